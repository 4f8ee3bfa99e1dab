//! Core domain models for reqcheck
//!
//! This module contains the fundamental types used throughout the application:
//! - Dependency records read from requirements.txt
//! - The aggregated update report

mod dependency;
mod report;

pub use dependency::Dependency;
pub use report::{ReportGroup, UpdateReport, WITHOUT_UPDATES_TITLE, WITH_UPDATES_TITLE};
