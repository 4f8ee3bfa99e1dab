//! reqcheck - requirements.txt freshness checker library
//!
//! This library provides the core functionality for comparing the versions
//! pinned in a project's requirements.txt against the latest releases
//! published on PyPI:
//! - Streaming manifest reader
//! - Bounded pool of concurrent registry lookups
//! - Aggregation into "with updates" / "without updates" groups

pub mod cli;
pub mod domain;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod pool;
pub mod progress;
pub mod queue;
pub mod registry;
