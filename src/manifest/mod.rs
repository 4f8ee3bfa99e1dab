//! Manifest file reading
//!
//! This module provides functionality to:
//! - Locate requirements.txt in a project directory
//! - Stream dependency declarations out of it line by line

mod requirements;

pub use requirements::{parse_requirement_line, RequirementsReader, REQUIREMENTS_FILE};
