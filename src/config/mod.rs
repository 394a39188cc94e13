//! Configuration module for the instagram-archiver.
//!
//! This module handles:
//! - Loading configuration from YAML (or TOML) files
//! - Configuration validation

pub mod loader;
pub mod validation;

pub use loader::{Config, DEFAULT_CONFIG_PATH, DEFAULT_TIMEOUT_SECS};
pub use validation::validate_config;
