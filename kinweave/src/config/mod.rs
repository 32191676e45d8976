//! Configuration system for kinweave.
//!
//! Configuration is layered from defaults, files, and environment variables,
//! then validated.

mod builder;
mod loader;
mod models;
#[cfg(test)]
mod tests;
mod validation;

pub use builder::ConfigBuilder;
pub use loader::ConfigLoader;
pub use models::*;

/// Default configuration file names that the system will look for
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "kinweave.toml",
    "kinweave.yaml",
    "kinweave.yml",
    "kinweave.json",
    ".kinweave/config.toml",
    ".kinweave/config.yaml",
    ".kinweave/config.yml",
    ".kinweave/config.json",
];

/// Environment variable prefix for kinweave configuration
pub const ENV_PREFIX: &str = "KINWEAVE_";

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error occurred during file loading
    #[error("Failed to load configuration file: {0}")]
    FileLoadError(String),

    /// Error occurred during validation
    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    /// Error occurred during parsing
    #[error("Configuration parsing error: {0}")]
    ParseError(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
