//! Configuration builder.

use super::{Result, models::*, validation};
use std::path::Path;

/// Builder for creating KinweaveConfig instances.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: KinweaveConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: KinweaveConfig::default(),
        }
    }

    /// Set the probe character kind.
    pub fn with_probe_character_kind(mut self, kind: impl Into<String>) -> Self {
        self.config.probe.character_kind = kind.into();
        self
    }

    /// Set the faction probes are spawned into.
    pub fn with_probe_faction(mut self, faction: impl Into<String>) -> Self {
        self.config.probe.faction = faction.into();
        self
    }

    /// Load relationship definitions from a file.
    pub fn with_definitions<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.definitions.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set the log format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Configure logging to a file.
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Disable logging to stdout.
    pub fn without_stdout_logging(mut self) -> Self {
        self.config.logging.stdout = false;
        self
    }

    /// Configuration for development: debug-level pretty logging.
    pub fn development() -> Self {
        Self::new()
            .with_log_level(LogLevel::Debug)
            .with_log_format(LogFormat::Pretty)
    }

    /// Configuration for automated tests: only warnings, compact output.
    pub fn testing() -> Self {
        Self::new()
            .with_log_level(LogLevel::Warn)
            .with_log_format(LogFormat::Compact)
    }

    /// Fully default configuration with JSON logging at Info level.
    pub fn defaults() -> Self {
        Self::new()
            .with_log_level(LogLevel::Info)
            .with_log_format(LogFormat::Json)
    }

    /// Build the configuration, validating it in the process.
    pub fn build(self) -> Result<KinweaveConfig> {
        validation::validate_config(&self.config)?;

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
