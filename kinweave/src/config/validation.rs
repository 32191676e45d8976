//! Configuration validation utilities.

use super::ConfigError;
use super::models::*;

/// Validate the entire configuration.
pub fn validate_config(config: &KinweaveConfig) -> Result<(), ConfigError> {
    validate_probe_config(&config.probe)?;
    validate_definitions_config(&config.definitions)?;
    validate_logging_config(&config.logging)?;

    Ok(())
}

fn validate_probe_config(config: &ProbeConfig) -> Result<(), ConfigError> {
    if config.character_kind.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Probe character kind cannot be empty".to_string(),
        ));
    }

    if config.faction.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Probe faction cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_definitions_config(config: &DefinitionsConfig) -> Result<(), ConfigError> {
    if let Some(path) = &config.path
        && path.as_os_str().is_empty()
    {
        return Err(ConfigError::ValidationError(
            "Definitions path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<(), ConfigError> {
    if let Some(file) = &config.file
        && file.file_name().is_none()
    {
        return Err(ConfigError::ValidationError(format!(
            "Log file path has no file name: {}",
            file.display()
        )));
    }

    Ok(())
}
