use crate::config::{
    ConfigBuilder, ConfigError, ConfigLoader, KinweaveConfig, LogFormat, LogLevel, validation,
};
use std::io::Write;
use std::path::PathBuf;

#[test]
fn test_default_config() {
    let config = KinweaveConfig::default();
    assert_eq!(config.logging.level, LogLevel::Info);
    assert_eq!(config.logging.format, LogFormat::Default);
    assert!(config.logging.stdout);
    assert_eq!(config.probe.character_kind, "colonist");
    assert_eq!(config.probe.faction, "player");
    assert!(config.definitions.path.is_none());
}

#[test]
fn test_config_builder() {
    let config = ConfigBuilder::new()
        .with_probe_character_kind("villager")
        .with_probe_faction("outlanders")
        .with_definitions("/tmp/kinds.toml")
        .with_log_level(LogLevel::Debug)
        .build()
        .unwrap();

    assert_eq!(config.probe.character_kind, "villager");
    assert_eq!(config.probe.faction, "outlanders");
    assert_eq!(
        config.definitions.path,
        Some(PathBuf::from("/tmp/kinds.toml"))
    );
    assert_eq!(config.logging.level, LogLevel::Debug);

    let spec = config.probe.to_spec();
    assert_eq!(spec.character_kind, "villager");
    assert_eq!(spec.faction, "outlanders");
}

#[test]
fn test_validation() {
    assert!(validation::validate_config(&KinweaveConfig::default()).is_ok());

    let result = ConfigBuilder::new().with_probe_faction("  ").build();
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));

    let result = ConfigBuilder::new().with_probe_character_kind("").build();
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

#[test]
fn test_predefined_configs() {
    let dev = ConfigBuilder::development().build().unwrap();
    let test = ConfigBuilder::testing().build().unwrap();
    let defaults = ConfigBuilder::defaults().build().unwrap();

    assert_eq!(dev.logging.level, LogLevel::Debug);
    assert_eq!(dev.logging.format, LogFormat::Pretty);
    assert_eq!(test.logging.level, LogLevel::Warn);
    assert_eq!(defaults.logging.format, LogFormat::Json);
}

#[test]
fn test_loader_reads_toml_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        "[probe]\ncharacter_kind = \"villager\"\n\n[logging]\nlevel = \"debug\"\nformat = \"compact\""
    )
    .unwrap();

    let config = ConfigLoader::new()
        .load_file(file.path())
        .unwrap()
        .extract()
        .unwrap();

    assert_eq!(config.probe.character_kind, "villager");
    assert_eq!(config.probe.faction, "player");
    assert_eq!(config.logging.level, LogLevel::Debug);
    assert_eq!(config.logging.format, LogFormat::Compact);
}

#[test]
fn test_loader_rejects_invalid_values() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{"probe": {{"faction": ""}}}}"#).unwrap();

    let result = ConfigLoader::new().load_file(file.path()).unwrap().extract();
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}

#[test]
fn test_loader_rejects_missing_and_unknown_files() {
    let mut loader = ConfigLoader::new();
    assert!(matches!(
        loader.load_file("/nonexistent/kinweave.toml"),
        Err(ConfigError::FileLoadError(_))
    ));

    let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
    assert!(matches!(
        loader.load_file(file.path()),
        Err(ConfigError::FileLoadError(_))
    ));
}

#[test]
fn test_config_serialization() {
    let config = ConfigBuilder::new()
        .with_probe_faction("outlanders")
        .build()
        .unwrap();

    let json = serde_json::to_string(&config).unwrap();
    let deserialized: KinweaveConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(config.probe, deserialized.probe);
    assert_eq!(config.logging.level, deserialized.logging.level);
}
