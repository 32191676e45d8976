use kinweave::config::{ConfigLoader, KinweaveConfig};
use kinweave::relationships::RelationshipEngine;
use std::path::PathBuf;

pub struct KinweaveCliContext {
    pub config: KinweaveConfig,
    pub engine: RelationshipEngine,
}

impl KinweaveCliContext {
    /// Load configuration and build the catalog.
    ///
    /// An explicit `config_path` replaces the default file search;
    /// `definitions` overrides the configured definitions file.
    pub fn new(config_path: Option<PathBuf>, definitions: Option<PathBuf>) -> kinweave::Result<Self> {
        let mut loader = ConfigLoader::new();
        match config_path {
            Some(path) => {
                loader.load_file(path)?;
            }
            None => {
                loader.load_default_files();
            }
        }
        let mut config = loader.load_env().extract()?;

        if definitions.is_some() {
            config.definitions.path = definitions;
        }

        // The CLI installs its own stderr subscriber
        config.logging.stdout = false;

        let engine = kinweave::init(&config)?;
        Ok(Self { config, engine })
    }
}
