//! # kinweave
//!
//! Relationship definitions and assignments for character-driven simulations.
//!
//! A session starts from a directory of relationship kinds, each with an
//! optional worker that applies the kind's effect, and optional extension
//! overlays that add an explicit inverse, conflicting kinds, a custom worker
//! type, or the animal-only and compatibility-required flags.
//!
//! From these the [`RelationshipCatalog`](relationships::RelationshipCatalog)
//! derives:
//!
//! - the kinds a user may assign by hand
//! - each kind's inverse, inferred by running its worker between two
//!   disposable probe characters when the overlay does not declare one
//!
//! User-authored relationships live in a
//! [`RelationshipSet`](relationships::RelationshipSet), where "A is Parent
//! of B" is also found as "B is Child of A".
//!
//! ## Quick Start
//!
//! ```rust
//! use kinweave::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     let kinds = KindDirectory::from_kinds([
//!         RelationshipKind::new("Parent")?
//!             .family_by_blood()
//!             .with_worker(Arc::new(ReciprocalWorker::new("Parent", Some("Child".to_string())))),
//!         RelationshipKind::new("Rival")?.with_worker(Arc::new(ReciprocalWorker::symmetric("Rival"))),
//!     ])?;
//!
//!     let mut engine = RelationshipEngine::new(
//!         kinds,
//!         ExtensionDirectory::new(),
//!         WorkerTypeRegistry::with_builtin(),
//!         &SimpleProbeFactory,
//!         &ProbeSpec::new("colonist", "player"),
//!     );
//!
//!     assert_eq!(engine.catalog().inverse_of("Parent"), Some("Child"));
//!     assert!(!engine.catalog().is_assignable("Parent"));
//!
//!     let (a, b) = (CharacterId::new(), CharacterId::new());
//!     engine.link("Rival", a, b)?;
//!     assert!(engine.relationships().contains("Rival", b, a));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod logging;
pub mod relationships;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    pub use crate::{init, init_with_probes};

    pub use crate::config::{
        ConfigBuilder, ConfigLoader, KinweaveConfig, LogFormat, LogLevel, LoggingConfig,
        ProbeConfig,
    };

    pub use crate::relationships::{
        AllowedRelationshipSet, AssignmentId, CatalogIssue, CharacterId, CreateRelation,
        DefinitionSet, ExtensionDirectory, InverseRelationshipMap, KindDirectory, LinkOutcome,
        ProbeFactory, ProbeSpec, ReciprocalWorker, RelationWorker, RelationshipAssignment,
        RelationshipCatalog, RelationshipEngine, RelationshipKind, RelationshipKindExtension,
        RelationshipSet, SimpleProbeFactory, SocialCharacter, WorkerTypeRegistry,
    };

    pub use crate::{KinweaveError, Result};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for kinweave operations
#[derive(Debug, thiserror::Error)]
pub enum KinweaveError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Logging error
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LogError),

    /// Invalid or duplicate kind, overlay or worker type
    #[error(transparent)]
    Directory(#[from] crate::relationships::DirectoryError),

    /// Definitions file could not be loaded or applied
    #[error(transparent)]
    Definitions(#[from] crate::relationships::DefinitionError),

    /// Probe failure surfaced to the caller
    #[error("Probe error: {0}")]
    Probe(#[from] crate::relationships::ProbeError),

    /// Worker failure surfaced to the caller
    #[error(transparent)]
    Worker(#[from] crate::relationships::WorkerError),

    /// Rejected assignment
    #[error(transparent)]
    Engine(#[from] crate::relationships::EngineError),

    /// Kind name not present in the catalog
    #[error("Relationship kind '{0}' not found")]
    UnknownKind(String),
}

impl From<crate::config::ConfigError> for KinweaveError {
    fn from(err: crate::config::ConfigError) -> Self {
        KinweaveError::Configuration(err.to_string())
    }
}

/// Result type for kinweave operations
pub type Result<T> = std::result::Result<T, KinweaveError>;

/// Build a relationship engine from configuration.
///
/// Initializes logging, loads the configured definitions file, and probes
/// with in-memory [`SimpleProbeFactory`](relationships::SimpleProbeFactory)
/// characters.
///
/// # Examples
///
/// ```rust
/// use kinweave::prelude::*;
///
/// fn example() -> Result<()> {
///     let config = ConfigBuilder::testing()
///         .with_definitions("kinds.toml")
///         .build()?;
///
///     let engine = init(&config)?;
///     for kind in engine.catalog().allowed().iter() {
///         println!("{kind}");
///     }
///     Ok(())
/// }
/// ```
pub fn init(config: &config::KinweaveConfig) -> Result<relationships::RelationshipEngine> {
    init_with_probes(config, &relationships::SimpleProbeFactory)
}

/// Build a relationship engine from configuration with a host-supplied probe
/// factory.
pub fn init_with_probes(
    config: &config::KinweaveConfig,
    probes: &dyn relationships::ProbeFactory,
) -> Result<relationships::RelationshipEngine> {
    logging::init(&config.logging)?;

    let definitions = match &config.definitions.path {
        Some(path) => relationships::DefinitionSet::load(path)?,
        None => {
            tracing::warn!("No definitions file configured; starting with an empty directory");
            relationships::DefinitionSet::default()
        }
    };

    let (kinds, extensions) = definitions.into_directories()?;

    Ok(relationships::RelationshipEngine::new(
        kinds,
        extensions,
        relationships::WorkerTypeRegistry::with_builtin(),
        probes,
        &config.probe.to_spec(),
    ))
}
