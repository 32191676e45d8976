//! Relationship definitions and assignments
//!
//! Kind directory, extension overlays, worker resolution, inverse inference
//! and the symmetric assignment set.

pub mod assignment;
pub mod catalog;
pub mod definitions;
pub mod engine;
pub mod extension;
pub mod inverse;
pub mod kind;
pub mod probe;
pub mod resolver;
pub mod worker;

// Re-export key types for convenience
pub use assignment::{AssignmentId, RelationshipAssignment, RelationshipSet};
pub use catalog::{AllowedRelationshipSet, CatalogIssue, RelationshipCatalog, infer_inverse};
pub use definitions::{
    DefinitionError, DefinitionSet, ExtensionDefinition, KindDefinition, WorkerDefinition,
};
pub use engine::{EngineError, LinkOutcome, RelationshipEngine};
pub use extension::{ExtensionDirectory, RelationshipKindExtension};
pub use inverse::InverseRelationshipMap;
pub use kind::{DirectoryError, KindDirectory, RelationshipKind};
pub use probe::{
    CharacterId, DirectRelation, ProbeError, ProbeFactory, ProbeSpec, SimpleCharacter,
    SimpleProbeFactory, SocialCharacter,
};
pub use resolver::RelationWorkerResolver;
pub use worker::{CreateRelation, ReciprocalWorker, RelationWorker, WorkerError, WorkerTypeRegistry};
