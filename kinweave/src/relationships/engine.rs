//! Session facade over the catalog and the assignment set

use super::assignment::{AssignmentId, RelationshipAssignment, RelationshipSet};
use super::catalog::RelationshipCatalog;
use super::extension::ExtensionDirectory;
use super::kind::KindDirectory;
use super::probe::{CharacterId, ProbeFactory, ProbeSpec};
use super::worker::WorkerTypeRegistry;
use tracing::{debug, instrument};

/// Error types for engine operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Relationship kind '{kind}' cannot be assigned by hand")]
    NotAssignable { kind: String },

    #[error("Character {character} cannot be linked to itself")]
    SelfLink { character: CharacterId },
}

/// Result of [`RelationshipEngine::link`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// A new assignment was stored
    Created(AssignmentId),
    /// The relationship was already present, from either side
    Existing(AssignmentId),
}

impl LinkOutcome {
    pub fn id(&self) -> AssignmentId {
        match self {
            LinkOutcome::Created(id) | LinkOutcome::Existing(id) => *id,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, LinkOutcome::Created(_))
    }
}

/// Catalog plus the user-authored relationships of one session.
#[derive(Debug)]
pub struct RelationshipEngine {
    catalog: RelationshipCatalog,
    relationships: RelationshipSet,
}

impl RelationshipEngine {
    /// Build the catalog and start with an empty relationship set
    pub fn new(
        kinds: KindDirectory,
        extensions: ExtensionDirectory,
        worker_types: WorkerTypeRegistry,
        probes: &dyn ProbeFactory,
        spec: &ProbeSpec,
    ) -> Self {
        Self::from_catalog(RelationshipCatalog::build(
            kinds,
            extensions,
            worker_types,
            probes,
            spec,
        ))
    }

    pub fn from_catalog(catalog: RelationshipCatalog) -> Self {
        let relationships = RelationshipSet::new(catalog.inverses().clone());
        Self {
            catalog,
            relationships,
        }
    }

    /// Assign "`source` is `kind` of `target`" unless it is already known
    #[instrument(skip(self), level = "debug")]
    pub fn link(
        &mut self,
        kind: &str,
        source: CharacterId,
        target: CharacterId,
    ) -> Result<LinkOutcome, EngineError> {
        if !self.catalog.is_assignable(kind) {
            return Err(EngineError::NotAssignable {
                kind: kind.to_string(),
            });
        }

        if source == target {
            return Err(EngineError::SelfLink { character: source });
        }

        if let Some(existing) = self.relationships.find(kind, source, target) {
            debug!(id = %existing.id, "Relationship already present");
            return Ok(LinkOutcome::Existing(existing.id));
        }

        let id = self.relationships.assign(kind, source, target);
        debug!(%id, "Relationship created");
        Ok(LinkOutcome::Created(id))
    }

    /// Remove the assignment matching "`source` is `kind` of `target`",
    /// from either side
    pub fn unlink(
        &mut self,
        kind: &str,
        source: CharacterId,
        target: CharacterId,
    ) -> Option<RelationshipAssignment> {
        let id = self.relationships.find(kind, source, target)?.id;
        self.relationships.remove(id)
    }

    /// Drop every assignment involving `character`
    pub fn remove_character(&mut self, character: CharacterId) -> usize {
        self.relationships.remove_character(character)
    }

    pub fn catalog(&self) -> &RelationshipCatalog {
        &self.catalog
    }

    pub fn relationships(&self) -> &RelationshipSet {
        &self.relationships
    }
}
