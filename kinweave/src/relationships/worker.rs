//! Relation workers
//!
//! A worker is the pluggable logic that applies a relationship kind's effect
//! when two characters are linked. Kinds carry a default worker; extension
//! overlays can name a custom worker type that is built on demand from the
//! [`WorkerTypeRegistry`].
//!
//! Whether a worker can create relations at all is declared statically
//! through [`RelationWorker::relation_creator`]. Callers check that
//! capability without invoking anything.
//!
//! # Examples
//!
//! ```
//! use kinweave::relationships::{CreateRelation, RelationWorker, SocialCharacter, WorkerError};
//!
//! #[derive(Debug)]
//! struct MentorWorker;
//!
//! impl CreateRelation for MentorWorker {
//!     fn create_relation(
//!         &self,
//!         source: &mut dyn SocialCharacter,
//!         target: &mut dyn SocialCharacter,
//!     ) -> Result<(), WorkerError> {
//!         source.add_relation("Mentor", target.id());
//!         target.add_relation("Student", source.id());
//!         Ok(())
//!     }
//! }
//!
//! impl RelationWorker for MentorWorker {
//!     fn kind(&self) -> &str {
//!         "Mentor"
//!     }
//!
//!     fn relation_creator(&self) -> Option<&dyn CreateRelation> {
//!         Some(self)
//!     }
//! }
//! ```

use super::kind::{DirectoryError, RelationshipKind};
use super::probe::SocialCharacter;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Error raised by a worker while applying a relation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkerError {
    #[error("Relation rejected: {0}")]
    Rejected(String),

    #[error("Worker failed: {0}")]
    Failed(String),
}

/// The "create relation" capability
pub trait CreateRelation {
    /// Apply the kind's effect from `source` toward `target`
    fn create_relation(
        &self,
        source: &mut dyn SocialCharacter,
        target: &mut dyn SocialCharacter,
    ) -> Result<(), WorkerError>;
}

/// Logic bound to one relationship kind
pub trait RelationWorker: Send + Sync + fmt::Debug {
    /// Name of the kind this worker is bound to
    fn kind(&self) -> &str;

    /// The create-relation capability, if this worker has one
    fn relation_creator(&self) -> Option<&dyn CreateRelation> {
        None
    }
}

/// Data-driven worker.
///
/// Writes its kind from source to target and, when a reciprocal is set, the
/// reciprocal from target back to source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReciprocalWorker {
    kind: String,
    reciprocal: Option<String>,
}

impl ReciprocalWorker {
    pub fn new(kind: impl Into<String>, reciprocal: Option<String>) -> Self {
        Self {
            kind: kind.into(),
            reciprocal,
        }
    }

    /// Worker whose reciprocal is its own kind (sibling, spouse, ...)
    pub fn symmetric(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        Self {
            reciprocal: Some(kind.clone()),
            kind,
        }
    }

    /// Worker that only writes the forward relation
    pub fn one_way(kind: impl Into<String>) -> Self {
        Self::new(kind, None)
    }

    pub fn reciprocal(&self) -> Option<&str> {
        self.reciprocal.as_deref()
    }
}

impl CreateRelation for ReciprocalWorker {
    fn create_relation(
        &self,
        source: &mut dyn SocialCharacter,
        target: &mut dyn SocialCharacter,
    ) -> Result<(), WorkerError> {
        if source.id() == target.id() {
            return Err(WorkerError::Rejected(format!(
                "'{}' cannot link a character to itself",
                self.kind
            )));
        }

        source.add_relation(&self.kind, target.id());
        if let Some(reciprocal) = &self.reciprocal {
            target.add_relation(reciprocal, source.id());
        }
        Ok(())
    }
}

impl RelationWorker for ReciprocalWorker {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn relation_creator(&self) -> Option<&dyn CreateRelation> {
        Some(self)
    }
}

/// Builds a worker bound to a base kind
pub type WorkerConstructor =
    Arc<dyn Fn(&RelationshipKind) -> Option<Arc<dyn RelationWorker>> + Send + Sync>;

/// Custom worker types by name.
#[derive(Clone, Default)]
pub struct WorkerTypeRegistry {
    constructors: BTreeMap<String, WorkerConstructor>,
}

impl WorkerTypeRegistry {
    /// Worker type name for [`ReciprocalWorker::symmetric`]
    pub const SYMMETRIC: &'static str = "symmetric";

    /// Worker type name for [`ReciprocalWorker::one_way`]
    pub const ONE_WAY: &'static str = "one_way";

    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in data-driven worker types
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.constructors.insert(
            Self::SYMMETRIC.to_string(),
            Arc::new(|kind: &RelationshipKind| {
                Some(Arc::new(ReciprocalWorker::symmetric(kind.name())) as Arc<dyn RelationWorker>)
            }),
        );
        registry.constructors.insert(
            Self::ONE_WAY.to_string(),
            Arc::new(|kind: &RelationshipKind| {
                Some(Arc::new(ReciprocalWorker::one_way(kind.name())) as Arc<dyn RelationWorker>)
            }),
        );
        registry
    }

    /// Register a constructor under a type name
    pub fn register<F>(&mut self, type_name: impl Into<String>, constructor: F) -> Result<(), DirectoryError>
    where
        F: Fn(&RelationshipKind) -> Option<Arc<dyn RelationWorker>> + Send + Sync + 'static,
    {
        let type_name = type_name.into();
        if self.constructors.contains_key(&type_name) {
            return Err(DirectoryError::WorkerTypeAlreadyExists(type_name));
        }

        self.constructors.insert(type_name, Arc::new(constructor));
        Ok(())
    }

    /// Build a worker of `type_name` bound to `kind`
    pub fn construct(&self, type_name: &str, kind: &RelationshipKind) -> Option<Arc<dyn RelationWorker>> {
        self.constructors.get(type_name).and_then(|ctor| ctor(kind))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }
}

impl fmt::Debug for WorkerTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerTypeRegistry")
            .field("types", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationships::probe::SimpleCharacter;

    #[test]
    fn test_reciprocal_worker_writes_both_sides() {
        let worker = ReciprocalWorker::new("Parent", Some("Child".to_string()));
        let mut parent = SimpleCharacter::new("colonist", "player");
        let mut child = SimpleCharacter::new("colonist", "player");

        let creator = worker.relation_creator().unwrap();
        creator.create_relation(&mut parent, &mut child).unwrap();

        assert_eq!(parent.relations_toward(child.id()), vec!["Parent"]);
        assert_eq!(child.relations_toward(parent.id()), vec!["Child"]);
    }

    #[test]
    fn test_one_way_worker_leaves_target_untouched() {
        let worker = ReciprocalWorker::one_way("Admirer");
        let mut a = SimpleCharacter::new("colonist", "player");
        let mut b = SimpleCharacter::new("colonist", "player");

        worker.create_relation(&mut a, &mut b).unwrap();
        assert_eq!(a.relations_toward(b.id()), vec!["Admirer"]);
        assert!(b.relations_toward(a.id()).is_empty());
    }

    #[test]
    fn test_default_worker_has_no_capability() {
        #[derive(Debug)]
        struct InertWorker;

        impl RelationWorker for InertWorker {
            fn kind(&self) -> &str {
                "Inert"
            }
        }

        assert!(InertWorker.relation_creator().is_none());
    }

    #[test]
    fn test_builtin_registry_constructs_bound_workers() {
        let registry = WorkerTypeRegistry::with_builtin();
        let kind = RelationshipKind::new("Spouse").unwrap();

        let worker = registry
            .construct(WorkerTypeRegistry::SYMMETRIC, &kind)
            .unwrap();
        assert_eq!(worker.kind(), "Spouse");
        assert!(worker.relation_creator().is_some());
        assert!(registry.construct("teleporter", &kind).is_none());
    }

    #[test]
    fn test_register_duplicate_type_fails() {
        let mut registry = WorkerTypeRegistry::with_builtin();
        let result = registry.register(WorkerTypeRegistry::ONE_WAY, |_| None);
        assert_eq!(
            result,
            Err(DirectoryError::WorkerTypeAlreadyExists("one_way".to_string()))
        );

        assert!(registry.register("custom", |_| None).is_ok());
        assert!(registry.contains("custom"));
    }
}
