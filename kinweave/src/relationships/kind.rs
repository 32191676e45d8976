//! Relationship kind directory
//!
//! Base definitions of every relationship kind known to a session, in the
//! order they were registered. Iteration order is stable and drives the order
//! of the allowed set and of inverse inference.

use super::worker::RelationWorker;
use std::collections::HashMap;
use std::sync::Arc;

/// Error types for directory operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("Relationship kind already exists: {0}")]
    KindAlreadyExists(String),

    #[error("Relationship kind extension already exists: {0}")]
    ExtensionAlreadyExists(String),

    #[error("Worker type already registered: {0}")]
    WorkerTypeAlreadyExists(String),

    #[error("Invalid kind name: {0}")]
    InvalidKindName(String),
}

/// Validate a kind name the same way for kinds, overlays and inverse names.
pub(crate) fn validate_kind_name(name: &str) -> Result<(), DirectoryError> {
    if name.trim().is_empty() {
        return Err(DirectoryError::InvalidKindName(
            "Kind name cannot be empty".to_string(),
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err(DirectoryError::InvalidKindName(format!(
            "'{name}' may only contain alphanumeric characters, hyphens, and underscores"
        )));
    }

    Ok(())
}

/// Base definition of a relationship kind.
///
/// The default worker is optional: a kind without one is only usable when an
/// extension overlay supplies a custom worker type.
#[derive(Debug, Clone)]
pub struct RelationshipKind {
    name: String,
    family_by_blood: bool,
    default_worker: Option<Arc<dyn RelationWorker>>,
}

impl RelationshipKind {
    /// Create a new kind with no worker that is not family-by-blood
    pub fn new(name: impl Into<String>) -> Result<Self, DirectoryError> {
        let name = name.into();
        validate_kind_name(&name)?;

        Ok(Self {
            name,
            family_by_blood: false,
            default_worker: None,
        })
    }

    /// Mark this kind as family-by-blood (derived during generation, never
    /// assigned by hand)
    pub fn family_by_blood(mut self) -> Self {
        self.family_by_blood = true;
        self
    }

    /// Set the default worker
    pub fn with_worker(mut self, worker: Arc<dyn RelationWorker>) -> Self {
        self.default_worker = Some(worker);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_family_by_blood(&self) -> bool {
        self.family_by_blood
    }

    pub fn default_worker(&self) -> Option<&Arc<dyn RelationWorker>> {
        self.default_worker.as_ref()
    }
}

/// Ordered directory of relationship kinds, unique by name.
#[derive(Debug, Clone, Default)]
pub struct KindDirectory {
    kinds: Vec<RelationshipKind>,
    index: HashMap<String, usize>,
}

impl KindDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from kinds in order, failing on the first duplicate
    pub fn from_kinds(
        kinds: impl IntoIterator<Item = RelationshipKind>,
    ) -> Result<Self, DirectoryError> {
        let mut directory = Self::new();
        for kind in kinds {
            directory.register(kind)?;
        }
        Ok(directory)
    }

    /// Append a kind
    pub fn register(&mut self, kind: RelationshipKind) -> Result<(), DirectoryError> {
        if self.index.contains_key(kind.name()) {
            return Err(DirectoryError::KindAlreadyExists(kind.name().to_string()));
        }

        self.index.insert(kind.name().to_string(), self.kinds.len());
        self.kinds.push(kind);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RelationshipKind> {
        self.index.get(name).map(|&i| &self.kinds[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Kinds in registration order
    pub fn iter(&self) -> impl Iterator<Item = &RelationshipKind> {
        self.kinds.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.kinds.iter().map(RelationshipKind::name)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationships::worker::ReciprocalWorker;

    #[test]
    fn test_register_and_get() {
        let mut directory = KindDirectory::new();
        directory
            .register(RelationshipKind::new("Rival").unwrap())
            .unwrap();

        let kind = directory.get("Rival").unwrap();
        assert_eq!(kind.name(), "Rival");
        assert!(!kind.is_family_by_blood());
        assert!(kind.default_worker().is_none());
        assert!(directory.get("Friend").is_none());
    }

    #[test]
    fn test_register_duplicate_fails() {
        let mut directory = KindDirectory::new();
        directory
            .register(RelationshipKind::new("Rival").unwrap())
            .unwrap();

        let err = directory
            .register(RelationshipKind::new("Rival").unwrap())
            .unwrap_err();
        assert_eq!(err, DirectoryError::KindAlreadyExists("Rival".to_string()));
    }

    #[test]
    fn test_iteration_keeps_registration_order() {
        let directory = KindDirectory::from_kinds(
            ["Parent", "Sibling", "Bond", "Rival"]
                .into_iter()
                .map(|name| RelationshipKind::new(name).unwrap()),
        )
        .unwrap();

        let names: Vec<_> = directory.names().collect();
        assert_eq!(names, vec!["Parent", "Sibling", "Bond", "Rival"]);
        assert_eq!(directory.len(), 4);
    }

    #[test]
    fn test_kind_builder() {
        let kind = RelationshipKind::new("Sibling")
            .unwrap()
            .family_by_blood()
            .with_worker(Arc::new(ReciprocalWorker::symmetric("Sibling")));

        assert!(kind.is_family_by_blood());
        assert_eq!(kind.default_worker().unwrap().kind(), "Sibling");
    }

    #[test]
    fn test_invalid_kind_names() {
        assert!(RelationshipKind::new("").is_err());
        assert!(RelationshipKind::new("   ").is_err());
        assert!(RelationshipKind::new("ex@lover").is_err());
        assert!(RelationshipKind::new("ex_lover").is_ok());
        assert!(RelationshipKind::new("half-sibling").is_ok());
    }
}
