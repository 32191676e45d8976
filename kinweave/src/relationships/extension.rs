//! Extension overlays
//!
//! Optional per-kind metadata layered on top of a base [`RelationshipKind`],
//! keyed by the same unique name: an explicit inverse, conflicting kinds, a
//! custom worker type, and the animal-only and compatibility-required flags.

use super::kind::{DirectoryError, KindDirectory, validate_kind_name};
use super::worker::{RelationWorker, WorkerTypeRegistry};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::warn;

/// Overrides for one relationship kind.
#[derive(Debug, Clone)]
pub struct RelationshipKindExtension {
    name: String,
    inverse: Option<String>,
    conflicts: Vec<String>,
    worker_type: Option<String>,
    animal_only: bool,
    requires_compatibility: bool,
    custom_worker: OnceLock<Option<Arc<dyn RelationWorker>>>,
}

impl RelationshipKindExtension {
    /// Create an empty overlay for the kind called `name`
    pub fn new(name: impl Into<String>) -> Result<Self, DirectoryError> {
        let name = name.into();
        validate_kind_name(&name)?;

        Ok(Self {
            name,
            inverse: None,
            conflicts: Vec::new(),
            worker_type: None,
            animal_only: false,
            requires_compatibility: false,
            custom_worker: OnceLock::new(),
        })
    }

    /// Declare the inverse kind explicitly
    pub fn with_inverse(mut self, inverse: impl Into<String>) -> Self {
        self.inverse = Some(inverse.into());
        self
    }

    /// Add a kind this one cannot coexist with
    pub fn with_conflict(mut self, other: impl Into<String>) -> Self {
        self.conflicts.push(other.into());
        self
    }

    /// Name the custom worker type that replaces the kind's default worker
    pub fn with_worker_type(mut self, worker_type: impl Into<String>) -> Self {
        self.worker_type = Some(worker_type.into());
        self
    }

    /// Restrict this kind to animals
    pub fn animal_only(mut self) -> Self {
        self.animal_only = true;
        self
    }

    /// Require compatibility between the two characters
    pub fn requires_compatibility(mut self) -> Self {
        self.requires_compatibility = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inverse(&self) -> Option<&str> {
        self.inverse.as_deref()
    }

    pub fn conflicts(&self) -> &[String] {
        &self.conflicts
    }

    /// Whether `other` is listed as a conflict of this kind
    pub fn lists_conflict(&self, other: &str) -> bool {
        self.conflicts.iter().any(|c| c == other)
    }

    pub fn worker_type(&self) -> Option<&str> {
        self.worker_type.as_deref()
    }

    pub fn is_animal_only(&self) -> bool {
        self.animal_only
    }

    pub fn is_compatibility_required(&self) -> bool {
        self.requires_compatibility
    }

    /// The custom worker for this kind.
    ///
    /// Built once on first request, bound to the base kind with the same
    /// name, and memoized. Yields `None` when no custom type is named, the
    /// base kind is missing, or the type is not registered; the caller then
    /// falls back to the kind's default worker.
    pub fn custom_worker(
        &self,
        kinds: &KindDirectory,
        worker_types: &WorkerTypeRegistry,
    ) -> Option<Arc<dyn RelationWorker>> {
        let worker_type = self.worker_type.as_deref()?;

        self.custom_worker
            .get_or_init(|| {
                let Some(kind) = kinds.get(&self.name) else {
                    warn!(
                        kind = %self.name,
                        worker_type,
                        "Extension has no base kind; custom worker unavailable"
                    );
                    return None;
                };

                let worker = worker_types.construct(worker_type, kind);
                if worker.is_none() {
                    warn!(
                        kind = %self.name,
                        worker_type,
                        "Custom worker type could not be built"
                    );
                }
                worker
            })
            .clone()
    }
}

/// Extension overlays by kind name.
#[derive(Debug, Clone, Default)]
pub struct ExtensionDirectory {
    extensions: HashMap<String, RelationshipKindExtension>,
}

impl ExtensionDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from overlays, failing on the first duplicate name
    pub fn from_extensions(
        extensions: impl IntoIterator<Item = RelationshipKindExtension>,
    ) -> Result<Self, DirectoryError> {
        let mut directory = Self::new();
        for extension in extensions {
            directory.register(extension)?;
        }
        Ok(directory)
    }

    /// Add an overlay
    pub fn register(&mut self, extension: RelationshipKindExtension) -> Result<(), DirectoryError> {
        if self.extensions.contains_key(extension.name()) {
            return Err(DirectoryError::ExtensionAlreadyExists(
                extension.name().to_string(),
            ));
        }

        self.extensions
            .insert(extension.name().to_string(), extension);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RelationshipKindExtension> {
        self.extensions.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RelationshipKindExtension> {
        self.extensions.values()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// True if either kind's overlay lists the other as a conflict
    pub fn conflicts_with(&self, a: &str, b: &str) -> bool {
        if a == b {
            return false;
        }

        let lists = |from: &str, to: &str| {
            self.get(from)
                .is_some_and(|extension| extension.lists_conflict(to))
        };
        lists(a, b) || lists(b, a)
    }
}
