//! Worker resolution
//!
//! Picks the worker that executes a kind's effect: the overlay's custom worker
//! when one is named and can be built, the kind's default worker otherwise.

use super::extension::ExtensionDirectory;
use super::kind::{KindDirectory, RelationshipKind};
use super::worker::{RelationWorker, WorkerTypeRegistry};
use std::sync::Arc;

/// Resolves the worker for each relationship kind.
///
/// Custom workers are memoized inside their overlay, so repeated resolution
/// returns the same instance.
#[derive(Debug, Clone, Copy)]
pub struct RelationWorkerResolver<'a> {
    kinds: &'a KindDirectory,
    extensions: &'a ExtensionDirectory,
    worker_types: &'a WorkerTypeRegistry,
}

impl<'a> RelationWorkerResolver<'a> {
    pub fn new(
        kinds: &'a KindDirectory,
        extensions: &'a ExtensionDirectory,
        worker_types: &'a WorkerTypeRegistry,
    ) -> Self {
        Self {
            kinds,
            extensions,
            worker_types,
        }
    }

    /// Worker for `kind`, or `None` when the kind is unusable
    pub fn resolve(&self, kind: &RelationshipKind) -> Option<Arc<dyn RelationWorker>> {
        self.extensions
            .get(kind.name())
            .and_then(|extension| extension.custom_worker(self.kinds, self.worker_types))
            .or_else(|| kind.default_worker().cloned())
    }

    /// Worker for the kind called `name`
    pub fn resolve_by_name(&self, name: &str) -> Option<Arc<dyn RelationWorker>> {
        self.kinds.get(name).and_then(|kind| self.resolve(kind))
    }

    /// Whether the resolved worker can create relations
    pub fn can_create_relation(&self, kind: &RelationshipKind) -> bool {
        self.resolve(kind)
            .is_some_and(|worker| worker.relation_creator().is_some())
    }
}
