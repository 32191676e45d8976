//! Relationship catalog
//!
//! Built once per session from the kind directory, the extension overlays and
//! a probe factory. It produces:
//!
//! - the [`AllowedRelationshipSet`]: kinds a user may attach by hand
//! - the [`InverseRelationshipMap`]: each kind's reciprocal kind
//!
//! Most kinds do not declare their inverse. For those the catalog runs the
//! kind's worker between two fresh probe characters and takes the first
//! relation that appears on the target, pointing back at the source, as the
//! inverse (see [`infer_inverse`]). Failures are per kind: they are logged,
//! recorded as a [`CatalogIssue`], and never stop the build.

use super::extension::ExtensionDirectory;
use super::inverse::InverseRelationshipMap;
use super::kind::{KindDirectory, RelationshipKind};
use super::probe::{ProbeError, ProbeFactory, ProbeSpec};
use super::resolver::RelationWorkerResolver;
use super::worker::{RelationWorker, WorkerTypeRegistry};
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Kinds eligible for manual assignment, in directory order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AllowedRelationshipSet {
    kinds: Vec<String>,
}

impl AllowedRelationshipSet {
    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.iter().any(|k| k == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.kinds.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Non-fatal problem found while building the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum CatalogIssue {
    /// No worker, or a worker without the create-relation capability
    UnresolvableKind { kind: String, reason: String },

    /// The overlay names an inverse that is not a known kind
    UnknownExplicitInverse { kind: String, inverse: String },

    /// Probing did not yield an inverse
    InferenceFailed { kind: String, reason: String },
}

impl CatalogIssue {
    pub fn kind(&self) -> &str {
        match self {
            CatalogIssue::UnresolvableKind { kind, .. }
            | CatalogIssue::UnknownExplicitInverse { kind, .. }
            | CatalogIssue::InferenceFailed { kind, .. } => kind,
        }
    }
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogIssue::UnresolvableKind { kind, reason } => {
                write!(f, "{kind}: unresolvable ({reason})")
            }
            CatalogIssue::UnknownExplicitInverse { kind, inverse } => {
                write!(f, "{kind}: explicit inverse '{inverse}' is not a known kind")
            }
            CatalogIssue::InferenceFailed { kind, reason } => {
                write!(f, "{kind}: inverse inference failed ({reason})")
            }
        }
    }
}

/// Infer the inverse of `kind` by running its worker between two probes.
///
/// Spawns a source and a target probe, invokes create-relation from source
/// to target, and returns the first relation kind the target gained toward
/// the source. `Ok(None)` means the worker ran but nothing appeared on the
/// target. Worker errors and panics are returned as [`ProbeError`]. Both
/// probes are dropped before this returns.
pub fn infer_inverse(
    kind: &str,
    worker: &dyn RelationWorker,
    probes: &dyn ProbeFactory,
    spec: &ProbeSpec,
) -> Result<Option<String>, ProbeError> {
    let creator = worker
        .relation_creator()
        .ok_or_else(|| ProbeError::MissingCapability {
            kind: kind.to_string(),
        })?;

    let mut source = probes.spawn(spec)?;
    let mut target = probes.spawn(spec)?;
    let before = target.relations_toward(source.id());

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        creator.create_relation(source.as_mut(), target.as_mut())
    }));

    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            return Err(ProbeError::WorkerFailed {
                kind: kind.to_string(),
                reason: e.to_string(),
            });
        }
        Err(payload) => {
            return Err(ProbeError::WorkerPanicked {
                kind: kind.to_string(),
                message: panic_message(payload.as_ref()),
            });
        }
    }

    let after = target.relations_toward(source.id());
    Ok(first_new_relation(before, after))
}

/// First entry of `after` not accounted for by `before`, counting duplicates
fn first_new_relation(mut before: Vec<String>, after: Vec<String>) -> Option<String> {
    for kind in after {
        match before.iter().position(|k| *k == kind) {
            Some(i) => {
                before.remove(i);
            }
            None => return Some(kind),
        }
    }
    None
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Allowed set and inverse map for one session.
#[derive(Debug)]
pub struct RelationshipCatalog {
    kinds: KindDirectory,
    extensions: ExtensionDirectory,
    worker_types: WorkerTypeRegistry,
    allowed: AllowedRelationshipSet,
    inverses: Arc<InverseRelationshipMap>,
    issues: Vec<CatalogIssue>,
}

impl RelationshipCatalog {
    /// Build the catalog.
    ///
    /// `probes` and `spec` are only used during the build; probe characters
    /// never outlive it.
    pub fn build(
        kinds: KindDirectory,
        extensions: ExtensionDirectory,
        worker_types: WorkerTypeRegistry,
        probes: &dyn ProbeFactory,
        spec: &ProbeSpec,
    ) -> Self {
        let span = tracing::info_span!("catalog_build", kinds = kinds.len());
        let _guard = span.enter();

        let resolver = RelationWorkerResolver::new(&kinds, &extensions, &worker_types);
        let mut issues = Vec::new();

        let workers: Vec<Option<Arc<dyn RelationWorker>>> = kinds
            .iter()
            .map(|kind| resolve_usable(&resolver, kind, &mut issues))
            .collect();

        let allowed = build_allowed(&kinds, &extensions, &workers);
        let inverses = build_inverses(&kinds, &extensions, &workers, probes, spec, &mut issues);

        info!(
            allowed = allowed.len(),
            inverses = inverses.len(),
            issues = issues.len(),
            "Relationship catalog built"
        );

        Self {
            kinds,
            extensions,
            worker_types,
            allowed,
            inverses: Arc::new(inverses),
            issues,
        }
    }

    pub fn allowed(&self) -> &AllowedRelationshipSet {
        &self.allowed
    }

    pub fn inverses(&self) -> &Arc<InverseRelationshipMap> {
        &self.inverses
    }

    /// Inverse of `kind`, if known
    pub fn inverse_of(&self, kind: &str) -> Option<&str> {
        self.inverses.get(kind)
    }

    /// Whether `kind` may be attached by hand
    pub fn is_assignable(&self, kind: &str) -> bool {
        self.allowed.contains(kind)
    }

    /// True if either kind's overlay lists the other as a conflict
    pub fn conflicts_with(&self, a: &str, b: &str) -> bool {
        self.extensions.conflicts_with(a, b)
    }

    /// Every kind that conflicts with `kind`, from either side, in directory
    /// order
    pub fn conflicts_of(&self, kind: &str) -> Vec<&str> {
        self.kinds
            .names()
            .filter(|other| self.conflicts_with(kind, other))
            .collect()
    }

    pub fn is_animal_only(&self, kind: &str) -> bool {
        self.extensions
            .get(kind)
            .is_some_and(|e| e.is_animal_only())
    }

    pub fn is_compatibility_required(&self, kind: &str) -> bool {
        self.extensions
            .get(kind)
            .is_some_and(|e| e.is_compatibility_required())
    }

    /// Non-fatal problems recorded during the build
    pub fn issues(&self) -> &[CatalogIssue] {
        &self.issues
    }

    pub fn kinds(&self) -> &KindDirectory {
        &self.kinds
    }

    pub fn extensions(&self) -> &ExtensionDirectory {
        &self.extensions
    }

    /// Resolver over this catalog's directories
    pub fn resolver(&self) -> RelationWorkerResolver<'_> {
        RelationWorkerResolver::new(&self.kinds, &self.extensions, &self.worker_types)
    }
}

/// Resolve a kind's worker, recording the kind as unresolvable when it has
/// no worker or the worker cannot create relations
fn resolve_usable(
    resolver: &RelationWorkerResolver<'_>,
    kind: &RelationshipKind,
    issues: &mut Vec<CatalogIssue>,
) -> Option<Arc<dyn RelationWorker>> {
    let reason = match resolver.resolve(kind) {
        Some(worker) if worker.relation_creator().is_some() => return Some(worker),
        Some(_) => "worker cannot create relations",
        None => "no worker",
    };

    warn!(kind = kind.name(), reason, "Relationship kind is unresolvable");
    issues.push(CatalogIssue::UnresolvableKind {
        kind: kind.name().to_string(),
        reason: reason.to_string(),
    });
    None
}

fn build_allowed(
    kinds: &KindDirectory,
    extensions: &ExtensionDirectory,
    workers: &[Option<Arc<dyn RelationWorker>>],
) -> AllowedRelationshipSet {
    let kinds = kinds
        .iter()
        .zip(workers)
        .filter(|(kind, worker)| {
            !kind.is_family_by_blood()
                && !extensions
                    .get(kind.name())
                    .is_some_and(|e| e.is_animal_only())
                && worker.is_some()
        })
        .map(|(kind, _)| kind.name().to_string())
        .collect();

    AllowedRelationshipSet { kinds }
}

fn build_inverses(
    kinds: &KindDirectory,
    extensions: &ExtensionDirectory,
    workers: &[Option<Arc<dyn RelationWorker>>],
    probes: &dyn ProbeFactory,
    spec: &ProbeSpec,
    issues: &mut Vec<CatalogIssue>,
) -> InverseRelationshipMap {
    let mut inverses = InverseRelationshipMap::default();

    for (kind, worker) in kinds.iter().zip(workers) {
        // Explicit inverses need no worker, so unresolvable kinds keep them
        if let Some(explicit) = extensions.get(kind.name()).and_then(|e| e.inverse()) {
            if kinds.contains(explicit) {
                debug!(kind = kind.name(), inverse = explicit, "Explicit inverse");
                inverses.insert(kind.name(), explicit);
            } else {
                warn!(
                    kind = kind.name(),
                    inverse = explicit,
                    "Explicit inverse is not a known kind"
                );
                issues.push(CatalogIssue::UnknownExplicitInverse {
                    kind: kind.name().to_string(),
                    inverse: explicit.to_string(),
                });
            }
            continue;
        }

        // Already recorded as unresolvable
        let Some(worker) = worker else {
            continue;
        };

        match infer_inverse(kind.name(), worker.as_ref(), probes, spec) {
            Ok(Some(inverse)) => {
                debug!(kind = kind.name(), inverse = %inverse, "Inferred inverse");
                inverses.insert(kind.name(), inverse);
            }
            Ok(None) => {
                warn!(kind = kind.name(), "Probe produced no relation on the target");
                issues.push(CatalogIssue::InferenceFailed {
                    kind: kind.name().to_string(),
                    reason: "no relation appeared on the probe target".to_string(),
                });
            }
            Err(e) => {
                warn!(kind = kind.name(), error = %e, "Inverse inference failed");
                issues.push(CatalogIssue::InferenceFailed {
                    kind: kind.name().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    inverses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationships::extension::RelationshipKindExtension;
    use crate::relationships::probe::{MockProbeFactory, SimpleProbeFactory, SocialCharacter};
    use crate::relationships::worker::{CreateRelation, ReciprocalWorker, WorkerError};

    #[derive(Debug)]
    struct FailingWorker;

    impl CreateRelation for FailingWorker {
        fn create_relation(
            &self,
            _source: &mut dyn SocialCharacter,
            _target: &mut dyn SocialCharacter,
        ) -> Result<(), WorkerError> {
            Err(WorkerError::Failed("needs a live map".to_string()))
        }
    }

    impl RelationWorker for FailingWorker {
        fn kind(&self) -> &str {
            "Broken"
        }

        fn relation_creator(&self) -> Option<&dyn CreateRelation> {
            Some(self)
        }
    }

    #[derive(Debug)]
    struct PanickingWorker;

    impl CreateRelation for PanickingWorker {
        fn create_relation(
            &self,
            _source: &mut dyn SocialCharacter,
            _target: &mut dyn SocialCharacter,
        ) -> Result<(), WorkerError> {
            panic!("index out of range");
        }
    }

    impl RelationWorker for PanickingWorker {
        fn kind(&self) -> &str {
            "Cursed"
        }

        fn relation_creator(&self) -> Option<&dyn CreateRelation> {
            Some(self)
        }
    }

    #[derive(Debug)]
    struct InertWorker;

    impl RelationWorker for InertWorker {
        fn kind(&self) -> &str {
            "Inert"
        }
    }

    fn kind(name: &str, worker: impl RelationWorker + 'static) -> RelationshipKind {
        RelationshipKind::new(name).unwrap().with_worker(Arc::new(worker))
    }

    fn spec() -> ProbeSpec {
        ProbeSpec::new("colonist", "player")
    }

    fn build(kinds: Vec<RelationshipKind>, extensions: Vec<RelationshipKindExtension>) -> RelationshipCatalog {
        RelationshipCatalog::build(
            KindDirectory::from_kinds(kinds).unwrap(),
            ExtensionDirectory::from_extensions(extensions).unwrap(),
            WorkerTypeRegistry::with_builtin(),
            &SimpleProbeFactory,
            &spec(),
        )
    }

    #[test]
    fn test_infer_self_inverse() {
        let worker = ReciprocalWorker::symmetric("Sibling");
        let inverse = infer_inverse("Sibling", &worker, &SimpleProbeFactory, &spec()).unwrap();
        assert_eq!(inverse.as_deref(), Some("Sibling"));
    }

    #[test]
    fn test_infer_distinct_inverse() {
        let worker = ReciprocalWorker::new("Parent", Some("Child".to_string()));
        let inverse = infer_inverse("Parent", &worker, &SimpleProbeFactory, &spec()).unwrap();
        assert_eq!(inverse.as_deref(), Some("Child"));
    }

    #[test]
    fn test_infer_nothing_appears() {
        let worker = ReciprocalWorker::one_way("Admirer");
        let inverse = infer_inverse("Admirer", &worker, &SimpleProbeFactory, &spec()).unwrap();
        assert_eq!(inverse, None);
    }

    #[test]
    fn test_infer_reports_worker_failure() {
        let err = infer_inverse("Broken", &FailingWorker, &SimpleProbeFactory, &spec()).unwrap_err();
        assert!(matches!(err, ProbeError::WorkerFailed { .. }));
    }

    #[test]
    fn test_infer_contains_worker_panic() {
        let err = infer_inverse("Cursed", &PanickingWorker, &SimpleProbeFactory, &spec()).unwrap_err();
        match err {
            ProbeError::WorkerPanicked { kind, message } => {
                assert_eq!(kind, "Cursed");
                assert!(message.contains("index out of range"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_infer_requires_capability_before_spawning() {
        let mut probes = MockProbeFactory::new();
        probes.expect_spawn().never();

        let err = infer_inverse("Inert", &InertWorker, &probes, &spec()).unwrap_err();
        assert_eq!(
            err,
            ProbeError::MissingCapability {
                kind: "Inert".to_string()
            }
        );
    }

    #[test]
    fn test_first_new_relation_ignores_preexisting_entries() {
        let before = vec!["Friend".to_string()];
        let after = vec!["Friend".to_string(), "Friend".to_string(), "Rival".to_string()];
        assert_eq!(first_new_relation(before, after), Some("Friend".to_string()));

        let before = vec!["Friend".to_string()];
        let after = vec!["Friend".to_string()];
        assert_eq!(first_new_relation(before, after), None);
    }

    #[test]
    fn test_allowed_set_filters() {
        let catalog = build(
            vec![
                kind("Parent", ReciprocalWorker::new("Parent", Some("Child".to_string()))).family_by_blood(),
                kind("Rival", ReciprocalWorker::symmetric("Rival")),
                kind("Bond", ReciprocalWorker::symmetric("Bond")),
                kind("Inert", InertWorker),
                RelationshipKind::new("Nameless").unwrap(),
                kind("Friend", ReciprocalWorker::symmetric("Friend")),
            ],
            vec![RelationshipKindExtension::new("Bond").unwrap().animal_only()],
        );

        let allowed: Vec<_> = catalog.allowed().iter().collect();
        assert_eq!(allowed, vec!["Rival", "Friend"]);
        assert!(!catalog.is_assignable("Parent"));
        assert!(!catalog.is_assignable("Bond"));
        assert!(catalog.is_animal_only("Bond"));
    }

    #[test]
    fn test_family_by_blood_kinds_still_get_inverses() {
        let catalog = build(
            vec![
                kind("Parent", ReciprocalWorker::new("Parent", Some("Child".to_string()))).family_by_blood(),
                kind("Child", ReciprocalWorker::new("Child", Some("Parent".to_string()))).family_by_blood(),
            ],
            vec![],
        );

        assert_eq!(catalog.inverse_of("Parent"), Some("Child"));
        assert_eq!(catalog.inverse_of("Child"), Some("Parent"));
        assert!(catalog.allowed().is_empty());
    }

    #[test]
    fn test_explicit_inverse_wins_over_probing() {
        let catalog = build(
            vec![
                kind("Mentor", ReciprocalWorker::one_way("Mentor")),
                kind("Student", ReciprocalWorker::one_way("Student")),
            ],
            vec![RelationshipKindExtension::new("Mentor").unwrap().with_inverse("Student")],
        );

        assert_eq!(catalog.inverse_of("Mentor"), Some("Student"));
        assert_eq!(catalog.inverse_of("Student"), None);
    }

    #[test]
    fn test_unknown_explicit_inverse_is_omitted() {
        let catalog = build(
            vec![kind("Mentor", ReciprocalWorker::new("Mentor", Some("Student".to_string())))],
            vec![RelationshipKindExtension::new("Mentor").unwrap().with_inverse("Pupil")],
        );

        assert_eq!(catalog.inverse_of("Mentor"), None);
        assert_eq!(
            catalog.issues(),
            [CatalogIssue::UnknownExplicitInverse {
                kind: "Mentor".to_string(),
                inverse: "Pupil".to_string(),
            }]
        );
    }

    #[test]
    fn test_failing_kinds_do_not_abort_the_build() {
        let catalog = build(
            vec![
                kind("Cursed", PanickingWorker),
                kind("Broken", FailingWorker),
                kind("Inert", InertWorker),
                kind("Sibling", ReciprocalWorker::symmetric("Sibling")),
            ],
            vec![],
        );

        assert_eq!(catalog.inverse_of("Sibling"), Some("Sibling"));
        assert_eq!(catalog.inverses().len(), 1);

        let failed: Vec<_> = catalog.issues().iter().map(CatalogIssue::kind).collect();
        assert_eq!(failed, vec!["Inert", "Cursed", "Broken"]);
        assert!(matches!(
            catalog.issues()[0],
            CatalogIssue::UnresolvableKind { .. }
        ));
    }

    #[test]
    fn test_conflicts() {
        let catalog = build(
            vec![
                kind("Rival", ReciprocalWorker::symmetric("Rival")),
                kind("Friend", ReciprocalWorker::symmetric("Friend")),
                kind("Lover", ReciprocalWorker::symmetric("Lover")),
            ],
            vec![
                RelationshipKindExtension::new("Rival").unwrap().with_conflict("Friend"),
                RelationshipKindExtension::new("Lover").unwrap().with_conflict("Rival"),
            ],
        );

        assert!(catalog.conflicts_with("Rival", "Friend"));
        assert!(catalog.conflicts_with("Friend", "Rival"));
        assert!(!catalog.conflicts_with("Rival", "Rival"));
        assert!(!catalog.conflicts_with("Friend", "Lover"));
        assert_eq!(catalog.conflicts_of("Rival"), vec!["Friend", "Lover"]);
    }

    #[test]
    fn test_custom_worker_type_drives_inference() {
        let catalog = build(
            vec![RelationshipKind::new("Spouse").unwrap()],
            vec![
                RelationshipKindExtension::new("Spouse")
                    .unwrap()
                    .with_worker_type(WorkerTypeRegistry::SYMMETRIC)
                    .requires_compatibility(),
            ],
        );

        assert!(catalog.is_assignable("Spouse"));
        assert!(catalog.is_compatibility_required("Spouse"));
        assert_eq!(catalog.inverse_of("Spouse"), Some("Spouse"));
        assert!(catalog.issues().is_empty());
    }
}
