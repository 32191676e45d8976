//! Relationship definitions as data
//!
//! Describes a kind directory and its overlays in TOML, YAML or JSON. Every
//! kind that declares a `worker` gets a [`ReciprocalWorker`] as its default
//! worker.
//!
//! ```toml
//! [[kinds]]
//! name = "Parent"
//! family_by_blood = true
//! worker = { reciprocal = "Child" }
//!
//! [[kinds]]
//! name = "Rival"
//! worker = { reciprocal = "Rival" }
//!
//! [[extensions]]
//! name = "Rival"
//! conflicts = ["Friend"]
//! ```

use super::extension::{ExtensionDirectory, RelationshipKindExtension};
use super::kind::{DirectoryError, KindDirectory, RelationshipKind};
use super::worker::ReciprocalWorker;
use figment::{
    Figment,
    providers::{Format, Json, Toml, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Error types for definition loading
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("Failed to load definitions: {0}")]
    Load(String),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Default worker declaration for a kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerDefinition {
    /// Kind written on the target back toward the source
    #[serde(default)]
    pub reciprocal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindDefinition {
    pub name: String,
    #[serde(default)]
    pub family_by_blood: bool,
    #[serde(default)]
    pub worker: Option<WorkerDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionDefinition {
    pub name: String,
    #[serde(default)]
    pub inverse: Option<String>,
    #[serde(default)]
    pub conflicts: Vec<String>,
    #[serde(default)]
    pub worker_type: Option<String>,
    #[serde(default)]
    pub animal_only: bool,
    #[serde(default)]
    pub requires_compatibility: bool,
}

/// Kinds and overlays for one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionSet {
    #[serde(default)]
    pub kinds: Vec<KindDefinition>,
    #[serde(default)]
    pub extensions: Vec<ExtensionDefinition>,
}

impl DefinitionSet {
    /// Load definitions from a `.toml`, `.yaml`/`.yml` or `.json` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DefinitionError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DefinitionError::Load(format!(
                "Definitions file not found: {}",
                path.display()
            )));
        }

        let figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Figment::from(Toml::file(path)),
            Some("yaml") | Some("yml") => Figment::from(Yaml::file(path)),
            Some("json") => Figment::from(Json::file(path)),
            _ => {
                return Err(DefinitionError::Load(format!(
                    "Unsupported file format: {}",
                    path.display()
                )));
            }
        };

        let definitions: Self = figment
            .extract()
            .map_err(|e| DefinitionError::Load(e.to_string()))?;

        debug!(
            path = %path.display(),
            kinds = definitions.kinds.len(),
            extensions = definitions.extensions.len(),
            "Loaded relationship definitions"
        );
        Ok(definitions)
    }

    /// Build the kind and extension directories
    pub fn into_directories(self) -> Result<(KindDirectory, ExtensionDirectory), DefinitionError> {
        let mut kinds = KindDirectory::new();
        for definition in self.kinds {
            let mut kind = RelationshipKind::new(definition.name.as_str())?;
            if definition.family_by_blood {
                kind = kind.family_by_blood();
            }
            if let Some(worker) = definition.worker {
                kind = kind.with_worker(Arc::new(ReciprocalWorker::new(
                    definition.name,
                    worker.reciprocal,
                )));
            }
            kinds.register(kind)?;
        }

        let mut extensions = ExtensionDirectory::new();
        for definition in self.extensions {
            extensions.register(definition.into_extension()?)?;
        }

        Ok((kinds, extensions))
    }
}

impl ExtensionDefinition {
    fn into_extension(self) -> Result<RelationshipKindExtension, DirectoryError> {
        let mut extension = RelationshipKindExtension::new(self.name)?;
        if let Some(inverse) = self.inverse {
            extension = extension.with_inverse(inverse);
        }
        for conflict in self.conflicts {
            extension = extension.with_conflict(conflict);
        }
        if let Some(worker_type) = self.worker_type {
            extension = extension.with_worker_type(worker_type);
        }
        if self.animal_only {
            extension = extension.animal_only();
        }
        if self.requires_compatibility {
            extension = extension.requires_compatibility();
        }
        Ok(extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DEFINITIONS: &str = r#"
[[kinds]]
name = "Parent"
family_by_blood = true
worker = { reciprocal = "Child" }

[[kinds]]
name = "Rival"
worker = { reciprocal = "Rival" }

[[kinds]]
name = "Spouse"

[[extensions]]
name = "Rival"
conflicts = ["Friend"]

[[extensions]]
name = "Spouse"
worker_type = "symmetric"
requires_compatibility = true
"#;

    fn write_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_toml() {
        let file = write_file(".toml", DEFINITIONS);
        let definitions = DefinitionSet::load(file.path()).unwrap();

        assert_eq!(definitions.kinds.len(), 3);
        assert!(definitions.kinds[0].family_by_blood);
        assert_eq!(
            definitions.kinds[0].worker,
            Some(WorkerDefinition {
                reciprocal: Some("Child".to_string())
            })
        );
        assert!(definitions.kinds[2].worker.is_none());
        assert_eq!(definitions.extensions[0].conflicts, vec!["Friend"]);
    }

    #[test]
    fn test_load_json() {
        let file = write_file(
            ".json",
            r#"{"kinds": [{"name": "Sibling", "worker": {"reciprocal": "Sibling"}}]}"#,
        );
        let definitions = DefinitionSet::load(file.path()).unwrap();
        assert_eq!(definitions.kinds[0].name, "Sibling");
        assert!(definitions.extensions.is_empty());
    }

    #[test]
    fn test_load_rejects_unknown_format() {
        let file = write_file(".ini", "kinds = []");
        assert!(matches!(
            DefinitionSet::load(file.path()),
            Err(DefinitionError::Load(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(DefinitionSet::load("/nonexistent/kinweave/definitions.toml").is_err());
    }

    #[test]
    fn test_into_directories() {
        let file = write_file(".toml", DEFINITIONS);
        let (kinds, extensions) = DefinitionSet::load(file.path())
            .unwrap()
            .into_directories()
            .unwrap();

        let parent = kinds.get("Parent").unwrap();
        assert!(parent.is_family_by_blood());
        assert_eq!(parent.default_worker().unwrap().kind(), "Parent");
        assert!(kinds.get("Spouse").unwrap().default_worker().is_none());

        assert!(extensions.conflicts_with("Friend", "Rival"));
        let spouse = extensions.get("Spouse").unwrap();
        assert_eq!(spouse.worker_type(), Some("symmetric"));
        assert!(spouse.is_compatibility_required());
    }

    #[test]
    fn test_into_directories_rejects_duplicates() {
        let definitions = DefinitionSet {
            kinds: vec![
                KindDefinition {
                    name: "Rival".to_string(),
                    family_by_blood: false,
                    worker: None,
                },
                KindDefinition {
                    name: "Rival".to_string(),
                    family_by_blood: false,
                    worker: None,
                },
            ],
            extensions: Vec::new(),
        };

        assert!(matches!(
            definitions.into_directories(),
            Err(DefinitionError::Directory(DirectoryError::KindAlreadyExists(_)))
        ));
    }
}
