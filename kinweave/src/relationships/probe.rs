//! Probe characters
//!
//! Inverse inference runs a kind's worker against two disposable characters
//! and reads back what appeared on the target. The host supplies the
//! characters through a [`ProbeFactory`]; [`SimpleProbeFactory`] is an
//! in-memory factory that is enough for data-driven workers and for tests.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable character identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(Uuid);

impl CharacterId {
    /// Create a new random character ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CharacterId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// A character as seen by relation workers.
pub trait SocialCharacter: fmt::Debug {
    fn id(&self) -> CharacterId;

    /// Record a direct relation of `kind` held by this character toward `other`
    fn add_relation(&mut self, kind: &str, other: CharacterId);

    /// Kinds of every direct relation this character holds toward `other`,
    /// oldest first
    fn relations_toward(&self, other: CharacterId) -> Vec<String>;
}

/// What kind of character to spawn for probing, and in which faction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeSpec {
    pub character_kind: String,
    pub faction: String,
}

impl ProbeSpec {
    pub fn new(character_kind: impl Into<String>, faction: impl Into<String>) -> Self {
        Self {
            character_kind: character_kind.into(),
            faction: faction.into(),
        }
    }
}

/// Error types for probing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("Could not spawn a '{character_kind}' probe in faction '{faction}': {reason}")]
    SpawnFailed {
        character_kind: String,
        faction: String,
        reason: String,
    },

    #[error("Worker for '{kind}' cannot create relations")]
    MissingCapability { kind: String },

    #[error("Worker for '{kind}' failed: {reason}")]
    WorkerFailed { kind: String, reason: String },

    #[error("Worker for '{kind}' panicked: {message}")]
    WorkerPanicked { kind: String, message: String },
}

/// Source of disposable characters.
///
/// Characters returned here must not be registered in any cast or written
/// anywhere; the caller owns them and drops them when it is done.
#[cfg_attr(test, mockall::automock)]
pub trait ProbeFactory {
    fn spawn(&self, spec: &ProbeSpec) -> Result<Box<dyn SocialCharacter>, ProbeError>;
}

/// One direct relation held by a [`SimpleCharacter`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectRelation {
    pub kind: String,
    pub other: CharacterId,
}

/// Minimal in-memory character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleCharacter {
    id: CharacterId,
    character_kind: String,
    faction: String,
    relations: Vec<DirectRelation>,
}

impl SimpleCharacter {
    pub fn new(character_kind: impl Into<String>, faction: impl Into<String>) -> Self {
        Self {
            id: CharacterId::new(),
            character_kind: character_kind.into(),
            faction: faction.into(),
            relations: Vec::new(),
        }
    }

    pub fn character_kind(&self) -> &str {
        &self.character_kind
    }

    pub fn faction(&self) -> &str {
        &self.faction
    }

    pub fn relations(&self) -> &[DirectRelation] {
        &self.relations
    }
}

impl SocialCharacter for SimpleCharacter {
    fn id(&self) -> CharacterId {
        self.id
    }

    fn add_relation(&mut self, kind: &str, other: CharacterId) {
        self.relations.push(DirectRelation {
            kind: kind.to_string(),
            other,
        });
    }

    fn relations_toward(&self, other: CharacterId) -> Vec<String> {
        self.relations
            .iter()
            .filter(|r| r.other == other)
            .map(|r| r.kind.clone())
            .collect()
    }
}

/// Factory producing fresh [`SimpleCharacter`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleProbeFactory;

impl ProbeFactory for SimpleProbeFactory {
    fn spawn(&self, spec: &ProbeSpec) -> Result<Box<dyn SocialCharacter>, ProbeError> {
        if spec.character_kind.trim().is_empty() {
            return Err(ProbeError::SpawnFailed {
                character_kind: spec.character_kind.clone(),
                faction: spec.faction.clone(),
                reason: "character kind is empty".to_string(),
            });
        }

        Ok(Box::new(SimpleCharacter::new(
            spec.character_kind.clone(),
            spec.faction.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relations_toward_filters_by_other() {
        let mut alice = SimpleCharacter::new("colonist", "player");
        let bob = CharacterId::new();
        let carol = CharacterId::new();

        alice.add_relation("Friend", bob);
        alice.add_relation("Rival", carol);
        alice.add_relation("Bond", bob);

        assert_eq!(alice.relations_toward(bob), vec!["Friend", "Bond"]);
        assert_eq!(alice.relations_toward(carol), vec!["Rival"]);
        assert!(alice.relations_toward(CharacterId::new()).is_empty());
    }

    #[test]
    fn test_simple_factory_spawns_distinct_characters() {
        let factory = SimpleProbeFactory;
        let spec = ProbeSpec::new("colonist", "player");

        let a = factory.spawn(&spec).unwrap();
        let b = factory.spawn(&spec).unwrap();
        assert_ne!(a.id(), b.id());
        assert!(a.relations_toward(b.id()).is_empty());
    }

    #[test]
    fn test_simple_factory_rejects_empty_kind() {
        let factory = SimpleProbeFactory;
        let err = factory.spawn(&ProbeSpec::new("", "player")).unwrap_err();
        assert!(matches!(err, ProbeError::SpawnFailed { .. }));
    }

    #[test]
    fn test_character_id_display_round_trips_uuid() {
        let uuid = Uuid::new_v4();
        let id = CharacterId::from(uuid);
        assert_eq!(id.to_string(), uuid.to_string());
        assert_eq!(id.as_uuid(), &uuid);
    }
}
