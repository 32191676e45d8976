//! Relationship assignments
//!
//! A [`RelationshipSet`] holds the user-authored relationships of one
//! session. Each assignment is stored once, from its source's point of view;
//! lookups also match the reversed pair through the inverse map, so asking
//! for "B is Child of A" finds the stored "A is Parent of B".

use super::inverse::InverseRelationshipMap;
use super::probe::CharacterId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Identity of one stored assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentId(Uuid);

impl AssignmentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AssignmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One user-authored relationship: `source` is `kind` of `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipAssignment {
    pub id: AssignmentId,
    pub kind: String,
    /// Inverse kind as known when the assignment was created
    pub inverse: Option<String>,
    pub source: CharacterId,
    pub target: CharacterId,
    pub created_at: DateTime<Utc>,
}

impl RelationshipAssignment {
    pub fn new(
        kind: impl Into<String>,
        inverse: Option<String>,
        source: CharacterId,
        target: CharacterId,
    ) -> Self {
        Self {
            id: AssignmentId::new(),
            kind: kind.into(),
            inverse,
            source,
            target,
            created_at: Utc::now(),
        }
    }

    /// Whether `character` is either end of this assignment
    pub fn involves(&self, character: CharacterId) -> bool {
        self.source == character || self.target == character
    }
}

/// Ordered collection of assignments with symmetric lookup.
#[derive(Debug, Clone)]
pub struct RelationshipSet {
    assignments: Vec<RelationshipAssignment>,
    inverses: Arc<InverseRelationshipMap>,
}

impl RelationshipSet {
    /// Create an empty set that resolves reversed lookups through `inverses`
    pub fn new(inverses: Arc<InverseRelationshipMap>) -> Self {
        Self {
            assignments: Vec::new(),
            inverses,
        }
    }

    /// Find the assignment describing "`source` is `kind` of `target`".
    ///
    /// A record stored in exactly that form wins. Otherwise a record stored
    /// as (inverse(`kind`), `target`, `source`) matches, when the inverse
    /// map knows an inverse for `kind`.
    pub fn find(
        &self,
        kind: &str,
        source: CharacterId,
        target: CharacterId,
    ) -> Option<&RelationshipAssignment> {
        self.assignments
            .iter()
            .find(|r| r.kind == kind && r.source == source && r.target == target)
            .or_else(|| {
                let inverse = self.inverses.get(kind)?;
                self.assignments
                    .iter()
                    .find(|r| r.kind == inverse && r.source == target && r.target == source)
            })
    }

    pub fn contains(&self, kind: &str, source: CharacterId, target: CharacterId) -> bool {
        self.find(kind, source, target).is_some()
    }

    /// Append an assignment.
    ///
    /// The set does not deduplicate; call [`Self::contains`] first when that
    /// matters.
    pub fn add(&mut self, assignment: RelationshipAssignment) -> AssignmentId {
        let id = assignment.id;
        self.assignments.push(assignment);
        id
    }

    /// Append "`source` is `kind` of `target`" with its inverse taken from
    /// the inverse map
    pub fn assign(
        &mut self,
        kind: impl Into<String>,
        source: CharacterId,
        target: CharacterId,
    ) -> AssignmentId {
        let kind = kind.into();
        let inverse = self.inverses.get(&kind).map(str::to_string);
        self.add(RelationshipAssignment::new(kind, inverse, source, target))
    }

    pub fn get(&self, id: AssignmentId) -> Option<&RelationshipAssignment> {
        self.assignments.iter().find(|r| r.id == id)
    }

    /// Remove one assignment by identity. Unknown ids are a no-op.
    pub fn remove(&mut self, id: AssignmentId) -> Option<RelationshipAssignment> {
        let index = self.assignments.iter().position(|r| r.id == id)?;
        Some(self.assignments.remove(index))
    }

    /// Remove every assignment involving `character`, returning how many
    /// were dropped
    pub fn remove_character(&mut self, character: CharacterId) -> usize {
        let before = self.assignments.len();
        self.assignments.retain(|r| !r.involves(character));
        before - self.assignments.len()
    }

    /// Assignments where `character` is either end, in insertion order
    pub fn involving(&self, character: CharacterId) -> impl Iterator<Item = &RelationshipAssignment> {
        self.assignments.iter().filter(move |r| r.involves(character))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RelationshipAssignment> {
        self.assignments.iter()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn inverses(&self) -> &Arc<InverseRelationshipMap> {
        &self.inverses
    }
}
