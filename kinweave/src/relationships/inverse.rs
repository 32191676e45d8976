//! Inverse relationship map

use serde::Serialize;
use std::collections::BTreeMap;

/// Kind name to the name of its inverse kind.
///
/// Built once by the catalog and never mutated afterwards. A kind that is
/// absent simply has no known inverse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InverseRelationshipMap {
    entries: BTreeMap<String, String>,
}

impl InverseRelationshipMap {
    pub(crate) fn insert(&mut self, kind: impl Into<String>, inverse: impl Into<String>) {
        self.entries.insert(kind.into(), inverse.into());
    }

    /// The inverse of `kind`, if known
    pub fn get(&self, kind: &str) -> Option<&str> {
        self.entries.get(kind).map(String::as_str)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }

    /// Entries sorted by kind name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InverseRelationshipMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        for (kind, inverse) in iter {
            map.insert(kind, inverse);
        }
        map
    }
}
