//! Session history: the answers recorded at each visited node.

use std::fmt;

use flowgraph_core::{Error, NodeId, Result};
use im::HashMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Answers chosen at one visited node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub id: NodeId,
    pub answers: Vec<NodeId>,
}

/// Insertion-ordered, write-once map from visited node to its answers.
///
/// Serialises as a JSON object whose key order is the record order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breadcrumbs {
    entries: Vec<Breadcrumb>,
    index: HashMap<NodeId, usize>,
}

impl Breadcrumbs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyRecorded` if `id` already has an entry.
    pub fn insert(&mut self, id: impl Into<NodeId>, answers: Vec<NodeId>) -> Result<()> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(Error::already_recorded(id));
        }
        self.index.insert(id.clone(), self.entries.len());
        self.entries.push(Breadcrumb { id, answers });
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&[NodeId]> {
        self.index
            .get(id)
            .and_then(|&position| self.entries.get(position))
            .map(|crumb| crumb.answers.as_slice())
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in record order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Breadcrumb> {
        self.entries.iter()
    }

    /// Every recorded answer, flattened in record order.
    pub fn answers(&self) -> impl DoubleEndedIterator<Item = &NodeId> {
        self.entries.iter().flat_map(|crumb| crumb.answers.iter())
    }
}

impl IntoIterator for Breadcrumbs {
    type Item = Breadcrumb;
    type IntoIter = std::vec::IntoIter<Breadcrumb>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Breadcrumbs {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for crumb in &self.entries {
            map.serialize_entry(&crumb.id, &crumb.answers)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Breadcrumbs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(BreadcrumbsVisitor)
    }
}

struct BreadcrumbsVisitor;

impl<'de> Visitor<'de> for BreadcrumbsVisitor {
    type Value = Breadcrumbs;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map from node id to a list of answer ids")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut crumbs = Breadcrumbs::new();
        while let Some((id, answers)) = access.next_entry::<NodeId, Vec<NodeId>>()? {
            crumbs.insert(id, answers).map_err(serde::de::Error::custom)?;
        }
        Ok(crumbs)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn ids(list: &[&str]) -> Vec<NodeId> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_insert_is_write_once() {
        let mut crumbs = Breadcrumbs::new();
        crumbs.insert("q", ids(&["a"])).unwrap();
        let err = crumbs.insert("q", ids(&["b"])).unwrap_err();
        assert_eq!(err.to_string(), "already recorded");
        assert_eq!(crumbs.get("q"), Some(ids(&["a"]).as_slice()));
    }

    #[test]
    fn test_serialisation_keeps_record_order() {
        let mut crumbs = Breadcrumbs::new();
        crumbs.insert("z", ids(&["z1"])).unwrap();
        crumbs.insert("a", ids(&["a1", "a2"])).unwrap();

        let json = serde_json::to_string(&crumbs).unwrap();
        assert_eq!(json, r#"{"z":["z1"],"a":["a1","a2"]}"#);
    }

    #[test]
    fn test_deserialisation_keeps_document_order() {
        let crumbs: Breadcrumbs = serde_json::from_str(r#"{"z": ["z1"], "a": []}"#).unwrap();
        let order: Vec<&str> = crumbs.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, ["z", "a"]);
    }

    #[test]
    fn test_answers_flatten_in_record_order() {
        let mut crumbs = Breadcrumbs::new();
        crumbs.insert("q1", ids(&["a", "b"])).unwrap();
        crumbs.insert("q2", ids(&["c"])).unwrap();
        let answers: Vec<&NodeId> = crumbs.answers().collect();
        assert_eq!(answers, [&"a".to_string(), &"b".to_string(), &"c".to_string()]);
    }
}
