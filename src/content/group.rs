//! Rule groups.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::content::catalog::CatalogError;

/// A named category used to classify rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            tags: Vec::new(),
        }
    }
}

/// Immutable set of groups keyed by id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupSet {
    groups: BTreeMap<String, Group>,
}

impl GroupSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_groups<I>(groups: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = Group>,
    {
        let mut map = BTreeMap::new();
        for group in groups {
            if map.contains_key(&group.id) {
                return Err(CatalogError::DuplicateGroup(group.id));
            }
            map.insert(group.id.clone(), group);
        }
        Ok(Self { groups: map })
    }

    pub fn all(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn get(&self, id: &str) -> Option<&Group> {
        self.groups.get(id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_serializes_without_empty_fields() {
        let group = Group::new("performance", "Performance");
        assert_eq!(
            serde_json::to_value(&group).unwrap(),
            serde_json::json!({"id": "performance", "name": "Performance"})
        );

        let mut tagged = group.clone();
        tagged.tags.push("perf".into());
        assert_eq!(
            serde_json::to_value(&tagged).unwrap()["tags"],
            serde_json::json!(["perf"])
        );
    }

    #[test]
    fn test_duplicate_group_rejected() {
        let result = GroupSet::from_groups(vec![
            Group::new("security", "Security"),
            Group::new("security", "Security again"),
        ]);
        assert_eq!(result, Err(CatalogError::DuplicateGroup("security".into())));
    }

    #[test]
    fn test_lookup() {
        let set = GroupSet::from_groups(vec![Group::new("fault_tolerance", "Fault Tolerance")]).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("fault_tolerance").map(|g| g.name.as_str()), Some("Fault Tolerance"));
        assert!(GroupSet::empty().all().next().is_none());
    }
}
