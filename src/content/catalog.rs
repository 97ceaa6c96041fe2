//! In-memory rule catalog.
//!
//! # Design Decisions
//! - Built once at startup, never mutated; shared via `Arc` so concurrent
//!   readers need no synchronization
//! - Rules are keyed by plugin identifier in a `BTreeMap`, which fixes the
//!   iteration order every listing endpoint observes

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::content::model::{GlobalRuleConfig, RuleContent};

/// Errors raised while assembling a catalog or group set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate rule identifier: {0}")]
    DuplicateRule(String),

    #[error("rule has an empty plugin identifier (plugin name: {0:?})")]
    MissingIdentifier(String),

    #[error("duplicate group identifier: {0}")]
    DuplicateGroup(String),
}

/// Immutable snapshot of every rule served by this process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ContentCatalog {
    config: GlobalRuleConfig,
    rules: BTreeMap<String, RuleContent>,
}

impl ContentCatalog {
    /// Create an empty catalog.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog keyed by each rule's plugin identifier.
    pub fn from_rules<I>(config: GlobalRuleConfig, rules: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = RuleContent>,
    {
        let mut map = BTreeMap::new();
        for rule in rules {
            let id = rule.plugin_id().to_string();
            if id.is_empty() {
                return Err(CatalogError::MissingIdentifier(rule.plugin.name));
            }
            if map.contains_key(&id) {
                return Err(CatalogError::DuplicateRule(id));
            }
            map.insert(id, rule);
        }
        Ok(Self { config, rules: map })
    }

    /// Every rule, in catalog iteration order.
    pub fn all_rules(&self) -> impl Iterator<Item = &RuleContent> {
        self.rules.values()
    }

    pub fn rule_ids(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn get(&self, id: &str) -> Option<&RuleContent> {
        self.rules.get(id)
    }

    pub fn config(&self) -> &GlobalRuleConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
