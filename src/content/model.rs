//! Rule content types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::content::value::ContentValue;

/// Identity of the plugin that implements a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RulePluginInfo {
    /// Human-readable plugin name.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub node_id: String,
    #[serde(default)]
    pub product_code: String,
    /// Stable module-like identifier, e.g. `ccx_rules_ocp.external.rules.nodes_kubelet_version_check`.
    pub python_module: String,
}

/// One catalog entry describing a single diagnostic rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleContent {
    pub plugin: RulePluginInfo,
    /// Rule metadata and texts. Opaque to the service.
    pub body: ContentValue,
}

impl RuleContent {
    pub fn new(plugin: RulePluginInfo, body: ContentValue) -> Self {
        Self { plugin, body }
    }

    /// The plugin identifier this rule is known by.
    pub fn plugin_id(&self) -> &str {
        &self.plugin.python_module
    }
}

/// Settings shared by every rule in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalRuleConfig {
    /// Impact name to numeric weight.
    pub impact: BTreeMap<String, i64>,
}
