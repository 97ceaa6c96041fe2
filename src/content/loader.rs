//! Startup loading of rule content and groups from disk.
//!
//! # Layout
//! ```text
//! <content dir>/
//!     config.toml                 [impact] table of integer weights (optional)
//!     <any>/<rule>/
//!         plugin.toml             name, node_id, product_code, python_module
//!         summary.md              (optional, same for reason/resolution/more_info)
//!         <ERROR_KEY>/
//!             metadata.toml
//!             generic.md          (optional)
//!             reason.md           (optional)
//! ```
//!
//! Any directory holding a `plugin.toml` is a rule; other directories are
//! searched recursively.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::content::catalog::{CatalogError, ContentCatalog};
use crate::content::group::{Group, GroupSet};
use crate::content::model::{GlobalRuleConfig, RuleContent, RulePluginInfo};
use crate::content::value::ContentValue;

const PLUGIN_FILE: &str = "plugin.toml";
const ERROR_KEY_FILE: &str = "metadata.toml";
const GLOBAL_CONFIG_FILE: &str = "config.toml";
const RULE_TEXT_FILES: [&str; 4] = ["summary", "reason", "resolution", "more_info"];
const ERROR_KEY_TEXT_FILES: [&str; 2] = ["generic", "reason"];

/// Error type for content loading.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, Deserialize)]
struct GroupsFile {
    #[serde(default)]
    groups: Vec<Group>,
}

/// Load every rule under `dir` into a catalog.
pub fn load_catalog(dir: &Path) -> Result<ContentCatalog, LoadError> {
    let config_path = dir.join(GLOBAL_CONFIG_FILE);
    let config: GlobalRuleConfig = if config_path.is_file() {
        parse_toml(&config_path)?
    } else {
        GlobalRuleConfig::default()
    };

    let mut rules = Vec::new();
    collect_rules(dir, &mut rules)?;

    let catalog = ContentCatalog::from_rules(config, rules)?;
    tracing::debug!(path = %dir.display(), rules = catalog.len(), "Rule content loaded");
    Ok(catalog)
}

/// Load the group definitions file.
pub fn load_groups(path: &Path) -> Result<GroupSet, LoadError> {
    let file: GroupsFile = parse_toml(path)?;
    Ok(GroupSet::from_groups(file.groups)?)
}

fn collect_rules(dir: &Path, rules: &mut Vec<RuleContent>) -> Result<(), LoadError> {
    if dir.join(PLUGIN_FILE).is_file() {
        rules.push(load_rule(dir)?);
        return Ok(());
    }

    for subdir in subdirectories(dir)? {
        collect_rules(&subdir, rules)?;
    }
    Ok(())
}

fn load_rule(dir: &Path) -> Result<RuleContent, LoadError> {
    let plugin: RulePluginInfo = parse_toml(&dir.join(PLUGIN_FILE))?;

    let mut body = ContentValue::map();
    for name in RULE_TEXT_FILES {
        if let Some(text) = read_optional_text(&dir.join(format!("{}.md", name)))? {
            body.insert(name, text.into());
        }
    }
    let has_reason = body.get("reason").is_some();
    body.insert("has_reason", has_reason.into());

    let mut error_keys = ContentValue::map();
    for key_dir in subdirectories(dir)? {
        let metadata_path = key_dir.join(ERROR_KEY_FILE);
        if !metadata_path.is_file() {
            continue;
        }
        let Some(key) = key_dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let metadata: toml::Value = parse_toml(&metadata_path)?;
        let mut entry = ContentValue::map();
        entry.insert("metadata", metadata.into());
        for name in ERROR_KEY_TEXT_FILES {
            if let Some(text) = read_optional_text(&key_dir.join(format!("{}.md", name)))? {
                entry.insert(name, text.into());
            }
        }
        error_keys.insert(key, entry);
    }
    body.insert("error_keys", error_keys);

    Ok(RuleContent::new(plugin, body))
}

fn parse_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional_text(path: &Path) -> Result<Option<String>, LoadError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(LoadError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Sorted subdirectories, so load order does not depend on the filesystem.
fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let io_err = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if entry.file_type().map_err(io_err)?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}
