//! Startup orchestration.
//!
//! # Design Decisions
//! - Fail fast: any load error is fatal
//! - Content and groups load before the server is built, so the server never
//!   observes a partially loaded catalog

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::config::ServiceConfig;
use crate::content::loader::{load_catalog, load_groups, LoadError};
use crate::content::{ContentCatalog, GroupSet};
use crate::http::HttpServer;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load rule content: {0}")]
    Content(#[source] LoadError),

    #[error("failed to load groups: {0}")]
    Groups(#[source] LoadError),
}

/// Catalog and groups as loaded from the configured locations.
pub fn load_content(config: &ServiceConfig) -> Result<(ContentCatalog, GroupSet), StartupError> {
    let catalog = load_catalog(Path::new(&config.content.path)).map_err(StartupError::Content)?;
    let groups = load_groups(Path::new(&config.content.groups_path)).map_err(StartupError::Groups)?;
    Ok((catalog, groups))
}

/// Load content and build the HTTP server around it.
pub fn bootstrap(config: ServiceConfig) -> Result<HttpServer, StartupError> {
    let (catalog, groups) = load_content(&config)?;

    tracing::info!(
        content_path = %config.content.path,
        rules = catalog.len(),
        groups = groups.len(),
        "Content loaded"
    );

    Ok(HttpServer::new(config, Arc::new(catalog), Arc::new(groups)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_bootstrap_loads_content() {
        let dir = TempDir::new().unwrap();
        let rule_dir = dir.path().join("content/rule_a");
        std::fs::create_dir_all(&rule_dir).unwrap();
        std::fs::write(rule_dir.join("plugin.toml"), "python_module = \"rule.a\"\n").unwrap();
        let groups_path = dir.path().join("groups.toml");
        std::fs::write(&groups_path, "[[groups]]\nid = \"security\"\nname = \"Security\"\n").unwrap();

        let mut config = ServiceConfig::default();
        config.content.path = dir.path().join("content").to_string_lossy().into_owned();
        config.content.groups_path = groups_path.to_string_lossy().into_owned();

        let (catalog, groups) = load_content(&config).unwrap();
        assert_eq!(catalog.rule_ids().collect::<Vec<_>>(), vec!["rule.a"]);
        assert_eq!(groups.len(), 1);
        assert!(bootstrap(config).is_ok());
    }

    #[test]
    fn test_missing_groups_file_fails() {
        let dir = TempDir::new().unwrap();
        let mut config = ServiceConfig::default();
        config.content.path = dir.path().to_string_lossy().into_owned();
        config.content.groups_path = dir.path().join("absent.toml").to_string_lossy().into_owned();

        assert!(matches!(load_content(&config), Err(StartupError::Groups(_))));
    }
}
