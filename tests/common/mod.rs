//! Shared fixtures for integration tests.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use content_service::config::ServiceConfig;
use content_service::content::{
    ContentCatalog, ContentValue, GlobalRuleConfig, Group, GroupSet, RuleContent, RulePluginInfo,
};
use content_service::{HttpServer, Shutdown};

/// A server running on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Bind an ephemeral port and serve the given content on it.
pub async fn start_server(
    mut config: ServiceConfig,
    catalog: ContentCatalog,
    groups: GroupSet,
) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.server.bind_address = addr.to_string();

    let server = HttpServer::new(config, Arc::new(catalog), Arc::new(groups));
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    TestServer { addr, shutdown, handle }
}

pub fn rule(id: &str, summary: &str) -> RuleContent {
    let mut body = ContentValue::map();
    body.insert("summary", summary.into());
    body.insert("has_reason", false.into());
    RuleContent::new(
        RulePluginInfo {
            name: summary.to_string(),
            python_module: id.to_string(),
            ..Default::default()
        },
        body,
    )
}

pub fn catalog(rules: Vec<RuleContent>) -> ContentCatalog {
    ContentCatalog::from_rules(GlobalRuleConfig::default(), rules).unwrap()
}

pub fn groups(groups: Vec<Group>) -> GroupSet {
    GroupSet::from_groups(groups).unwrap()
}

#[allow(dead_code)]
pub fn write_file(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
