//! Read-only endpoints over the content catalog.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::path::PathBuf;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::content::{Group, RuleContent};
use crate::http::response::{handle_server_error, send_bytes, send_ok, Envelope, ServerError};
use crate::http::server::AppState;
use crate::observability::metrics;

/// Log a handler failure and route it to the generic server-error path.
fn respond(result: Result<Response, ServerError>, message: &'static str) -> Response {
    match result {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(kind = err.kind(), error = %err, "{}", message);
            handle_server_error(&err)
        }
    }
}

/// Liveness check.
pub async fn main_endpoint() -> Response {
    respond(send_ok(&Envelope::ok()), "Cannot send response data")
}

/// Serve the OpenAPI specification file named in the configuration.
pub async fn serve_api_spec_file(State(state): State<AppState>, request: Request) -> Response {
    let configured = PathBuf::from(&state.config.server.api_spec_file);
    let abs_path = match std::path::absolute(&configured) {
        Ok(path) => path,
        Err(source) => {
            let err = ServerError::PathResolution {
                path: configured,
                source,
            };
            return respond(Err(err), "Error creating absolute path of OpenAPI spec file");
        }
    };

    match ServeFile::new(&abs_path).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// List every defined group.
pub async fn list_groups(State(state): State<AppState>) -> Response {
    let groups: Vec<&Group> = state.groups.all().collect();
    let result = Envelope::ok_with_data("groups", &groups)
        .map_err(ServerError::from)
        .and_then(|envelope| send_ok(&envelope));
    respond(result, "Cannot send list of groups")
}

/// The whole catalog as one binary blob.
pub async fn get_static_content(State(state): State<AppState>) -> Response {
    let result = match state.encoder.encode(&state.catalog) {
        Ok(blob) => {
            metrics::record_encoded_size(blob.len());
            Ok(send_bytes(StatusCode::OK, blob))
        }
        Err(err) => {
            metrics::record_encoding_failure(err.kind());
            Err(ServerError::from(err))
        }
    };
    respond(result, "Cannot encode rules static content")
}

/// Plugin identifiers of every rule, in catalog order.
pub async fn get_rule_names(State(state): State<AppState>) -> Response {
    let rules: Vec<&str> = state.catalog.all_rules().map(RuleContent::plugin_id).collect();
    let result = Envelope::ok_with_data("rules", &rules)
        .map_err(ServerError::from)
        .and_then(|envelope| send_ok(&envelope));
    respond(result, "Cannot send list of rule names")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::content::{
        ContentCatalog, ContentEncoder, ContentValue, GlobalRuleConfig, GroupSet, RulePluginInfo,
    };
    use crate::http::server::HttpServer;
    use axum::{body::Body, Router};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn rule(id: &str) -> RuleContent {
        let mut body = ContentValue::map();
        body.insert("summary", format!("summary of {}", id).into());
        RuleContent::new(
            RulePluginInfo {
                python_module: id.to_string(),
                ..Default::default()
            },
            body,
        )
    }

    fn router_with(config: ServiceConfig, catalog: ContentCatalog, groups: GroupSet) -> Router {
        HttpServer::new(config, Arc::new(catalog), Arc::new(groups)).into_router()
    }

    fn default_router() -> Router {
        let catalog = ContentCatalog::from_rules(
            GlobalRuleConfig::default(),
            vec![rule("rule.b"), rule("rule.a")],
        )
        .unwrap();
        let groups = GroupSet::from_groups(vec![Group::new("performance", "Performance")]).unwrap();
        router_with(ServiceConfig::default(), catalog, groups)
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = router
            .oneshot(axum::http::Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, body.to_vec())
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let (status, _, body) = get(router, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_main_endpoint() {
        let (status, body) = get_json(default_router(), "/api/v1/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_rule_names_in_catalog_order() {
        let (status, body) = get_json(default_router(), "/api/v1/rules").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok", "rules": ["rule.a", "rule.b"]}));
    }

    #[tokio::test]
    async fn test_groups() {
        let (status, body) = get_json(default_router(), "/api/v1/groups").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"status": "ok", "groups": [{"id": "performance", "name": "Performance"}]})
        );
    }

    #[tokio::test]
    async fn test_empty_content() {
        let router = router_with(ServiceConfig::default(), ContentCatalog::empty(), GroupSet::empty());

        let (_, groups) = get_json(router.clone(), "/api/v1/groups").await;
        assert_eq!(groups, json!({"status": "ok", "groups": []}));

        let (_, rules) = get_json(router.clone(), "/api/v1/rules").await;
        assert_eq!(rules, json!({"status": "ok", "rules": []}));

        let (status, _, blob) = get(router, "/api/v1/content").await;
        assert_eq!(status, StatusCode::OK);
        assert!(ContentEncoder::default().decode(&blob).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_static_content_round_trip() {
        let (status, headers, blob) = get(default_router(), "/api/v1/content").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["content-type"], "application/octet-stream");

        let decoded = ContentEncoder::default().decode(&blob).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded.get("rule.a"), Some(&rule("rule.a")));
    }

    #[tokio::test]
    async fn test_static_content_encoding_failure() {
        let mut config = ServiceConfig::default();
        config.content.max_encoded_bytes = 4;
        let catalog =
            ContentCatalog::from_rules(GlobalRuleConfig::default(), vec![rule("rule.a")]).unwrap();
        let router = router_with(config, catalog, GroupSet::empty());

        let (status, body) = get_json(router, "/api/v1/content").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        assert!(body["details"].as_str().unwrap().contains("4 byte limit"));
    }

    #[tokio::test]
    async fn test_static_content_unsupported_value() {
        let mut nan = rule("rule.nan");
        nan.body.insert("score", ContentValue::Float(f64::NAN));
        let catalog =
            ContentCatalog::from_rules(GlobalRuleConfig::default(), vec![rule("rule.a"), nan])
                .unwrap();
        let router = router_with(ServiceConfig::default(), catalog, GroupSet::empty());

        let (status, body) = get_json(router, "/api/v1/content").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        let details = body["details"].as_str().unwrap();
        assert!(details.contains("rule.nan"), "{}", details);
        assert!(details.contains("$.score"), "{}", details);
    }

    #[tokio::test]
    async fn test_spec_file_served() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("openapi.json");
        std::fs::write(&path, r#"{"openapi": "3.0.0"}"#).unwrap();

        let mut config = ServiceConfig::default();
        config.server.api_spec_file = path.to_string_lossy().into_owned();
        let router = router_with(config, ContentCatalog::empty(), GroupSet::empty());

        let (status, headers, body) = get(router, "/api/v1/openapi.json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(body, br#"{"openapi": "3.0.0"}"#.to_vec());
    }

    #[tokio::test]
    async fn test_missing_spec_file_is_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = ServiceConfig::default();
        config.server.api_spec_file = dir.path().join("openapi.json").to_string_lossy().into_owned();
        let router = router_with(config, ContentCatalog::empty(), GroupSet::empty());

        let (status, _, _) = get(router, "/api/v1/openapi.json").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let response = default_router()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/v1/")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "req-42");

        let (_, headers, _) = get(default_router(), "/api/v1/").await;
        assert!(headers.contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_root_prefix() {
        let mut config = ServiceConfig::default();
        config.server.api_prefix = "/".into();
        let router = router_with(config, ContentCatalog::empty(), GroupSet::empty());

        let (status, body) = get_json(router.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));

        let (status, _) = get_json(router, "/rules").await;
        assert_eq!(status, StatusCode::OK);
    }
}
