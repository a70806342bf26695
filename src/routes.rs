use axum::{routing::get, Router};
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};

use crate::gateway::handlers as gateway_handlers;
use crate::openapi::swagger_ui;
use crate::AppState;

/// Build the proxy API routes
fn proxy_routes() -> Router<AppState> {
    Router::new()
        .route("/api/weather", get(gateway_handlers::get_weather))
        .route("/api/forecast", get(gateway_handlers::get_forecast))
}

/// Build the complete application router
///
/// Anything not matched by the API falls through to the static directory.
pub fn build_router(state: AppState) -> Router {
    let static_dir = Path::new(&state.config.static_dir);
    let index = ServeFile::new(static_dir.join("index.html"));
    let assets = ServeDir::new(static_dir);

    Router::new()
        .route("/health", get(gateway_handlers::health))
        .merge(proxy_routes())
        .merge(swagger_ui())
        .route_service("/", index)
        .fallback_service(assets)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::gateway::ProxyService;
    use axum::{body::Body, http::Request, http::StatusCode};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn router_with_static(dir: &Path) -> Router {
        let config = AppConfig {
            static_dir: dir.to_string_lossy().into_owned(),
            ..AppConfig::default()
        };
        let proxy = ProxyService::new(
            reqwest::Client::new(),
            &config.upstream_base_url,
            Duration::from_secs(1),
        );
        build_router(AppState {
            proxy: Arc::new(proxy),
            config: Arc::new(config),
        })
    }

    async fn get_text(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_root_serves_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>天气预报</h1>").unwrap();

        let (status, body) = get_text(router_with_static(dir.path()), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<h1>天气预报</h1>");
    }

    #[tokio::test]
    async fn test_static_asset_served_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "index").unwrap();
        std::fs::create_dir(dir.path().join("css")).unwrap();
        std::fs::write(dir.path().join("css/style.css"), "body { margin: 0; }").unwrap();

        let (status, body) = get_text(router_with_static(dir.path()), "/css/style.css").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "body { margin: 0; }");

        let (status, _) = get_text(router_with_static(dir.path()), "/missing.js").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
