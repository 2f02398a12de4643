pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod rate_limit;
pub mod routes;
pub mod seed;
pub mod state;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::rate_limit::LoginRateLimiter;
use crate::state::{AppState, SharedState};
use crate::storage::DocumentStore;

pub fn build_app(pool: PgPool, config: Config) -> Router {
    let documents = DocumentStore::new(config.upload_dir.clone());
    if let Err(e) = std::fs::create_dir_all(documents.root()) {
        tracing::warn!(
            "Upload directory {} not available yet: {e}",
            documents.root().display()
        );
    }

    let cors = cors_layer(&config.cors_origins);
    let static_dir = config.static_dir.clone();

    let state: SharedState = Arc::new(AppState {
        pool,
        config,
        documents,
        login_limiter: LoginRateLimiter::new(),
    });

    Router::new()
        .merge(routes::api_routes())
        .fallback_service(ServeDir::new(static_dir))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin when none are configured; otherwise only the listed ones.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::RegistrationMode;

    /// Router over a lazy pool; only routes that never query it are exercised.
    fn app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let scratch = std::env::temp_dir().join("juridico-router-tests");
        let config = Config {
            database_url: "postgres://localhost/unused".to_string(),
            jwt_secret: "router-test-secret".to_string(),
            jwt_ttl_minutes: 60,
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            registration: RegistrationMode::Open,
            upload_dir: scratch.join("uploads"),
            max_upload_size: 1024,
            static_dir: PathBuf::from("static"),
            cors_origins: vec![],
            log_level: "warn".to_string(),
            admin_seed: None,
        };
        build_app(pool, config)
    }

    async fn send(uri: &str, auth: Option<&str>) -> axum::response::Response {
        let mut request = Request::builder().uri(uri);
        if let Some(value) = auth {
            request = request.header("authorization", value);
        }
        app()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn status_probe_is_public() {
        let response = send("/api/status", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["x-content-type-options"],
            "nosniff"
        );
        let body = json(response).await;
        assert_eq!(body["status"], "ok");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn protected_routes_need_a_token() {
        let response = send("/api/clients", None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json(response).await["message"], "Token not provided");

        let response = send("/api/tasks", Some("Token abc")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json(response).await["message"], "Malformed token");

        let response = send("/api/processes", Some("Bearer not-a-jwt")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json(response).await["message"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn non_numeric_ids_answer_json_400() {
        let claims = crate::auth::jwt::Claims {
            id: 1,
            email: "ana@example.com".to_string(),
            role: crate::models::Role::User,
            exp: (chrono::Utc::now() + chrono::Duration::minutes(5)).timestamp(),
        };
        let token = crate::auth::jwt::encode_token(&claims, "router-test-secret").unwrap();
        let bearer = format!("Bearer {token}");

        for uri in ["/api/clients/abc", "/api/tasks/1.5", "/api/documents/process/x"] {
            let response = send(uri, Some(&bearer)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert!(
                response.headers()["content-type"]
                    .to_str()
                    .unwrap()
                    .starts_with("application/json")
            );
            let body = json(response).await;
            assert!(body["message"].as_str().unwrap().contains("Cannot parse"), "{uri}");
        }
    }

    #[tokio::test]
    async fn unknown_api_paths_answer_json_404() {
        let response = send("/api/nothing/here", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json(response).await["message"], "Route not found");
    }
}
