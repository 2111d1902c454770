//! Main application router.

use crate::{
    controllers::{account_controller, health_controller, profile_controller},
    middleware::logging_middleware,
    state::AppState,
};
use infovault_config::ServerConfig;
use axum::{
    http::{header, HeaderValue},
    middleware, Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

/// Creates the main application router.
pub fn create_router(state: AppState, server_config: &ServerConfig) -> Router {
    let cors = create_cors_layer(server_config);

    let csp = HeaderValue::from_str(&server_config.content_security_policy)
        .map_err(|e| warn!("Ignoring invalid Content-Security-Policy: {}", e))
        .ok();

    let api_router = Router::new()
        .nest("/accounts", account_controller::router())
        .nest("/users", profile_controller::router());

    let router = Router::new()
        .merge(health_controller::router())
        .nest("/api/v1", api_router)
        .with_state(state)
        .layer(SetResponseHeaderLayer::if_not_present(header::CONTENT_SECURITY_POLICY, csp))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(server_config.request_timeout()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with REST endpoints");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }

    if server_config.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::{DateTime, Utc};
    use http_body_util::BodyExt;
    use infovault_core::{InfoError, InfoResult};
    use infovault_repository::DatabasePool;
    use infovault_service::{
        AccountResponse, AccountService, BalanceResponse, MemoryCacheStore, ProfileResponse,
        RecordTransactionRequest, RecordTransactionResponse, TransactionListResponse,
    };
    use serde_json::Value;
    use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    struct StubAccountService;

    #[async_trait]
    impl AccountService for StubAccountService {
        async fn get_account(&self, id: i64) -> InfoResult<AccountResponse> {
            if id == 999 {
                return Err(InfoError::not_found("statement returned no rows"));
            }
            Ok(AccountResponse {
                id,
                user_id: 7,
                name: "savings".to_string(),
                balance: 100,
                created_at: DateTime::<Utc>::default(),
            })
        }

        async fn get_balance(&self, id: i64) -> InfoResult<BalanceResponse> {
            Ok(BalanceResponse {
                account_id: id,
                balance: 100,
            })
        }

        async fn list_transactions(&self, account_id: i64, limit: u32) -> InfoResult<TransactionListResponse> {
            Ok(TransactionListResponse {
                account_id,
                transactions: Vec::new(),
                total: i64::from(limit),
            })
        }

        async fn get_profile(&self, user_id: i64) -> InfoResult<ProfileResponse> {
            Ok(ProfileResponse {
                user_id,
                name: "Ann".to_string(),
                email: None,
            })
        }

        async fn record_transaction(
            &self,
            account_id: i64,
            _request: RecordTransactionRequest,
        ) -> InfoResult<RecordTransactionResponse> {
            Ok(RecordTransactionResponse { id: 1, account_id })
        }
    }

    fn app() -> Router {
        app_with(&ServerConfig::default())
    }

    fn app_with(config: &ServerConfig) -> Router {
        let options = MySqlConnectOptions::new().host("127.0.0.1").port(1);
        let pool = MySqlPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy_with(options);

        let state = AppState::new(
            Arc::new(StubAccountService),
            Arc::new(DatabasePool::with_pool(pool)),
            Arc::new(MemoryCacheStore::new()),
            "0.1.0-test",
        );
        create_router(state, config)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_ping_banner() {
        let response = app().oneshot(get("/ping")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_SECURITY_POLICY).unwrap(),
            "connect-src http://localhost:8080"
        );

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"Infovault API | 0.1.0-test");
    }

    #[tokio::test]
    async fn test_get_account() {
        let response = app().oneshot(get("/api/v1/accounts/42")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_SECURITY_POLICY).unwrap(),
            "default-src 'self'"
        );

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["id"], 42);
        assert_eq!(json["data"]["balance"], 100);
    }

    #[tokio::test]
    async fn test_missing_account_is_404() {
        let response = app().oneshot(get("/api/v1/accounts/999")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_transaction_limit_is_clamped() {
        let response = app()
            .oneshot(get("/api/v1/accounts/42/transactions?limit=500"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["total"], 100);
    }

    #[tokio::test]
    async fn test_get_profile() {
        let response = app().oneshot(get("/api/v1/users/7/profile")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["data"]["name"], "Ann");
        assert!(json["data"].get("email").is_none());
    }

    #[tokio::test]
    async fn test_record_transaction_created() {
        let response = app()
            .oneshot(post_json(
                "/api/v1/accounts/42/transactions",
                r#"{"tx_id":"tx-1","amount":25,"memo":null}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["data"]["account_id"], 42);
    }

    #[tokio::test]
    async fn test_record_transaction_validation_error() {
        let response = app()
            .oneshot(post_json(
                "/api/v1/accounts/42/transactions",
                r#"{"tx_id":"  ","amount":0,"memo":null}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_record_transaction_invalid_json() {
        let response = app()
            .oneshot(post_json("/api/v1/accounts/42/transactions", "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "INVALID_JSON");
    }

    #[tokio::test]
    async fn test_ready_reports_unreachable_database() {
        let response = app().oneshot(get("/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let json = body_json(response).await;
        assert_eq!(json["database"], "down");
        assert_eq!(json["cache"], "up");
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri("/api/v1/accounts/42")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_cors_with_explicit_origins() {
        let config = ServerConfig {
            cors_origins: vec!["https://app.example.com".to_string()],
            ..ServerConfig::default()
        };

        let response = app_with(&config)
            .oneshot(preflight("https://app.example.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://app.example.com"
        );

        let response = app_with(&config)
            .oneshot(preflight("https://evil.example.com"))
            .await
            .unwrap();
        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
