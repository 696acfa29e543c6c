//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;
use unixify_common::{AppConfig, AppError};
use unixify_db::{
    create_pool, run_migrations, PgAccountRepository, PgAuditRepository, PgGroupRepository,
    PgMembershipRepository, PgRegistryStore,
};
use unixify_service::ServiceContextBuilder;

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health probes get the basic stack only, so they stay reachable when the
/// API is being rate limited.
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let timeout = Duration::from_secs(config.api.request_timeout_secs);

    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
        timeout,
    );
    let health = apply_middleware(health_routes(), timeout);

    api.merge(health).with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let db_config = unixify_db::DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        info!("Applying database migrations...");
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }

    // Create repositories
    let account_repo = Arc::new(PgAccountRepository::new(pool.clone()));
    let group_repo = Arc::new(PgGroupRepository::new(pool.clone()));
    let membership_repo = Arc::new(PgMembershipRepository::new(pool.clone()));
    let audit_repo = Arc::new(PgAuditRepository::new(pool.clone()));
    let store = Arc::new(PgRegistryStore::new(pool));

    // Build service context
    let service_context = ServiceContextBuilder::new()
        .account_repo(account_repo)
        .group_repo(group_repo)
        .membership_repo(membership_repo)
        .audit_repo(audit_repo)
        .store(store)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    // Socket addresses are the fallback source of the audited client IP
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.api.address();

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, &addr).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use unixify_common::{
        AppSettings, CorsConfig, DatabaseConfig, Environment, JwtConfig, RateLimitConfig,
        ServerConfig,
    };
    use unixify_core::AuditAction;
    use unixify_service::test_support::{context, MemoryRegistry};

    fn test_config() -> AppConfig {
        AppConfig {
            app: AppSettings {
                name: "unixify".to_string(),
                env: Environment::Development,
            },
            api: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                request_timeout_secs: 30,
            },
            database: DatabaseConfig {
                url: "postgres://unused".to_string(),
                max_connections: 1,
                min_connections: 0,
                run_migrations: false,
            },
            jwt: JwtConfig {
                secret: "router-test-secret".to_string(),
                leeway_secs: 0,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: 1000,
                burst: 1000,
            },
            cors: CorsConfig {
                allowed_origins: Vec::new(),
            },
        }
    }

    struct TestApp {
        app: Router,
        registry: Arc<MemoryRegistry>,
        token: String,
    }

    impl TestApp {
        fn new() -> Self {
            let registry = MemoryRegistry::new();
            let state = AppState::new(context(&registry), test_config());
            let token = state
                .jwt_service()
                .issue_access_token(7, "operator", 300)
                .unwrap();
            Self {
                app: create_app(state),
                registry,
                token,
            }
        }

        async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            let mut request = Request::builder()
                .method(method)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
                .header("x-forwarded-for", "203.0.113.9, 10.0.0.1");
            let body = match body {
                Some(value) => {
                    request = request.header(header::CONTENT_TYPE, "application/json");
                    Body::from(value.to_string())
                }
                None => Body::empty(),
            };
            raw(&self.app, request.body(body).unwrap()).await
        }
    }

    async fn raw(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn account(uid: i64, username: &str, account_type: &str) -> Value {
        json!({ "unix_uid": uid, "username": username, "account_type": account_type })
    }

    fn group(gid: i64, groupname: &str, group_type: &str) -> Value {
        json!({ "unix_gid": gid, "groupname": groupname, "group_type": group_type })
    }

    #[tokio::test]
    async fn test_health_needs_no_token() {
        let app = TestApp::new();

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = raw(&app.app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let request = Request::builder()
            .uri("/health/ready")
            .body(Body::empty())
            .unwrap();
        let (status, body) = raw(&app.app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"]["database"], "healthy");
    }

    #[tokio::test]
    async fn test_api_requires_bearer_token() {
        let app = TestApp::new();

        let request = Request::builder()
            .uri("/api/v1/accounts")
            .body(Body::empty())
            .unwrap();
        let (status, body) = raw(&app.app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "MISSING_AUTHORIZATION");

        let request = Request::builder()
            .uri("/api/v1/accounts")
            .header(header::AUTHORIZATION, "Bearer not-a-token")
            .body(Body::empty())
            .unwrap();
        let (status, body) = raw(&app.app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_TOKEN");
    }

    #[tokio::test]
    async fn test_create_account_is_attributed_to_token_and_forwarded_ip() {
        let app = TestApp::new();

        let (status, body) = app
            .send("POST", "/api/v1/accounts", Some(account(1500, "alice", "people")))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["record"]["unix_uid"], 1500);
        assert_eq!(body["warnings"], json!([]));

        let audit = app.registry.audit_entries();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].action, AuditAction::Create);
        assert_eq!(audit[0].user_id, 7);
        assert_eq!(audit[0].username, "operator");
        assert_eq!(audit[0].ip_address, "203.0.113.9");

        let (status, body) = app
            .send("GET", "/api/v1/accounts/uid-check?uid=1500&exclude_id=0", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["duplicate"], true);

        let (status, body) = app
            .send("POST", "/api/v1/accounts", Some(account(1500, "bob", "people")))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "UID_TAKEN");
        assert_eq!(app.registry.live_account_count(), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_uid_is_created_with_warning() {
        let app = TestApp::new();

        let (status, body) = app
            .send("POST", "/api/v1/accounts", Some(account(500, "legacy", "people")))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["warnings"][0]["kind"], "uid");
        assert_eq!(body["warnings"][0]["type"], "people");

        let (status, body) = app
            .send("GET", "/api/v1/accounts/uid-validate?uid=500&type=people", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "warning");

        let (status, body) = app
            .send("GET", "/api/v1/accounts/uid-validate?uid=-1&type=people", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "invalid");
    }

    #[tokio::test]
    async fn test_next_ids_follow_range_policy() {
        let app = TestApp::new();

        let (status, body) = app
            .send("GET", "/api/v1/accounts/next-uid?type=database", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["next"], 70000);

        app.send("POST", "/api/v1/groups", Some(group(1200, "staff", "people")))
            .await;
        let (_, body) = app
            .send("GET", "/api/v1/groups/next-gid?type=people", None)
            .await;
        assert_eq!(body["next"], 1201);

        let (status, body) = app
            .send("GET", "/api/v1/groups/next-gid?type=wizard", None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_TYPE");
    }

    #[tokio::test]
    async fn test_system_account_needs_system_primary_group() {
        let app = TestApp::new();

        let (status, body) = app
            .send("POST", "/api/v1/accounts", Some(account(50, "svcacct", "system")))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "PRIMARY_GROUP_REQUIRED");

        let (_, svcgrp) = app
            .send("POST", "/api/v1/groups", Some(group(50, "svcgrp", "system")))
            .await;
        let mut request = account(50, "svcacct", "system");
        request["primary_group_id"] = svcgrp["record"]["id"].clone();
        let (status, body) = app.send("POST", "/api/v1/accounts", Some(request)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["record"]["primary_group_id"], svcgrp["record"]["id"]);

        let (status, body) = app
            .send(
                "DELETE",
                &format!("/api/v1/groups/{}", svcgrp["record"]["id"]),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "GROUP_IN_USE");
    }

    #[tokio::test]
    async fn test_membership_roundtrip_and_incompatibility() {
        let app = TestApp::new();

        let (_, alice) = app
            .send("POST", "/api/v1/accounts", Some(account(1500, "alice", "people")))
            .await;
        let (_, backup) = app
            .send("POST", "/api/v1/accounts", Some(account(60010, "backup", "service")))
            .await;
        let (_, staff) = app
            .send("POST", "/api/v1/groups", Some(group(1100, "staff", "people")))
            .await;
        let alice_id = alice["record"]["id"].clone();
        let staff_id = staff["record"]["id"].clone();

        let (status, body) = app
            .send(
                "POST",
                "/api/v1/memberships",
                Some(json!({ "account_id": backup["record"]["id"], "group_id": staff_id })),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "INCOMPATIBLE_TYPES");
        assert_eq!(app.registry.membership_count(), 0);

        let membership = json!({ "account_id": alice_id, "group_id": staff_id });
        let (status, _) = app
            .send("POST", "/api/v1/memberships", Some(membership.clone()))
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = app
            .send("GET", &format!("/api/v1/groups/{staff_id}/members"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["username"], "alice");

        let (status, _) = app
            .send("DELETE", "/api/v1/memberships", Some(membership.clone()))
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = app
            .send("DELETE", "/api/v1/memberships", Some(membership))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "UNKNOWN_MEMBERSHIP");
    }

    #[tokio::test]
    async fn test_update_and_delete_account() {
        let app = TestApp::new();

        let (_, alice) = app
            .send("POST", "/api/v1/accounts", Some(account(1500, "alice", "people")))
            .await;
        let uri = format!("/api/v1/accounts/{}", alice["record"]["id"]);

        let (status, body) = app
            .send("PUT", &uri, Some(json!({ "first_name": "Alice" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["record"]["first_name"], "Alice");
        assert_eq!(body["record"]["username"], "alice");

        let (status, _) = app.send("DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = app.send("GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "UNKNOWN_ACCOUNT");
    }

    #[tokio::test]
    async fn test_list_and_search_accounts() {
        let app = TestApp::new();
        app.send("POST", "/api/v1/accounts", Some(account(1500, "alice", "people")))
            .await;
        app.send("POST", "/api/v1/accounts", Some(account(60010, "backup", "service")))
            .await;

        let (status, body) = app.send("GET", "/api/v1/accounts", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (_, body) = app.send("GET", "/api/v1/accounts?type=service", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["username"], "backup");

        let (_, body) = app.send("GET", "/api/v1/accounts?q=ali", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["username"], "alice");

        let (_, body) = app
            .send("GET", "/api/v1/accounts?q=ali&type=service", None)
            .await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_search_within_type_and_unknown_type() {
        let app = TestApp::new();
        app.send("POST", "/api/v1/accounts", Some(account(1500, "backupadm", "people")))
            .await;
        app.send("POST", "/api/v1/accounts", Some(account(60010, "backup", "service")))
            .await;

        let (_, body) = app.send("GET", "/api/v1/accounts?q=backup", None).await;
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (status, body) = app
            .send("GET", "/api/v1/accounts?q=backup&type=people", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["username"], "backupadm");

        let (status, body) = app
            .send("GET", "/api/v1/accounts?q=backup&type=wizard", None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_TYPE");

        app.send("POST", "/api/v1/groups", Some(group(1100, "staff", "people")))
            .await;
        app.send("POST", "/api/v1/groups", Some(group(50, "wheel", "system")))
            .await;
        let (_, body) = app.send("GET", "/api/v1/groups?q=0&type=system", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["groupname"], "wheel");
    }

    #[tokio::test]
    async fn test_lookup_by_identifier_and_name() {
        let app = TestApp::new();
        app.send("POST", "/api/v1/accounts", Some(account(1500, "alice", "people")))
            .await;
        app.send("POST", "/api/v1/groups", Some(group(50, "wheel", "system")))
            .await;

        let (status, body) = app.send("GET", "/api/v1/accounts/by-uid/1500", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice");

        let (status, body) = app
            .send("GET", "/api/v1/accounts/by-name/alice", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["unix_uid"], 1500);

        let (status, body) = app.send("GET", "/api/v1/accounts/by-uid/1501", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "UNKNOWN_ACCOUNT");

        let (status, body) = app.send("GET", "/api/v1/accounts/by-uid/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_PATH_PARAMETER");

        let (status, body) = app.send("GET", "/api/v1/groups/by-gid/50", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["groupname"], "wheel");

        let (status, body) = app.send("GET", "/api/v1/groups/by-name/wheel", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["unix_gid"], 50);

        let (status, body) = app.send("GET", "/api/v1/groups/by-name/users", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "UNKNOWN_GROUP");
    }

    #[tokio::test]
    async fn test_rejects_malformed_input() {
        let app = TestApp::new();

        let (status, body) = app.send("GET", "/api/v1/accounts/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_PATH_PARAMETER");

        let (status, body) = app
            .send("POST", "/api/v1/accounts", Some(account(1500, "Bad Name", "people")))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["details"]["username"].is_array());

        let (status, body) = app
            .send("POST", "/api/v1/accounts", Some(json!({ "username": "alice" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_BODY");

        let (status, body) = app
            .send("GET", "/api/v1/accounts/uid-check?uid=many", None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_QUERY_PARAMETER");
    }

    #[tokio::test]
    async fn test_audit_log_filters() {
        let app = TestApp::new();
        let (_, alice) = app
            .send("POST", "/api/v1/accounts", Some(account(1500, "alice", "people")))
            .await;
        let alice_id = alice["record"]["id"].clone();
        app.send(
            "PUT",
            &format!("/api/v1/accounts/{alice_id}"),
            Some(json!({ "last_name": "Liddell" })),
        )
        .await;
        app.send("POST", "/api/v1/groups", Some(group(1100, "staff", "people")))
            .await;

        let (status, body) = app.send("GET", "/api/v1/audit", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);
        assert_eq!(body[0]["entity_type"], "group");

        let (_, body) = app
            .send(
                "GET",
                &format!("/api/v1/audit?entity_type=account&entity_id={alice_id}&action=update"),
                None,
            )
            .await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        let entry_id = body[0]["id"].clone();

        let (status, body) = app
            .send("GET", &format!("/api/v1/audit/{entry_id}"), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["action"], "update");

        let (status, body) = app
            .send("GET", "/api/v1/audit?action=explode", None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_QUERY_PARAMETER");
    }
}
