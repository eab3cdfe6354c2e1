#![allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    missing_debug_implementations,
    unreachable_pub,
    dead_code
)]
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::{Arc, Once};
use tokio::net::TcpListener;
use user_service::AppBuilder;
use user_service::api::{MgmtState, app_router, mgmt_router};
use user_service::config::{
    Config, HealthConfig, LogFormat, RateLimitConfig, ServerConfig, StorageBackend, StorageConfig, TelemetryConfig,
};
use user_service::storage::{InMemoryUserRepository, UserRepository};

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("user_service=debug".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().init();
    });
}

pub fn get_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // 0 means let OS choose
            mgmt_port: 0,
            shutdown_timeout_secs: 1,
            trusted_proxies: vec!["127.0.0.1/32".parse().unwrap()],
        },
        storage: StorageConfig { backend: StorageBackend::Memory, database_url: None, db_max_connections: 5 },
        rate_limit: RateLimitConfig { per_second: 10_000, burst: 10_000 },
        health: HealthConfig { store_timeout_ms: 500 },
        telemetry: TelemetryConfig { log_format: LogFormat::Text, otlp_endpoint: None },
    }
}

pub struct TestApp {
    pub server_url: String,
    pub mgmt_url: String,
    pub client: reqwest::Client,
    pub config: Config,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_config(get_test_config()).await
    }

    pub async fn spawn_with_config(config: Config) -> Self {
        Self::spawn_with(config, Arc::new(InMemoryUserRepository::new())).await
    }

    pub async fn spawn_with(config: Config, repository: Arc<dyn UserRepository>) -> Self {
        setup_tracing();

        let app = AppBuilder::new(config.clone()).with_repository(repository).build().unwrap();
        let api = app_router(&config, app.services);
        let mgmt = mgmt_router(MgmtState { health_service: app.health_service });

        let api_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mgmt_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server_url = format!("http://{}", api_listener.local_addr().unwrap());
        let mgmt_url = format!("http://{}", mgmt_listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(api_listener, api.into_make_service_with_connect_info::<SocketAddr>()).await.unwrap();
        });
        tokio::spawn(async move {
            axum::serve(mgmt_listener, mgmt.into_make_service_with_connect_info::<SocketAddr>()).await.unwrap();
        });

        Self { server_url, mgmt_url, client: reqwest::Client::new(), config }
    }

    pub fn users_url(&self) -> String {
        format!("{}/users", self.server_url)
    }

    pub fn user_url(&self, id: impl std::fmt::Display) -> String {
        format!("{}/users/{}", self.server_url, id)
    }

    pub async fn post_user(&self, body: &Value) -> reqwest::Response {
        self.client.post(self.users_url()).json(body).send().await.unwrap()
    }

    pub async fn put_user(&self, id: impl std::fmt::Display, body: &Value) -> reqwest::Response {
        self.client.put(self.user_url(id)).json(body).send().await.unwrap()
    }

    pub async fn get_user(&self, id: impl std::fmt::Display) -> reqwest::Response {
        self.client.get(self.user_url(id)).send().await.unwrap()
    }

    pub async fn delete_user(&self, id: impl std::fmt::Display) -> reqwest::Response {
        self.client.delete(self.user_url(id)).send().await.unwrap()
    }

    pub async fn list_users(&self) -> Vec<Value> {
        let resp = self.client.get(self.users_url()).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        resp.json().await.unwrap()
    }

    /// Creates a user and returns the stored record, asserting success.
    pub async fn create_user(&self, email: &str, full_name: &str, password: &str) -> Value {
        let resp = self.post_user(&user_body(email, full_name, password)).await;
        assert_eq!(resp.status(), StatusCode::CREATED, "creating {email} failed");
        resp.json().await.unwrap()
    }
}

pub fn user_body(email: &str, full_name: &str, password: &str) -> Value {
    json!({ "email": email, "full-name": full_name, "password": password })
}

/// Asserts the standard error envelope and returns it.
pub async fn assert_error(resp: reqwest::Response, status: StatusCode, error: &str) -> Value {
    assert_eq!(resp.status(), status);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], error, "unexpected envelope: {body}");
    assert!(body["details"].is_string());
    assert!(body["timestamp"].is_string());
    body
}
