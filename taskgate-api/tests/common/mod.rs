//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - An in-memory store, so no database is required
//! - Seeded users for each role, with ready-made tokens
//! - Request helpers driving the router through `tower::Service`

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use taskgate_api::app::{build_router, AppState};
use taskgate_api::config::{ApiConfig, Config, JwtConfig, LogFormat, StoreBackend, StoreConfig};
use taskgate_shared::auth::password::HashParams;
use taskgate_shared::models::user::{NewUser, Role, User};
use taskgate_shared::store::{memory::MemoryStore, Store};
use tower::Service as _;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<dyn Store>,
    pub state: AppState,
    pub app: axum::Router,
    pub admin: User,
    pub manager: User,
    pub member: User,
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        store: StoreConfig {
            backend: StoreBackend::Memory,
            database_url: String::new(),
            max_connections: 1,
            connect_retries: 1,
            retry_delay_seconds: 0,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            ttl_hours: 1,
        },
        log_format: LogFormat::Pretty,
    }
}

impl TestContext {
    /// Creates a fresh context with one user per role
    pub async fn new() -> Self {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());

        let admin = seed_user(store.as_ref(), "admin@example.com", Role::Admin).await;
        let manager = seed_user(store.as_ref(), "manager@example.com", Role::Manager).await;
        let member = seed_user(store.as_ref(), "member@example.com", Role::Member).await;

        let state = AppState::with_hash_params(store.clone(), test_config(), HashParams::fast());
        let app = build_router(state.clone());

        TestContext {
            store,
            state,
            app,
            admin,
            manager,
            member,
        }
    }

    /// Returns authorization header value for a seeded user
    pub fn auth_header(&self, user: &User) -> String {
        let token = self
            .state
            .services
            .tokens
            .issue(user.id, user.role)
            .expect("Failed to issue token");
        format!("Bearer {}", token)
    }

    /// Sends a request and returns status plus parsed JSON body
    pub async fn send(&self, method: &str, uri: &str, auth: Option<&User>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(user) = auth {
            builder = builder.header("authorization", self.auth_header(user));
        }

        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self.app.clone().call(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, auth: Option<&User>) -> (StatusCode, Value) {
        self.send("GET", uri, auth, None).await
    }

    pub async fn post(&self, uri: &str, auth: Option<&User>, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, auth, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, auth: Option<&User>, body: Value) -> (StatusCode, Value) {
        self.send("PATCH", uri, auth, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, auth: Option<&User>) -> (StatusCode, Value) {
        self.send("DELETE", uri, auth, None).await
    }
}

async fn seed_user(store: &dyn Store, email: &str, role: Role) -> User {
    store
        .create_user(NewUser {
            name: email.split('@').next().unwrap_or("user").to_string(),
            email: email.to_string(),
            password_hash: String::new(),
            role,
        })
        .await
        .expect("Failed to seed user")
}
