//! Shared harness for the integration tests: a migrated temp-file sqlite
//! database, the seeded router, and small request helpers.

#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt; // for `oneshot`

use note_list::create_app;
use note_list::identity::SqliteIdentityStore;

pub const SUPERADMIN_EMAIL: &str = "superadmin@notelist.local";
pub const SUPERADMIN_PASSWORD: &str = "Sup3rAdmin!";

pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
    pub identity: SqliteIdentityStore,
    // Held so the database file outlives the test.
    _dir: TempDir,
}

pub async fn setup() -> Result<TestApp> {
    let dir = tempfile::tempdir().context("failed to create tempdir")?;
    let db_path = dir.path().join("test.db");

    let opts = SqliteConnectOptions::new()
        .filename(db_path.as_path())
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(opts).await?;

    let migrator = sqlx::migrate::Migrator::new(
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations"),
    )
    .await?;
    migrator.run(&pool).await?;

    std::env::set_var("JWT_SECRET", "test-secret");
    note_list::seed::run(&pool).await?;
    let app = create_app(pool.clone()).await?;

    Ok(TestApp {
        app,
        identity: SqliteIdentityStore::new(pool.clone()),
        pool,
        _dir: dir,
    })
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        };

        let resp = self.app.clone().oneshot(builder.body(body)?).await?;
        let status = resp.status();
        let bytes = body::to_bytes(resp.into_body(), usize::MAX).await?;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, json))
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<String> {
        let (status, body) = self
            .request(
                "POST",
                "/auth/register",
                None,
                Some(json!({ "username": username, "email": email, "password": password })),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register failed: {body}");
        token_from(&body)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let (status, body) = self
            .request(
                "POST",
                "/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "login failed: {body}");
        token_from(&body)
    }

    pub async fn superadmin_token(&self) -> Result<String> {
        self.login(SUPERADMIN_EMAIL, SUPERADMIN_PASSWORD).await
    }

    /// The user id a register/login response reported.
    pub async fn user_id(&self, email: &str) -> Result<String> {
        use note_list::identity::IdentityStore;
        let user = self
            .identity
            .find_user_by_email(email)
            .await
            .map_err(|err| anyhow::anyhow!("lookup failed: {err}"))?
            .context("no such user")?;
        Ok(user.id)
    }
}

pub fn token_from(body: &Value) -> Result<String> {
    Ok(body
        .get("token")
        .and_then(|v| v.as_str())
        .context("missing token")?
        .to_string())
}
