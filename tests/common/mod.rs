#![allow(dead_code)]

use std::{str::FromStr, sync::Arc};

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use temp_dir::TempDir;
use tower::ServiceExt;
use userhub::{AppState, Config};
use userhub_user::{
    Command,
    publisher::OutboxPublisher,
    repository::{SqliteStore, Store},
};

pub struct TestApp {
    pub router: Router,
    pub outbox: OutboxPublisher,
    pub pool: SqlitePool,
    _dir: TempDir,
}

pub async fn setup_test_db(dir: &TempDir) -> anyhow::Result<SqlitePool> {
    let path = dir.child("userhub.db");
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await?;

    userhub_db::migrate(&pool).await?;

    Ok(pool)
}

/// Router backed by SQLite with events written straight to the outbox,
/// so rows are visible as soon as a request returns.
pub async fn create_test_app() -> anyhow::Result<TestApp> {
    let dir = TempDir::new()?;
    let pool = setup_test_db(&dir).await?;
    let store: Arc<dyn Store> = Arc::new(SqliteStore::new(pool.clone()));
    let outbox = OutboxPublisher::new(pool.clone());

    let state = AppState {
        config: Config::load(None)?,
        user_command: Command::new(store, Arc::new(outbox.clone())),
        pool: pool.clone(),
    };

    Ok(TestApp {
        router: userhub::create_app(state),
        outbox,
        pool,
        _dir: dir,
    })
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> anyhow::Result<Response<Body>> {
        Ok(self.router.clone().oneshot(request).await?)
    }

    pub async fn json(
        &self,
        method: &str,
        uri: &str,
        body: serde_json::Value,
    ) -> anyhow::Result<Response<Body>> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?;

        self.send(request).await
    }

    pub async fn empty(&self, method: &str, uri: &str) -> anyhow::Result<Response<Body>> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())?;

        self.send(request).await
    }
}

pub async fn read_json(response: Response<Body>) -> anyhow::Result<serde_json::Value> {
    let bytes = response.into_body().collect().await?.to_bytes();

    Ok(serde_json::from_slice(&bytes)?)
}
