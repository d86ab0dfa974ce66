#![allow(dead_code)]

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use temp_dir::TempDir;
use userhub_shared::UserEvent;
use userhub_user::{
    Command, CreateUserInput,
    publisher::{PublishError, Publisher},
    repository::{MemoryStore, SqliteStore, Store},
};

#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<UserEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<UserEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, event: &UserEvent) -> Result<(), PublishError> {
        self.events.lock().unwrap().push(event.clone());

        Ok(())
    }
}

pub struct FailingPublisher;

#[async_trait]
impl Publisher for FailingPublisher {
    async fn publish(&self, _event: &UserEvent) -> Result<(), PublishError> {
        Err(PublishError::Closed)
    }
}

pub struct TestState {
    pub command: Command,
    pub store: Arc<dyn Store>,
    pub publisher: Arc<RecordingPublisher>,
    pub pool: Option<SqlitePool>,
    _dir: Option<TempDir>,
}

pub async fn setup_pool(dir: &TempDir) -> anyhow::Result<SqlitePool> {
    let path = dir.child("db.sqlite3");
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await?;
    userhub_db::migrate(&pool).await?;

    Ok(pool)
}

pub async fn setup_sqlite() -> anyhow::Result<TestState> {
    let dir = TempDir::new()?;
    let pool = setup_pool(&dir).await?;
    let store: Arc<dyn Store> = Arc::new(SqliteStore::new(pool.clone()));
    let publisher = Arc::new(RecordingPublisher::default());

    Ok(TestState {
        command: Command::new(store.clone(), publisher.clone()),
        store,
        publisher,
        pool: Some(pool),
        _dir: Some(dir),
    })
}

pub fn setup_memory() -> TestState {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let publisher = Arc::new(RecordingPublisher::default());

    TestState {
        command: Command::new(store.clone(), publisher.clone()),
        store,
        publisher,
        pool: None,
        _dir: None,
    }
}

pub fn create_input(name: &str, email: &str, age: i32) -> CreateUserInput {
    CreateUserInput {
        name: name.to_owned(),
        email: email.to_owned(),
        age: Some(age),
    }
}
