use anyhow::Result;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{ConnectOptions, Sqlite, SqlitePool};
use std::str::FromStr;
use tracing::log::LevelFilter;

/// WAL lets readers proceed during a write; busy_timeout absorbs short
/// write contention instead of failing with SQLITE_BUSY.
async fn configure_pragmas(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA temp_store = memory")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the database file if it does not exist yet.
pub async fn create_database(database_url: &str) -> Result<()> {
    if !Sqlite::database_exists(database_url).await? {
        tracing::info!(database_url, "Creating database");
        Sqlite::create_database(database_url).await?;
    }

    Ok(())
}

/// Drop the database if it exists, then create it again empty.
pub async fn reset_database(database_url: &str) -> Result<()> {
    if Sqlite::database_exists(database_url).await? {
        tracing::info!(database_url, "Dropping database");
        Sqlite::drop_database(database_url).await?;
    }

    create_database(database_url).await
}

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.log_statements(LevelFilter::Debug);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    configure_pragmas(&pool).await?;

    tracing::info!("Created pool with {} max connections", max_connections);

    Ok(pool)
}

/// Create (if needed), connect and migrate in one go.
pub async fn prepare(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    create_database(database_url).await?;
    let pool = create_pool(database_url, max_connections).await?;
    userhub_db::migrate(&pool).await?;

    tracing::info!("Migrations applied");

    Ok(pool)
}
