use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use sqlx::SqlitePool;

type Probe = (StatusCode, Json<Value>);

/// GET /health - the process answers
pub async fn health() -> Probe {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// GET /ready - the user store can be queried
pub async fn ready(State(pool): State<SqlitePool>) -> Probe {
    if let Err(err) = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user LIMIT 1")
        .fetch_one(&pool)
        .await
    {
        tracing::error!(error = %err, "user store not reachable");

        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not_ready", "reason": "store_unavailable" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({ "status": "ready", "connections": pool.size() })),
    )
}
