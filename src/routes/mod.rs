use axum::{
    Router,
    routing::{delete, get, post, put},
};
use sqlx::SqlitePool;

mod hal;
mod health;
mod users;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub user_command: userhub_user::Command,
    pub pool: SqlitePool,
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        // Health check endpoints
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .route("/users", get(users::list))
        .route("/users/read/{id}", get(users::read))
        .route("/users/create", post(users::create))
        .route("/users/update/{id}", put(users::update))
        .route("/users/delete/{id}", delete(users::delete))
        .with_state(app_state)
}
