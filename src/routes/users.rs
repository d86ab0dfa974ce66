use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use userhub_user::{CreateUserInput, UpdateUserInput};

use crate::error::AppError;

use super::{
    AppState,
    hal::{Hal, UserCollection, UserModel},
};

/// GET /users
pub async fn list(State(state): State<AppState>) -> Result<Hal<UserCollection>, AppError> {
    Ok(Hal(state.user_command.list().await?.into()))
}

/// GET /users/read/{id}
pub async fn read(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Hal<UserModel>, AppError> {
    Ok(Hal(state.user_command.read(id).await?.into()))
}

/// POST /users/create - 201 with a Location pointing at the read route
pub async fn create(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<CreateUserInput>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let user = UserModel::from(state.user_command.create(input).await?);
    let location = format!("/users/read/{}", user.user.id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Hal(user)))
}

/// PUT /users/update/{id}
pub async fn update(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(input), _): WithRejection<Json<UpdateUserInput>, AppError>,
) -> Result<Hal<UserModel>, AppError> {
    Ok(Hal(state.user_command.update(id, input).await?.into()))
}

/// DELETE /users/delete/{id} - 204 with an empty body
pub async fn delete(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<StatusCode, AppError> {
    state.user_command.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
