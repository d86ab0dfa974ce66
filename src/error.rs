use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use time::OffsetDateTime;

const BAD_REQUEST: &str = "/users/error/bad-request";
const NOT_FOUND: &str = "/users/error/not-found";
const CONFLICT: &str = "/users/error/conflict";
const INTERNAL_SERVER: &str = "/users/error/internal-server";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Errors surfaced by the HTTP layer, rendered as `application/problem+json`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Unexpected error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct Problem {
    #[serde(rename = "type")]
    kind: &'static str,
    title: &'static str,
    status: u16,
    detail: String,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

impl From<userhub_shared::Error> for AppError {
    fn from(err: userhub_shared::Error) -> Self {
        match err {
            userhub_shared::Error::Validate(errors) => AppError::Validation(field_errors(&errors)),
            userhub_shared::Error::Conflict(msg) => AppError::Conflict(msg),
            userhub_shared::Error::NotFound(msg) => AppError::NotFound(msg),
            userhub_shared::Error::Unknown(err) => AppError::Internal(err),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Flattens validator output into one entry per failed rule, sorted by field.
fn field_errors(errors: &validator::ValidationErrors) -> Vec<FieldError> {
    let mut fields = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| error.code.to_string()),
            })
        })
        .collect::<Vec<_>>();

    fields.sort_by(|a, b| a.field.cmp(&b.field).then(a.message.cmp(&b.message)));
    fields
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, title) = match &self {
            AppError::Validation(_) | AppError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, BAD_REQUEST, "Bad Request")
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, NOT_FOUND, "Not Found"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, CONFLICT, "Conflict"),
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "Unexpected error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_SERVER,
                    "Internal Server Error",
                )
            }
        };

        let detail = self.to_string();
        let errors = match self {
            AppError::Validation(errors) => Some(errors),
            _ => None,
        };

        let problem = Problem {
            kind,
            title,
            status: status.as_u16(),
            detail,
            timestamp: userhub_shared::now(),
            errors,
        };

        let body = match serde_json::to_vec(&problem) {
            Ok(body) => body,
            Err(err) => {
                tracing::error!(error = %err, "Failed to encode problem detail");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };

        (
            status,
            [(header::CONTENT_TYPE, "application/problem+json")],
            body,
        )
            .into_response()
    }
}
