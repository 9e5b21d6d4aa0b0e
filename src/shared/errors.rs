use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("group not found")]
    GroupNotFound,
    #[error("student not found")]
    StudentNotFound,
    #[error("cannot delete group with subgroups")]
    GroupHasSubgroups(i64),
    #[error("parent group {0} does not exist")]
    UnknownParentGroup(i64),
    #[error("group {0} does not exist")]
    UnknownGroup(i64),
    #[error("group {group} cannot be its own ancestor")]
    ParentCycle { group: i64, parent: i64 },
    #[error("parent cycle detected at group {0}")]
    CycleDetected(i64),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest { message: String },
    #[error("{message}")]
    NotFound { message: String },
    #[error("{message}")]
    Conflict { message: String },
    #[error("internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            ApiError::Conflict { message } => (StatusCode::CONFLICT, message),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };

        let body = ErrorBody { message };
        (status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl From<DomainError> for ApiError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::GroupNotFound => ApiError::NotFound {
                message: "group not found".to_string(),
            },
            DomainError::StudentNotFound => ApiError::NotFound {
                message: "student not found".to_string(),
            },
            DomainError::GroupHasSubgroups(_) => ApiError::Conflict {
                message: "cannot delete group with subgroups".to_string(),
            },
            err @ (DomainError::UnknownParentGroup(_)
            | DomainError::UnknownGroup(_)
            | DomainError::ParentCycle { .. }) => ApiError::BadRequest {
                message: err.to_string(),
            },
            DomainError::CycleDetected(id) => {
                tracing::error!("group hierarchy contains a cycle at {id}");
                ApiError::Internal
            }
            DomainError::Unexpected(msg) => {
                tracing::error!("internal error: {msg}");
                ApiError::Internal
            }
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!("Internal error: {err:?}");
        ApiError::Internal
    }
}
