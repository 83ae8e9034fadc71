use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("API key is invalid or does not exist")]
    InvalidApiKey,

    #[error("Email is already registered")]
    EmailExists,

    #[error("Admin email is already registered")]
    AdminExists,

    #[error("API key is still used by one or more users. Delete those users first.")]
    KeyInUse,

    #[error("User not found")]
    UserNotFound,

    #[error("API key not found")]
    KeyNotFound,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) | ApiError::InvalidApiKey => StatusCode::BAD_REQUEST,
            ApiError::EmailExists | ApiError::AdminExists | ApiError::KeyInUse => {
                StatusCode::CONFLICT
            }
            ApiError::UserNotFound | ApiError::KeyNotFound => StatusCode::NOT_FOUND,
            ApiError::Database(_)
            | ApiError::Hashing(_)
            | ApiError::Configuration(_)
            | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            ApiError::Internal.to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        tracing::error!(error = %err, "blocking task failed");
        ApiError::Internal
    }
}
