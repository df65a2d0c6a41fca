use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::api::pages;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Spotify error: {0}")]
    Spotify(String),

    #[error("Completion API error: {0}")]
    Completion(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Every workflow failure renders the same generic page. The distinct kinds
/// exist for logging and tests, not for the end user.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Auth(ref msg) => {
                tracing::error!("Spotify login failed: {}", msg);
                StatusCode::UNAUTHORIZED
            }
            AppError::Generation(ref msg) => {
                tracing::error!("Candidate generation failed: {}", msg);
                StatusCode::BAD_GATEWAY
            }
            AppError::NotFound(ref msg) => {
                tracing::warn!("No catalog match: {}", msg);
                StatusCode::NOT_FOUND
            }
            AppError::Spotify(ref msg) => {
                tracing::error!("Spotify API error: {}", msg);
                StatusCode::BAD_GATEWAY
            }
            AppError::Completion(ref msg) => {
                tracing::error!("Completion API error: {}", msg);
                StatusCode::BAD_GATEWAY
            }
            AppError::Validation(ref msg) => {
                tracing::warn!("Invalid request: {}", msg);
                StatusCode::BAD_REQUEST
            }
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Html(pages::failure())).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
