use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;
use tracing::error;

/// Failures outside the designed login flow.
///
/// Missing input and rejected credentials are ordinary outcomes, not errors;
/// anything that ends up here is reported to the client as a bare 500.
#[derive(Debug, ThisError)]
pub enum LoginError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Template error: {0}")]
    TemplateError(#[from] askama::Error),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] Box<figment::Error>),
}

impl From<figment::Error> for LoginError {
    fn from(e: figment::Error) -> Self {
        LoginError::ConfigError(Box::new(e))
    }
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}
