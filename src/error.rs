use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{kind} '{name}' already exists")]
    DuplicateName { kind: &'static str, name: String },

    #[error("Please select at least one ingredient")]
    EmptySelection,

    #[error("Unknown ingredient id(s): {}", format_ids(.0))]
    UnknownIngredient(Vec<i64>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

fn format_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Map a unique-constraint violation to `DuplicateName`, pass anything else through
    pub fn from_insert(err: sqlx::Error, kind: &'static str, name: &str) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                Error::DuplicateName {
                    kind,
                    name: name.to_string(),
                }
            }
            other => Error::Database(other),
        }
    }

    /// Get a sanitized error message safe for logging
    pub fn log_safe(&self) -> String {
        match self {
            // Database errors might contain schema details
            Error::Database(_) => "Database operation failed".to_string(),
            Error::Migration(_) => "Database migration failed".to_string(),
            Error::Io(_) => "File system operation failed".to_string(),

            Error::DuplicateName { kind, name } => format!("Duplicate {kind} name: {name}"),
            Error::EmptySelection => "Empty ingredient selection".to_string(),
            Error::UnknownIngredient(ids) => {
                format!("Unknown ingredient id(s): {}", format_ids(ids))
            }
            Error::Config(msg) => format!("Configuration error: {msg}"),
            Error::NotFound(msg) => format!("Not found: {msg}"),
            Error::Validation(msg) => format!("Validation error: {msg}"),
            Error::Internal(msg) => format!("Internal error: {msg}"),
        }
    }
}

// Implement IntoResponse for API error handling
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::DuplicateName { .. } => StatusCode::CONFLICT,
            Error::EmptySelection | Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::UnknownIngredient(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request error: {}", self.log_safe());
        } else {
            tracing::debug!("Request rejected: {}", self.log_safe());
        }

        let error_message = match &self {
            Error::Database(_) | Error::Migration(_) => "Database error".to_string(),
            _ if status.is_server_error() => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
