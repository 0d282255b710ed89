use thiserror::Error;

/// Internal error type for store and service operations
///
/// Not exposed via the API - endpoints must convert to `ErreurApi` so the
/// driver detail stays in the server logs.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error("Database error during {operation}: {source}")]
    Database {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    /// Placeholder count and parameter count diverged. Raised before the
    /// query ever reaches the driver.
    #[error("Parameter count mismatch: query expects {attendu} placeholders, got {recu} values")]
    ParameterMismatch { attendu: usize, recu: usize },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto { operation: String, message: String },

    #[error("Token expired")]
    TokenExpire,

    #[error("Invalid token")]
    TokenInvalide,

    #[error("Duplicate entry: {0}")]
    Conflit(String),

    #[error("Not found: {0}")]
    Introuvable(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> Self {
        InternalError::Database {
            operation: operation.to_string(),
            source,
        }
    }

    pub fn crypto(operation: &str, message: impl Into<String>) -> Self {
        InternalError::Crypto {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}
