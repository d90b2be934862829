use thiserror::Error;

/// Failures reported by config collaborators.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Backend(String),

    #[error("config namespace not found: {0}")]
    NamespaceNotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backing document could not be read or written.
    #[error("invalid config document {path}: {message}")]
    Document { path: String, message: String },
}

impl ServiceError {
    pub fn backend(message: impl Into<String>) -> Self {
        ServiceError::Backend(message.into())
    }
}
