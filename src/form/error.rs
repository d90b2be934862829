use thiserror::Error;

use super::path::{PathSegment, display_path};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("{key}{}: no such element", display_path(.path))]
    InvalidPath { key: String, path: Vec<PathSegment> },
    #[error("{key}{}: not a list or map", display_path(.path))]
    NotAContainer { key: String, path: Vec<PathSegment> },
    #[error("{key}: not a nested field")]
    NotNestable { key: String },
    #[error("{key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl EditError {
    pub(crate) fn invalid_path(key: &str, path: &[PathSegment]) -> Self {
        EditError::InvalidPath {
            key: key.to_string(),
            path: path.to_vec(),
        }
    }

    pub(crate) fn not_container(key: &str, path: &[PathSegment]) -> Self {
        EditError::NotAContainer {
            key: key.to_string(),
            path: path.to_vec(),
        }
    }
}
