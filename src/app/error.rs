use thiserror::Error;

use crate::{form::EditError, service::ServiceError};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("unknown config key: {0}")]
    UnknownKey(String),

    #[error("a restart is already in progress")]
    RestartInProgress,

    #[error("no restart trigger configured")]
    RestartUnavailable,
}
