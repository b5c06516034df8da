use std::time::Duration;

use thiserror::Error;

use crate::interview::InterviewRecord;
use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in vox-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Configuration errors. Fatal to the command or request that hit them.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    MissingCredential(String),

    #[error("topic '{0}' not found")]
    UnknownTopic(String),

    #[error("unknown provider '{0}'")]
    UnknownProvider(String),

    #[error("invalid topic '{id}': {reason}")]
    InvalidTopic { id: String, reason: String },

    #[error("could not read config file {path}: {message}")]
    Read { path: String, message: String },

    #[error("could not parse config file {path}: {message}")]
    Parse { path: String, message: String },
}

/// Errors raised by an interview front end while asking or displaying.
#[derive(Debug, Error)]
pub enum UiError {
    #[error("input closed before an answer was given")]
    InputClosed,

    #[error("terminal I/O error: {0}")]
    Io(String),

    #[error("chat platform error: {0}")]
    Platform(String),

    #[error("answer channel closed")]
    ChannelClosed,

    #[error("no answer received within {0:?}")]
    Timeout(Duration),
}

/// Errors from the session registry.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("an interview is already in progress for '{0}'")]
    AlreadyActive(String),
}

/// Errors that end an interview run.
#[derive(Debug, Error)]
pub enum InterviewError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("error asking question: {0}")]
    Ask(#[source] UiError),

    #[error("could not summarize interview: {0}")]
    Summarize(#[source] LlmError),

    /// Saving failed. The completed record is handed back so the caller can
    /// retry the save without re-running the interview.
    #[error("could not save interview: {source}")]
    Persistence {
        #[source]
        source: RepositoryError,
        record: Box<InterviewRecord>,
    },
}
