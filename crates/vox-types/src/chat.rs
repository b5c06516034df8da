//! Chat platform error type.

/// Errors from chat platform API calls.
#[derive(Debug, thiserror::Error)]
pub enum ChatPlatformError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The platform answered but rejected the call (e.g. `channel_not_found`).
    #[error("platform rejected {method}: {code}")]
    Api { method: String, code: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),
}
