//! ConversationClient and ConversationSession trait definitions.
//!
//! A client opens stateful sessions (the service keeps seeing the whole
//! history) and can also run one-off stateless generations.

use std::future::Future;

use vox_types::llm::{Content, GenerateResponse, LlmError, Part};

/// A stateful conversation with the generative service.
///
/// Every call to `send_message` appends the given parts as a user turn,
/// sends the full history, and appends the reply to the history.
pub trait ConversationSession: Send + Sync {
    fn send_message(
        &mut self,
        parts: Vec<Part>,
    ) -> impl Future<Output = Result<GenerateResponse, LlmError>> + Send;
}

/// Trait for generative service backends.
///
/// Implementations live in vox-infra (e.g., `GeminiClient`).
pub trait ConversationClient: Send + Sync {
    type Session: ConversationSession + 'static;

    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Open a session whose history starts with `history`.
    fn start_session(&self, history: Vec<Content>) -> Self::Session;

    /// One stateless generation call, independent of any session.
    fn generate_content(
        &self,
        parts: Vec<Part>,
    ) -> impl Future<Output = Result<GenerateResponse, LlmError>> + Send;
}
