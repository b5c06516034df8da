//! BoxConversationClient -- object-safe dynamic dispatch wrapper for ConversationClient.
//!
//! 1. Object-safe `ConversationClientDyn`/`ConversationSessionDyn` traits with boxed futures
//! 2. Blanket impls for every `T: ConversationClient` / `T: ConversationSession`
//! 3. `BoxConversationClient`/`BoxConversationSession` wrap the trait objects and delegate

use std::future::Future;
use std::pin::Pin;

use vox_types::llm::{Content, GenerateResponse, LlmError, Part};

use super::client::{ConversationClient, ConversationSession};

type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<GenerateResponse, LlmError>> + Send + 'a>>;

/// Object-safe version of [`ConversationSession`].
pub trait ConversationSessionDyn: Send + Sync {
    fn send_message_boxed(&mut self, parts: Vec<Part>) -> GenerateFuture<'_>;
}

impl<T: ConversationSession> ConversationSessionDyn for T {
    fn send_message_boxed(&mut self, parts: Vec<Part>) -> GenerateFuture<'_> {
        Box::pin(self.send_message(parts))
    }
}

/// Type-erased conversation session.
pub struct BoxConversationSession {
    inner: Box<dyn ConversationSessionDyn>,
}

impl BoxConversationSession {
    pub fn new<T: ConversationSession + 'static>(session: T) -> Self {
        Self {
            inner: Box::new(session),
        }
    }

    /// Append `parts` as a user turn and return the service's reply.
    pub async fn send_message(&mut self, parts: Vec<Part>) -> Result<GenerateResponse, LlmError> {
        self.inner.send_message_boxed(parts).await
    }
}

/// Object-safe version of [`ConversationClient`].
///
/// A blanket implementation is provided for all types implementing
/// `ConversationClient`, so callers never implement this directly.
pub trait ConversationClientDyn: Send + Sync {
    fn name(&self) -> &str;

    fn start_session_boxed(&self, history: Vec<Content>) -> BoxConversationSession;

    fn generate_content_boxed(&self, parts: Vec<Part>) -> GenerateFuture<'_>;
}

impl<T: ConversationClient> ConversationClientDyn for T {
    fn name(&self) -> &str {
        ConversationClient::name(self)
    }

    fn start_session_boxed(&self, history: Vec<Content>) -> BoxConversationSession {
        BoxConversationSession::new(self.start_session(history))
    }

    fn generate_content_boxed(&self, parts: Vec<Part>) -> GenerateFuture<'_> {
        Box::pin(self.generate_content(parts))
    }
}

/// Type-erased generative client for runtime backend selection.
///
/// Since `ConversationClient` uses RPITIT and an associated session type, it
/// cannot be used as a trait object directly. This wrapper provides the same
/// methods over the `ConversationClientDyn` trait object.
pub struct BoxConversationClient {
    inner: Box<dyn ConversationClientDyn>,
}

impl BoxConversationClient {
    pub fn new<T: ConversationClient + 'static>(client: T) -> Self {
        Self {
            inner: Box::new(client),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn start_session(&self, history: Vec<Content>) -> BoxConversationSession {
        self.inner.start_session_boxed(history)
    }

    pub async fn generate_content(&self, parts: Vec<Part>) -> Result<GenerateResponse, LlmError> {
        self.inner.generate_content_boxed(parts).await
    }
}
