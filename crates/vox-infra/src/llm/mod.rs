//! Generative service clients.
//!
//! Concrete implementations of the [`ConversationClient`] trait defined in
//! `vox-core`.
//!
//! [`ConversationClient`]: vox_core::llm::client::ConversationClient

pub mod gemini;

use secrecy::SecretString;

use vox_core::llm::box_client::BoxConversationClient;
use vox_types::llm::LlmError;

use self::gemini::GeminiClient;

/// Create the boxed client used for llm topics.
pub fn create_client(api_key: &str, model: &str) -> Result<BoxConversationClient, LlmError> {
    let client = GeminiClient::new(SecretString::from(api_key.to_string()), model.to_string())?;
    Ok(BoxConversationClient::new(client))
}
