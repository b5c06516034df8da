//! GeminiClient -- concrete [`ConversationClient`] for the Gemini API.
//!
//! Both chat turns and one-off generations go to
//! `/v1beta/models/{model}:generateContent`. A chat session keeps the
//! history locally and resends all of it on every turn.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is only exposed
//! when building the request header.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use vox_core::llm::client::{ConversationClient, ConversationSession};
use vox_observe::genai_attrs::{OP_CHAT, OP_GENERATE_CONTENT, PROVIDER_GEMINI};
use vox_types::llm::{Content, GenerateResponse, LlmError, Part, Role};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Sent in place of an empty user turn, which the API rejects.
const CONTINUE_PROMPT: &str = "Please continue.";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: &'a [Content],
}

/// Connection details shared by the client and its sessions.
struct Endpoint {
    http: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl Endpoint {
    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    #[tracing::instrument(
        name = "gemini.generate",
        skip(self, contents),
        fields(
            gen_ai.operation.name = operation,
            gen_ai.provider.name = PROVIDER_GEMINI,
            gen_ai.request.model = %self.model,
            turns = contents.len(),
        )
    )]
    async fn generate(
        &self,
        operation: &'static str,
        contents: &[Content],
    ) -> Result<GenerateResponse, LlmError> {
        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&GenerateRequest { contents })
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_ms = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs * 1000);
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "gemini request failed");
            return Err(match status.as_u16() {
                400 => LlmError::InvalidRequest(error_body),
                401 | 403 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited { retry_after_ms },
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let parsed = response
            .json::<GenerateResponse>()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;
        tracing::debug!(candidates = parsed.candidates.len(), "gemini response");
        Ok(parsed)
    }
}

/// Gemini generative client.
///
/// Deliberately not `Debug`, so the key cannot leak through formatting.
pub struct GeminiClient {
    endpoint: Arc<Endpoint>,
}

impl GeminiClient {
    pub fn new(api_key: SecretString, model: String) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            endpoint: Arc::new(Endpoint {
                http,
                api_key,
                base_url: DEFAULT_BASE_URL.to_string(),
                model,
            }),
        })
    }

    #[cfg(test)]
    pub(crate) fn model(&self) -> &str {
        &self.endpoint.model
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(self, base_url: impl Into<String>) -> Self {
        let endpoint = Endpoint {
            http: self.endpoint.http.clone(),
            api_key: SecretString::from(self.endpoint.api_key.expose_secret().to_string()),
            base_url: base_url.into(),
            model: self.endpoint.model.clone(),
        };
        Self {
            endpoint: Arc::new(endpoint),
        }
    }
}

impl ConversationClient for GeminiClient {
    type Session = GeminiChatSession;

    fn name(&self) -> &str {
        PROVIDER_GEMINI
    }

    fn start_session(&self, history: Vec<Content>) -> GeminiChatSession {
        GeminiChatSession {
            endpoint: Arc::clone(&self.endpoint),
            history,
        }
    }

    async fn generate_content(&self, parts: Vec<Part>) -> Result<GenerateResponse, LlmError> {
        let contents = [Content::new(Role::User, user_parts(parts))];
        self.endpoint.generate(OP_GENERATE_CONTENT, &contents).await
    }
}

/// A chat whose history lives on the client side.
pub struct GeminiChatSession {
    endpoint: Arc<Endpoint>,
    history: Vec<Content>,
}

impl GeminiChatSession {
    #[cfg(test)]
    pub(crate) fn history(&self) -> &[Content] {
        &self.history
    }
}

impl ConversationSession for GeminiChatSession {
    async fn send_message(&mut self, parts: Vec<Part>) -> Result<GenerateResponse, LlmError> {
        self.history
            .push(Content::new(Role::User, user_parts(parts)));

        match self.endpoint.generate(OP_CHAT, &self.history).await {
            Ok(response) => {
                if let Some(content) = response.first_content() {
                    self.history.push(content.clone());
                }
                Ok(response)
            }
            Err(e) => {
                // A failed turn leaves the history as it was.
                self.history.pop();
                Err(e)
            }
        }
    }
}

fn user_parts(parts: Vec<Part>) -> Vec<Part> {
    if parts.is_empty() {
        vec![Part::text(CONTINUE_PROMPT)]
    } else {
        parts
    }
}
