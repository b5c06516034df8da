//! SlackClient -- concrete [`ChatPlatform`] over the Slack Web API.
//!
//! Slack answers most failures with HTTP 200 and `{"ok": false, "error": ...}`,
//! so both the status and the `ok` flag are checked.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use vox_core::chat::platform::ChatPlatform;
use vox_types::chat::ChatPlatformError;

const DEFAULT_BASE_URL: &str = "https://slack.com/api";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    channel: Option<ChannelRef>,
}

#[derive(Debug, Deserialize)]
struct ChannelRef {
    id: String,
}

pub struct SlackClient {
    http: reqwest::Client,
    bot_token: SecretString,
    base_url: String,
}

impl SlackClient {
    pub fn new(bot_token: SecretString) -> Result<Self, ChatPlatformError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ChatPlatformError::Http(e.to_string()))?;
        Ok(Self {
            http,
            bot_token,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn call(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<ApiResponse, ChatPlatformError> {
        let response = self
            .http
            .post(format!("{}/{method}", self.base_url))
            .bearer_auth(self.bot_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatPlatformError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatPlatformError::Http(format!("{method} returned HTTP {status}")));
        }

        let parsed: ApiResponse = response
            .json()
            .await
            .map_err(|e| ChatPlatformError::Deserialization(e.to_string()))?;

        if !parsed.ok {
            return Err(ChatPlatformError::Api {
                method: method.to_string(),
                code: parsed.error.unwrap_or_else(|| "unknown_error".to_string()),
            });
        }
        Ok(parsed)
    }
}

impl ChatPlatform for SlackClient {
    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), ChatPlatformError> {
        self.call("chat.postMessage", json!({ "channel": channel_id, "text": text }))
            .await?;
        Ok(())
    }

    async fn open_direct_conversation(&self, user_id: &str) -> Result<String, ChatPlatformError> {
        let response = self
            .call("conversations.open", json!({ "users": user_id }))
            .await?;
        response
            .channel
            .map(|c| c.id)
            .ok_or_else(|| ChatPlatformError::Deserialization("conversations.open returned no channel".to_string()))
    }

    async fn post_ephemeral(
        &self,
        channel_id: &str,
        user_id: &str,
        text: &str,
    ) -> Result<(), ChatPlatformError> {
        self.call(
            "chat.postEphemeral",
            json!({ "channel": channel_id, "user": user_id, "text": text }),
        )
        .await?;
        Ok(())
    }
}
