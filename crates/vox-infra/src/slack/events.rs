//! Inbound Slack payloads: Events API envelopes and slash commands.

use serde::Deserialize;

/// Top-level body posted to the events endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEnvelope {
    /// Sent once when the endpoint is registered; the challenge must be echoed.
    UrlVerification { challenge: String },
    EventCallback { event: InnerEvent },
    #[serde(other)]
    Unsupported,
}

/// The `event` object of an event callback. Only message fields are kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InnerEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
}

impl InnerEvent {
    /// `(user, text)` if this is a plain message written by a person.
    ///
    /// Bot messages (including our own questions) and edits/joins, which
    /// carry a subtype, are not answers.
    pub fn human_message(&self) -> Option<(&str, &str)> {
        if self.kind != "message" || self.bot_id.is_some() || self.subtype.is_some() {
            return None;
        }
        Some((self.user.as_deref()?, self.text.as_deref().unwrap_or_default()))
    }
}

/// A slash command invocation, decoded from its form body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashCommand {
    pub command: String,
    pub text: String,
    pub user_id: String,
    pub channel_id: String,
}

#[derive(Debug, thiserror::Error)]
#[error("slash command is missing field '{0}'")]
pub struct MissingField(pub &'static str);

impl SlashCommand {
    pub fn parse(body: &[u8]) -> Result<Self, MissingField> {
        let mut command = None;
        let mut text = None;
        let mut user_id = None;
        let mut channel_id = None;

        for (key, value) in url::form_urlencoded::parse(body) {
            match key.as_ref() {
                "command" => command = Some(value.into_owned()),
                "text" => text = Some(value.into_owned()),
                "user_id" => user_id = Some(value.into_owned()),
                "channel_id" => channel_id = Some(value.into_owned()),
                _ => {}
            }
        }

        Ok(Self {
            command: command.ok_or(MissingField("command"))?,
            text: text.unwrap_or_default(),
            user_id: user_id.ok_or(MissingField("user_id"))?,
            channel_id: channel_id.ok_or(MissingField("channel_id"))?,
        })
    }
}
