//! Configuration types for vox.
//!
//! `VoxConfig` mirrors the `config.toml` file: interview topics, generative
//! provider settings, chat platform credentials, and telemetry toggles. All
//! sections are optional; command-line flags override file values.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::topic::TopicConfig;

/// Model used when neither the command line nor the config file picks one.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Interviewer persona used when the config file does not set one.
pub const DEFAULT_INTERVIEWER_PROMPT: &str = "You are an interviewer.";

const REDACTED: &str = "<redacted>";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoxConfig {
    /// Available interview topics.
    #[serde(default)]
    pub interviews: Vec<TopicConfig>,

    #[serde(default)]
    pub providers: ProvidersConfig,

    #[serde(default)]
    pub slack: SlackConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Directory holding `vox.db`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub gemini: GeminiConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Persona prepended to every llm topic prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interviewer_prompt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlackConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_secret: Option<String>,
    /// How long a chat interview waits for each answer. Unset waits forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Bridge tracing spans to OpenTelemetry.
    #[serde(default)]
    pub otel: bool,
}

impl VoxConfig {
    /// Model to use, preferring an explicit override.
    pub fn model(&self, override_model: Option<&str>) -> String {
        override_model
            .or(self.providers.gemini.model.as_deref())
            .unwrap_or(DEFAULT_MODEL)
            .to_string()
    }

    /// Final prompt for an llm topic: interviewer persona, blank line, topic prompt.
    pub fn interview_prompt(&self, topic_prompt: &str) -> String {
        let persona = self
            .providers
            .gemini
            .interviewer_prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_INTERVIEWER_PROMPT);
        format!("{persona}\n\n{topic_prompt}")
    }

    pub fn answer_timeout(&self) -> Option<Duration> {
        self.slack.answer_timeout_secs.map(Duration::from_secs)
    }

    /// Copy of the config with every credential replaced by a placeholder.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        let redact = |v: &mut Option<String>| {
            if v.is_some() {
                *v = Some(REDACTED.to_string());
            }
        };
        redact(&mut config.providers.gemini.api_key);
        redact(&mut config.slack.bot_token);
        redact(&mut config.slack.signing_secret);
        config
    }
}
