//! Interview topics.
//!
//! A [`TopicConfig`] is the raw entry from the configuration file. It is
//! resolved into a [`Topic`] when an interview is started, which is where an
//! unknown provider kind or a topic without questions/prompt is reported.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Which question source drives a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Static,
    Llm,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Static => write!(f, "static"),
            ProviderKind::Llm => write!(f, "llm"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "static" => Ok(ProviderKind::Static),
            "llm" | "gemini" => Ok(ProviderKind::Llm),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// A topic entry exactly as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicConfig {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub provider: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

/// Where a resolved topic gets its questions from.
#[derive(Debug, Clone, PartialEq)]
pub enum TopicSource {
    /// A fixed, ordered script.
    Static { questions: Vec<String> },
    /// A free-text prompt for the conversational interviewer.
    Llm { prompt: String },
}

/// A validated, immutable interview topic.
#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    pub id: String,
    pub name: String,
    pub source: TopicSource,
}

impl Topic {
    pub fn kind(&self) -> ProviderKind {
        match self.source {
            TopicSource::Static { .. } => ProviderKind::Static,
            TopicSource::Llm { .. } => ProviderKind::Llm,
        }
    }
}

impl TopicConfig {
    /// Validate this entry into a [`Topic`].
    pub fn resolve(&self) -> Result<Topic, ConfigError> {
        let source = match self.provider.parse::<ProviderKind>()? {
            ProviderKind::Static => TopicSource::Static {
                questions: self.questions.clone(),
            },
            ProviderKind::Llm => {
                let prompt = self
                    .prompt
                    .as_deref()
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .ok_or_else(|| ConfigError::InvalidTopic {
                        id: self.id.clone(),
                        reason: "llm topics need a prompt".to_string(),
                    })?;
                TopicSource::Llm {
                    prompt: prompt.to_string(),
                }
            }
        };

        Ok(Topic {
            id: self.id.clone(),
            name: self.name.clone(),
            source,
        })
    }
}

/// Find a topic by case-insensitive ID and resolve it.
pub fn find_topic(topics: &[TopicConfig], topic_id: &str) -> Result<Topic, ConfigError> {
    topics
        .iter()
        .find(|t| t.id.eq_ignore_ascii_case(topic_id))
        .ok_or_else(|| ConfigError::UnknownTopic(topic_id.to_string()))?
        .resolve()
}
