//! The closed set of question providers.

use std::sync::Arc;

use vox_types::config::VoxConfig;
use vox_types::error::ConfigError;
use vox_types::interview::QuestionAndAnswer;
use vox_types::llm::LlmError;
use vox_types::topic::{Topic, TopicSource};

use super::conversational::ConversationalInterviewer;
use super::static_provider::StaticQuestions;
use crate::llm::box_client::BoxConversationClient;

/// Decides which question to ask next.
pub enum QuestionProvider {
    Static(StaticQuestions),
    Conversational(ConversationalInterviewer),
}

impl QuestionProvider {
    /// Build the provider a topic asks for.
    ///
    /// `client` is only needed for llm topics; its absence is reported as a
    /// missing API key, since that is the only way to end up without one.
    pub fn from_topic(
        topic: &Topic,
        config: &VoxConfig,
        client: Option<Arc<BoxConversationClient>>,
    ) -> Result<Self, ConfigError> {
        match &topic.source {
            TopicSource::Static { questions } => {
                Ok(Self::Static(StaticQuestions::new(questions.clone())))
            }
            TopicSource::Llm { prompt } => {
                let client =
                    client.ok_or_else(|| ConfigError::MissingCredential("api-key".to_string()))?;
                let prompt = config.interview_prompt(prompt);
                tracing::debug!(topic = %topic.id, provider = client.name(), "starting conversational interviewer");
                Ok(Self::Conversational(ConversationalInterviewer::new(
                    client, &prompt,
                )))
            }
        }
    }

    /// Next question given the previous answer (empty on the first call).
    pub async fn next_question(&mut self, previous_answer: &str) -> Option<String> {
        match self {
            Self::Static(p) => p.next_question(),
            Self::Conversational(p) => p.next_question(previous_answer).await,
        }
    }

    /// A summary produced during questioning, if any.
    pub fn inline_summary(&self) -> Option<&str> {
        match self {
            Self::Static(_) => None,
            Self::Conversational(p) => p.inline_summary(),
        }
    }

    /// Summarize a finished transcript. Scripted interviews have no summary.
    pub async fn summarize(&self, entries: &[QuestionAndAnswer]) -> Result<String, LlmError> {
        match self {
            Self::Static(_) => Ok(String::new()),
            Self::Conversational(p) => p.summarize(entries).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedClient, text};

    fn static_topic() -> Topic {
        Topic {
            id: "onboarding".to_string(),
            name: "Onboarding".to_string(),
            source: TopicSource::Static {
                questions: vec!["q1".to_string(), "q2".to_string()],
            },
        }
    }

    fn llm_topic() -> Topic {
        Topic {
            id: "research".to_string(),
            name: "Research".to_string(),
            source: TopicSource::Llm {
                prompt: "Ask about CI.".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_static_topic_needs_no_client() {
        let mut provider =
            QuestionProvider::from_topic(&static_topic(), &VoxConfig::default(), None).unwrap();
        assert_eq!(provider.next_question("").await.as_deref(), Some("q1"));
        assert_eq!(provider.next_question("a1").await.as_deref(), Some("q2"));
        assert!(provider.next_question("a2").await.is_none());
        assert!(provider.inline_summary().is_none());
        assert_eq!(provider.summarize(&[]).await.unwrap(), "");
    }

    #[test]
    fn test_llm_topic_without_client_is_missing_credential() {
        let result = QuestionProvider::from_topic(&llm_topic(), &VoxConfig::default(), None);
        assert!(matches!(
            result,
            Err(ConfigError::MissingCredential(ref name)) if name == "api-key"
        ));
    }

    #[tokio::test]
    async fn test_llm_topic_prompt_gets_persona() {
        let client = ScriptedClient::new(vec![text("Q1?")]);
        let mut provider =
            QuestionProvider::from_topic(&llm_topic(), &VoxConfig::default(), Some(client.boxed()))
                .unwrap();
        assert_eq!(provider.next_question("").await.as_deref(), Some("Q1?"));
        assert_eq!(
            client.seed()[0].parts[0].text.as_deref(),
            Some("You are an interviewer.\n\nAsk about CI.")
        );
    }
}
