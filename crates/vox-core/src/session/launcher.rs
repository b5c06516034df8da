//! Starts chat interviews for respondents.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use vox_types::chat::ChatPlatformError;
use vox_types::error::{ConfigError, InterviewError, SessionError};
use vox_types::interview::InterviewRecord;
use vox_types::topic::Topic;

use super::chat_ui::ChatUi;
use super::registry::SessionRegistry;
use crate::chat::platform::ChatPlatform;
use crate::interview::orchestrator::Interviewer;
use crate::interview::provider::QuestionProvider;
use crate::repository::interview::InterviewRepository;

/// Why a chat interview did not complete.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not open direct conversation: {0}")]
    Platform(#[from] ChatPlatformError),

    #[error(transparent)]
    Interview(#[from] InterviewError),
}

impl LaunchError {
    /// Text shown privately to the respondent.
    pub fn user_message(&self) -> String {
        match self {
            LaunchError::Session(_) => "You already have an interview in progress.".to_string(),
            LaunchError::Config(e) => format!("Error: {e}"),
            LaunchError::Platform(_) => {
                "Error: could not open a direct conversation with you.".to_string()
            }
            LaunchError::Interview(InterviewError::Persistence { .. }) => {
                "Error: your interview finished but could not be saved.".to_string()
            }
            LaunchError::Interview(e) => format!("Error: {e}"),
        }
    }
}

/// Wires a respondent's session, direct channel, and provider into an interview run.
pub struct ChatInterviewLauncher<P, R> {
    registry: SessionRegistry,
    platform: Arc<P>,
    repository: Arc<R>,
    answer_timeout: Option<Duration>,
}

impl<P, R> ChatInterviewLauncher<P, R>
where
    P: ChatPlatform,
    R: InterviewRepository,
{
    pub fn new(
        registry: SessionRegistry,
        platform: Arc<P>,
        repository: Arc<R>,
        answer_timeout: Option<Duration>,
    ) -> Self {
        Self {
            registry,
            platform,
            repository,
            answer_timeout,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn platform(&self) -> &Arc<P> {
        &self.platform
    }

    /// Run a full interview for `respondent_id` over a direct conversation.
    ///
    /// The session is registered before anything else, so a second request
    /// from the same respondent fails fast. It is released when this call
    /// returns, on success or failure.
    #[tracing::instrument(
        name = "chat_interview",
        skip(self, topic, build_provider),
        fields(topic_id = %topic.id)
    )]
    pub async fn launch<F>(
        &self,
        respondent_id: &str,
        topic: &Topic,
        build_provider: F,
    ) -> Result<InterviewRecord, LaunchError>
    where
        F: FnOnce(&Topic) -> Result<QuestionProvider, ConfigError>,
    {
        let session = self.registry.start_session(respondent_id)?;
        let provider = build_provider(topic)?;
        let channel_id = self
            .platform
            .open_direct_conversation(respondent_id)
            .await?;

        let ui = ChatUi::new(
            Arc::clone(&self.platform),
            channel_id,
            session,
            self.answer_timeout,
        );
        let record = Interviewer::new(provider, ui, Arc::clone(&self.repository))
            .run(respondent_id, &topic.id)
            .await?;
        Ok(record)
    }

    /// Tell the respondent privately why their interview did not run.
    pub async fn report_failure(&self, channel_id: &str, respondent_id: &str, error: &LaunchError) {
        tracing::warn!(respondent_id, error = %error, "chat interview failed");
        if let Err(e) = self
            .platform
            .post_ephemeral(channel_id, respondent_id, &error.user_message())
            .await
        {
            tracing::warn!(respondent_id, error = %e, "could not report failure to respondent");
        }
    }
}
