//! Interview front end that talks to a respondent over a chat platform.

use std::sync::Arc;
use std::time::Duration;

use vox_types::error::UiError;

use super::registry::SessionHandle;
use crate::chat::platform::ChatPlatform;
use crate::interview::ui::InterviewUi;

const SUMMARY_HEADER: &str = "*--- Interview Summary ---*";
const SUMMARY_FOOTER: &str = "*-------------------------*";
const NO_SUMMARY: &str = "Thanks, your answers have been recorded.";

/// Posts questions to a direct channel and waits on the session for replies.
///
/// Owns the [`SessionHandle`], so the respondent's session is released when
/// this UI is dropped.
pub struct ChatUi<P> {
    platform: Arc<P>,
    channel_id: String,
    session: SessionHandle,
    answer_timeout: Option<Duration>,
}

impl<P: ChatPlatform> ChatUi<P> {
    pub fn new(
        platform: Arc<P>,
        channel_id: impl Into<String>,
        session: SessionHandle,
        answer_timeout: Option<Duration>,
    ) -> Self {
        Self {
            platform,
            channel_id: channel_id.into(),
            session,
            answer_timeout,
        }
    }

    async fn wait_for_answer(&mut self) -> Result<String, UiError> {
        let answer = match self.answer_timeout {
            Some(limit) => tokio::time::timeout(limit, self.session.next_answer())
                .await
                .map_err(|_| UiError::Timeout(limit))?,
            None => self.session.next_answer().await,
        };
        answer.ok_or(UiError::ChannelClosed)
    }
}

/// Chat rendering of the closing summary.
pub fn format_summary(summary: &str) -> String {
    let body = if summary.trim().is_empty() {
        NO_SUMMARY
    } else {
        summary
    };
    format!("{SUMMARY_HEADER}\n{body}\n{SUMMARY_FOOTER}")
}

impl<P: ChatPlatform> InterviewUi for ChatUi<P> {
    async fn ask(&mut self, question: &str) -> Result<String, UiError> {
        // Anything typed before this question is posted cannot answer it.
        self.session.discard_stale();
        self.platform
            .post_message(&self.channel_id, question)
            .await
            .map_err(|e| UiError::Platform(e.to_string()))?;
        self.wait_for_answer().await
    }

    async fn display_summary(&mut self, summary: &str) -> Result<(), UiError> {
        self.platform
            .post_message(&self.channel_id, &format_summary(summary))
            .await
            .map_err(|e| UiError::Platform(e.to_string()))
    }
}
