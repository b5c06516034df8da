//! The respondent-facing side of an interview.

use std::future::Future;

use vox_types::error::UiError;

/// Presents questions and the final summary to a respondent.
///
/// Implemented by the terminal front end (vox-api) and by
/// [`crate::session::chat_ui::ChatUi`] for chat platforms.
pub trait InterviewUi: Send {
    /// Show `question` and wait for the respondent's answer.
    fn ask(&mut self, question: &str) -> impl Future<Output = Result<String, UiError>> + Send;

    /// Show the closing summary. Called once, after the interview is saved.
    fn display_summary(&mut self, summary: &str) -> impl Future<Output = Result<(), UiError>> + Send;
}
