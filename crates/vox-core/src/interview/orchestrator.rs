//! Interview orchestrator.
//!
//! Drives one interview from first question to persisted record:
//!
//! 1. Ask questions until the provider is done, carrying each answer forward
//! 2. Take the provider's inline summary, or request one for the transcript
//! 3. Save interview, transcript, and summary as one unit, retrying once
//! 4. Show the summary (a failure here is logged; the record is already saved)

use std::sync::Arc;

use vox_types::error::{InterviewError, RepositoryError};
use vox_types::interview::{InterviewRecord, QuestionAndAnswer};

use super::provider::QuestionProvider;
use super::ui::InterviewUi;
use crate::repository::interview::InterviewRepository;

pub struct Interviewer<R, U> {
    provider: QuestionProvider,
    ui: U,
    repository: Arc<R>,
}

impl<R: InterviewRepository, U: InterviewUi> Interviewer<R, U> {
    pub fn new(provider: QuestionProvider, ui: U, repository: Arc<R>) -> Self {
        Self {
            provider,
            ui,
            repository,
        }
    }

    /// Run the interview to completion and return what was saved.
    ///
    /// Consumes the interviewer so the front end (and any session it holds)
    /// is released when the run ends, however it ends.
    #[tracing::instrument(
        name = "interview",
        skip(self),
        fields(respondent_id = %respondent_id, topic_id = %topic_id)
    )]
    pub async fn run(
        mut self,
        respondent_id: &str,
        topic_id: &str,
    ) -> Result<InterviewRecord, InterviewError> {
        let mut entries = Vec::new();
        let mut previous_answer = String::new();

        while let Some(question) = self.provider.next_question(&previous_answer).await {
            let answer = self.ui.ask(&question).await.map_err(|e| {
                tracing::warn!(error = %e, question_count = entries.len() + 1, "interview aborted while asking");
                InterviewError::Ask(e)
            })?;
            entries.push(QuestionAndAnswer::new(question, answer.clone()));
            previous_answer = answer;
        }

        let summary = self.summary_for(&entries).await?;
        let record = InterviewRecord::new(respondent_id, topic_id, entries, summary);

        if let Err(source) = self.save(&record).await {
            tracing::error!(error = %source, interview_id = %record.id(), "failed to save interview");
            return Err(InterviewError::Persistence {
                source,
                record: Box::new(record),
            });
        }

        tracing::info!(
            interview_id = %record.id(),
            question_count = record.transcript.entries.len(),
            "interview saved"
        );

        if let Err(e) = self.ui.display_summary(&record.summary.text).await {
            tracing::warn!(error = %e, interview_id = %record.id(), "could not display summary");
        }

        Ok(record)
    }

    async fn save(&self, record: &InterviewRecord) -> Result<(), RepositoryError> {
        match self.repository.save(record).await {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::warn!(error = %e, interview_id = %record.id(), "save failed, retrying once");
                self.repository.save(record).await.map(|_| ())
            }
        }
    }

    async fn summary_for(&self, entries: &[QuestionAndAnswer]) -> Result<String, InterviewError> {
        if let Some(summary) = self.provider.inline_summary() {
            return Ok(summary.to_string());
        }
        self.provider
            .summarize(entries)
            .await
            .map_err(InterviewError::Summarize)
    }
}
