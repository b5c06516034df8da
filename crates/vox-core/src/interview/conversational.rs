//! Conversational question provider backed by a generative service.
//!
//! The interviewer owns one stateful session. Each answer is fed back as the
//! next user turn and the reply is the next question, until either the
//! service emits the completion sentinel or the question budget runs out.
//! In the latter case one more turn asks the service to wrap up with a
//! summary, so the interview still ends with one.

use std::sync::Arc;

use vox_types::interview::{QuestionAndAnswer, render_entries};
use vox_types::llm::{Content, LlmError, Part, Role};

use crate::interview::sentinel::{Reply, parse_reply};
use crate::llm::box_client::{BoxConversationClient, BoxConversationSession};

/// Questions asked before the interviewer forces a wrap-up.
pub const MAX_QUESTIONS: u32 = 20;

/// Structural instruction seeded after the topic prompt.
pub const INTERVIEW_STRUCTURE: &str = "Conduct the interview one question at a time. \
Reply with only the next question and wait for the answer before asking another. \
When you have learned enough, reply with INTERVIEW_COMPLETE followed by a short \
summary of the respondent's answers.";

const WRAP_UP_REQUEST: &str = "We have run out of time for questions. Do not ask another \
question. Reply with INTERVIEW_COMPLETE followed by a short summary of the interview.";

const SUMMARIZE_PREFIX: &str = "Please summarize the following interview transcript:\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Active,
    /// Budget exhausted; the next call sends the wrap-up turn.
    Terminating,
    Terminated,
}

pub struct ConversationalInterviewer {
    client: Arc<BoxConversationClient>,
    session: BoxConversationSession,
    state: State,
    asked: u32,
    max_questions: u32,
    summary: Option<String>,
}

impl ConversationalInterviewer {
    /// Open a session seeded with `prompt` and the structural instruction.
    pub fn new(client: Arc<BoxConversationClient>, prompt: &str) -> Self {
        let seed = Content::new(
            Role::Model,
            vec![Part::text(prompt), Part::text(INTERVIEW_STRUCTURE)],
        );
        let session = client.start_session(vec![seed]);
        Self {
            client,
            session,
            state: State::Active,
            asked: 0,
            max_questions: MAX_QUESTIONS,
            summary: None,
        }
    }

    pub fn with_max_questions(mut self, max_questions: u32) -> Self {
        self.max_questions = max_questions.max(1);
        self
    }

    /// Feed back the previous answer and return the next question.
    ///
    /// Returns `None` once the interview is over. Service failures and empty
    /// replies end the interview here rather than surfacing as errors; the
    /// orchestrator falls back to a stateless summary.
    pub async fn next_question(&mut self, previous_answer: &str) -> Option<String> {
        match self.state {
            State::Terminated => None,
            State::Terminating => {
                self.wrap_up(previous_answer).await;
                None
            }
            State::Active => self.advance(previous_answer).await,
        }
    }

    /// Summary captured from the session, if the service produced one.
    ///
    /// A bare completion sentinel yields `Some("")`. `None` means the session
    /// ended without a usable summary (a service failure or an empty wrap-up).
    pub fn inline_summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn questions_asked(&self) -> u32 {
        self.asked
    }

    /// Stateless summary of a full transcript, independent of the session.
    pub async fn summarize(&self, entries: &[QuestionAndAnswer]) -> Result<String, LlmError> {
        let prompt = format!("{SUMMARIZE_PREFIX}{}", render_entries(entries));
        let response = self.client.generate_content(vec![Part::text(prompt)]).await?;
        let text = response.first_text().ok_or(LlmError::EmptyResponse)?;
        Ok(text.trim().to_string())
    }

    async fn advance(&mut self, previous_answer: &str) -> Option<String> {
        let text = match self.send(answer_parts(previous_answer)).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, question_count = self.asked, "ending interview after service failure");
                self.state = State::Terminated;
                return None;
            }
        };

        match parse_reply(&text) {
            Reply::Complete { summary } => {
                tracing::debug!(question_count = self.asked, "service completed the interview");
                self.summary = Some(summary);
                self.state = State::Terminated;
                None
            }
            Reply::Question(question) => {
                self.asked += 1;
                if self.asked >= self.max_questions {
                    tracing::debug!(question_count = self.asked, "question budget reached");
                    self.state = State::Terminating;
                }
                Some(question)
            }
        }
    }

    async fn wrap_up(&mut self, previous_answer: &str) {
        self.state = State::Terminated;

        let mut parts = answer_parts(previous_answer);
        parts.push(Part::text(WRAP_UP_REQUEST));

        match self.send(parts).await {
            Ok(text) => {
                let summary = match parse_reply(&text) {
                    Reply::Complete { summary } => summary,
                    Reply::Question(text) => text,
                };
                self.summary = Some(summary).filter(|s| !s.is_empty());
            }
            Err(e) => {
                tracing::warn!(error = %e, "wrap-up turn failed, summary will be generated separately");
            }
        }
    }

    async fn send(&mut self, parts: Vec<Part>) -> Result<String, LlmError> {
        let response = self.session.send_message(parts).await?;
        match response.first_text().map(str::trim) {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => Err(LlmError::EmptyResponse),
        }
    }
}

fn answer_parts(answer: &str) -> Vec<Part> {
    if answer.is_empty() {
        Vec::new()
    } else {
        vec![Part::text(answer)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::sentinel::COMPLETION_SENTINEL;
    use crate::testing::{Scripted, ScriptedClient, text};

    fn interviewer(client: &ScriptedClient) -> ConversationalInterviewer {
        ConversationalInterviewer::new(client.boxed(), "You are an interviewer.\n\nAsk about CI.")
    }

    #[tokio::test]
    async fn test_seeds_session_with_prompt_and_structure() {
        let client = ScriptedClient::new(vec![text("Q1?")]);
        let mut provider = interviewer(&client);
        assert_eq!(provider.next_question("").await.as_deref(), Some("Q1?"));

        let seed = client.seed();
        assert_eq!(seed.len(), 1);
        assert_eq!(seed[0].role, Role::Model);
        assert_eq!(
            seed[0].parts[0].text.as_deref(),
            Some("You are an interviewer.\n\nAsk about CI.")
        );
        assert_eq!(seed[0].parts[1].text.as_deref(), Some(INTERVIEW_STRUCTURE));
        assert!(INTERVIEW_STRUCTURE.contains(COMPLETION_SENTINEL));
    }

    #[tokio::test]
    async fn test_first_turn_sends_no_answer() {
        let client = ScriptedClient::new(vec![text("Q1?"), text("Q2?")]);
        let mut provider = interviewer(&client);
        provider.next_question("").await;
        provider.next_question("my answer").await;

        let sent = client.sent();
        assert!(sent[0].is_empty());
        assert_eq!(sent[1], vec!["my answer".to_string()]);
    }

    #[tokio::test]
    async fn test_sentinel_ends_with_inline_summary() {
        let client = ScriptedClient::new(vec![
            text("Q1?"),
            text("INTERVIEW_COMPLETE Builds are slow."),
        ]);
        let mut provider = interviewer(&client);
        assert!(provider.next_question("").await.is_some());
        assert!(provider.next_question("slow").await.is_none());
        assert_eq!(provider.inline_summary(), Some("Builds are slow."));

        // Terminated: no further service calls.
        assert!(provider.next_question("ignored").await.is_none());
        assert_eq!(client.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_bare_sentinel_is_empty_inline_summary() {
        let client = ScriptedClient::new(vec![text("INTERVIEW_COMPLETE")]);
        let mut provider = interviewer(&client);
        assert!(provider.next_question("").await.is_none());
        assert_eq!(provider.inline_summary(), Some(""));
    }

    #[tokio::test]
    async fn test_bare_sentinel_in_wrap_up_leaves_no_inline_summary() {
        let client = ScriptedClient::new(vec![text("Q1?"), text("INTERVIEW_COMPLETE")]);
        let mut provider = interviewer(&client).with_max_questions(1);
        assert!(provider.next_question("").await.is_some());
        assert!(provider.next_question("a1").await.is_none());
        assert!(provider.inline_summary().is_none());
    }

    #[tokio::test]
    async fn test_budget_triggers_single_wrap_up_turn() {
        let client = ScriptedClient::new(vec![
            text("Q1?"),
            text("Q2?"),
            text("Q3?"),
            text("Here is the summary."),
        ]);
        let mut provider = interviewer(&client).with_max_questions(3);

        assert_eq!(provider.next_question("").await.as_deref(), Some("Q1?"));
        assert_eq!(provider.next_question("a1").await.as_deref(), Some("Q2?"));
        assert_eq!(provider.next_question("a2").await.as_deref(), Some("Q3?"));
        assert_eq!(provider.questions_asked(), 3);

        assert!(provider.next_question("a3").await.is_none());
        assert_eq!(provider.inline_summary(), Some("Here is the summary."));

        let sent = client.sent();
        assert_eq!(sent.len(), 4);
        // The final answer and the wrap-up request travel together.
        assert_eq!(sent[3][0], "a3");
        assert_eq!(sent[3][1], WRAP_UP_REQUEST);

        assert!(provider.next_question("").await.is_none());
        assert_eq!(client.sent().len(), 4);
    }

    #[tokio::test]
    async fn test_default_budget_caps_questions() {
        let replies = (0..MAX_QUESTIONS + 5)
            .map(|i| Scripted::Text(format!("Q{i}?")))
            .collect();
        let client = ScriptedClient::new(replies);
        let mut provider = interviewer(&client);

        let mut asked = 0;
        while provider.next_question("answer").await.is_some() {
            asked += 1;
        }
        assert_eq!(asked, MAX_QUESTIONS);
        assert_eq!(provider.questions_asked(), MAX_QUESTIONS);

        // One turn per question plus the single wrap-up turn, and no
        // stateless summarize call.
        let sent = client.sent();
        assert_eq!(sent.len(), MAX_QUESTIONS as usize + 1);
        assert_eq!(sent.last().and_then(|p| p.last()).map(String::as_str), Some(WRAP_UP_REQUEST));
        assert!(client.generated().is_empty());
        assert_eq!(provider.inline_summary(), Some(format!("Q{MAX_QUESTIONS}?").as_str()));
    }

    #[tokio::test]
    async fn test_service_failure_ends_interview() {
        let client = ScriptedClient::new(vec![text("Q1?"), Scripted::Fail]);
        let mut provider = interviewer(&client);
        assert!(provider.next_question("").await.is_some());
        assert!(provider.next_question("a1").await.is_none());
        assert!(provider.inline_summary().is_none());
        assert!(provider.next_question("a2").await.is_none());
        assert_eq!(client.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_reply_ends_interview() {
        let client = ScriptedClient::new(vec![text("   ")]);
        let mut provider = interviewer(&client);
        assert!(provider.next_question("").await.is_none());
        assert!(provider.inline_summary().is_none());
    }

    #[tokio::test]
    async fn test_failed_wrap_up_leaves_no_summary() {
        let client = ScriptedClient::new(vec![text("Q1?"), Scripted::Fail]);
        let mut provider = interviewer(&client).with_max_questions(1);
        assert!(provider.next_question("").await.is_some());
        assert!(provider.next_question("a1").await.is_none());
        assert!(provider.inline_summary().is_none());
    }

    #[tokio::test]
    async fn test_summarize_uses_stateless_call() {
        let client = ScriptedClient::new(Vec::new()).with_summary(text(" Summary text. "));
        let provider = interviewer(&client);
        let entries = vec![QuestionAndAnswer::new("Why?", "Because.")];

        let summary = provider.summarize(&entries).await.unwrap();
        assert_eq!(summary, "Summary text.");

        let generated = client.generated();
        assert_eq!(generated.len(), 1);
        assert_eq!(
            generated[0][0],
            "Please summarize the following interview transcript:\n\nQ: Why?\nA: Because.\n\n"
        );
        assert!(client.sent().is_empty());
    }

    #[tokio::test]
    async fn test_summarize_propagates_failure() {
        let client = ScriptedClient::new(Vec::new()).with_summary(Scripted::Fail);
        let provider = interviewer(&client);
        assert!(provider.summarize(&[]).await.is_err());
    }
}
