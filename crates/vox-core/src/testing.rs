//! Hand-written doubles shared by the unit tests in this crate.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex};

use vox_types::chat::ChatPlatformError;
use vox_types::error::{RepositoryError, UiError};
use vox_types::interview::{Interview, InterviewId, InterviewRecord, Summary, Transcript};
use vox_types::llm::{Content, GenerateResponse, LlmError, Part};

use crate::chat::platform::ChatPlatform;
use crate::interview::ui::InterviewUi;
use crate::llm::box_client::BoxConversationClient;
use crate::llm::client::{ConversationClient, ConversationSession};
use crate::repository::interview::InterviewRepository;
use crate::session::registry::SessionRegistry;

// --- Generative service ---

#[derive(Clone, Debug)]
pub enum Scripted {
    Text(String),
    Fail,
}

pub fn text(s: &str) -> Scripted {
    Scripted::Text(s.to_string())
}

#[derive(Default)]
struct ScriptState {
    session_replies: VecDeque<Scripted>,
    generate_replies: VecDeque<Scripted>,
    seed: Vec<Content>,
    sent: Vec<Vec<String>>,
    generated: Vec<Vec<String>>,
}

/// Replays canned replies and records every request.
#[derive(Clone, Default)]
pub struct ScriptedClient {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedClient {
    pub fn new(session_replies: Vec<Scripted>) -> Self {
        let client = Self::default();
        client.state.lock().unwrap().session_replies = session_replies.into();
        client
    }

    pub fn with_summary(self, reply: Scripted) -> Self {
        self.state.lock().unwrap().generate_replies.push_back(reply);
        self
    }

    pub fn boxed(&self) -> Arc<BoxConversationClient> {
        Arc::new(BoxConversationClient::new(self.clone()))
    }

    /// Texts of each `send_message` call, in order.
    pub fn sent(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().sent.clone()
    }

    /// Texts of each stateless `generate_content` call, in order.
    pub fn generated(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().generated.clone()
    }

    pub fn seed(&self) -> Vec<Content> {
        self.state.lock().unwrap().seed.clone()
    }
}

fn texts(parts: &[Part]) -> Vec<String> {
    parts.iter().filter_map(|p| p.text.clone()).collect()
}

fn to_response(reply: Option<Scripted>) -> Result<GenerateResponse, LlmError> {
    match reply {
        Some(Scripted::Text(t)) => Ok(GenerateResponse::from_text(t)),
        Some(Scripted::Fail) => Err(LlmError::Provider {
            message: "scripted failure".to_string(),
        }),
        None => Err(LlmError::Provider {
            message: "script exhausted".to_string(),
        }),
    }
}

pub struct ScriptedSession {
    state: Arc<Mutex<ScriptState>>,
}

impl ConversationSession for ScriptedSession {
    fn send_message(
        &mut self,
        parts: Vec<Part>,
    ) -> impl Future<Output = Result<GenerateResponse, LlmError>> + Send {
        let reply = {
            let mut state = self.state.lock().unwrap();
            state.sent.push(texts(&parts));
            state.session_replies.pop_front()
        };
        async move { to_response(reply) }
    }
}

impl ConversationClient for ScriptedClient {
    type Session = ScriptedSession;

    fn name(&self) -> &str {
        "scripted"
    }

    fn start_session(&self, history: Vec<Content>) -> ScriptedSession {
        self.state.lock().unwrap().seed = history;
        ScriptedSession {
            state: self.state.clone(),
        }
    }

    fn generate_content(
        &self,
        parts: Vec<Part>,
    ) -> impl Future<Output = Result<GenerateResponse, LlmError>> + Send {
        let reply = {
            let mut state = self.state.lock().unwrap();
            state.generated.push(texts(&parts));
            state.generate_replies.pop_front()
        };
        async move { to_response(reply) }
    }
}

// --- Front end ---

/// Answers from a queue and records what it was shown.
#[derive(Clone, Default)]
pub struct MockUi {
    answers: Arc<Mutex<VecDeque<Result<String, UiError>>>>,
    pub asked: Arc<Mutex<Vec<String>>>,
    pub summaries: Arc<Mutex<Vec<String>>>,
    fail_display: bool,
}

impl MockUi {
    pub fn answering(answers: &[&str]) -> Self {
        let ui = Self::default();
        {
            let mut queue = ui.answers.lock().unwrap();
            for a in answers {
                queue.push_back(Ok(a.to_string()));
            }
        }
        ui
    }

    pub fn then_fail(self, err: UiError) -> Self {
        self.answers.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn failing_display(mut self) -> Self {
        self.fail_display = true;
        self
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }

    pub fn summaries(&self) -> Vec<String> {
        self.summaries.lock().unwrap().clone()
    }
}

impl InterviewUi for MockUi {
    fn ask(&mut self, question: &str) -> impl Future<Output = Result<String, UiError>> + Send {
        self.asked.lock().unwrap().push(question.to_string());
        let answer = self
            .answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(UiError::InputClosed));
        async move { answer }
    }

    fn display_summary(&mut self, summary: &str) -> impl Future<Output = Result<(), UiError>> + Send {
        self.summaries.lock().unwrap().push(summary.to_string());
        let result = if self.fail_display {
            Err(UiError::Io("display broke".to_string()))
        } else {
            Ok(())
        };
        async move { result }
    }
}

// --- Persistence ---

#[derive(Default)]
pub struct MockRepository {
    records: Mutex<HashMap<InterviewId, InterviewRecord>>,
    /// Saves still to fail before one succeeds.
    save_failures: Mutex<usize>,
    save_attempts: Mutex<usize>,
}

impl MockRepository {
    pub fn failing() -> Self {
        Self {
            save_failures: Mutex::new(usize::MAX),
            ..Default::default()
        }
    }

    pub fn failing_once() -> Self {
        Self {
            save_failures: Mutex::new(1),
            ..Default::default()
        }
    }

    pub fn save_attempts(&self) -> usize {
        *self.save_attempts.lock().unwrap()
    }

    pub fn saved(&self) -> Vec<InterviewRecord> {
        self.records.lock().unwrap().values().cloned().collect()
    }
}

impl InterviewRepository for MockRepository {
    fn save(
        &self,
        record: &InterviewRecord,
    ) -> impl Future<Output = Result<InterviewId, RepositoryError>> + Send {
        *self.save_attempts.lock().unwrap() += 1;
        let fail = {
            let mut failures = self.save_failures.lock().unwrap();
            let fail = *failures > 0;
            *failures = failures.saturating_sub(1);
            fail
        };
        let result = if fail {
            Err(RepositoryError::Query("disk full".to_string()))
        } else {
            self.records
                .lock()
                .unwrap()
                .insert(record.id(), record.clone());
            Ok(record.id())
        };
        async move { result }
    }

    fn get_interview(
        &self,
        id: &InterviewId,
    ) -> impl Future<Output = Result<Interview, RepositoryError>> + Send {
        let result = self
            .records
            .lock()
            .unwrap()
            .get(id)
            .map(|r| r.interview.clone())
            .ok_or(RepositoryError::NotFound);
        async move { result }
    }

    fn get_transcript(
        &self,
        id: &InterviewId,
    ) -> impl Future<Output = Result<Transcript, RepositoryError>> + Send {
        let result = self
            .records
            .lock()
            .unwrap()
            .get(id)
            .map(|r| r.transcript.clone())
            .ok_or(RepositoryError::NotFound);
        async move { result }
    }

    fn get_summary(
        &self,
        id: &InterviewId,
    ) -> impl Future<Output = Result<Summary, RepositoryError>> + Send {
        let result = self
            .records
            .lock()
            .unwrap()
            .get(id)
            .map(|r| r.summary.clone())
            .ok_or(RepositoryError::NotFound);
        async move { result }
    }

    fn list_interviews(&self) -> impl Future<Output = Result<Vec<Interview>, RepositoryError>> + Send {
        let result = Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .map(|r| r.interview.clone())
            .collect());
        async move { result }
    }

    fn close(&self) -> impl Future<Output = ()> + Send {
        async {}
    }
}

// --- Chat platform ---

/// Records posts. When wired to a registry, each post to the respondent's
/// direct channel is answered with the next queued reply, as a prompt human would.
#[derive(Default)]
pub struct MockPlatform {
    pub posts: Mutex<Vec<(String, String)>>,
    pub ephemerals: Mutex<Vec<(String, String, String)>>,
    replies: Mutex<VecDeque<String>>,
    responder: Option<(SessionRegistry, String)>,
    fail_open: bool,
    fail_post: bool,
}

pub const DM_CHANNEL: &str = "D-direct";

impl MockPlatform {
    pub fn replying(registry: SessionRegistry, respondent_id: &str, replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            responder: Some((registry, respondent_id.to_string())),
            ..Default::default()
        }
    }

    pub fn failing_open() -> Self {
        Self {
            fail_open: true,
            ..Default::default()
        }
    }

    pub fn failing_post() -> Self {
        Self {
            fail_post: true,
            ..Default::default()
        }
    }

    pub fn posts(&self) -> Vec<(String, String)> {
        self.posts.lock().unwrap().clone()
    }

    pub fn ephemerals(&self) -> Vec<(String, String, String)> {
        self.ephemerals.lock().unwrap().clone()
    }
}

impl ChatPlatform for MockPlatform {
    fn post_message(
        &self,
        channel_id: &str,
        text: &str,
    ) -> impl Future<Output = Result<(), ChatPlatformError>> + Send {
        let result = if self.fail_post {
            Err(ChatPlatformError::Api {
                method: "chat.postMessage".to_string(),
                code: "channel_not_found".to_string(),
            })
        } else {
            self.posts
                .lock()
                .unwrap()
                .push((channel_id.to_string(), text.to_string()));
            if let Some((registry, respondent_id)) = &self.responder {
                if channel_id == DM_CHANNEL {
                    if let Some(reply) = self.replies.lock().unwrap().pop_front() {
                        registry.deliver(respondent_id, &reply);
                    }
                }
            }
            Ok(())
        };
        async move { result }
    }

    fn open_direct_conversation(
        &self,
        _user_id: &str,
    ) -> impl Future<Output = Result<String, ChatPlatformError>> + Send {
        let result = if self.fail_open {
            Err(ChatPlatformError::Http("connection refused".to_string()))
        } else {
            Ok(DM_CHANNEL.to_string())
        };
        async move { result }
    }

    fn post_ephemeral(
        &self,
        channel_id: &str,
        user_id: &str,
        text: &str,
    ) -> impl Future<Output = Result<(), ChatPlatformError>> + Send {
        self.ephemerals.lock().unwrap().push((
            channel_id.to_string(),
            user_id.to_string(),
            text.to_string(),
        ));
        async { Ok(()) }
    }
}
