//! Shared fixtures for handler tests.

use std::sync::{Arc, Mutex};

use axum::http::HeaderMap;
use axum::response::Response;
use secrecy::SecretString;

use vox_core::chat::platform::ChatPlatform;
use vox_core::session::launcher::ChatInterviewLauncher;
use vox_core::session::registry::SessionRegistry;
use vox_infra::slack::signature::SignatureVerifier;
use vox_infra::sqlite::interview::SqliteInterviewRepository;
use vox_types::chat::ChatPlatformError;
use vox_types::config::VoxConfig;
use vox_types::topic::TopicConfig;

use crate::state::{AppState, open_repository_in};

pub const DM_CHANNEL: &str = "D-direct";
const SIGNING_SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";

pub type TestState = AppState<RecordingPlatform, SqliteInterviewRepository>;

/// Chat platform that records every call and always succeeds.
#[derive(Default)]
pub struct RecordingPlatform {
    posts: Mutex<Vec<(String, String)>>,
    ephemerals: Mutex<Vec<(String, String, String)>>,
}

impl RecordingPlatform {
    pub fn posts(&self) -> Vec<(String, String)> {
        self.posts.lock().unwrap().clone()
    }

    pub fn ephemerals(&self) -> Vec<(String, String, String)> {
        self.ephemerals.lock().unwrap().clone()
    }
}

impl ChatPlatform for RecordingPlatform {
    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), ChatPlatformError> {
        self.posts
            .lock()
            .unwrap()
            .push((channel_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn open_direct_conversation(&self, _user_id: &str) -> Result<String, ChatPlatformError> {
        Ok(DM_CHANNEL.to_string())
    }

    async fn post_ephemeral(
        &self,
        channel_id: &str,
        user_id: &str,
        text: &str,
    ) -> Result<(), ChatPlatformError> {
        self.ephemerals.lock().unwrap().push((
            channel_id.to_string(),
            user_id.to_string(),
            text.to_string(),
        ));
        Ok(())
    }
}

fn config() -> VoxConfig {
    let mut config = VoxConfig::default();
    config.interviews = vec![
        TopicConfig {
            id: "onboarding".to_string(),
            name: "Onboarding".to_string(),
            provider: "static".to_string(),
            questions: vec!["What is your name?".to_string()],
            prompt: None,
        },
        TopicConfig {
            id: "research".to_string(),
            name: "Research".to_string(),
            provider: "llm".to_string(),
            questions: Vec::new(),
            prompt: Some("Ask about CI.".to_string()),
        },
    ];
    config
}

/// State backed by a throwaway database and a recording platform, with no
/// generative client.
pub async fn test_state() -> (TestState, Arc<RecordingPlatform>) {
    let tmp = tempfile::tempdir().unwrap();
    let repository = open_repository_in(tmp.path()).await.unwrap();
    std::mem::forget(tmp);

    let platform = Arc::new(RecordingPlatform::default());
    let launcher = ChatInterviewLauncher::new(
        SessionRegistry::new(),
        Arc::clone(&platform),
        Arc::new(repository),
        None,
    );
    let state = AppState {
        config: Arc::new(config()),
        verifier: Arc::new(SignatureVerifier::new(SecretString::from(
            SIGNING_SECRET.to_string(),
        ))),
        launcher: Arc::new(launcher),
        llm_client: None,
    };
    (state, platform)
}

/// Headers carrying a valid signature for `body` at the current time.
pub fn signed_headers(state: &TestState, body: &str) -> HeaderMap {
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let signature = state.verifier.sign(&timestamp, body.as_bytes()).unwrap();

    let mut headers = HeaderMap::new();
    headers.insert("x-slack-request-timestamp", timestamp.parse().unwrap());
    headers.insert("x-slack-signature", signature.parse().unwrap());
    headers
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
