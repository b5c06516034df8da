//! Application state for the webhook server.
//!
//! Handlers are generic over the chat platform and repository so they can be
//! exercised against in-memory doubles; the server pins them to Slack and
//! SQLite through the default type parameters.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use vox_core::llm::box_client::BoxConversationClient;
use vox_core::session::launcher::ChatInterviewLauncher;
use vox_infra::config::resolve_data_dir;
use vox_infra::slack::client::SlackClient;
use vox_infra::slack::signature::SignatureVerifier;
use vox_infra::sqlite::interview::SqliteInterviewRepository;
use vox_infra::sqlite::pool::DatabasePool;
use vox_types::config::VoxConfig;

/// Shared state handed to every webhook handler.
pub struct AppState<P = SlackClient, R = SqliteInterviewRepository> {
    pub config: Arc<VoxConfig>,
    pub verifier: Arc<SignatureVerifier>,
    pub launcher: Arc<ChatInterviewLauncher<P, R>>,
    /// Present when an API key was configured; llm topics fail without it.
    pub llm_client: Option<Arc<BoxConversationClient>>,
}

impl<P, R> Clone for AppState<P, R> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            verifier: Arc::clone(&self.verifier),
            launcher: Arc::clone(&self.launcher),
            llm_client: self.llm_client.clone(),
        }
    }
}

/// `$VOX_DATA_DIR`, when set and non-empty.
fn data_dir_from_env() -> Option<PathBuf> {
    std::env::var_os("VOX_DATA_DIR")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Open the interview database under the resolved data directory.
pub async fn open_repository(config: &VoxConfig) -> anyhow::Result<SqliteInterviewRepository> {
    let env_dir = data_dir_from_env();
    let data_dir = resolve_data_dir(config, env_dir.as_deref());
    open_repository_in(&data_dir).await
}

pub async fn open_repository_in(data_dir: &Path) -> anyhow::Result<SqliteInterviewRepository> {
    let pool = DatabasePool::open_in(data_dir)
        .await
        .with_context(|| format!("could not open database in {}", data_dir.display()))?;
    tracing::debug!(data_dir = %data_dir.display(), "database opened");
    Ok(SqliteInterviewRepository::new(pool))
}
