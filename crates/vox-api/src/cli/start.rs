//! `vox start`: run one interview in the terminal.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use console::style;

use vox_core::interview::orchestrator::Interviewer;
use vox_core::interview::provider::QuestionProvider;
use vox_core::llm::box_client::BoxConversationClient;
use vox_core::repository::interview::InterviewRepository;
use vox_infra::llm::create_client;
use vox_types::config::VoxConfig;
use vox_types::error::InterviewError;
use vox_types::interview::{InterviewRecord, render_entries};
use vox_types::topic::{ProviderKind, Topic, find_topic};

use super::StartArgs;
use super::credential;
use super::terminal::TerminalUi;
use crate::state::open_repository;

/// Run an interview, or list the topics when none was named.
pub async fn run(config: &VoxConfig, args: StartArgs) -> Result<()> {
    let Some(topic_id) = args.topic.as_deref() else {
        list_topics(config, &mut std::io::stdout())?;
        return Ok(());
    };

    let topic = find_topic(&config.interviews, topic_id)?;
    let provider = build_provider(config, &topic, args.api_key.as_deref(), args.model.as_deref())?;

    let respondent = args.user.unwrap_or_else(os_user);

    let repository = Arc::new(open_repository(config).await?);
    let result = Interviewer::new(provider, TerminalUi::stdio(), Arc::clone(&repository))
        .run(&respondent, &topic.id)
        .await;
    repository.close().await;

    let record = match result {
        Ok(record) => record,
        Err(InterviewError::Persistence { source, record }) => {
            write_unsaved(&record, &mut std::io::stderr())?;
            return Err(anyhow::Error::new(source).context("interview could not be saved"));
        }
        Err(e) => return Err(e.into()),
    };
    println!();
    println!(
        "  {} Interview saved as {}",
        style("✓").green().bold(),
        style(record.id()).cyan()
    );
    Ok(())
}

/// Print an interview that could not be stored, so the answers survive the
/// failed run.
fn write_unsaved(record: &InterviewRecord, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "Interview could not be saved. Your answers:")?;
    writeln!(out)?;
    write!(out, "{}", render_entries(&record.transcript.entries))?;
    if !record.summary.text.is_empty() {
        writeln!(out, "--- Summary ---")?;
        writeln!(out, "{}", record.summary.text)?;
    }
    Ok(())
}

/// The OS user name, or `"terminal"` when it cannot be determined.
fn os_user() -> String {
    ["USER", "USERNAME"]
        .into_iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| "terminal".to_string())
}

/// Print `id: name` for every configured topic.
pub fn list_topics(config: &VoxConfig, out: &mut impl Write) -> std::io::Result<()> {
    if config.interviews.is_empty() {
        writeln!(out, "No topics configured.")?;
        return Ok(());
    }
    writeln!(out, "Please specify a topic using --topic. Available topics:")?;
    for topic in &config.interviews {
        writeln!(out, " - {}: {}", topic.id, topic.name)?;
    }
    Ok(())
}

/// Build the provider for `topic`, creating a generative client only for
/// llm topics so scripted interviews run without any API key.
pub fn build_provider(
    config: &VoxConfig,
    topic: &Topic,
    api_key: Option<&str>,
    model: Option<&str>,
) -> Result<QuestionProvider> {
    let client = match topic.kind() {
        ProviderKind::Static => None,
        ProviderKind::Llm => llm_client(config, api_key, model)?,
    };
    Ok(QuestionProvider::from_topic(topic, config, client)?)
}

/// The generative client, if an API key is available from the flag or the file.
pub fn llm_client(
    config: &VoxConfig,
    api_key: Option<&str>,
    model: Option<&str>,
) -> Result<Option<Arc<BoxConversationClient>>> {
    let Some(key) = credential(api_key, config.providers.gemini.api_key.as_deref()) else {
        return Ok(None);
    };
    let model = config.model(model);
    tracing::debug!(model = %model, "creating generative client");
    let client = create_client(&key, &model).context("could not create generative client")?;
    Ok(Some(Arc::new(client)))
}
