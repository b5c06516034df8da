//! `vox serve`: the Slack webhook server.

use std::sync::Arc;

use anyhow::Result;
use console::style;
use secrecy::SecretString;

use vox_core::repository::interview::InterviewRepository;
use vox_core::session::launcher::ChatInterviewLauncher;
use vox_core::session::registry::SessionRegistry;
use vox_infra::slack::client::SlackClient;
use vox_infra::slack::signature::SignatureVerifier;
use vox_types::config::VoxConfig;
use vox_types::error::ConfigError;

use super::ServeArgs;
use super::credential;
use super::start::llm_client;
use crate::http::router::build_router;
use crate::state::{AppState, open_repository};

pub async fn run(config: &VoxConfig, args: ServeArgs) -> Result<()> {
    let bot_token = credential(args.slack_bot_token.as_deref(), config.slack.bot_token.as_deref())
        .ok_or_else(|| ConfigError::MissingCredential("slack-bot-token".to_string()))?;
    let signing_secret = credential(
        args.slack_signing_secret.as_deref(),
        config.slack.signing_secret.as_deref(),
    )
    .ok_or_else(|| ConfigError::MissingCredential("slack-signing-secret".to_string()))?;

    let llm_client = llm_client(config, args.api_key.as_deref(), args.model.as_deref())?;
    if llm_client.is_none() {
        tracing::warn!("no api-key configured; llm topics will be rejected");
    }

    let repository = Arc::new(open_repository(config).await?);
    let platform = Arc::new(SlackClient::new(SecretString::from(bot_token))?);
    let launcher = ChatInterviewLauncher::new(
        SessionRegistry::new(),
        platform,
        Arc::clone(&repository),
        config.answer_timeout(),
    );

    let state = AppState {
        config: Arc::new(config.clone()),
        verifier: Arc::new(SignatureVerifier::new(SecretString::from(signing_secret))),
        launcher: Arc::new(launcher),
        llm_client,
    };

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, topics = config.interviews.len(), "webhook server listening");

    println!(
        "  {} vox listening on {}",
        style("⚡").bold(),
        style(format!("http://{addr}")).cyan()
    );
    println!("  {}", style("Press Ctrl+C to stop").dim());

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    repository.close().await;
    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
