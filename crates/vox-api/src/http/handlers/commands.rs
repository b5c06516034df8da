//! POST /slack/commands -- the `/vox` slash command.
//!
//! The command text is parsed like a command line (`interview start --topic
//! <id>`). Usage errors and unknown topics are answered privately to the
//! invoker; a valid request starts the interview on its own task.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use clap::{Parser, Subcommand};

use vox_core::chat::platform::ChatPlatform;
use vox_core::interview::provider::QuestionProvider;
use vox_core::repository::interview::InterviewRepository;
use vox_infra::slack::events::SlashCommand;
use vox_types::topic::{Topic, find_topic};

use super::verify_request;
use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(disable_version_flag = true)]
struct SlashCli {
    #[command(subcommand)]
    command: SlashCommands,
}

#[derive(Subcommand, Debug)]
enum SlashCommands {
    /// Interviews.
    Interview {
        #[command(subcommand)]
        action: InterviewAction,
    },
}

#[derive(Subcommand, Debug)]
enum InterviewAction {
    /// Start an interview in a direct message.
    Start {
        /// Topic to interview about.
        #[arg(long)]
        topic: String,
    },
}

/// Topic ID requested by the command, or the text to show the invoker.
fn requested_topic(command: &SlashCommand) -> Result<String, String> {
    let args = std::iter::once(command.command.as_str()).chain(command.text.split_whitespace());
    match SlashCli::try_parse_from(args) {
        Ok(SlashCli {
            command:
                SlashCommands::Interview {
                    action: InterviewAction::Start { topic },
                },
        }) => Ok(topic),
        Err(e) => Err(e.render().to_string()),
    }
}

pub async fn slash_command<P, R>(
    State(state): State<AppState<P, R>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError>
where
    P: ChatPlatform + 'static,
    R: InterviewRepository + 'static,
{
    verify_request(&state.verifier, &headers, &body)?;
    let command = SlashCommand::parse(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let topic_id = match requested_topic(&command) {
        Ok(topic_id) => topic_id,
        Err(usage) => {
            reply_privately(&state, &command, &usage).await;
            return Ok(StatusCode::ACCEPTED);
        }
    };

    let topic = match find_topic(&state.config.interviews, &topic_id) {
        Ok(topic) => topic,
        Err(e) => {
            reply_privately(&state, &command, &format!("Error: {e}")).await;
            return Ok(StatusCode::ACCEPTED);
        }
    };

    tracing::info!(
        respondent_id = %command.user_id,
        topic_id = %topic.id,
        "starting chat interview"
    );
    spawn_interview(state, command, topic);
    Ok(StatusCode::ACCEPTED)
}

fn spawn_interview<P, R>(state: AppState<P, R>, command: SlashCommand, topic: Topic)
where
    P: ChatPlatform + 'static,
    R: InterviewRepository + 'static,
{
    tokio::spawn(async move {
        let config = Arc::clone(&state.config);
        let client = state.llm_client.clone();
        let result = state
            .launcher
            .launch(&command.user_id, &topic, move |topic| {
                QuestionProvider::from_topic(topic, &config, client)
            })
            .await;

        match result {
            Ok(record) => tracing::info!(
                interview_id = %record.id(),
                respondent_id = %command.user_id,
                "chat interview finished"
            ),
            Err(e) => {
                state
                    .launcher
                    .report_failure(&command.channel_id, &command.user_id, &e)
                    .await
            }
        }
    });
}

async fn reply_privately<P, R>(state: &AppState<P, R>, command: &SlashCommand, text: &str)
where
    P: ChatPlatform,
    R: InterviewRepository,
{
    if let Err(e) = state
        .launcher
        .platform()
        .post_ephemeral(&command.channel_id, &command.user_id, text)
        .await
    {
        tracing::warn!(respondent_id = %command.user_id, error = %e, "could not post ephemeral reply");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::http::test_support::{DM_CHANNEL, TestState, signed_headers, test_state};

    fn form(text: &str) -> String {
        format!(
            "command=%2Fvox&text={}&user_id=U1&channel_id=C1",
            text.replace(' ', "+")
        )
    }

    async fn post(state: TestState, body: &str) -> StatusCode {
        let headers = signed_headers(&state, body);
        match slash_command(State(state), headers, Bytes::from(body.to_string())).await {
            Ok(status) => status,
            Err(e) => panic!("handler failed: {e:?}"),
        }
    }

    /// Poll until `check` holds, failing after a second.
    async fn eventually(mut check: impl FnMut() -> bool) {
        tokio::time::timeout(Duration::from_secs(1), async {
            while !check() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not reached");
    }

    #[test]
    fn test_requested_topic() {
        let command = SlashCommand::parse(form("interview start --topic onboarding").as_bytes())
            .unwrap();
        assert_eq!(requested_topic(&command).unwrap(), "onboarding");
    }

    #[test]
    fn test_missing_topic_is_usage_error() {
        let command = SlashCommand::parse(form("interview start").as_bytes()).unwrap();
        let usage = requested_topic(&command).unwrap_err();
        assert!(usage.contains("--topic"));
    }

    #[test]
    fn test_help_is_returned_as_text() {
        let command = SlashCommand::parse(form("--help").as_bytes()).unwrap();
        let usage = requested_topic(&command).unwrap_err();
        assert!(usage.contains("interview"));
    }

    #[tokio::test]
    async fn test_unsigned_command_is_rejected() {
        let (state, _) = test_state().await;
        let body = form("interview start --topic onboarding");
        let result = slash_command(State(state), HeaderMap::new(), Bytes::from(body)).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_usage_error_is_ephemeral() {
        let (state, platform) = test_state().await;
        assert_eq!(post(state, &form("bogus")).await, StatusCode::ACCEPTED);

        let ephemerals = platform.ephemerals();
        assert_eq!(ephemerals.len(), 1);
        assert_eq!(ephemerals[0].0, "C1");
        assert_eq!(ephemerals[0].1, "U1");
        assert!(ephemerals[0].2.contains("Usage"));
    }

    #[tokio::test]
    async fn test_unknown_topic_is_ephemeral() {
        let (state, platform) = test_state().await;
        let status = post(state, &form("interview start --topic churn")).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(
            platform.ephemerals()[0].2,
            "Error: topic 'churn' not found"
        );
    }

    #[tokio::test]
    async fn test_static_interview_runs_over_chat() {
        let (state, platform) = test_state().await;
        let registry = state.launcher.registry().clone();

        let status = post(state, &form("interview start --topic onboarding")).await;
        assert_eq!(status, StatusCode::ACCEPTED);

        eventually(|| platform.posts().len() == 1).await;
        assert_eq!(
            platform.posts()[0],
            (DM_CHANNEL.to_string(), "What is your name?".to_string())
        );

        registry.deliver("U1", "Alice");
        eventually(|| platform.posts().len() == 2).await;
        assert!(platform.posts()[1].1.contains("Interview Summary"));
        eventually(|| !registry.is_active("U1")).await;
    }

    #[tokio::test]
    async fn test_llm_topic_without_key_reports_failure() {
        let (state, platform) = test_state().await;
        let status = post(state, &form("interview start --topic research")).await;
        assert_eq!(status, StatusCode::ACCEPTED);

        eventually(|| !platform.ephemerals().is_empty()).await;
        assert_eq!(
            platform.ephemerals()[0].2,
            "Error: api-key is required"
        );
    }

    #[tokio::test]
    async fn test_second_start_is_rejected() {
        let (state, platform) = test_state().await;
        let _session = state.launcher.registry().start_session("U1").unwrap();

        post(state, &form("interview start --topic onboarding")).await;
        eventually(|| !platform.ephemerals().is_empty()).await;
        assert_eq!(
            platform.ephemerals()[0].2,
            "You already have an interview in progress."
        );
    }
}
