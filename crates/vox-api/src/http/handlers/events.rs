//! POST /slack/events -- Events API callbacks.
//!
//! The URL-verification challenge is echoed back. Message events from people
//! are routed to the author's running interview, if any; everything else is
//! acknowledged and ignored.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};

use vox_core::chat::platform::ChatPlatform;
use vox_core::repository::interview::InterviewRepository;
use vox_infra::slack::events::EventEnvelope;

use super::verify_request;
use crate::http::error::AppError;
use crate::state::AppState;

pub async fn slack_events<P, R>(
    State(state): State<AppState<P, R>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError>
where
    P: ChatPlatform + 'static,
    R: InterviewRepository + 'static,
{
    verify_request(&state.verifier, &headers, &body)?;

    let envelope: EventEnvelope = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("invalid event payload: {e}")))?;

    match envelope {
        EventEnvelope::UrlVerification { challenge } => {
            tracing::info!("answering url verification challenge");
            Ok((
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain")],
                challenge,
            )
                .into_response())
        }
        EventEnvelope::EventCallback { event } => {
            if let Some((user, text)) = event.human_message() {
                let delivery = state.launcher.registry().deliver(user, text);
                tracing::debug!(respondent_id = user, ?delivery, "message event");
            }
            Ok(StatusCode::ACCEPTED.into_response())
        }
        EventEnvelope::Unsupported => Ok(StatusCode::ACCEPTED.into_response()),
    }
}
