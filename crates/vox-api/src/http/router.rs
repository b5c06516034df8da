//! Axum router configuration.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use vox_core::chat::platform::ChatPlatform;
use vox_core::repository::interview::InterviewRepository;

use crate::http::handlers;
use crate::state::AppState;

/// Build the webhook router with request tracing.
pub fn build_router<P, R>(state: AppState<P, R>) -> Router
where
    P: ChatPlatform + 'static,
    R: InterviewRepository + 'static,
{
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/slack/events", post(handlers::events::slack_events::<P, R>))
        .route("/slack/commands", post(handlers::commands::slash_command::<P, R>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
