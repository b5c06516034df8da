//! ChatPlatform trait definition.

use std::future::Future;

use vox_types::chat::ChatPlatformError;

/// Outbound messaging on a chat workspace.
///
/// Implementations live in vox-infra (e.g., `SlackClient`). Inbound events
/// arrive through the HTTP surface in vox-api, not through this trait.
pub trait ChatPlatform: Send + Sync {
    fn post_message(
        &self,
        channel_id: &str,
        text: &str,
    ) -> impl Future<Output = Result<(), ChatPlatformError>> + Send;

    /// Open (or reuse) a direct conversation with `user_id`, returning its channel ID.
    fn open_direct_conversation(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<String, ChatPlatformError>> + Send;

    /// Post a message only `user_id` can see.
    fn post_ephemeral(
        &self,
        channel_id: &str,
        user_id: &str,
        text: &str,
    ) -> impl Future<Output = Result<(), ChatPlatformError>> + Send;
}
