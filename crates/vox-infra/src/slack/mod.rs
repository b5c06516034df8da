//! Slack integration: Web API client, request signing, and inbound payloads.

pub mod client;
pub mod events;
pub mod signature;
