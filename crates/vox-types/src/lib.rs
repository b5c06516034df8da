//! Shared domain types for vox.
//!
//! This crate contains the types used across the vox workspace: interviews,
//! transcripts, topics, configuration, the generative-service wire shapes,
//! and the error enums for each concern.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod interview;
pub mod llm;
pub mod topic;
