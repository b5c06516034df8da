//! Infrastructure layer for vox.
//!
//! Implements the ports defined in `vox-core`: SQLite interview storage, the
//! Gemini generative client, and the Slack chat platform client. Also holds
//! config file loading and Slack request verification.

pub mod config;
pub mod llm;
pub mod slack;
pub mod sqlite;

#[cfg(test)]
mod mock_http;
