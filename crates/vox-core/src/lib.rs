//! Business logic and port trait definitions for vox.
//!
//! This crate defines the "ports" (repository, generative service, and chat
//! platform traits) that the infrastructure layer implements, plus the
//! interview orchestrator, the two question providers, and the chat session
//! registry. It depends only on `vox-types` -- never on `vox-infra` or any
//! database/IO crate.

pub mod chat;
pub mod interview;
pub mod llm;
pub mod repository;
pub mod session;

#[cfg(test)]
mod testing;
