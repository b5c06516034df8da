//! Chat interview sessions: who is being interviewed, and how their
//! replies reach the running interview.

pub mod chat_ui;
pub mod launcher;
pub mod registry;
