//! Interview orchestration and question providers.
//!
//! A [`provider::QuestionProvider`] decides what to ask next; an
//! [`ui::InterviewUi`] carries questions to the respondent and answers back;
//! the [`orchestrator::Interviewer`] drives the loop, summarizes, and
//! persists the result.

pub mod conversational;
pub mod orchestrator;
pub mod provider;
pub mod sentinel;
pub mod static_provider;
pub mod ui;
