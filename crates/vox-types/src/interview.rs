//! Interview, transcript, and summary types.
//!
//! An interview is persisted as three records sharing one [`InterviewId`]:
//! the metadata ([`Interview`]), the ordered question/answer pairs
//! ([`Transcript`]) and the generated text ([`Summary`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Unique identifier for an interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterviewId(pub Uuid);

impl InterviewId {
    /// Create a new InterviewId using UUID v7 (time-sortable).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for InterviewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InterviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InterviewId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A single question and the respondent's answer to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAndAnswer {
    pub question: String,
    pub answer: String,
}

impl QuestionAndAnswer {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Render entries as `Q: ...` / `A: ...` blocks separated by blank lines.
pub fn render_entries(entries: &[QuestionAndAnswer]) -> String {
    entries
        .iter()
        .map(|qa| format!("Q: {}\nA: {}\n\n", qa.question, qa.answer))
        .collect()
}

/// Metadata for a completed interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interview {
    pub id: InterviewId,
    /// Who answered the questions (chat user ID or terminal user name).
    pub respondent_id: String,
    /// The topic the interview was run against.
    pub topic_id: String,
    pub created_at: DateTime<Utc>,
}

/// Ordered question/answer record of one interview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub interview_id: InterviewId,
    pub entries: Vec<QuestionAndAnswer>,
}

/// Generated summary of one interview. Empty for scripted interviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub interview_id: InterviewId,
    pub text: String,
}

/// Everything that gets saved for one interview, as a single unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewRecord {
    pub interview: Interview,
    pub transcript: Transcript,
    pub summary: Summary,
}

impl InterviewRecord {
    /// Build a record for a finished interview, generating its identity now.
    pub fn new(
        respondent_id: impl Into<String>,
        topic_id: impl Into<String>,
        entries: Vec<QuestionAndAnswer>,
        summary: impl Into<String>,
    ) -> Self {
        let id = InterviewId::new();
        Self {
            interview: Interview {
                id,
                respondent_id: respondent_id.into(),
                topic_id: topic_id.into(),
                created_at: Utc::now(),
            },
            transcript: Transcript {
                interview_id: id,
                entries,
            },
            summary: Summary {
                interview_id: id,
                text: summary.into(),
            },
        }
    }

    pub fn id(&self) -> InterviewId {
        self.interview.id
    }
}
