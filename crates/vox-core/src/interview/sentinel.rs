//! Completion sentinel handling for conversational replies.

/// Marker the generative service emits when it considers the interview done.
pub const COMPLETION_SENTINEL: &str = "INTERVIEW_COMPLETE";

/// A parsed reply from the conversational interviewer's backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The next question to put to the respondent.
    Question(String),
    /// The service ended the interview. `summary` is whatever followed the
    /// sentinel, possibly empty.
    Complete { summary: String },
}

/// Classify a reply. Anything after the sentinel is kept as the summary.
pub fn parse_reply(text: &str) -> Reply {
    match text.split_once(COMPLETION_SENTINEL) {
        Some((_, trailing)) => Reply::Complete {
            summary: trailing
                .trim_start_matches(|c: char| c == ':' || c.is_whitespace())
                .trim_end()
                .to_string(),
        },
        None => Reply::Question(text.trim().to_string()),
    }
}
