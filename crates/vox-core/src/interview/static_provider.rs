//! Scripted question provider.

/// Yields a fixed list of questions in order, ignoring answers.
#[derive(Debug, Clone)]
pub struct StaticQuestions {
    questions: Vec<String>,
    next: usize,
}

impl StaticQuestions {
    pub fn new(questions: Vec<String>) -> Self {
        Self { questions, next: 0 }
    }

    /// The next scripted question, or `None` once the script is exhausted.
    pub fn next_question(&mut self) -> Option<String> {
        let question = self.questions.get(self.next)?.clone();
        self.next += 1;
        Some(question)
    }

    #[cfg(test)]
    pub(crate) fn remaining(&self) -> usize {
        self.questions.len().saturating_sub(self.next)
    }
}
