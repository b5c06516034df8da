//! Registry of in-progress chat interviews.
//!
//! At most one interview runs per respondent. The registry maps a respondent
//! to the answer channel of their running interview; inbound chat messages
//! are routed through [`SessionRegistry::deliver`]. A [`SessionHandle`] owns
//! the receiving end and unregisters the session when dropped, so a session
//! is released on every exit path of the interview task.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use uuid::Uuid;

use vox_types::error::SessionError;

/// Answers buffered per session. A second message arriving before the
/// interview reads the first is dropped.
const ANSWER_BUFFER: usize = 1;

struct Entry {
    token: Uuid,
    answers: mpsc::Sender<String>,
}

/// What happened to an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the respondent's running interview.
    Delivered,
    /// The respondent has no interview in progress.
    NoSession,
    /// An earlier answer is still waiting to be read; this one was discarded.
    Dropped,
}

#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<String, Entry>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session for `respondent_id`, failing if one is already active.
    ///
    /// The check and the insert happen under one lock, so two concurrent
    /// starts for the same respondent cannot both succeed.
    pub fn start_session(&self, respondent_id: &str) -> Result<SessionHandle, SessionError> {
        let mut sessions = self.lock();
        if sessions.contains_key(respondent_id) {
            return Err(SessionError::AlreadyActive(respondent_id.to_string()));
        }

        let (tx, rx) = mpsc::channel(ANSWER_BUFFER);
        let token = Uuid::now_v7();
        sessions.insert(
            respondent_id.to_string(),
            Entry {
                token,
                answers: tx,
            },
        );
        tracing::debug!(respondent_id, "chat session started");

        Ok(SessionHandle {
            respondent_id: respondent_id.to_string(),
            token,
            answers: rx,
            sessions: Arc::clone(&self.sessions),
        })
    }

    /// Route an inbound message to the respondent's interview. Never blocks.
    pub fn deliver(&self, respondent_id: &str, text: &str) -> Delivery {
        let sessions = self.lock();
        let Some(entry) = sessions.get(respondent_id) else {
            return Delivery::NoSession;
        };
        match entry.answers.try_send(text.to_string()) {
            Ok(()) => Delivery::Delivered,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::debug!(respondent_id, "answer dropped, previous one not yet read");
                Delivery::Dropped
            }
            // The interview task is gone but its handle has not dropped yet.
            Err(mpsc::error::TrySendError::Closed(_)) => Delivery::NoSession,
        }
    }

    /// Forget the respondent's session. Its pending `next_answer` call ends
    /// with `None`. Returns whether a session was removed.
    pub fn end_session(&self, respondent_id: &str) -> bool {
        self.lock().remove(respondent_id).is_some()
    }

    pub fn is_active(&self, respondent_id: &str) -> bool {
        self.lock().contains_key(respondent_id)
    }

    #[cfg(test)]
    pub(crate) fn active_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        // Every critical section is a single map operation, so a poisoned
        // map is still consistent.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Receiving end of one respondent's session.
pub struct SessionHandle {
    respondent_id: String,
    token: Uuid,
    answers: mpsc::Receiver<String>,
    sessions: Arc<Mutex<HashMap<String, Entry>>>,
}

impl SessionHandle {
    pub fn respondent_id(&self) -> &str {
        &self.respondent_id
    }

    /// Wait for the next answer. `None` once the session has been ended.
    pub async fn next_answer(&mut self) -> Option<String> {
        self.answers.recv().await
    }

    /// Throw away answers that arrived while no question was outstanding.
    /// Returns how many were discarded.
    pub fn discard_stale(&mut self) -> usize {
        let mut discarded = 0;
        while let Ok(text) = self.answers.try_recv() {
            tracing::debug!(
                respondent_id = %self.respondent_id,
                answer = %text,
                "discarding message sent before the current question"
            );
            discarded += 1;
        }
        discarded
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        // Only remove our own entry; a newer session for the same respondent
        // may have replaced it after an explicit end_session.
        if sessions
            .get(&self.respondent_id)
            .is_some_and(|e| e.token == self.token)
        {
            sessions.remove(&self.respondent_id);
            tracing::debug!(respondent_id = %self.respondent_id, "chat session released");
        }
    }
}
