//! Conversation history.
//!
//! An append-only sequence of turns owned by the orchestrator for the
//! lifetime of the process. One shared instance is the default; a caller
//! with its own session concept can supply an instance per session.

use std::sync::{Mutex, MutexGuard};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// Append-only, thread-safe conversation log.
#[derive(Debug, Default)]
pub struct ConversationHistory {
    turns: Mutex<Vec<Turn>>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completed exchange.
    ///
    /// Both turns land under a single lock: concurrent requests can
    /// never interleave within a pair, and a request that failed before
    /// producing an answer appends nothing.
    pub fn append_exchange(&self, query: &str, answer: &str) {
        let mut turns = self.lock();
        turns.push(Turn {
            role: Role::User,
            text: query.to_string(),
        });
        turns.push(Turn {
            role: Role::Assistant,
            text: answer.to_string(),
        });
    }

    /// Clone the current turns in order.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Turn>> {
        // Appends are atomic pairs, so the data is valid even if another
        // thread panicked while holding the lock
        self.turns.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_append_and_snapshot() {
        let history = ConversationHistory::new();
        assert!(history.is_empty());

        history.append_exchange("When is check-in?", "Check-in is at 3pm.");

        let turns = history.snapshot();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].text, "When is check-in?");
        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[1].text, "Check-in is at 3pm.");
    }

    #[test]
    fn test_concurrent_appends_never_interleave() {
        let history = Arc::new(ConversationHistory::new());
        let mut handles = Vec::new();

        for i in 0..16 {
            let history = Arc::clone(&history);
            handles.push(std::thread::spawn(move || {
                history.append_exchange(&format!("question {}", i), &format!("answer {}", i));
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let turns = history.snapshot();
        assert_eq!(turns.len(), 32);
        for pair in turns.chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(pair[1].role, Role::Assistant);
            // Each answer sits directly after its own question
            let question_id = pair[0].text.trim_start_matches("question ");
            assert_eq!(pair[1].text, format!("answer {}", question_id));
        }
    }
}
