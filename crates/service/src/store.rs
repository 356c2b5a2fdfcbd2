//! The per-task ownership-token store. Kept behind a trait so a networked
//! store is a drop-in later; the in-memory implementation carries no
//! durability requirement.

use crate::task::TaskId;
use std::collections::HashMap;
use std::sync::Mutex;
use subtle::ConstantTimeEq;

pub trait TokenStore: Send + Sync {
    fn put(&self, id: TaskId, token: String);
    /// `None` if the task is unknown; `Some(true)` iff `token` matches the
    /// one recorded at submission, compared in constant time.
    fn check(&self, id: TaskId, token: &str) -> Option<bool>;
}

#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: Mutex<HashMap<TaskId, String>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn put(&self, id: TaskId, token: String) {
        self.tokens.lock().expect("token store mutex poisoned").insert(id, token);
    }

    fn check(&self, id: TaskId, token: &str) -> Option<bool> {
        let tokens = self.tokens.lock().expect("token store mutex poisoned");
        let recorded = tokens.get(&id)?;
        Some(bool::from(recorded.as_bytes().ct_eq(token.as_bytes())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_task_has_no_token() {
        let store = InMemoryTokenStore::new();
        assert_eq!(store.check(1, "anything"), None);
    }

    #[test]
    fn matching_token_passes() {
        let store = InMemoryTokenStore::new();
        store.put(1, "secret".to_string());
        assert_eq!(store.check(1, "secret"), Some(true));
        assert_eq!(store.check(1, "wrong"), Some(false));
    }
}
