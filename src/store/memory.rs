use std::sync::{Mutex, PoisonError};

use crate::error::Result;
use crate::store::{SessionStore, StoredSession};

/// A session store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<StoredSession>,
}

impl MemoryStore {
    /// Creates an empty `MemoryStore`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `MemoryStore` holding `state`.
    pub fn with_state(state: StoredSession) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<StoredSession> {
        Ok(self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn persist(&self, state: &StoredSession) -> Result<()> {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state.clone();
        Ok(())
    }
}
