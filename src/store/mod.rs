//! Persistence of the session tokens and the cached user.
//!
//! The two values live under the keys `auth_tokens` and `user`. They are
//! written together and cleared together; a snapshot holding only one of
//! them is read back as no session at all.

pub mod file;
pub mod memory;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::session::Session;
use crate::models::user::User;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Everything a store persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_tokens: Option<Session>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl StoredSession {
    /// Both keys set, or both absent.
    pub fn is_consistent(&self) -> bool {
        self.auth_tokens.is_some() == self.user.is_some()
    }
}

/// Storage for the signed-in session, injected into the API client.
///
/// Implementors provide the two primitives; the provided methods keep the
/// tokens and the cached user in step. Reads happen on every call, nothing
/// is cached in memory by the callers.
pub trait SessionStore: Send + Sync {
    /// Reads the raw snapshot.
    fn load(&self) -> Result<StoredSession>;

    /// Replaces the snapshot in a single step.
    fn persist(&self, state: &StoredSession) -> Result<()>;

    /// The snapshot, with half-written states read as empty.
    fn current(&self) -> Result<StoredSession> {
        let state = self.load()?;
        if state.is_consistent() {
            Ok(state)
        } else {
            tracing::warn!("⚠️ Stored session is missing tokens or user, ignoring it");
            Ok(StoredSession::default())
        }
    }

    /// The stored tokens, if signed in.
    fn session(&self) -> Result<Option<Session>> {
        Ok(self.current()?.auth_tokens)
    }

    /// The cached user, if signed in.
    fn user(&self) -> Result<Option<User>> {
        Ok(self.current()?.user)
    }

    /// Whether a session is stored.
    fn is_authenticated(&self) -> Result<bool> {
        Ok(self.current()?.auth_tokens.is_some())
    }

    /// Stores a new session and its user together.
    fn save(&self, session: &Session, user: &User) -> Result<()> {
        self.persist(&StoredSession {
            auth_tokens: Some(session.clone()),
            user: Some(user.clone()),
        })?;
        tracing::info!("✅ Session stored for user: {}", user.username);
        Ok(())
    }

    /// Replaces the cached user. Returns `false` when no session exists.
    fn update_user(&self, user: &User) -> Result<bool> {
        let mut state = self.current()?;
        if state.auth_tokens.is_none() {
            return Ok(false);
        }

        state.user = Some(user.clone());
        self.persist(&state)?;
        tracing::debug!("Cached user refreshed: {}", user.username);
        Ok(true)
    }

    /// Swaps in a new access token, keeping the refresh token and the user.
    /// Returns `false` when no session exists.
    fn replace_access_token(&self, access: &str) -> Result<bool> {
        let mut state = self.current()?;
        let Some(session) = state.auth_tokens.as_ref() else {
            return Ok(false);
        };

        state.auth_tokens = Some(session.with_access(access));
        self.persist(&state)?;
        tracing::debug!("🔑 Access token replaced");
        Ok(true)
    }

    /// Removes the tokens and the cached user.
    fn clear(&self) -> Result<()> {
        self.persist(&StoredSession::default())?;
        tracing::info!("👋 Session cleared");
        Ok(())
    }
}
