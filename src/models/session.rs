use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The token pair issued by the server on login, registration and staff login.
///
/// Serialized with the server's field names (`access`, `refresh`), which is
/// also the layout persisted under the `auth_tokens` key.
/// Both tokens are wiped from memory when the value is dropped.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Session {
    /// The short-lived access token sent as a bearer credential.
    pub access: String,
    /// The long-lived token used to obtain a new access token.
    pub refresh: String,
}

impl Session {
    /// Creates a new `Session`.
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }

    /// Returns a copy of this session carrying a new access token.
    pub fn with_access(&self, access: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: self.refresh.clone(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}

/// The body of `POST /auth/refresh/`.
#[derive(Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// The response of `POST /auth/refresh/`.
#[derive(Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct RefreshResponse {
    pub access: String,
}
