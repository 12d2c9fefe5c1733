use http::Method;

use crate::api::client::ApiClient;
use crate::error::Result;
use crate::models::dashboard::MessageResponse;
use crate::models::session::RefreshRequest;
use crate::models::user::{AuthResponse, LoginCredentials, RegisterData, User, UserEnvelope};

impl ApiClient {
    /// Authenticates a passenger. `POST /auth/login/`
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse> {
        self.request(Method::POST, "/auth/login/", Some(credentials))
            .await
    }

    /// Authenticates a staff member; the server rejects non-staff accounts
    /// with `403`. `POST /auth/staff-login/`
    pub async fn staff_login(&self, credentials: &LoginCredentials) -> Result<AuthResponse> {
        self.request(Method::POST, "/auth/staff-login/", Some(credentials))
            .await
    }

    /// Creates an account. `POST /auth/register/`
    pub async fn register(&self, data: &RegisterData) -> Result<AuthResponse> {
        self.request(Method::POST, "/auth/register/", Some(data))
            .await
    }

    /// Invalidates `refresh` on the server. `POST /auth/logout/`
    pub async fn logout(&self, refresh: &str) -> Result<MessageResponse> {
        self.request(Method::POST, "/auth/logout/", Some(&RefreshRequest { refresh }))
            .await
    }

    /// Fetches the signed-in user. `GET /auth/user/`
    pub async fn current_user(&self) -> Result<User> {
        let envelope: UserEnvelope = self
            .request::<(), _>(Method::GET, "/auth/user/", None)
            .await?;
        Ok(envelope.user)
    }
}
