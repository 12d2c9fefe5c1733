use crate::api::ApiClient;
use crate::error::Result;
use crate::models::user::{AuthResponse, LoginCredentials, RegisterData, User};
use crate::validation::auth::{validate_login, validate_registration};

/// Stores the tokens and user of a successful authentication together.
fn store_authentication(client: &ApiClient, response: &AuthResponse) -> Result<User> {
    client.store().save(&response.tokens, &response.user)?;
    Ok(response.user.clone())
}

/// Signs a passenger in and persists the session.
///
/// # Arguments
///
/// * `client` - The API client.
/// * `credentials` - The username and password.
///
/// # Returns
///
/// A `Result` containing the signed-in `User`.
pub async fn login(client: &ApiClient, credentials: &LoginCredentials) -> Result<User> {
    validate_login(credentials)?;
    tracing::debug!("🔐 Login attempt: {}", credentials.username);

    let response = client.login(credentials).await?;
    let user = store_authentication(client, &response)?;

    tracing::info!("✅ User logged in: {}", user.username);
    Ok(user)
}

/// Signs a staff member in and persists the session.
///
/// # Arguments
///
/// * `client` - The API client.
/// * `credentials` - The username and password.
///
/// # Returns
///
/// A `Result` containing the signed-in `User`. Accounts without staff
/// privileges fail with the server's `403`.
pub async fn staff_login(client: &ApiClient, credentials: &LoginCredentials) -> Result<User> {
    validate_login(credentials)?;
    tracing::debug!("🔐 Staff login attempt: {}", credentials.username);

    let response = client.staff_login(credentials).await?;
    let user = store_authentication(client, &response)?;

    tracing::info!("✅ Staff member logged in: {} ({})", user.username, user.role);
    Ok(user)
}

/// Registers a new account and signs it in.
///
/// The form is validated locally first; an invalid form fails with
/// `ClientError::InvalidInput` and nothing is sent.
///
/// # Arguments
///
/// * `client` - The API client.
/// * `data` - The registration form.
///
/// # Returns
///
/// A `Result` containing the new `User`.
pub async fn register(client: &ApiClient, data: &RegisterData) -> Result<User> {
    validate_registration(data)?;
    tracing::info!("📝 Register attempt: {}", data.username);

    let response = client.register(data).await?;
    let user = store_authentication(client, &response)?;

    tracing::info!("✅ User registered: {}", user.username);
    Ok(user)
}

/// Signs out. The refresh token is invalidated on the server when possible;
/// the local session is cleared regardless of the outcome.
pub async fn logout(client: &ApiClient) -> Result<()> {
    if let Some(session) = client.store().session()? {
        match client.logout(&session.refresh).await {
            Ok(_) => tracing::debug!("Refresh token invalidated on server"),
            Err(e) => tracing::warn!("⚠️ Server logout failed, clearing local session anyway: {}", e),
        }
    }

    client.store().clear()?;
    tracing::info!("✅ User logged out");
    Ok(())
}

/// Checks a stored session against the server on startup.
///
/// # Returns
///
/// The current user when the stored session is still accepted, `None` when
/// nothing was stored or the session was rejected (it is then cleared).
pub async fn restore_session(client: &ApiClient) -> Result<Option<User>> {
    if !client.store().is_authenticated()? {
        return Ok(None);
    }

    match client.current_user().await {
        Ok(user) => {
            client.store().update_user(&user)?;
            tracing::info!("✅ Session restored for user: {}", user.username);
            Ok(Some(user))
        }
        Err(e) => {
            tracing::warn!("❌ Stored session rejected: {}", e);
            client.store().clear()?;
            Ok(None)
        }
    }
}

/// Refreshes the cached user when signed in. Failures are logged and the
/// cached copy is kept.
pub async fn refresh_user_info(client: &ApiClient) -> Result<Option<User>> {
    if !client.store().is_authenticated()? {
        return Ok(None);
    }

    match client.current_user().await {
        Ok(user) => {
            client.store().update_user(&user)?;
            Ok(Some(user))
        }
        Err(e) => {
            tracing::warn!("⚠️ Failed to refresh user info: {}", e);
            client.store().user()
        }
    }
}
