use std::sync::Arc;

use http::header::{ACCEPT, CONTENT_TYPE};
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use zeroize::Zeroizing;

use crate::config::{normalize_base_url, Config};
use crate::error::{ClientError, Result};
use crate::models::session::{RefreshRequest, RefreshResponse};
use crate::store::SessionStore;

/// The endpoint that exchanges a refresh token for a new access token.
pub const REFRESH_PATH: &str = "/auth/refresh/";

/// Which try of a request is in flight. A request is retried at most once,
/// after a successful token refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    First,
    Retried,
}

/// A request to the tracking API, relative to the client's base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(&'static str, String)>,
    body: Option<String>,
}

impl ApiRequest {
    /// Creates a new `ApiRequest`. `path` starts with `/`.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// A `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Attaches a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(sonic_rs::to_string(body)?);
        Ok(self)
    }

    /// Appends query parameters.
    pub fn query(mut self, pairs: impl IntoIterator<Item = (&'static str, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The path relative to the base URL.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// HTTP client for the baggage tracking API.
///
/// Attaches the stored access token to every call and, on a `401`, trades
/// the stored refresh token for a new access token and retries the call
/// once. The session store is read on every attempt.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    store: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// Creates a new `ApiClient`.
    ///
    /// # Arguments
    ///
    /// * `config` - The client configuration.
    /// * `store` - Where the session is read from and written to.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `ApiClient`.
    pub fn new(config: &Config, store: Arc<dyn SessionStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self::with_http(&config.api_url, http, store))
    }

    /// Creates a new `ApiClient` around an existing `reqwest::Client`.
    pub fn with_http(base_url: &str, http: reqwest::Client, store: Arc<dyn SessionStore>) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            http,
            store,
        }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The injected session store.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Issues `method path` with an optional JSON body and decodes the
    /// response.
    pub async fn request<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = ApiRequest::new(method, path);
        if let Some(body) = body {
            request = request.json(body)?;
        }
        self.send(&request).await
    }

    /// Sends `request`, refreshing the access token and retrying once if
    /// the server answers `401`.
    ///
    /// # Returns
    ///
    /// The decoded 2xx body, or the failure of the last attempt. When the
    /// refresh itself fails the store is cleared and the original `401` is
    /// returned.
    pub async fn send<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let mut attempt = Attempt::First;

        loop {
            let session = self.store.session()?;
            let access = session.as_ref().map(|s| s.access.as_str());

            tracing::debug!(
                "➡️ {} {} (attempt: {:?}, authenticated: {})",
                request.method,
                request.path,
                attempt,
                access.is_some()
            );

            let response = self.dispatch(request, access).await?;
            let status = response.status();
            let body = response.text().await?;

            if status.is_success() {
                tracing::debug!("✅ {} {} -> {}", request.method, request.path, status);
                return decode(&body);
            }

            let error = ClientError::from_response(status, body);
            if status != StatusCode::UNAUTHORIZED || attempt == Attempt::Retried {
                return Err(error);
            }

            let Some(refresh) = self
                .store
                .session()?
                .map(|s| Zeroizing::new(s.refresh.clone()))
            else {
                tracing::debug!("No refresh token stored, not retrying {}", request.path);
                return Err(error);
            };

            match self.refresh_access_token(&refresh).await {
                Ok(new_access) => {
                    if !self.store.replace_access_token(&new_access)? {
                        tracing::warn!("⚠️ Session disappeared during refresh");
                        return Err(error);
                    }
                    tracing::info!(
                        "🔄 Access token refreshed, retrying {} {}",
                        request.method,
                        request.path
                    );
                    attempt = Attempt::Retried;
                }
                Err(refresh_error) => {
                    tracing::warn!("❌ Token refresh failed, signing out: {}", refresh_error);
                    self.store.clear()?;
                    return Err(error);
                }
            }
        }
    }

    /// Exchanges `refresh` for a new access token. Sent without a bearer
    /// header and never retried.
    pub async fn refresh_access_token(&self, refresh: &str) -> Result<Zeroizing<String>> {
        let request = ApiRequest::post(REFRESH_PATH).json(&RefreshRequest { refresh })?;
        let response = self.dispatch(&request, None).await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::from_response(status, body));
        }

        let refreshed: RefreshResponse = decode(&body)?;
        Ok(Zeroizing::new(refreshed.access.clone()))
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        access: Option<&str>,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .header(ACCEPT, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(token) = access {
            builder = builder.bearer_auth(token);
        }

        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        builder.send().await.map_err(|e| {
            tracing::error!("❌ {} {} failed: {}", request.method, request.path, e);
            ClientError::Transport(e)
        })
    }
}

/// Decodes a JSON body; an empty body decodes as `null`.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    let body = if body.trim().is_empty() { "null" } else { body };
    Ok(sonic_rs::from_str(body)?)
}
