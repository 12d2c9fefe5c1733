use std::collections::BTreeMap;
use std::fmt;

use http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Field name to the list of messages reported for it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Keys of an error body that carry a message rather than a field error.
const MESSAGE_KEYS: [&str; 4] = ["error", "detail", "message", "code"];

/// The body of a failed response, kept exactly as the server sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPayload {
    raw: String,
}

#[derive(Deserialize, Default)]
struct MessageBody {
    error: Option<String>,
    detail: Option<String>,
    message: Option<String>,
    errors: Option<BTreeMap<String, FieldMessages>>,
    non_field_errors: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldMessages {
    Many(Vec<String>),
    One(String),
}

impl FieldMessages {
    fn into_vec(self) -> Vec<String> {
        match self {
            FieldMessages::Many(messages) => messages,
            FieldMessages::One(message) => vec![message],
        }
    }
}

impl ErrorPayload {
    /// Wraps a raw response body.
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The body as received.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    fn body(&self) -> MessageBody {
        sonic_rs::from_str(&self.raw).unwrap_or_default()
    }

    /// The human readable message, looked up in `error`, `detail`, `message`
    /// and finally the first `non_field_errors` entry.
    pub fn message(&self) -> Option<String> {
        let body = self.body();
        body.error
            .or(body.detail)
            .or(body.message)
            .or_else(|| body.non_field_errors.and_then(|m| m.into_iter().next()))
    }

    /// Per-field messages, either from an `errors` object or from a
    /// top-level field map as produced by form serializers.
    pub fn field_errors(&self) -> FieldErrors {
        if let Some(errors) = self.body().errors {
            return errors
                .into_iter()
                .map(|(field, messages)| (field, messages.into_vec()))
                .collect();
        }

        sonic_rs::from_str::<BTreeMap<String, FieldMessages>>(&self.raw)
            .map(|fields| {
                fields
                    .into_iter()
                    .filter(|(field, _)| !MESSAGE_KEYS.contains(&field.as_str()))
                    .map(|(field, messages)| (field, messages.into_vec()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The HTTP status of the response.
    pub status: StatusCode,
    /// The response body.
    pub payload: ErrorPayload,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.payload.message() {
            Some(message) => write!(f, "{} {}", self.status.as_u16(), message),
            None if self.payload.raw().is_empty() => write!(f, "{}", self.status),
            None => write!(f, "{} {}", self.status.as_u16(), self.payload.raw()),
        }
    }
}

/// The client's error type.
#[derive(Error, Debug)]
pub enum ClientError {
    /// No HTTP response was received.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server rejected the credentials and they could not be refreshed.
    #[error("Unauthorized: {0}")]
    Unauthorized(ApiError),

    /// The server rejected the payload with field-level errors.
    #[error("Validation failed: {0}")]
    Validation(ApiError),

    /// Any other 4xx response.
    #[error("API error: {0}")]
    Api(ApiError),

    /// A 5xx response.
    #[error("Server error ({})", .0.status)]
    Server(ApiError),

    /// The input was rejected locally before any request was sent.
    #[error("Invalid input: {}", summarize(.0))]
    InvalidInput(FieldErrors),

    /// The session store could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// A JSON body could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] sonic_rs::Error),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// A `Result` type that uses `ClientError` as the error type.
pub type Result<T> = std::result::Result<T, ClientError>;

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ClientError {
    /// Classifies a non-2xx response.
    pub fn from_response(status: StatusCode, body: String) -> Self {
        let error = ApiError {
            status,
            payload: ErrorPayload::new(body),
        };

        if status == StatusCode::UNAUTHORIZED {
            tracing::debug!("Unauthorized response: {}", error);
            ClientError::Unauthorized(error)
        } else if status.is_server_error() {
            tracing::error!("Server error: {}", error);
            ClientError::Server(error)
        } else if matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY
        ) && !error.payload.field_errors().is_empty()
        {
            tracing::debug!("Validation error: {}", error);
            ClientError::Validation(error)
        } else {
            tracing::debug!("API error: {}", error);
            ClientError::Api(error)
        }
    }

    /// The response this error was built from, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ClientError::Unauthorized(e)
            | ClientError::Validation(e)
            | ClientError::Api(e)
            | ClientError::Server(e) => Some(e),
            _ => None,
        }
    }

    /// The HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        self.api_error().map(|e| e.status)
    }

    /// The server-provided message, if any. Server errors stay opaque.
    pub fn message(&self) -> Option<String> {
        match self {
            ClientError::Server(_) => None,
            other => other.api_error().and_then(|e| e.payload.message()),
        }
    }

    /// Per-field messages from either local or server-side validation.
    pub fn field_errors(&self) -> FieldErrors {
        match self {
            ClientError::InvalidInput(errors) => errors.clone(),
            ClientError::Server(_) => FieldErrors::new(),
            other => other
                .api_error()
                .map(|e| e.payload.field_errors())
                .unwrap_or_default(),
        }
    }

    /// Whether this is a 401 that survived the refresh attempt.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }

    /// Whether the server answered 403.
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(StatusCode::FORBIDDEN)
    }

    /// Whether the server answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}
