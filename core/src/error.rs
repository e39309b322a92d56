//! Error taxonomy for the SEER*API client core.
//!
//! # Design
//! Local validation failures (`InvalidKey`) are kept apart from remote
//! failures: they never need a round trip and are deterministic given the
//! inputs alone. Remote failures are produced by [`classify`], a pure
//! function of the status code and the optional `{code, message}` body.
//! Nothing in this crate retries; every failure reaches the caller.

use serde::Deserialize;
use thiserror::Error;

/// Coarse category of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    BadRequest,
    NotFound,
    Auth,
    Server,
    Transport,
}

/// Errors returned by `SeerClient` build and parse methods.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// An input key is not accepted by the lookup's allowed-key set.
    #[error("invalid input key `{key}`")]
    InvalidKey { key: String },

    /// 400 or another unlisted 4xx.
    #[error("bad request (HTTP {status}): {message}")]
    BadRequest { status: u16, message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    /// 401 or 403.
    #[error("unauthorized (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// No usable response: connection failure, timeout, or a status the
    /// service never sends for errors.
    #[error("transport failure{}: {message}", fmt_status(.status))]
    Transport { status: Option<u16>, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

fn fmt_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl ApiError {
    /// A host-side failure with no response at all.
    pub fn transport(message: impl Into<String>) -> Self {
        ApiError::Transport {
            status: None,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::InvalidKey { .. } | ApiError::Serialization(_) => ErrorKind::Validation,
            ApiError::BadRequest { .. } => ErrorKind::BadRequest,
            ApiError::NotFound { .. } => ErrorKind::NotFound,
            ApiError::Unauthorized { .. } => ErrorKind::Auth,
            ApiError::Server { .. } => ErrorKind::Server,
            ApiError::Transport { .. } | ApiError::Deserialization(_) => ErrorKind::Transport,
        }
    }

    /// Whether a caller may reasonably try the same request again.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Server | ErrorKind::Transport)
    }

    /// The HTTP status that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::BadRequest { status, .. }
            | ApiError::Unauthorized { status, .. }
            | ApiError::Server { status, .. } => Some(*status),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

/// Structured error body sent by the service.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    pub message: String,
}

impl ErrorBody {
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }
}

/// Map a failed call to exactly one [`ApiError`].
///
/// `status` is `None` when no response was received. The body's `message`
/// is kept verbatim when it parses as an [`ErrorBody`]; otherwise the raw
/// body, and failing that the reason phrase, becomes the message.
pub fn classify(status: Option<u16>, body: Option<&str>) -> ApiError {
    let Some(status) = status else {
        let message = body
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or("no response received");
        return ApiError::transport(message);
    };

    let message = body
        .and_then(|b| ErrorBody::parse(b).map(|e| e.message).or_else(|| raw_message(b)))
        .unwrap_or_else(|| reason_phrase(status).to_string());

    match status {
        401 | 403 => ApiError::Unauthorized { status, message },
        404 => ApiError::NotFound { message },
        400..=499 => ApiError::BadRequest { status, message },
        500..=599 => ApiError::Server { status, message },
        _ => ApiError::Transport {
            status: Some(status),
            message,
        },
    }
}

fn raw_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        400..=499 => "Client Error",
        500..=599 => "Server Error",
        _ => "Unexpected Status",
    }
}
