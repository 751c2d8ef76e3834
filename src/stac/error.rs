//! STAC client error types.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Result type for STAC client operations.
pub type StacResult<T> = Result<T, StacError>;

/// A failed STAC API operation.
///
/// Carries the operation it belongs to (e.g. `Failed to get collection x`)
/// and what went wrong. Displays as `<context>: <kind>`.
#[derive(Debug, Error)]
#[error("{context}: {kind}")]
pub struct StacError {
    context: String,
    #[source]
    kind: StacErrorKind,
}

impl StacError {
    pub fn new(context: impl Into<String>, kind: StacErrorKind) -> Self {
        Self {
            context: context.into(),
            kind,
        }
    }

    pub fn kind(&self) -> &StacErrorKind {
        &self.kind
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// Whether the API answered 404 for the requested resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, StacErrorKind::Api { code, .. } if code == StatusCode::NOT_FOUND.as_u16())
    }
}

/// Classification of STAC client failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StacErrorKind {
    /// The API answered with a non-success status.
    #[error("STAC API Error {code}: {description}")]
    Api { code: u16, description: String },

    /// The request was sent but no response arrived.
    #[error("Network error: Unable to connect to STAC API at {base_url}")]
    Network { base_url: String },

    /// The request could not be built.
    #[error("Request error: {message}")]
    Request { message: String },

    /// The API answered successfully with a body that is not the expected document.
    #[error("Invalid response from STAC API: {message}")]
    Decode { message: String },
}

/// Error bodies STAC servers commonly return.
///
/// FastAPI-based servers use `detail`, stac-server style APIs use `description`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
    description: Option<String>,
}

impl StacErrorKind {
    /// Build an API error from a response status and body.
    pub fn api(status: StatusCode, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(body).ok();
        let description = parsed
            .and_then(|b| {
                let detail = b.detail.and_then(|d| match d {
                    serde_json::Value::String(s) => Some(s),
                    serde_json::Value::Null => None,
                    other => Some(other.to_string()),
                });
                detail.or(b.description)
            })
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));

        Self::Api {
            code: status.as_u16(),
            description,
        }
    }

    pub fn network(base_url: impl Into<String>) -> Self {
        Self::Network {
            base_url: base_url.into(),
        }
    }

    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}
