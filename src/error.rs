//! Error types at the boundary between cluesmith and the generative service.
//!
//! `ProviderError` carries the technical failure of a single call and is only
//! ever logged. `ClueError` is what callers see: a classification plus a
//! one-line message that is safe to show to a user.

use thiserror::Error;

use crate::retry::classify::{
    self, BUSY_MESSAGE, FORMAT_MESSAGE, NETWORK_MESSAGE, SAFETY_MESSAGE,
};
use crate::retry::{Classification, RetryableError};

/// Technical failure of one call to the generative service.
///
/// Each variant is classified by what it is, not by its text. Only a
/// `Rejected` payload goes through the substring table. Rate limits are read
/// from the HTTP status or the provider's status token, never the free-form
/// body.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("AI service error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("failed to fetch: {0}")]
    Network(String),

    #[error("candidate was blocked: {0}")]
    Blocked(String),

    #[error("invalid json: {0}")]
    InvalidJson(String),

    #[error("unexpected format: {0}")]
    UnexpectedFormat(String),

    /// A structured error payload that is not an error type of its own.
    #[error("{}", describe_payload(.0))]
    Rejected(serde_json::Value),
}

impl ProviderError {
    /// The provider's status token (`RESOURCE_EXHAUSTED`, `UNAVAILABLE`, ...)
    /// from a Google-style error body, if the body carries one.
    pub fn provider_status(&self) -> Option<String> {
        let ProviderError::Http { body, .. } = self else {
            return None;
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        // Some endpoints wrap the error object in a one-element array
        let value = match value {
            serde_json::Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
            other => other,
        };
        value["error"]["status"].as_str().map(str::to_string)
    }

    fn is_rate_limited(&self) -> bool {
        match self {
            ProviderError::Http { status, .. } => {
                *status == 429
                    || self
                        .provider_status()
                        .is_some_and(|s| s.eq_ignore_ascii_case("resource_exhausted"))
            }
            _ => false,
        }
    }
}

impl RetryableError for ProviderError {
    fn classification(&self) -> Classification {
        match self {
            ProviderError::Http { status, .. } => {
                if self.is_rate_limited() {
                    Classification::RateLimited
                } else if (500..=599).contains(status) {
                    Classification::Transient
                } else {
                    Classification::Permanent
                }
            }
            ProviderError::Network(_) => Classification::Transient,
            ProviderError::Blocked(_)
            | ProviderError::InvalidJson(_)
            | ProviderError::UnexpectedFormat(_) => Classification::Permanent,
            ProviderError::Rejected(_) => classify::classify(&self.to_string()),
        }
    }

    fn user_message(&self) -> &'static str {
        match self {
            ProviderError::Http { body, .. } if self.is_rate_limited() => {
                // The body still decides between "quota" and plain "busy"
                classify::matching_rule(body)
                    .map(|rule| rule.message)
                    .unwrap_or(BUSY_MESSAGE)
            }
            ProviderError::Http { .. } => classify::message_without_rate_limit(&self.to_string()),
            ProviderError::Network(_) => NETWORK_MESSAGE,
            ProviderError::Blocked(_) => SAFETY_MESSAGE,
            ProviderError::InvalidJson(_) | ProviderError::UnexpectedFormat(_) => FORMAT_MESSAGE,
            ProviderError::Rejected(_) => classify::user_message(&self.to_string()),
        }
    }
}

/// Render a structured payload for classification, JSON first.
pub fn describe_payload(value: &serde_json::Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{:?}", value))
}

/// Normalized error returned to callers of cluesmith operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClueError {
    #[error("{message}")]
    Service {
        classification: Classification,
        message: String,
        attempts: u32,
    },

    #[error("{0}")]
    InvalidInput(String),
}

impl ClueError {
    pub fn service(classification: Classification, message: impl Into<String>) -> Self {
        Self::Service {
            classification,
            message: message.into(),
            attempts: 1,
        }
    }

    /// Classification of the failure; input errors are permanent.
    pub fn classification(&self) -> Classification {
        match self {
            Self::Service { classification, .. } => *classification,
            Self::InvalidInput(_) => Classification::Permanent,
        }
    }

    /// Number of calls made before giving up (0 when input was rejected).
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Service { attempts, .. } => *attempts,
            Self::InvalidInput(_) => 0,
        }
    }
}
