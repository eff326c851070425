//! Ordered classification of raw failure text.
//!
//! Rules are evaluated top to bottom against the lower-cased text and the
//! first match wins, so a message mentioning both "quota" and "rate limit"
//! always resolves to the quota rule.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// HTTP 429 or a provider "resource exhausted" marker. Retried.
    RateLimited,
    /// Network and 5xx failures. Retried only when the policy opts in.
    Transient,
    /// Everything retrying with identical input will not fix.
    Permanent,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::RateLimited => "rate_limited",
            Classification::Transient => "transient",
            Classification::Permanent => "permanent",
        }
    }
}

/// One row of the classification table.
#[derive(Debug)]
pub struct Rule {
    pub needles: &'static [&'static str],
    /// Classification used when the text carries no rate-limit marker.
    pub classification: Classification,
    pub message: &'static str,
}

impl Rule {
    fn matches(&self, lowered: &str) -> bool {
        self.needles.iter().any(|needle| lowered.contains(needle))
    }
}

pub const RATE_LIMIT_MARKERS: &[&str] = &["429", "resource_exhausted"];

pub const BUSY_MESSAGE: &str = "The AI service is currently busy due to high demand. Please try again in a few moments. If the problem persists, check your API plan and billing details.";
pub const SAFETY_MESSAGE: &str =
    "The request was blocked for safety reasons. Please try a different answer or definition.";
pub const NETWORK_MESSAGE: &str =
    "Could not reach the AI service. Please check your network connection and try again.";
pub const FORMAT_MESSAGE: &str = "The AI service returned an unexpected response format.";

pub const FALLBACK_MESSAGE: &str =
    "An unexpected error occurred while communicating with the AI service. Please try again.";

pub static RULES: &[Rule] = &[
    Rule {
        needles: &["api key", "api_key_invalid", "permission_denied"],
        classification: Classification::Permanent,
        message: "The API key is invalid or missing. Please check your configuration.",
    },
    Rule {
        needles: &["quota"],
        classification: Classification::Permanent,
        message: "You have exceeded your API quota. Please check your plan and billing details.",
    },
    Rule {
        needles: &["rate limit", "too many requests", "429", "resource_exhausted"],
        classification: Classification::Transient,
        message: BUSY_MESSAGE,
    },
    Rule {
        needles: &["candidate was blocked", "safety", "blocked"],
        classification: Classification::Permanent,
        message: SAFETY_MESSAGE,
    },
    Rule {
        needles: &["failed to fetch", "network", "connection", "timed out"],
        classification: Classification::Transient,
        message: NETWORK_MESSAGE,
    },
    Rule {
        needles: &[
            "server error",
            "internal error",
            "500:",
            "502",
            "503",
            "504",
            "unavailable",
            "overloaded",
        ],
        classification: Classification::Transient,
        message: "The AI service is temporarily unavailable. Please try again later.",
    },
    Rule {
        needles: &["invalid json", "unexpected format"],
        classification: Classification::Permanent,
        message: FORMAT_MESSAGE,
    },
];

/// True when the text carries an HTTP 429 or "resource exhausted" marker.
pub fn is_rate_limited(raw: &str) -> bool {
    let lowered = raw.to_lowercase();
    RATE_LIMIT_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// First rule matching the text, if any.
pub fn matching_rule(raw: &str) -> Option<&'static Rule> {
    let lowered = raw.to_lowercase();
    RULES.iter().find(|rule| rule.matches(&lowered))
}

pub fn classify(raw: &str) -> Classification {
    if is_rate_limited(raw) {
        return Classification::RateLimited;
    }
    matching_rule(raw)
        .map(|rule| rule.classification)
        .unwrap_or(Classification::Permanent)
}

/// User-presentable message for a raw failure text.
pub fn user_message(raw: &str) -> &'static str {
    matching_rule(raw)
        .map(|rule| rule.message)
        .unwrap_or(FALLBACK_MESSAGE)
}

/// Message for a failure already known not to be rate limited. The
/// rate-limit row is skipped so a stray "429" in free text cannot select it.
pub fn message_without_rate_limit(raw: &str) -> &'static str {
    let lowered = raw.to_lowercase();
    RULES
        .iter()
        .filter(|rule| rule.message != BUSY_MESSAGE)
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.message)
        .unwrap_or(FALLBACK_MESSAGE)
}
