//! Turning raw model text into structured values.
//!
//! The service is asked for JSON but regularly wraps it in a Markdown fence
//! or adds a line of preamble, so every parse goes through
//! [`strip_markdown_fences`] first.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ProviderError;
use crate::model::Clue;

/// How many clues a response must contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    AtLeastOne,
    Exactly(usize),
}

/// Return the contents of the first fenced block, or the trimmed text.
pub fn strip_markdown_fences(content: &str) -> String {
    let trimmed = content.trim();

    let Some(start) = trimmed.find("```") else {
        return trimmed.to_string();
    };
    let after_open = &trimmed[start + 3..];
    let Some(end) = after_open.find("```") else {
        return trimmed.to_string();
    };

    strip_info_string(&after_open[..end]).trim().to_string()
}

// Drop the language tag of a fence (```json, ```JSON, ```javascript ...)
fn strip_info_string(block: &str) -> &str {
    if let Some(newline) = block.find('\n') {
        let tag = block[..newline].trim();
        let is_tag = tag
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if is_tag {
            return &block[newline + 1..];
        }
        return block;
    }
    block
        .strip_prefix("json")
        .or_else(|| block.strip_prefix("JSON"))
        .unwrap_or(block)
}

/// Strip fences and deserialize. Syntax errors become `InvalidJson`,
/// shape mismatches become `UnexpectedFormat`.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, ProviderError> {
    let value = parse_value(text)?;
    serde_json::from_value(value).map_err(|e| ProviderError::UnexpectedFormat(e.to_string()))
}

fn parse_value(text: &str) -> Result<Value, ProviderError> {
    let json_text = strip_markdown_fences(text);
    serde_json::from_str(&json_text).map_err(|e| ProviderError::InvalidJson(e.to_string()))
}

/// Parse an array of clues and check its arity.
pub fn parse_clues(text: &str, arity: Arity) -> Result<Vec<Clue>, ProviderError> {
    let value = parse_value(text)?;

    let items = value.as_array().ok_or_else(|| {
        ProviderError::UnexpectedFormat("expected a JSON array of clues".to_string())
    })?;
    if items.is_empty() {
        return Err(ProviderError::UnexpectedFormat(
            "empty list of clues".to_string(),
        ));
    }

    let clues: Vec<Clue> = serde_json::from_value(value)
        .map_err(|e| ProviderError::UnexpectedFormat(e.to_string()))?;

    if let Arity::Exactly(expected) = arity {
        if clues.len() != expected {
            return Err(ProviderError::UnexpectedFormat(format!(
                "expected {} clues, got {}",
                expected,
                clues.len()
            )));
        }
    }

    if clues.iter().any(|c| c.clue.trim().is_empty()) {
        return Err(ProviderError::UnexpectedFormat(
            "clue text is empty".to_string(),
        ));
    }

    Ok(clues)
}

/// Parse a JSON array of strings, dropping blanks and trimming the rest.
pub fn parse_string_list(text: &str) -> Result<Vec<String>, ProviderError> {
    let items: Vec<String> = parse_json(text)?;
    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}
