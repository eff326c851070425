//! Small helpers shared across cluesmith

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A string wrapper that masks its contents in Debug/Display output.
/// Keeps the Gemini API key out of logs and error messages.
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    /// Access the raw secret value (for request headers)
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Milliseconds since the Unix epoch; 0 if the clock is before it.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Upper-case the first character, leaving the rest untouched.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_string_hides_in_debug_and_display() {
        let secret: SecretString = "AIza-secret".to_string().into();
        assert_eq!(format!("{:?}", secret), "***");
        assert_eq!(format!("{}", secret), "***");
        assert_eq!(secret.expose(), "AIza-secret");
    }

    #[test]
    fn test_now_millis_is_recent() {
        // 2020-01-01 in millis
        assert!(now_millis() > 1_577_836_800_000);
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("to hear"), "To hear");
        assert_eq!(capitalize_first("éclair"), "Éclair");
        assert_eq!(capitalize_first(""), "");
    }
}
