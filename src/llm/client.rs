use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::ProviderError;

/// One "generate content" call: a prompt plus optional structured-output
/// configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
    pub system_instruction: Option<String>,
    pub temperature: Option<f32>,
    pub response_mime_type: Option<String>,
    pub response_schema: Option<Value>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Ask for `application/json` output matching `schema`.
    pub fn with_json_schema(mut self, schema: Value) -> Self {
        self.response_mime_type = Some("application/json".to_string());
        self.response_schema = Some(schema);
        self
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Perform exactly one call and return the raw response text.
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError>;
}

#[async_trait]
impl<T: LlmClient + ?Sized> LlmClient for Arc<T> {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError> {
        (**self).generate(request).await
    }
}

/// Canned responses for `--dry-run`, picked by what the prompt asks for.
pub struct MockLlmClient;

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError> {
        let prompt = request.prompt.as_str();
        if prompt.contains("dictionary-style definition") {
            Ok("to give attention to sound".to_string())
        } else if prompt.contains("synonyms") {
            Ok(r#"["hear", "heed", "attend", "hark"]"#.to_string())
        } else if prompt.contains("crossword setters") {
            Ok(r#"["Araucaria", "Paul", "Rufus", "Enigmatist", "Pasquale"]"#.to_string())
        } else if prompt.contains("variations") {
            // Fenced on purpose: real responses often are
            Ok(r#"```json
[
  {"clue": "Quietly, enlist as one who pays attention (6)", "explanation": "Anagram (as one) of ENLIST"},
  {"clue": "Tinsel strewn for a good hearing (6)", "explanation": "Anagram (strewn) of TINSEL"}
]
```"#
                .to_string())
        } else if prompt.contains("cryptic crossword clues") {
            Ok(r#"[
  {"clue": "Silent rearrangement to pay attention (6)", "explanation": "Definition: pay attention. Wordplay: anagram (rearrangement) of SILENT."},
  {"clue": "Enlist help at first? Just hear! (6)", "explanation": "Definition: hear. Wordplay: anagram of ENLIST."},
  {"clue": "Tinsel arranged to catch the ear (6)", "explanation": "Definition: catch the ear. Wordplay: anagram (arranged) of TINSEL."}
]"#
            .to_string())
        } else {
            Ok(r#"{"status": "mock"}"#.to_string())
        }
    }
}

/// Replays a fixed script of results and records every call.
///
/// The last scripted result repeats once the script is down to one entry,
/// so a single failure scripts "always fails".
pub struct ScriptedLlmClient {
    responses: Mutex<VecDeque<Result<String, ProviderError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicU32,
}

impl ScriptedLlmClient {
    pub fn new(responses: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn always(result: Result<String, ProviderError>) -> Self {
        Self::new(vec![result])
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.prompt.clone());

        let mut responses = self
            .responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if responses.len() > 1 {
            if let Some(next) = responses.pop_front() {
                return next;
            }
        }
        responses.front().cloned().unwrap_or_else(|| {
            Err(ProviderError::UnexpectedFormat(
                "no scripted response".to_string(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_schema_sets_mime_type() {
        let request = GenerateRequest::new("p").with_json_schema(serde_json::json!({"type": "ARRAY"}));
        assert_eq!(
            request.response_mime_type.as_deref(),
            Some("application/json")
        );
        assert!(request.response_schema.is_some());
    }

    #[tokio::test]
    async fn test_mock_client_definition() {
        let client = MockLlmClient::new();
        let text = client
            .generate(&GenerateRequest::new(
                "Provide a concise, dictionary-style definition for the word \"listen\".",
            ))
            .await
            .unwrap();
        assert!(!text.is_empty());
    }

    #[tokio::test]
    async fn test_scripted_client_replays_then_repeats_last() {
        let client = ScriptedLlmClient::new(vec![
            Err(ProviderError::Http {
                status: 429,
                body: "slow down".to_string(),
            }),
            Ok("one".to_string()),
        ]);
        let request = GenerateRequest::new("prompt");

        assert!(client.generate(&request).await.is_err());
        assert_eq!(client.generate(&request).await.unwrap(), "one");
        assert_eq!(client.generate(&request).await.unwrap(), "one");
        assert_eq!(client.calls(), 3);
        assert_eq!(client.prompts().len(), 3);
    }

    #[tokio::test]
    async fn test_scripted_client_empty_script_errors() {
        let client = ScriptedLlmClient::new(vec![]);
        let err = client
            .generate(&GenerateRequest::new("prompt"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnexpectedFormat(_)));
    }
}
