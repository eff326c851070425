//! Clue operations built on the retry wrapper.
//!
//! Every remote call goes through [`RetryPolicy::call`] with the response
//! parsing inside the retried operation, so a structurally wrong response is
//! classified (as a permanent "unexpected format") like any other failure.

use std::sync::Arc;
use tracing::{debug, info};

use crate::cache::{KeyedCache, LoadOnce};
use crate::error::{ClueError, ProviderError};
use crate::llm::{GenerateRequest, LlmClient};
use crate::model::{Clue, ClueRequest};
use crate::parse::{self, Arity};
use crate::prompts;
use crate::retry::{Classification, RetryPolicy};
use crate::util::capitalize_first;

/// Setter list shown to the user, loaded once per service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub setters: Vec<String>,
}

impl Metadata {
    /// "Paul" when available, otherwise the first setter.
    pub fn default_setter(&self) -> Option<&str> {
        self.setters
            .iter()
            .find(|s| s.as_str() == "Paul")
            .or_else(|| self.setters.first())
            .map(String::as_str)
    }
}

pub struct ClueService {
    client: Box<dyn LlmClient>,
    policy: RetryPolicy,
    synonyms: KeyedCache<Vec<String>>,
    metadata: LoadOnce<Metadata>,
}

impl ClueService {
    pub fn new(client: Box<dyn LlmClient>) -> Self {
        Self {
            client,
            policy: RetryPolicy::default(),
            synonyms: KeyedCache::new(),
            metadata: LoadOnce::new(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    async fn call<T, F>(&self, request: &GenerateRequest, parse: F) -> Result<T, ClueError>
    where
        F: Fn(&str) -> Result<T, ProviderError>,
    {
        let client = self.client.as_ref();
        let parse = &parse;
        self.policy
            .call(move || async move {
                let text = client.generate(request).await?;
                parse(&text)
            })
            .await
    }

    /// Ask for three clues for the answer described by `request`.
    pub async fn generate_clues(&self, request: &ClueRequest) -> Result<Vec<Clue>, ClueError> {
        request.validate()?;
        info!(
            answer = %request.answer,
            device = request.device().as_str(),
            difficulty = request.difficulty.as_str(),
            "Generating clues"
        );

        let llm_request = GenerateRequest::new(prompts::clue_generation(request))
            .with_system_instruction(prompts::persona_instruction(request.persona))
            .with_json_schema(prompts::clue_response_schema())
            .with_temperature(0.8);

        let mut clues = self
            .call(&llm_request, |text| parse::parse_clues(text, Arity::AtLeastOne))
            .await?;

        if let Some(ref setter) = request.setter {
            for clue in clues.iter_mut().filter(|c| c.setter.is_none()) {
                clue.setter = Some(setter.clone());
            }
        }

        info!("Generated {} clues", clues.len());
        Ok(clues)
    }

    /// Two rewordings of `original` that keep its wordplay.
    pub async fn generate_variations(
        &self,
        original: &Clue,
        request: &ClueRequest,
    ) -> Result<Vec<Clue>, ClueError> {
        request.validate()?;
        if original.clue.trim().is_empty() {
            return Err(ClueError::InvalidInput(
                "Please provide the clue to vary.".to_string(),
            ));
        }

        let llm_request = GenerateRequest::new(prompts::clue_variations(original, request))
            .with_system_instruction(prompts::persona_instruction(request.persona))
            .with_json_schema(prompts::clue_response_schema())
            .with_temperature(0.9);

        self.call(&llm_request, |text| parse::parse_clues(text, Arity::Exactly(2)))
            .await
    }

    /// A one-line dictionary definition, first letter capitalized.
    pub async fn find_definition(&self, word: &str) -> Result<String, ClueError> {
        if word.trim().is_empty() {
            return Err(ClueError::InvalidInput(
                "Please enter a word to define.".to_string(),
            ));
        }

        let llm_request = GenerateRequest::new(prompts::definition_lookup(word))
            .with_system_instruction(prompts::LEXICOGRAPHER_INSTRUCTION)
            .with_temperature(0.2);

        let definition = self
            .call(&llm_request, |text: &str| {
                Ok(text.trim().trim_matches('"').trim().to_string())
            })
            .await?;

        if definition.is_empty() {
            return Err(ClueError::service(
                Classification::Permanent,
                "Could not find a definition for the word.",
            ));
        }
        Ok(capitalize_first(&definition))
    }

    /// Synonyms for an answer or definition, cached per lower-cased text.
    pub async fn suggest_synonyms(&self, text: &str) -> Result<Vec<String>, ClueError> {
        if text.trim().is_empty() {
            return Err(ClueError::InvalidInput(
                "Please enter some text to find synonyms for.".to_string(),
            ));
        }
        if let Some(cached) = self.synonyms.get(text) {
            debug!("Synonym cache hit for {:?}", text.trim());
            return Ok(cached);
        }

        let llm_request = GenerateRequest::new(prompts::synonym_suggestions(text))
            .with_json_schema(prompts::string_list_schema())
            .with_temperature(0.7);

        let synonyms = self.call(&llm_request, parse::parse_string_list).await?;
        self.synonyms.insert(text, synonyms.clone());
        Ok(synonyms)
    }

    /// Setter metadata, loaded from the service on first use.
    pub async fn setters(&self) -> Result<Arc<Metadata>, ClueError> {
        self.metadata
            .get(|| async {
                info!("Loading setter metadata");
                let llm_request = GenerateRequest::new(prompts::setter_metadata())
                    .with_json_schema(prompts::string_list_schema())
                    .with_temperature(0.2);
                let setters = self.call(&llm_request, parse::parse_string_list).await?;
                if setters.is_empty() {
                    return Err(ClueError::service(
                        Classification::Permanent,
                        "Could not load setter styles. Please try again.",
                    ));
                }
                Ok(Metadata { setters })
            })
            .await
    }

    pub async fn invalidate_metadata(&self) {
        self.metadata.invalidate().await;
    }
}
