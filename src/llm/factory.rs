use anyhow::{bail, Result};

use super::client::{LlmClient, MockLlmClient};
use super::gemini::GeminiClient;
use crate::config::Config;

/// Create an LLM client based on configuration
pub fn create_client(config: &Config, dry_run: bool) -> Result<Box<dyn LlmClient>> {
    if dry_run {
        return Ok(Box::new(MockLlmClient::new()));
    }

    let llm = &config.llm;
    match llm.provider.as_str() {
        "gemini" => {
            let api_key = config.get_api_key()?;
            let client = match llm.base_url {
                Some(ref base_url) => GeminiClient::with_base_url(
                    api_key,
                    llm.model.clone(),
                    base_url.clone(),
                    llm.get_max_tokens(),
                    llm.timeout_secs,
                )?,
                None => GeminiClient::new(
                    api_key,
                    llm.model.clone(),
                    llm.get_max_tokens(),
                    llm.timeout_secs,
                )?,
            };
            Ok(Box::new(client))
        }

        "mock" => Ok(Box::new(MockLlmClient::new())),

        unknown => bail!("Unknown LLM provider: {}", unknown),
    }
}
