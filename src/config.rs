use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub llm: LlmConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key_env: Option<String>,
    /// Override the Gemini endpoint (proxies, tests)
    #[serde(default)]
    pub base_url: Option<String>,

    /// Optional: Override max output tokens (default 8192)
    #[serde(default)]
    pub max_tokens: Option<u32>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl LlmConfig {
    pub fn get_max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(8192)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per call, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "default_max_jitter_ms")]
    pub max_jitter_ms: u64,

    /// Also retry network failures and 5xx responses (default: false)
    #[serde(default)]
    pub retry_transient: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_jitter_ms: default_max_jitter_ms(),
            retry_transient: false,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts)
            .with_base_delay(Duration::from_millis(self.base_delay_ms))
            .with_max_jitter(Duration::from_millis(self.max_jitter_ms))
            .with_retry_transient(self.retry_transient)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Where history, presets and saved clues live
    /// (default: <data_dir>/cluesmith)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.data_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|dir| dir.join("cluesmith"))
            .unwrap_or_else(|| PathBuf::from(".cluesmith"))
    }
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_jitter_ms() -> u64 {
    500
}

impl Config {
    /// Load config from the working directory or user config directory
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    /// Load configuration from a specific path, or use default search paths
    pub fn load_with_path(path: Option<String>) -> Result<Self> {
        if let Some(config_path) = path {
            debug!("Loading config from explicit path: {}", config_path);
            return Self::load_from_path(&config_path)
                .with_context(|| format!("failed to load config from {}", config_path));
        }

        if let Ok(config) = Self::load_from_path("cluesmith.toml") {
            debug!("Loaded config from ./cluesmith.toml");
            return Ok(config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("cluesmith").join("config.toml");
            if let Ok(config) = Self::load_from_path(&config_path) {
                debug!("Loaded config from {:?}", config_path);
                return Ok(config);
            }
        }

        debug!("Using default config");
        Ok(Self::default())
    }

    fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get API key from environment variable specified in config
    pub fn get_api_key(&self) -> Result<String> {
        match &self.llm.api_key_env {
            Some(env_var) => {
                if env_var.to_lowercase() == "none" {
                    return Ok(String::new());
                }
                env::var(env_var).map_err(|_| {
                    anyhow::anyhow!("API key not found in environment variable: {}", env_var)
                })
            }
            None => Ok(String::new()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig {
                provider: "gemini".to_string(),
                model: "gemini-2.5-flash".to_string(),
                api_key_env: Some("GEMINI_API_KEY".to_string()),
                base_url: None,
                max_tokens: None,
                timeout_secs: default_timeout_secs(),
            },
            retry: RetryConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.api_key_env, Some("GEMINI_API_KEY".to_string()));
        assert_eq!(config.retry.max_attempts, 3);
        assert!(!config.retry.retry_transient);
        assert_eq!(config.llm.get_max_tokens(), 8192);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("provider = \"gemini\""));
        assert!(toml_str.contains("GEMINI_API_KEY"));
        assert!(toml_str.contains("max_attempts = 3"));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
[llm]
provider = "gemini"
model = "gemini-2.5-pro"
api_key_env = "MY_KEY"

[retry]
max_attempts = 5
"#,
        )
        .unwrap();
        assert_eq!(config.llm.model, "gemini-2.5-pro");
        assert_eq!(config.llm.timeout_secs, 60);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.base_delay_ms, 1000);
        assert_eq!(config.retry.max_jitter_ms, 500);
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_retry_config_to_policy() {
        let retry = RetryConfig {
            max_attempts: 4,
            base_delay_ms: 250,
            max_jitter_ms: 0,
            retry_transient: true,
        };
        let policy = retry.policy();
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.base_delay, Duration::from_millis(250));
        assert_eq!(policy.max_jitter, Duration::ZERO);
        assert!(policy.retry_transient);
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let storage = StorageConfig {
            data_dir: Some(PathBuf::from("/tmp/cluesmith-data")),
        };
        assert_eq!(
            storage.resolve_data_dir(),
            PathBuf::from("/tmp/cluesmith-data")
        );
    }

    #[test]
    fn test_api_key_none_needs_no_env() {
        let mut config = Config::default();
        config.llm.api_key_env = Some("none".to_string());
        assert_eq!(config.get_api_key().unwrap(), "");
    }

    #[test]
    fn test_api_key_missing_fails() {
        let mut config = Config::default();
        config.llm.api_key_env = Some("CLUESMITH_NONEXISTENT_KEY_XYZ".to_string());
        let err = config.get_api_key().unwrap_err();
        assert!(err.to_string().contains("API key not found"));
    }
}
