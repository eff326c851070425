//! Config loading and the client factory
//! Tests that touch process environment variables run serially

use anyhow::Result;
use serial_test::serial;
use std::env;
use std::fs;
use std::time::Duration;

use cluesmith::config::Config;
use cluesmith::llm::factory::create_client;
use cluesmith::llm::GenerateRequest;

#[test]
fn test_config_has_defaults() -> Result<()> {
    let config = Config::default();

    assert_eq!(config.llm.provider, "gemini");
    assert!(!config.llm.model.is_empty());
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.policy().base_delay, Duration::from_millis(1000));

    Ok(())
}

#[test]
fn test_load_explicit_path() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cluesmith.toml");
    fs::write(
        &path,
        r#"
[llm]
provider = "mock"
model = "unused"
api_key_env = "none"

[retry]
max_attempts = 6
retry_transient = true

[storage]
data_dir = "/tmp/cluesmith-test-data"
"#,
    )?;

    let config = Config::load_with_path(Some(path.to_string_lossy().to_string()))?;
    assert_eq!(config.llm.provider, "mock");
    assert_eq!(config.retry.max_attempts, 6);
    assert!(config.retry.retry_transient);
    assert_eq!(
        config.storage.resolve_data_dir(),
        std::path::PathBuf::from("/tmp/cluesmith-test-data")
    );

    Ok(())
}

#[test]
fn test_load_missing_explicit_path_fails() {
    let err = Config::load_with_path(Some("/nonexistent/cluesmith.toml".to_string())).unwrap_err();
    assert!(err.to_string().contains("failed to load config"));
}

#[test]
fn test_load_malformed_explicit_path_fails() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[llm\nprovider = ")?;
    assert!(Config::load_with_path(Some(path.to_string_lossy().to_string())).is_err());
    Ok(())
}

#[test]
#[serial]
fn test_api_key_read_from_configured_env_var() -> Result<()> {
    let mut config = Config::default();
    config.llm.api_key_env = Some("CLUESMITH_TEST_KEY".to_string());

    env::set_var("CLUESMITH_TEST_KEY", "secret-value");
    assert_eq!(config.get_api_key()?, "secret-value");

    env::remove_var("CLUESMITH_TEST_KEY");
    assert!(config.get_api_key().is_err());

    Ok(())
}

#[test]
#[serial]
fn test_factory_gemini_requires_key() {
    env::remove_var("CLUESMITH_MISSING_KEY");
    let mut config = Config::default();
    config.llm.api_key_env = Some("CLUESMITH_MISSING_KEY".to_string());

    let err = create_client(&config, false).err().unwrap();
    assert!(err.to_string().contains("CLUESMITH_MISSING_KEY"));

    // dry run never needs a key
    assert!(create_client(&config, true).is_ok());
}

#[test]
fn test_factory_unknown_provider() {
    let mut config = Config::default();
    config.llm.provider = "carrier-pigeon".to_string();
    let err = create_client(&config, false).err().unwrap();
    assert!(err.to_string().contains("Unknown LLM provider"));
}

#[tokio::test]
async fn test_factory_mock_provider_answers() -> Result<()> {
    let mut config = Config::default();
    config.llm.provider = "mock".to_string();
    let client = create_client(&config, false)?;
    let text = client
        .generate(&GenerateRequest::new("List synonyms for \"listen\""))
        .await?;
    assert!(text.contains("hear"));
    Ok(())
}
