use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "configs/app_configs.toml";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Model and prompt settings, loaded once at start-up and read-only after.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Settings {
    pub model_name: String,
    pub temperature: f64,
    /// System prompt for the request that decides on tool calls.
    pub function_caller_llm_system_prompt: String,
    /// System prompt for the request that writes the final answer.
    pub llm_system_prompt: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Settings {
    /// Reads the file named by `WEBGPT_CONFIG`, or [`DEFAULT_CONFIG_PATH`].
    pub fn load() -> Result<Self> {
        let path = std::env::var("WEBGPT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_path(path)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Secrets read from the environment (after `.env` has been loaded).
#[derive(Clone)]
pub struct Credentials {
    pub openai_api_key: String,
    pub brave_api_key: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            openai_api_key: required_var("OPENAI_API_KEY")?,
            brave_api_key: required_var("BRAVE_API_KEY")?,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").finish_non_exhaustive()
    }
}

fn required_var(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .with_context(|| format!("{name} environment variable not set"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_fall_back_to_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            model_name = "gpt-4o-mini"
            temperature = 0.0
            function_caller_llm_system_prompt = "Decide which tools to call."
            llm_system_prompt = "Answer using the tool results."
            "#,
        )
        .unwrap();

        assert_eq!(settings.model_name, "gpt-4o-mini");
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.request_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn missing_prompts_are_rejected() {
        let err = Settings::from_toml_str("model_name = \"m\"\ntemperature = 0.2\n").unwrap_err();
        assert!(err.to_string().contains("function_caller_llm_system_prompt"));
    }

    #[test]
    fn shipped_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../").join(DEFAULT_CONFIG_PATH);
        let settings = Settings::from_path(path).unwrap();
        assert!(!settings.function_caller_llm_system_prompt.is_empty());
        assert!(!settings.llm_system_prompt.is_empty());
    }
}
