use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ChainError;

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Application configuration.
///
/// Built once at startup (file, then environment) and passed down explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the planner agent server
    pub planner_url: String,
    /// Base URL of the writer agent server
    pub writer_url: String,
    /// Directory receiving marketing_plan.md and blog_post.md
    pub output_dir: PathBuf,
    /// Timeout for each agent call. Agent runs are slow, keep it generous.
    pub request_timeout_secs: u64,
    /// Gemini model used by the agent servers
    pub model: String,
    pub gemini_base_url: String,
    pub log_level: String,
    /// Never read from or written to the config file
    #[serde(skip)]
    pub gemini_api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            planner_url: "http://localhost:8000".into(),
            writer_url: "http://localhost:8001".into(),
            output_dir: PathBuf::from("marketing_outputs"),
            request_timeout_secs: 600,
            model: "gemini-2.0-flash".into(),
            gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            log_level: "info".into(),
            gemini_api_key: None,
        }
    }
}

impl AppConfig {
    /// Config file name looked up in the working directory
    pub const FILE_NAME: &'static str = "marketing-chain.json";

    /// Load from an explicit path, or from the first discovered file, or defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::discover() {
                Some(path) => Self::from_file(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Parse a config file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(Self::FILE_NAME);
        if local.exists() {
            return Some(local);
        }
        let user = dirs::config_dir()?.join("marketing-chain").join("config.json");
        user.exists().then_some(user)
    }

    /// Pick up credentials from the process environment
    pub fn with_env(self) -> Self {
        let key = std::env::var(API_KEY_ENV).ok();
        self.with_api_key(key)
    }

    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.gemini_api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Check everything the orchestrator needs
    pub fn validate(&self) -> Result<(), ChainError> {
        validate_url("planner_url", &self.planner_url)?;
        validate_url("writer_url", &self.writer_url)?;
        validate_url("gemini_base_url", &self.gemini_base_url)?;

        if self.request_timeout_secs == 0 {
            return Err(ChainError::Config(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ChainError::Config("output_dir must not be empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(ChainError::Config("model must not be empty".into()));
        }
        Ok(())
    }

    /// The agent servers cannot start without a key
    pub fn require_api_key(&self) -> Result<&str, ChainError> {
        self.gemini_api_key
            .as_deref()
            .ok_or_else(|| ChainError::Config(format!("{API_KEY_ENV} is not set")))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn validate_url(field: &str, value: &str) -> Result<(), ChainError> {
    let url = reqwest::Url::parse(value)
        .map_err(|e| ChainError::Config(format!("{field} '{value}' is not a URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ChainError::Config(format!(
            "{field} must use http or https, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.planner_url, "http://localhost:8000");
        assert_eq!(config.writer_url, "http://localhost:8001");
        assert_eq!(config.output_dir, PathBuf::from("marketing_outputs"));
    }

    #[test]
    fn test_from_file_keeps_defaults_for_missing_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "planner_url": "http://planner.internal:9000", "request_timeout_secs": 30 }"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.planner_url, "http://planner.internal:9000");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.writer_url, "http://localhost:8001");
    }

    #[test]
    fn test_api_key_is_never_read_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "gemini_api_key": "leaked" }"#).unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = AppConfig::load(Some(&temp_dir.path().join("nope.json")));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(AppConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.planner_url = "localhost:8000".into();
        assert!(matches!(config.validate(), Err(ChainError::Config(_))));

        let mut config = AppConfig::default();
        config.writer_url = "ftp://localhost:8001".into();
        assert!(matches!(config.validate(), Err(ChainError::Config(_))));

        let mut config = AppConfig::default();
        config.request_timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ChainError::Config(_))));

        let config = AppConfig::default().with_output_dir("");
        assert!(matches!(config.validate(), Err(ChainError::Config(_))));
    }

    #[test]
    fn test_require_api_key() {
        let config = AppConfig::default();
        assert!(config.require_api_key().is_err());

        let config = AppConfig::default().with_api_key(Some("   ".into()));
        assert!(config.require_api_key().is_err());

        let config = AppConfig::default().with_api_key(Some("secret".into()));
        assert_eq!(config.require_api_key().unwrap(), "secret");
    }
}
