//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/botpulse/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/botpulse/` (~/.config/botpulse/)
//! - Data: `$XDG_DATA_HOME/botpulse/` (~/.local/share/botpulse/)
//! - State/Logs: `$XDG_STATE_HOME/botpulse/` (~/.local/state/botpulse/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default number of entries the log store retains.
pub const DEFAULT_MAX_ENTRIES: usize = 50_000;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Log store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// LLM configuration for AI insights (optional)
    #[serde(default)]
    pub llm: Option<LlmConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Log store configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Maximum number of entries kept; older entries are evicted first
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Override path for the SQLite database
    pub database_path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            database_path: None,
        }
    }
}

impl StoreConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(Error::Config(
                "store.max_entries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Database path, honoring the override if one is set
    pub fn resolved_database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(Config::database_path)
    }
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

/// LLM provider configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// Provider type
    pub provider: LlmProvider,
    /// Model to use
    pub model: String,
    /// API endpoint (optional, uses default for provider)
    pub endpoint: Option<String>,
    /// API key (can also use env var)
    pub api_key: Option<String>,
    /// HTTP request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

/// Supported LLM providers
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    Ollama,
    Claude,
    OpenAI,
    Gemini,
}

impl LlmProvider {
    /// Returns the default endpoint for this provider
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            LlmProvider::Ollama => "http://localhost:11434",
            LlmProvider::Claude => "https://api.anthropic.com",
            LlmProvider::OpenAI => "https://api.openai.com",
            LlmProvider::Gemini => "https://generativelanguage.googleapis.com",
        }
    }

    /// Environment variable consulted when no `api_key` is configured
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            LlmProvider::Ollama => None,
            LlmProvider::Claude => Some("ANTHROPIC_API_KEY"),
            LlmProvider::OpenAI => Some("OPENAI_API_KEY"),
            LlmProvider::Gemini => Some("GEMINI_API_KEY"),
        }
    }
}

fn default_llm_timeout() -> u64 {
    60
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.store.validate()?;
        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/botpulse/config.toml` (~/.config/botpulse/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("botpulse").join("config.toml")
    }

    /// Returns the data directory path (for SQLite database)
    ///
    /// `$XDG_DATA_HOME/botpulse/` (~/.local/share/botpulse/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("botpulse")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/botpulse/` (~/.local/state/botpulse/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("botpulse")
    }

    /// Returns the database file path
    ///
    /// `$XDG_DATA_HOME/botpulse/data.db` (~/.local/share/botpulse/data.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("data.db")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/botpulse/botpulse.log` (~/.local/state/botpulse/botpulse.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("botpulse.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.llm.is_none());
        assert_eq!(config.store.max_entries, 50_000);
        assert!(config.store.database_path.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[store]
max_entries = 1000
database_path = "/tmp/botpulse-test.db"

[llm]
provider = "gemini"
model = "gemini-2.0-flash"

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.store.max_entries, 1000);
        assert_eq!(
            config.store.resolved_database_path(),
            PathBuf::from("/tmp/botpulse-test.db")
        );
        let llm = config.llm.unwrap();
        assert_eq!(llm.provider, LlmProvider::Gemini);
        assert_eq!(llm.model, "gemini-2.0-flash");
        assert_eq!(llm.timeout_secs, 60);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_llm_provider_endpoints() {
        assert_eq!(
            LlmProvider::Ollama.default_endpoint(),
            "http://localhost:11434"
        );
        assert_eq!(
            LlmProvider::Claude.default_endpoint(),
            "https://api.anthropic.com"
        );
        assert_eq!(LlmProvider::Ollama.api_key_env(), None);
        assert_eq!(LlmProvider::Gemini.api_key_env(), Some("GEMINI_API_KEY"));
    }

    #[test]
    fn test_store_config_validation() {
        assert!(StoreConfig::default().validate().is_ok());

        let config = StoreConfig {
            max_entries: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_rejects_zero_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[store]\nmax_entries = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_paths_end_with_app_name() {
        assert!(Config::database_path().ends_with("botpulse/data.db"));
        assert!(Config::log_path().ends_with("botpulse/botpulse.log"));
        assert!(Config::config_path().ends_with("botpulse/config.toml"));
    }
}
