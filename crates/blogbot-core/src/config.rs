//! Configuration management
//!
//! Settings are layered in this order (later wins):
//! 1. Built-in defaults
//! 2. `blogbot.toml` (or the file passed with `--config`)
//! 3. Environment variables
//!
//! String values inside the TOML file may reference environment variables
//! with the `${VAR_NAME}` syntax.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "blogbot.toml";

/// Telegram transport settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token
    pub bot_token: String,

    /// Telegram user IDs allowed to talk to the bot
    #[serde(default)]
    pub allowed_user_ids: Vec<u64>,
}

/// Content API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Create-post endpoint
    pub api_url: String,

    /// Token sent as `Authorization: Token <api_token>`
    pub api_token: String,

    /// Request timeout in seconds
    #[serde(default = "default_publish_timeout")]
    pub timeout_secs: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_token: String::new(),
            timeout_secs: default_publish_timeout(),
        }
    }
}

/// Text generation settings
///
/// Generation is enabled only when `api_key` is non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key
    pub api_key: String,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the chat-completions API
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_llm_base_url(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

/// Conversation session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle time after which an unfinished conversation is dropped
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: u64,

    /// How often the sweeper looks for expired sessions
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_session_ttl(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_model() -> String {
    "mistral-small-latest".to_string()
}

fn default_llm_base_url() -> String {
    "https://api.mistral.ai/v1".to_string()
}

fn default_publish_timeout() -> u64 {
    30
}

fn default_llm_timeout() -> u64 {
    120
}

fn default_session_ttl() -> u64 {
    3600 // 1 hour
}

fn default_sweep_interval() -> u64 {
    300
}

/// Main configuration for blogbot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub publish: PublishConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

impl Config {
    /// Load configuration for the process
    ///
    /// Uses `path` when given, otherwise `blogbot.toml` if it exists,
    /// otherwise environment variables only. The result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_toml_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_toml_file(DEFAULT_CONFIG_FILE)
            }
            None => Self::from_env(),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        config.apply_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        Self::from_toml_str(&content, |key| std::env::var(key).ok())
    }

    fn from_toml_str(content: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let expanded = expand_vars(content, &lookup);

        let toml: TomlConfig = toml::from_str(&expanded)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        let mut config = Self::from_toml_config(toml);
        config.apply_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    fn from_toml_config(toml: TomlConfig) -> Self {
        let telegram = toml.telegram.unwrap_or_default();
        let publish = toml.publish.unwrap_or_default();
        let llm = toml.llm.unwrap_or_default();
        let session = toml.session.unwrap_or_default();

        Config {
            telegram: TelegramConfig {
                bot_token: telegram.bot_token.unwrap_or_default(),
                allowed_user_ids: telegram.allowed_user_ids.unwrap_or_default(),
            },
            publish: PublishConfig {
                api_url: publish.api_url.unwrap_or_default(),
                api_token: publish.api_token.unwrap_or_default(),
                timeout_secs: publish.timeout_secs.unwrap_or_else(default_publish_timeout),
            },
            llm: LlmConfig {
                api_key: llm.api_key.unwrap_or_default(),
                model: llm.model.filter(|m| !m.is_empty()).unwrap_or_else(default_model),
                base_url: llm
                    .base_url
                    .filter(|u| !u.is_empty())
                    .unwrap_or_else(default_llm_base_url),
                timeout_secs: llm.timeout_secs.unwrap_or_else(default_llm_timeout),
            },
            session: SessionConfig {
                ttl_secs: session.ttl_secs.unwrap_or_else(default_session_ttl),
                sweep_interval_secs: session
                    .sweep_interval_secs
                    .unwrap_or_else(default_sweep_interval),
            },
        }
    }

    /// Override settings with variables from `lookup`; empty values are ignored
    fn apply_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // Telegram
        if let Some(token) = var("BOT_TOKEN") {
            self.telegram.bot_token = token;
        }
        if let Some(ids) = var("TELEGRAM_USER_ID") {
            self.telegram.allowed_user_ids = parse_user_ids(&ids)?;
        }

        // Content API
        if let Some(url) = var("API_URL") {
            self.publish.api_url = url;
        }
        if let Some(token) = var("DRF_TOKEN") {
            self.publish.api_token = token;
        }
        if let Some(secs) = var("PUBLISH_TIMEOUT_SECS") {
            self.publish.timeout_secs = parse_secs("PUBLISH_TIMEOUT_SECS", &secs)?;
        }

        // Generation: MISTRAL_* first, LLM_* as aliases
        if let Some(key) = var("MISTRAL_API_KEY").or_else(|| var("LLM_API_KEY")) {
            self.llm.api_key = key;
        }
        if let Some(model) = var("MISTRAL_MODEL").or_else(|| var("LLM_MODEL")) {
            self.llm.model = model;
        }
        if let Some(base_url) = var("LLM_BASE_URL") {
            self.llm.base_url = base_url;
        }
        if let Some(secs) = var("LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_secs("LLM_TIMEOUT_SECS", &secs)?;
        }

        // Sessions
        if let Some(secs) = var("SESSION_TTL_SECS") {
            self.session.ttl_secs = parse_secs("SESSION_TTL_SECS", &secs)?;
        }
        if let Some(secs) = var("SESSION_SWEEP_INTERVAL_SECS") {
            self.session.sweep_interval_secs = parse_secs("SESSION_SWEEP_INTERVAL_SECS", &secs)?;
        }

        Ok(())
    }

    /// Check that every mandatory setting is present
    pub fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.trim().is_empty() {
            return Err(Error::Config("BOT_TOKEN is not set".to_string()));
        }
        if self.telegram.allowed_user_ids.is_empty() {
            return Err(Error::Config(
                "TELEGRAM_USER_ID is empty or not set".to_string(),
            ));
        }
        if self.publish.api_url.trim().is_empty() {
            return Err(Error::Config("API_URL is not set".to_string()));
        }
        if self.publish.api_token.trim().is_empty() {
            return Err(Error::Config("DRF_TOKEN is not set".to_string()));
        }
        if self.session.ttl_secs == 0 {
            return Err(Error::Config(
                "session TTL must be greater than zero".to_string(),
            ));
        }
        if self.session.sweep_interval_secs == 0 {
            return Err(Error::Config(
                "session sweep interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Generation settings, if a completion API key is configured
    pub fn llm_config(&self) -> Option<&LlmConfig> {
        if self.llm.api_key.trim().is_empty() {
            None
        } else {
            Some(&self.llm)
        }
    }

    /// One-line description without secrets, for the startup log
    pub fn summary(&self) -> String {
        let generation = match self.llm_config() {
            Some(llm) => format!("enabled (model {})", llm.model),
            None => "disabled".to_string(),
        };
        format!(
            "publish_url={}, allowed_users={}, generation={}, session_ttl={}s",
            self.publish.api_url,
            self.telegram.allowed_user_ids.len(),
            generation,
            self.session.ttl_secs
        )
    }
}

/// Parse a comma-separated list of Telegram user IDs
pub fn parse_user_ids(raw: &str) -> Result<Vec<u64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .map_err(|_| Error::Config(format!("Invalid user ID in TELEGRAM_USER_ID: '{}'", s)))
        })
        .collect()
}

fn parse_secs(name: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} must be a number of seconds, got '{}'", name, raw)))
}

/// Replace `${VAR_NAME}` references with values from `lookup`
///
/// Unknown variables expand to an empty string.
fn expand_vars(value: &str, lookup: &impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut var_name = String::new();
            while let Some(c) = chars.next_if(|&c| c != '}') {
                var_name.push(c);
            }
            chars.next(); // consume '}'

            if let Some(env_value) = lookup(&var_name) {
                result.push_str(&env_value);
            }
        } else {
            result.push(c);
        }
    }

    result
}

// ============================================================================
// TOML file layout
// ============================================================================

#[derive(Debug, Deserialize)]
struct TomlConfig {
    telegram: Option<TomlTelegramConfig>,
    publish: Option<TomlPublishConfig>,
    llm: Option<TomlLlmConfig>,
    session: Option<TomlSessionConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlTelegramConfig {
    bot_token: Option<String>,
    allowed_user_ids: Option<Vec<u64>>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlPublishConfig {
    api_url: Option<String>,
    api_token: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlLlmConfig {
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlSessionConfig {
    ttl_secs: Option<u64>,
    sweep_interval_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            ("BOT_TOKEN", "123:abc"),
            ("TELEGRAM_USER_ID", "111, 222"),
            ("API_URL", "https://blog.example.com/api/posts/"),
            ("DRF_TOKEN", "secret"),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.llm.model, "mistral-small-latest");
        assert_eq!(config.llm.base_url, "https://api.mistral.ai/v1");
        assert_eq!(config.publish.timeout_secs, 30);
        assert_eq!(config.session.ttl_secs, 3600);
        assert_eq!(config.session.sweep_interval_secs, 300);
        assert!(config.llm_config().is_none());
    }

    #[test]
    fn test_from_vars_required_only() {
        let config = Config::from_vars(vars(&required())).unwrap();
        assert_eq!(config.telegram.bot_token, "123:abc");
        assert_eq!(config.telegram.allowed_user_ids, vec![111, 222]);
        assert_eq!(config.publish.api_url, "https://blog.example.com/api/posts/");
        assert_eq!(config.publish.api_token, "secret");
        assert!(config.llm_config().is_none());
    }

    #[test]
    fn test_missing_allow_list_is_fatal() {
        let pairs: Vec<_> = required()
            .into_iter()
            .filter(|(k, _)| *k != "TELEGRAM_USER_ID")
            .collect();
        let err = Config::from_vars(vars(&pairs)).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("TELEGRAM_USER_ID")));
    }

    #[test]
    fn test_blank_allow_list_is_fatal() {
        let mut pairs = required();
        pairs.retain(|(k, _)| *k != "TELEGRAM_USER_ID");
        pairs.push(("TELEGRAM_USER_ID", " , "));
        assert!(Config::from_vars(vars(&pairs)).is_err());
    }

    #[test]
    fn test_invalid_user_id() {
        let err = parse_user_ids("123,abc").unwrap_err();
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_parse_user_ids_trims_and_skips_empty() {
        assert_eq!(parse_user_ids(" 1 ,2,,3 ").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_missing_publish_settings() {
        let mut pairs = required();
        pairs.retain(|(k, _)| *k != "DRF_TOKEN");
        let err = Config::from_vars(vars(&pairs)).unwrap_err();
        assert!(err.to_string().contains("DRF_TOKEN"));

        let mut pairs = required();
        pairs.retain(|(k, _)| *k != "API_URL");
        let err = Config::from_vars(vars(&pairs)).unwrap_err();
        assert!(err.to_string().contains("API_URL"));
    }

    #[test]
    fn test_llm_settings_and_aliases() {
        let mut pairs = required();
        pairs.push(("MISTRAL_API_KEY", "mk"));
        pairs.push(("MISTRAL_MODEL", "mistral-large-latest"));
        let config = Config::from_vars(vars(&pairs)).unwrap();
        let llm = config.llm_config().unwrap();
        assert_eq!(llm.api_key, "mk");
        assert_eq!(llm.model, "mistral-large-latest");

        let mut pairs = required();
        pairs.push(("LLM_API_KEY", "lk"));
        pairs.push(("LLM_MODEL", ""));
        let config = Config::from_vars(vars(&pairs)).unwrap();
        let llm = config.llm_config().unwrap();
        assert_eq!(llm.api_key, "lk");
        assert_eq!(llm.model, "mistral-small-latest");
    }

    #[test]
    fn test_numeric_overrides() {
        let mut pairs = required();
        pairs.push(("SESSION_TTL_SECS", "60"));
        pairs.push(("PUBLISH_TIMEOUT_SECS", "5"));
        let config = Config::from_vars(vars(&pairs)).unwrap();
        assert_eq!(config.session.ttl_secs, 60);
        assert_eq!(config.publish.timeout_secs, 5);

        let mut pairs = required();
        pairs.push(("SESSION_TTL_SECS", "soon"));
        assert!(Config::from_vars(vars(&pairs)).is_err());
    }

    #[test]
    fn test_expand_vars() {
        let lookup = vars(&[("BLOGBOT_TEST_VAR", "test_value")]);
        assert_eq!(
            expand_vars("prefix_${BLOGBOT_TEST_VAR}_suffix", &lookup),
            "prefix_test_value_suffix"
        );
        assert_eq!(expand_vars("prefix_${MISSING}_suffix", &lookup), "prefix__suffix");
        assert_eq!(expand_vars("no_vars_here", &lookup), "no_vars_here");
        assert_eq!(expand_vars("${}_content", &lookup), "_content");
        assert_eq!(expand_vars("cost: $5", &lookup), "cost: $5");
    }

    #[test]
    fn test_toml_config_parsing() {
        let toml_content = r#"
[telegram]
bot_token = "${TEST_BOT_TOKEN}"
allowed_user_ids = [123456, 789012]

[publish]
api_url = "https://blog.example.com/api/posts/"
api_token = "drf"
timeout_secs = 10

[llm]
api_key = "mk"
model = "open-mistral-nemo"

[session]
ttl_secs = 900
"#;

        let config =
            Config::from_toml_str(toml_content, vars(&[("TEST_BOT_TOKEN", "999:xyz")])).unwrap();

        assert_eq!(config.telegram.bot_token, "999:xyz");
        assert_eq!(config.telegram.allowed_user_ids, vec![123456, 789012]);
        assert_eq!(config.publish.timeout_secs, 10);
        assert_eq!(config.llm.model, "open-mistral-nemo");
        assert_eq!(config.llm.base_url, "https://api.mistral.ai/v1");
        assert_eq!(config.session.ttl_secs, 900);
        assert_eq!(config.session.sweep_interval_secs, 300);
    }

    #[test]
    fn test_env_overrides_toml() {
        let toml_content = r#"
[telegram]
bot_token = "file-token"
allowed_user_ids = [1]

[publish]
api_url = "https://a.example.com/"
api_token = "file-secret"
"#;
        let config = Config::from_toml_str(
            toml_content,
            vars(&[("TELEGRAM_USER_ID", "7,8"), ("DRF_TOKEN", "env-secret")]),
        )
        .unwrap();
        assert_eq!(config.telegram.bot_token, "file-token");
        assert_eq!(config.telegram.allowed_user_ids, vec![7, 8]);
        assert_eq!(config.publish.api_token, "env-secret");
    }

    #[test]
    fn test_summary_hides_secrets() {
        let mut pairs = required();
        pairs.push(("MISTRAL_API_KEY", "super-secret-key"));
        let config = Config::from_vars(vars(&pairs)).unwrap();
        let summary = config.summary();
        assert!(summary.contains("allowed_users=2"));
        assert!(summary.contains("enabled"));
        assert!(!summary.contains("super-secret-key"));
        assert!(!summary.contains("123:abc"));
    }
}
