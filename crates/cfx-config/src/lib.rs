//! Configuration management for cfx.
//!
//! Parses `cfx.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. Settings missing
//! from the file fall back to environment variables, and CLI settings are
//! applied last via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `confluence.base_url`
//! - `confluence.username`
//! - `confluence.api_token`
//! - `logging.level`
//!
//! ## Environment Fallbacks
//!
//! | Variable | Field |
//! |----------|-------|
//! | `CONFLUENCE_URL` | `confluence.base_url` |
//! | `CONFLUENCE_USERNAME` | `confluence.username` |
//! | `CONFLUENCE_PAT`, `CONFLUENCE_API_TOKEN` | `confluence.api_token` |
//! | `LOG_LEVEL` | `logging.level` |
//! | `DEBUG` | `logging.debug` |

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override Confluence base URL.
    pub base_url: Option<String>,
    /// Override HTTP timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Override retry attempt limit.
    pub max_attempts: Option<u32>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "cfx.toml";

/// Environment variables consulted for unset fields, in lookup order.
const ENV_BASE_URL: &str = "CONFLUENCE_URL";
const ENV_USERNAME: &str = "CONFLUENCE_USERNAME";
const ENV_API_TOKEN: [&str; 2] = ["CONFLUENCE_PAT", "CONFLUENCE_API_TOKEN"];
const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
const ENV_DEBUG: &str = "DEBUG";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Confluence connection.
    pub confluence: ConfluenceConfig,
    /// Retry policy.
    pub retry: RetryConfig,
    /// Log output.
    pub logging: LoggingConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Confluence connection configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConfluenceConfig {
    /// Confluence base URL (e.g. `https://example.atlassian.net/wiki`).
    pub base_url: String,
    /// Account name for Basic auth. Bearer auth is used when empty.
    pub username: Option<String>,
    /// API token or personal access token.
    pub api_token: String,
    /// Per-request HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ConfluenceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            username: None,
            api_token: String::new(),
            timeout_secs: 30,
        }
    }
}

impl ConfluenceConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.base_url, "confluence.base_url")?;
        require_http_url(&self.base_url, "confluence.base_url")?;
        require_non_empty(&self.api_token, "confluence.api_token")?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "confluence.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Per-request HTTP timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Username if one is configured.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref().filter(|u| !u.is_empty())
    }
}

/// Retry policy configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts per call, including the first.
    pub max_attempts: u32,
    /// Bound on total time per call, in seconds.
    pub max_elapsed_secs: u64,
    /// Delay before the first retry, in milliseconds.
    pub initial_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            max_elapsed_secs: 30,
            initial_delay_ms: 500,
        }
    }
}

impl RetryConfig {
    /// Bound on total time per call.
    #[must_use]
    pub fn max_elapsed(&self) -> Duration {
        Duration::from_secs(self.max_elapsed_secs)
    }

    /// Delay before the first retry.
    #[must_use]
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }
}

/// Logging configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive (e.g. `info`, `cfx_confluence=debug`).
    pub level: Option<String>,
    /// Force debug output regardless of `level`.
    pub debug: bool,
}

impl LoggingConfig {
    /// Effective filter directive.
    ///
    /// Level names are lowercased; `warning` and `critical` are accepted as
    /// aliases for `warn` and `error`.
    #[must_use]
    pub fn filter(&self) -> String {
        if self.debug {
            return "debug".to_owned();
        }
        let level = self
            .level
            .as_deref()
            .map(str::trim)
            .filter(|level| !level.is_empty())
            .map_or_else(|| "info".to_owned(), str::to_lowercase);
        match level.as_str() {
            "warning" => "warn".to_owned(),
            "critical" | "fatal" => "error".to_owned(),
            _ => level,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`confluence.api_token`").
        field: String,
        /// Error message (e.g., "${`CONFLUENCE_PAT`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Whether an environment flag value means "on".
fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "y"
    )
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `cfx.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or a referenced environment variable is unset.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        Self::load_with_env(config_path, cli_settings, &process_env)
    }

    /// Like [`load`](Self::load), resolving environment variables through
    /// `env` instead of the process environment.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn load_with_env(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path, env)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered, env)?
        } else {
            Self::default()
        };

        config.apply_env_fallbacks(env);

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(base_url) = &settings.base_url {
            self.confluence.base_url.clone_from(base_url);
        }
        if let Some(timeout_secs) = settings.timeout_secs {
            self.confluence.timeout_secs = timeout_secs;
        }
        if let Some(max_attempts) = settings.max_attempts {
            self.retry.max_attempts = max_attempts;
        }
    }

    /// Fill fields left empty by the config file from the environment.
    fn apply_env_fallbacks(&mut self, env: &dyn Fn(&str) -> Option<String>) {
        let lookup = |name: &str| env(name).filter(|value| !value.is_empty());

        if self.confluence.base_url.is_empty()
            && let Some(base_url) = lookup(ENV_BASE_URL)
        {
            self.confluence.base_url = base_url;
        }
        if self.confluence.username().is_none() {
            self.confluence.username = lookup(ENV_USERNAME);
        }
        if self.confluence.api_token.is_empty()
            && let Some(token) = ENV_API_TOKEN.into_iter().find_map(lookup)
        {
            self.confluence.api_token = token;
        }
        if self.logging.level.is_none() {
            self.logging.level = lookup(ENV_LOG_LEVEL);
        }
        if !self.logging.debug {
            self.logging.debug = lookup(ENV_DEBUG).is_some_and(|value| is_truthy(&value));
        }
    }

    /// Get validated Confluence configuration.
    ///
    /// Use this instead of accessing the `confluence` field directly when
    /// the command needs to talk to the server.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the URL or token is missing or invalid.
    pub fn require_confluence(&self) -> Result<&ConfluenceConfig, ConfigError> {
        self.confluence.validate()?;
        Ok(&self.confluence)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(
        path: &Path,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.expand_env_vars(env)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Credentials are checked separately by [`require_confluence`](Self::require_confluence)
    /// so commands that never reach the server work without them.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "retry.max_attempts must be at least 1".to_owned(),
            ));
        }
        if self.retry.initial_delay_ms == 0 {
            return Err(ConfigError::Validation(
                "retry.initial_delay_ms must be at least 1".to_owned(),
            ));
        }
        if !self.confluence.base_url.is_empty() {
            require_http_url(&self.confluence.base_url, "confluence.base_url")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self, env: &dyn Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let confluence = &mut self.confluence;
        confluence.base_url = expand::expand_env(&confluence.base_url, "confluence.base_url", env)?;
        confluence.api_token =
            expand::expand_env(&confluence.api_token, "confluence.api_token", env)?;
        if let Some(ref username) = confluence.username {
            confluence.username = Some(expand::expand_env(username, "confluence.username", env)?);
        }

        if let Some(ref level) = self.logging.level {
            self.logging.level = Some(expand::expand_env(level, "logging.level", env)?);
        }

        Ok(())
    }
}
