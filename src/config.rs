use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Port used by a locally hosted workflow engine
pub const LOCAL_WEBHOOK_PORT: u16 = 5678;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
    #[serde(default)]
    pub support: SupportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Where tickets are posted and how the request authenticates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Full override URL, used only when `use_custom_url` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default)]
    pub use_custom_url: bool,

    /// Host the default URL is derived from
    #[serde(default = "default_webhook_host")]
    pub host: String,

    #[serde(default = "default_webhook_path")]
    pub path: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_webhook_timeout")]
    pub timeout_secs: u64,

    /// Authentication type: "none", "bearer" or "basic"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,

    /// Environment variable holding the bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Environment variable holding the basic auth password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,
}

fn default_webhook_host() -> String {
    "localhost".to_string()
}

fn default_webhook_path() -> String {
    "/webhook/medical-it-support".to_string()
}

fn default_webhook_timeout() -> u64 {
    30
}

/// Shortest request timeout a sender will use; 0 would fail every request
pub const MIN_TIMEOUT_SECS: u64 = 1;

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            use_custom_url: false,
            host: default_webhook_host(),
            path: default_webhook_path(),
            timeout_secs: default_webhook_timeout(),
            auth_type: None,
            token_env: None,
            username: None,
            password_env: None,
        }
    }
}

impl WebhookConfig {
    /// URL derived from `host` and `path`. Local hosts talk plain HTTP to
    /// the workflow engine's default port.
    pub fn default_url(&self) -> String {
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };
        match self.host.as_str() {
            "localhost" | "127.0.0.1" => {
                format!("http://localhost:{LOCAL_WEBHOOK_PORT}{path}")
            }
            host => format!("https://{host}{path}"),
        }
    }

    /// The URL submissions go to: the custom override when enabled,
    /// otherwise the derived default
    pub fn resolved_url(&self) -> String {
        match (&self.url, self.use_custom_url) {
            (Some(url), true) if !url.trim().is_empty() => url.trim().to_string(),
            _ => self.default_url(),
        }
    }

    /// Validate and enable a custom webhook URL
    pub fn set_custom_url(&mut self, url: &str) -> Result<()> {
        let parsed =
            reqwest::Url::parse(url.trim()).with_context(|| format!("Invalid webhook URL: {url}"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "Webhook URL must use http or https, got '{}'",
                parsed.scheme()
            );
        }
        self.url = Some(parsed.to_string());
        self.use_custom_url = true;
        Ok(())
    }

    /// Drop the custom URL and return to the derived default
    pub fn reset_url(&mut self) {
        self.url = None;
        self.use_custom_url = false;
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(MIN_TIMEOUT_SECS))
    }
}

/// Retry budget for ticket submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Extra attempts after the first one fails
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Fixed delay between attempts in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_max_retries() -> usize {
    2
}

fn default_retry_delay_ms() -> u64 {
    2000
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl SubmissionConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Human support fallback named in failure messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportConfig {
    #[serde(default = "default_contact_email")]
    pub contact_email: String,
}

fn default_contact_email() -> String {
    "support@medicalclinic.com".to_string()
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            contact_email: default_contact_email(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to file in TUI mode (false = stderr for debugging)
    #[serde(default = "default_log_to_file")]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: default_log_to_file(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for logs and local state
    #[serde(default = "default_state_path")]
    pub state: String,
}

fn default_state_path() -> String {
    ".clinic-intake".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state: default_state_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Event poll interval for the terminal UI
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

fn default_tick_rate() -> u64 {
    250
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
        }
    }
}

impl Config {
    /// Path to the project-local config file
    pub fn local_config_path() -> PathBuf {
        PathBuf::from(".clinic-intake/config.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so the wizard works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        let local_config = Self::local_config_path();
        if local_config.exists() {
            builder = builder.add_source(config::File::from(local_config));
        }

        // User config in ~/.config/clinic-intake/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("clinic-intake").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::from(PathBuf::from(path)));
        }

        // Environment variables such as INTAKE__WEBHOOK__HOST
        builder = builder.add_source(
            config::Environment::with_prefix("INTAKE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Save config to `.clinic-intake/config.toml`
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::local_config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create config directory")?;
            }
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        std::fs::write(config_path, toml_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        tracing::info!(path = %config_path.display(), "Saved configuration");
        Ok(())
    }

    pub fn state_path(&self) -> PathBuf {
        PathBuf::from(&self.paths.state)
    }

    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webhook: WebhookConfig::default(),
            submission: SubmissionConfig::default(),
            support: SupportConfig::default(),
            logging: LoggingConfig::default(),
            paths: PathsConfig::default(),
            ui: UiConfig::default(),
        }
    }
}
