//! Configuration management for BalanceWatch
//!
//! Settings are layered: built-in defaults, an optional TOML file, then
//! `BALANCEWATCH_<SECTION>__<FIELD>` environment variables. Command-line
//! flags are applied on top by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

/// Environment variable prefix for layered settings
pub const ENV_PREFIX: &str = "BALANCEWATCH";

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Account being watched and where to report it
    pub target: TargetConfig,

    /// Balance provider configuration
    pub provider: ProviderConfig,

    /// Telegram configuration
    pub telegram: TelegramConfig,

    /// Poll loop configuration
    pub watcher: WatcherConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from defaults, an optional file and the environment.
    ///
    /// An explicit `path` must exist. Without one, the platform config
    /// directory is searched for `config.toml` and used only if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`Config::load`], reading variables from `env` instead of the
    /// process environment when given.
    ///
    /// Environment values always stay strings: target values such as `007`
    /// or `1.50` must reach the target verbatim.
    pub fn load_with_env(path: Option<&Path>, env: Option<::config::Map<String, String>>) -> Result<Self> {
        let mut builder = ::config::Config::builder();

        match path {
            Some(path) => {
                debug!(path = %path.display(), "Loading configuration file");
                builder = builder.add_source(::config::File::from(path).required(true));
            }
            None => {
                if let Some(path) = default_config_path() {
                    debug!(path = %path.display(), "Checking default configuration file");
                    builder = builder.add_source(::config::File::from(path).required(false));
                }
            }
        }

        let config: Self = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check values that have no sensible fallback.
    ///
    /// The target is validated separately, when a command needs it.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.provider.base_url)?;
        Url::parse(&self.telegram.api_base_url)?;

        if self.watcher.interval.is_zero() {
            return Err(Error::config("watcher.interval must be greater than zero"));
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(Error::config(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{other}\""
            ))),
        }
    }
}

/// Location of the implicit configuration file
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "balancewatch")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Raw, unvalidated description of the watched account
///
/// All six values are required; see [`crate::models::WatchTarget`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Address to monitor
    pub address: Option<String>,
    /// Balance provider API key
    pub api_key: Option<String>,
    /// Ledger symbol as used in provider URLs (e.g. `ltc`)
    pub coin: Option<String>,
    /// Telegram chat or channel id
    pub chat_id: Option<String>,
    /// Telegram bot token
    pub token: Option<String>,
    /// Display name used in messages
    pub name: Option<String>,
}

/// Balance provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Explorer API base URL
    pub base_url: String,
    /// Summary payloads at or below this size mean the provider is down
    pub min_summary_bytes: usize,
    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://chainz.cryptoid.info".to_string(),
            min_summary_bytes: 100,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Telegram configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot API base URL
    pub api_base_url: String,
    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.telegram.org".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// How the first successful reading is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StartupMode {
    /// Record the first reading without notifying
    #[default]
    Seed,
    /// Compare the first reading against zero, reporting any existing
    /// balance as a deposit
    CompareFromZero,
}

/// Poll loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Time between cycles
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    /// First-cycle behaviour
    pub startup: StartupMode,
    /// Stop the watcher when a notification cannot be delivered
    pub exit_on_delivery_failure: bool,
    /// How long an in-flight cycle may run after a stop request
    #[serde(with = "humantime_serde")]
    pub shutdown_grace: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            startup: StartupMode::Seed,
            exit_on_delivery_failure: false,
            shutdown_grace: Duration::from_secs(30),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (json or pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn isolated(path: &Path) -> Result<Config> {
        Config::load_with_env(Some(path), Some(::config::Map::new()))
    }

    fn env(vars: &[(&str, &str)]) -> ::config::Map<String, String> {
        vars.iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.watcher.interval, Duration::from_secs(60));
        assert_eq!(config.watcher.startup, StartupMode::Seed);
        assert!(!config.watcher.exit_on_delivery_failure);
        assert_eq!(config.provider.min_summary_bytes, 100);
        assert!(config.target.address.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
[target]
address = "LTCaddr"
coin = "ltc"
name = "savings"

[watcher]
interval = "5m"
startup = "compare-from-zero"
shutdown_grace = "10s"

[logging]
format = "json"
"#,
        );

        let config = isolated(file.path()).unwrap();

        assert_eq!(config.target.address.as_deref(), Some("LTCaddr"));
        assert_eq!(config.target.coin.as_deref(), Some("ltc"));
        assert_eq!(config.target.name.as_deref(), Some("savings"));
        assert!(config.target.token.is_none());
        assert_eq!(config.watcher.interval, Duration::from_secs(300));
        assert_eq!(config.watcher.startup, StartupMode::CompareFromZero);
        assert_eq!(config.watcher.shutdown_grace, Duration::from_secs(10));
        assert_eq!(config.logging.format, "json");
        // untouched sections keep their defaults
        assert_eq!(config.provider.base_url, "https://chainz.cryptoid.info");
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        assert!(matches!(
            isolated(&missing),
            Err(Error::Settings(_))
        ));
    }

    #[test]
    fn test_rejects_bad_provider_url() {
        let file = write_config("[provider]\nbase_url = \"not a url\"\n");

        assert!(matches!(isolated(file.path()), Err(Error::Url(_))));
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = write_config("[target]\nname = \"savings\"\ncoin = \"ltc\"\n");

        let config = Config::load_with_env(
            Some(file.path()),
            Some(env(&[
                ("BALANCEWATCH_TARGET__NAME", "vault"),
                ("BALANCEWATCH_WATCHER__INTERVAL", "2m"),
                ("BALANCEWATCH_WATCHER__EXIT_ON_DELIVERY_FAILURE", "true"),
                ("BALANCEWATCH_PROVIDER__MIN_SUMMARY_BYTES", "250"),
                ("UNRELATED_TARGET__NAME", "ignored"),
            ])),
        )
        .unwrap();

        assert_eq!(config.target.name.as_deref(), Some("vault"));
        assert_eq!(config.target.coin.as_deref(), Some("ltc"));
        assert_eq!(config.watcher.interval, Duration::from_secs(120));
        assert!(config.watcher.exit_on_delivery_failure);
        assert_eq!(config.provider.min_summary_bytes, 250);
    }

    #[test]
    fn test_environment_target_values_stay_verbatim() {
        let file = write_config("");

        let config = Config::load_with_env(
            Some(file.path()),
            Some(env(&[
                ("BALANCEWATCH_TARGET__NAME", "007"),
                ("BALANCEWATCH_TARGET__API_KEY", "0123456789"),
                ("BALANCEWATCH_TARGET__ADDRESS", "1.50"),
                ("BALANCEWATCH_TARGET__CHAT_ID", "-100123"),
                ("BALANCEWATCH_TARGET__TOKEN", "true"),
            ])),
        )
        .unwrap();

        assert_eq!(config.target.name.as_deref(), Some("007"));
        assert_eq!(config.target.api_key.as_deref(), Some("0123456789"));
        assert_eq!(config.target.address.as_deref(), Some("1.50"));
        assert_eq!(config.target.chat_id.as_deref(), Some("-100123"));
        assert_eq!(config.target.token.as_deref(), Some("true"));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let mut config = Config::default();
        config.watcher.interval = Duration::ZERO;

        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("xml"));
    }
}
