//! Configuration for the auth audit tool.
//!
//! Provider credentials come from the process environment. Tool settings
//! (log level, default watch list, request timeout) are layered with the
//! `config` crate.

use std::env;
use std::fmt;
use std::path::Path;

use config::{Config as ConfigLoader, Environment, File, Map};
use serde::Deserialize;

/// Canonical variable for the provider base URL.
pub const URL_VAR: &str = "SUPABASE_URL";
/// Accepted synonym for [`URL_VAR`]; `SUPABASE_URL` wins when both are set.
pub const URL_ALIAS_VAR: &str = "NEXT_PUBLIC_SUPABASE_URL";
/// Service-role secret used as both bearer token and `apikey`.
pub const SERVICE_ROLE_KEY_VAR: &str = "SUPABASE_SERVICE_ROLE_KEY";

/// Settings file looked up in the working directory (any format `config` supports).
const SETTINGS_FILE: &str = "auth-audit";

/// Provider credentials.
#[derive(Clone)]
pub struct Config {
    /// Provider base URL without a trailing slash.
    pub base_url: String,
    pub service_role_key: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("service_role_key", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Load credentials from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load credentials through an arbitrary variable lookup.
    ///
    /// Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let canonical = non_empty(URL_VAR);
        let alias = non_empty(URL_ALIAS_VAR);
        if let (Some(c), Some(a)) = (&canonical, &alias) {
            if c != a {
                tracing::debug!(
                    "Both {} and {} are set and differ, using {}",
                    URL_VAR,
                    URL_ALIAS_VAR,
                    URL_VAR
                );
            }
        }
        let base_url = canonical.or(alias);
        let service_role_key = non_empty(SERVICE_ROLE_KEY_VAR);

        match (base_url, service_role_key) {
            (Some(url), Some(key)) => Ok(Config {
                base_url: url.trim_end_matches('/').to_string(),
                service_role_key: key,
            }),
            (url, key) => Err(ConfigError::MissingCredentials {
                url_missing: url.is_none(),
                key_missing: key.is_none(),
            }),
        }
    }
}

/// Optional tool settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emails to check when none are given on the command line.
    #[serde(default)]
    pub watch_emails: Vec<String>,
    /// Request timeout. Unset keeps the HTTP client's default.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            watch_emails: vec![],
            request_timeout_secs: None,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Settings {
    /// Load settings from defaults, `auth-audit.toml` (if present) and the environment.
    ///
    /// Sources (in order of precedence):
    /// 1. Environment variables (AUTH_AUDIT__KEY format, lists comma separated)
    /// 2. auth-audit.toml in the working directory
    /// 3. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(File::with_name(SETTINGS_FILE).required(false), None)
    }

    /// Load settings from an explicit file, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::build(File::from(path).required(true), None)
    }

    /// `env_vars` replaces the process environment when given.
    fn build<S>(file: S, env_vars: Option<Map<String, String>>) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = ConfigLoader::builder()
            .set_default("log_level", default_log_level())?
            .add_source(file)
            .add_source(
                Environment::with_prefix("AUTH_AUDIT")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("watch_emails")
                    .try_parsing(true)
                    .source(env_vars),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

/// Emails given on the command line replace the configured watch list.
pub fn select_watch_list(args: Vec<String>, settings: &Settings) -> Vec<String> {
    if args.is_empty() {
        settings.watch_emails.clone()
    } else {
        args
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing Supabase credentials: {}", missing_names(*url_missing, *key_missing).join(", "))]
    MissingCredentials { url_missing: bool, key_missing: bool },
    #[error("Invalid settings: {0}")]
    Settings(#[from] config::ConfigError),
}

impl ConfigError {
    /// Names of the variables that were missing, canonical names only.
    pub fn missing_vars(&self) -> Vec<&'static str> {
        match self {
            ConfigError::MissingCredentials {
                url_missing,
                key_missing,
            } => missing_names(*url_missing, *key_missing),
            ConfigError::Settings(_) => vec![],
        }
    }
}

fn missing_names(url_missing: bool, key_missing: bool) -> Vec<&'static str> {
    let mut names = Vec::new();
    if url_missing {
        names.push(URL_VAR);
    }
    if key_missing {
        names.push(SERVICE_ROLE_KEY_VAR);
    }
    names
}
