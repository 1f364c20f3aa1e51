//! The audit pipeline: configure, fetch users from a directory, then render the report.

use std::fmt::Write;
use std::time::Duration;

use crate::config::{Config, ConfigError, Settings, SERVICE_ROLE_KEY_VAR, URL_ALIAS_VAR, URL_VAR};
use crate::error::FetchError;
use crate::provider::{SupabaseAdminClient, UserDirectory};
use crate::report::render_report;

/// Exit status when configuration is missing or invalid.
///
/// Fetch failures never change the exit status: they are printed and the
/// run ends normally.
pub const EXIT_CONFIG_ERROR: i32 = 1;

/// Result of fetching and rendering once.
#[derive(Debug)]
pub enum AuditOutcome {
    Report { status: u16, report: String },
    Failed(FetchError),
}

impl AuditOutcome {
    /// Console text for this outcome.
    pub fn render(&self) -> String {
        match self {
            AuditOutcome::Report { status, report } => {
                format!("📡 API Response Status: {}\n\n{}", status, report)
            }
            AuditOutcome::Failed(err) => render_fetch_failure(err),
        }
    }
}

/// A configured run against one provider.
#[derive(Debug)]
pub struct AuditRun {
    pub base_url: String,
    pub outcome: AuditOutcome,
}

impl AuditRun {
    pub fn render(&self) -> String {
        format!("Supabase URL: {}\n\n{}", self.base_url, self.outcome.render())
    }
}

/// Fetch every user from `directory` and render the report.
pub async fn run(directory: &dyn UserDirectory, watch_emails: &[String]) -> AuditOutcome {
    match directory.list_users().await {
        Ok(fetched) => AuditOutcome::Report {
            status: fetched.status,
            report: render_report(&fetched.users, watch_emails),
        },
        Err(err) => {
            tracing::warn!(provider = directory.provider_name(), "User fetch failed: {}", err);
            AuditOutcome::Failed(err)
        }
    }
}

/// Load credentials through `lookup`, build the provider client and run.
///
/// Missing credentials return before any request is made.
pub async fn run_with_lookup<F>(
    lookup: F,
    settings: &Settings,
    watch_emails: &[String],
) -> Result<AuditRun, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = Config::from_lookup(lookup)?;
    tracing::info!("Checking users at {}", config.base_url);

    let client = match settings.request_timeout_secs {
        Some(secs) => SupabaseAdminClient::with_timeout(&config, Duration::from_secs(secs)),
        None => Ok(SupabaseAdminClient::new(&config)),
    };

    let outcome = match client {
        Ok(client) => run(&client, watch_emails).await,
        Err(e) => AuditOutcome::Failed(FetchError::from(e)),
    };

    Ok(AuditRun {
        base_url: config.base_url,
        outcome,
    })
}

/// Console text for a failed fetch.
pub fn render_fetch_failure(err: &FetchError) -> String {
    match err {
        FetchError::Provider { status, body } => format!(
            "📡 API Response Status: {}\n❌ Failed to fetch users: {}\nResponse: {}\n",
            status, status, body
        ),
        FetchError::Transport(message) => {
            format!("❌ Error checking auth users: {}\n", message)
        }
    }
}

/// Console text for a configuration failure, naming each missing value.
pub fn render_config_error(err: &ConfigError) -> String {
    let mut out = String::new();
    match err {
        ConfigError::MissingCredentials {
            url_missing,
            key_missing,
        } => {
            let mark = |missing: bool| if missing { "❌" } else { "✓" };
            let _ = writeln!(out, "❌ Missing Supabase credentials");
            let _ = writeln!(
                out,
                "{} (or {}): {}",
                URL_VAR,
                URL_ALIAS_VAR,
                mark(*url_missing)
            );
            let _ = writeln!(out, "{}: {}", SERVICE_ROLE_KEY_VAR, mark(*key_missing));
        }
        ConfigError::Settings(_) => {
            let _ = writeln!(out, "❌ {}", err);
        }
    }
    out
}
