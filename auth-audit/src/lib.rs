//! Auth Audit - lists the users registered with a Supabase project and
//! checks whether expected test accounts exist.

pub mod audit;
pub mod config;
pub mod error;
pub mod logging;
pub mod provider;
pub mod report;

pub use audit::{run, run_with_lookup, AuditOutcome, AuditRun};
pub use config::{Config, ConfigError, Settings};
pub use error::FetchError;
pub use provider::{FetchedUsers, SupabaseAdminClient, UserDirectory};
pub use report::{check_watch_list, render_report, WatchStatus};
