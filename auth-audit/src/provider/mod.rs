//! Provider abstraction layer.
//!
//! The `UserDirectory` trait hides the admin API behind a single call so the
//! audit pipeline can run against the real provider or a stand-in.

mod supabase;

pub use supabase::SupabaseAdminClient;

use async_trait::async_trait;
use auth_audit_common::UserRecord;

use crate::error::Result;

/// Users returned by a successful fetch, with the HTTP status observed.
#[derive(Debug, Clone)]
pub struct FetchedUsers {
    pub status: u16,
    pub users: Vec<UserRecord>,
}

/// Source of registered authentication users.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Short name of the backing provider, used in logs.
    fn provider_name(&self) -> &'static str;

    /// Fetch every registered user, in provider order.
    async fn list_users(&self) -> Result<FetchedUsers>;
}
