//! User records as returned by the provider's admin users endpoint.

use serde::{Deserialize, Deserializer, Serialize};

/// One registered user, projected from the admin API payload.
///
/// Records are deserialized verbatim and only read. Fields the provider
/// sends beyond these are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    /// Creation timestamp, kept as the provider formatted it.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
    #[serde(default)]
    pub email_confirmed_at: Option<String>,
    #[serde(default)]
    pub last_sign_in_at: Option<String>,
}

impl UserRecord {
    /// A user is confirmed iff the provider recorded a confirmation time.
    pub fn is_confirmed(&self) -> bool {
        self.email_confirmed_at.is_some()
    }

    /// Case-sensitive exact match on the email field.
    pub fn has_email(&self, email: &str) -> bool {
        self.email.as_deref() == Some(email)
    }
}

/// Treat an explicit `null` like a missing field.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of a successful `GET /auth/v1/admin/users`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminUsersResponse {
    #[serde(default)]
    pub users: Vec<UserRecord>,
}
