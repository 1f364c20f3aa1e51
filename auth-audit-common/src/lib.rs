//! Auth Audit Common Types
//!
//! Wire types returned by the authentication provider's admin API.

pub mod user;

pub use user::{AdminUsersResponse, UserRecord};
