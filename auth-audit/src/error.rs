//! Error types for fetching users from the provider.

/// Failure while fetching the user list.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The provider answered with a status other than 200.
    #[error("Provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    /// The request never produced a usable response (connection, timeout, bad body).
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Transport(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
