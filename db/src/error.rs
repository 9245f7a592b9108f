use thiserror::Error;

/// Failure of an external store or warehouse call.
///
/// The `Display` text is what clients receive, so variants carry the
/// upstream message as-is.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to load service account credentials: {0}")]
    Credentials(String),

    #[error("Failed to obtain access token: {0}")]
    Auth(String),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response from backend: {0}")]
    Decode(String),

    #[error("{0}")]
    Backend(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Decode(e.to_string())
    }
}
