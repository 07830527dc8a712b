use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Server returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Still waiting after {0} polls")]
    Timeout(u32),
}

impl ClientError {
    /// The server refused because not everyone is done voting
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::ApiError { status: 409, .. })
    }
}
