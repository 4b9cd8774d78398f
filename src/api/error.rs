use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// An authenticated request was attempted with no stored token.
    /// Raised before any network activity.
    #[error("no token found")]
    MissingToken,

    /// The stored token contains bytes that cannot be sent in a header.
    #[error("stored token is not a valid header value")]
    InvalidToken,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}
