//! Error types for GitHub client operations.
//!
//! This module defines the error types that can occur when reading refs and
//! repository contents through the GitHub API. Callers use
//! [`Error::is_repository_wide`] to decide whether a failure concerns a single
//! ref or the whole repository.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitHub client operations.
///
/// ## Examples
///
/// ```rust,ignore
/// use github_client::Error;
///
/// match client.list_directory("owner", "repo", "documentation/stub", "dev-1").await {
///     Ok(Some(entries)) => println!("{} entries", entries.len()),
///     Ok(None) => println!("no stub directory at this ref"),
///     Err(e) if e.is_repository_wide() => eprintln!("fatal: {}", e),
///     Err(e) => eprintln!("skipping ref: {}", e),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A generic API request failure.
    #[error("API request failed")]
    ApiError(),

    /// GitHub client initialization failure.
    ///
    /// The contained string provides specific details about the failure.
    #[error("Failed to authenticate or initialize GitHub client: {0}")]
    AuthError(String),

    /// Error deserializing the response from GitHub.
    #[error("Failed to deserialize GitHub response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The content of a file could not be decoded.
    ///
    /// GitHub returns file content base64 encoded. This error occurs when
    /// the encoding is not supported or the payload is corrupt.
    #[error("Failed to decode file content: {0}")]
    Decode(String),

    /// The GitHub API returned a response in an unexpected format.
    #[error("Invalid response format")]
    InvalidResponse,

    /// The request could not reach GitHub or the connection failed mid-way.
    #[error("Network error: {0}")]
    Network(String),

    /// The requested resource was not found.
    ///
    /// This error occurs when a GitHub API request returns a 404 status code,
    /// indicating that the requested resource (repository, ref, file, directory)
    /// does not exist or is not accessible with the current authentication.
    #[error("Resource not found")]
    NotFound,

    /// GitHub API rate limit has been exceeded.
    ///
    /// Anonymous requests are limited to 60 per hour. Supplying a token raises
    /// the limit considerably.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The credentials were rejected or do not grant access to the repository.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl Error {
    /// Returns `true` when the failure affects every request against the
    /// repository rather than a single ref.
    ///
    /// Authentication, authorization and rate limiting failures will not go
    /// away by moving on to the next ref, so they abort the build.
    pub fn is_repository_wide(&self) -> bool {
        matches!(
            self,
            Error::AuthError(_) | Error::RateLimitExceeded | Error::Unauthorized(_)
        )
    }
}
