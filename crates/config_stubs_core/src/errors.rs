//! Error types for stub discovery and integration.
//!
//! Configuration errors are always fatal and surface before any remote work
//! is done. Remote failures are fatal only when they concern the whole
//! repository; per-ref failures never reach this type and are logged instead.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Invalid or unusable configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Unsupported repo format: '{input}'")]
    UnsupportedRepoFormat { input: String },

    #[error("Unsupported host '{host}' in repo '{input}'")]
    UnsupportedHost { input: String, host: String },

    #[error("No repo configured and no local remote: {source}")]
    NoRepository {
        #[source]
        source: LocalCheckoutError,
    },

    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid stubs_nav_path '{value}': {reason}")]
    InvalidNavPath { value: String, reason: String },

    #[error("Invalid stubs_parent_url '{value}': {reason}")]
    InvalidParentUrl { value: String, reason: String },

    #[error("Invalid file format '{value}': {reason}")]
    InvalidFileFormat { value: String, reason: String },

    #[error("Invalid configuration: {field} - {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Failures inspecting the local working copy.
///
/// None of these abort a build on their own: the caller decides whether the
/// missing information is needed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocalCheckoutError {
    #[error("No git repository at '{path}': {reason}")]
    NotARepository { path: String, reason: String },

    #[error("No 'origin' remote: {reason}")]
    NoOrigin { reason: String },

    #[error("HEAD cannot be resolved: {reason}")]
    UnresolvedHead { reason: String },

    #[error("HEAD is detached")]
    DetachedHead,

    #[error("The {what} is not valid UTF-8")]
    InvalidUtf8 { what: &'static str },

    #[error("The repository at '{path}' has no working directory")]
    NoWorkingDirectory { path: String },
}

/// Errors that abort a stub build.
#[derive(Error, Debug)]
pub enum StubsError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A remote failure that affects the whole repository, such as rejected
    /// credentials, rate limiting, or a repository that does not exist.
    #[error("Remote access failed during {operation}: {source}")]
    RemoteAccess {
        operation: String,
        #[source]
        source: github_client::Error,
    },

    #[error("Failed to register documents with the site: {reason}")]
    Sink { reason: String },

    #[error("Build stage '{stage}' failed: {reason}")]
    Stage { stage: String, reason: String },
}

impl StubsError {
    pub(crate) fn remote(operation: impl Into<String>, source: github_client::Error) -> Self {
        StubsError::RemoteAccess {
            operation: operation.into(),
            source,
        }
    }
}

/// Result type alias for stub operations.
pub type StubsResult<T> = Result<T, StubsError>;
