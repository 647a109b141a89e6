//! Crate for reading refs and repository contents through the GitHub REST API.
//!
//! This crate provides a client that lists the branches and tags of a
//! repository and reads directory listings and file contents at a given ref.
//! The [`RepositoryClient`] trait is the seam consumers depend on, so that the
//! GitHub implementation can be swapped for a fake in tests.

use async_trait::async_trait;
use http::StatusCode;
use octocrab::{Octocrab, Result as OctocrabResult};
use serde::Serialize;
use tracing::{debug, error, info, instrument};

pub mod errors;
pub use errors::Error;

pub mod contents;
pub use contents::{EntryType, TreeEntry};

pub mod models;
pub use models::{GitRef, RefKind, RepositoryInfo};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// A client for reading refs and contents of GitHub repositories.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Octocrab,
}

impl GitHubClient {
    /// Creates a new `GitHubClient` from an already configured `Octocrab` instance.
    ///
    /// Use [`create_public_client`] or [`create_token_client`] to build the
    /// underlying client.
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

/// Query string for the Contents API.
#[derive(Serialize)]
struct RefQuery<'a> {
    #[serde(rename = "ref")]
    git_ref: &'a str,
}

/// Trait for the read-only repository operations needed to discover stubs.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// Lists all refs of the given kind in a repository.
    ///
    /// # Arguments
    ///
    /// * `owner` - The owner of the repository (user or organization name).
    /// * `repo` - The name of the repository.
    /// * `kind` - Whether to list branches or tags.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the repository does not exist and
    /// `Error::Unauthorized` / `Error::RateLimitExceeded` if GitHub refuses
    /// the request.
    async fn list_refs(&self, owner: &str, repo: &str, kind: RefKind)
        -> Result<Vec<GitRef>, Error>;

    /// Lists the entries of a directory at a given ref.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(entries))` - The directory exists at that ref.
    /// * `Ok(None)` - The path, or the ref itself, does not exist, or the
    ///   path is not a directory.
    async fn list_directory(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<Vec<TreeEntry>>, Error>;

    /// Gets the raw bytes of a file at a given ref.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the file does not exist at that ref and
    /// `Error::Decode` if the payload cannot be decoded.
    async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<Vec<u8>, Error>;

    /// Gets the default branch name of a repository.
    async fn get_default_branch(&self, owner: &str, repo: &str) -> Result<String, Error>;
}

#[async_trait]
impl RepositoryClient for GitHubClient {
    #[instrument(skip(self), fields(owner = %owner, repo = %repo, kind = %kind))]
    async fn list_refs(
        &self,
        owner: &str,
        repo: &str,
        kind: RefKind,
    ) -> Result<Vec<GitRef>, Error> {
        let path = format!(
            "/repos/{}/{}/git/matching-refs/{}",
            owner,
            repo,
            kind.namespace()
        );

        debug!("Making API call to: {}", path);
        let response: OctocrabResult<Vec<models::MatchingRef>> =
            self.client.get(path, None::<&()>).await;

        match response {
            Ok(entries) => {
                let refs: Vec<GitRef> = entries
                    .into_iter()
                    .filter_map(|entry| entry.into_git_ref(kind))
                    .collect();

                info!(count = refs.len(), "Retrieved refs from repository");
                Ok(refs)
            }
            Err(e) => {
                let mapped = map_octocrab_error(&e);
                log_octocrab_error("Failed to list refs", e);
                Err(mapped)
            }
        }
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, path = %path, git_ref = %git_ref))]
    async fn list_directory(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<Vec<TreeEntry>>, Error> {
        let api_path = contents_path(owner, repo, path);

        debug!("Making API call to: {}", api_path);
        let response: OctocrabResult<serde_json::Value> = self
            .client
            .get(api_path, Some(&RefQuery { git_ref }))
            .await;

        match response {
            Ok(value) if value.is_array() => {
                let entries: Vec<TreeEntry> = serde_json::from_value(value)?;
                debug!(count = entries.len(), "Directory listing received");
                Ok(Some(entries))
            }
            Ok(_) => {
                debug!("Path exists but is not a directory");
                Ok(None)
            }
            Err(e) => match map_octocrab_error(&e) {
                Error::NotFound => {
                    debug!("Directory not found at ref");
                    Ok(None)
                }
                mapped => {
                    log_octocrab_error("Failed to list directory", e);
                    Err(mapped)
                }
            },
        }
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, path = %path, git_ref = %git_ref))]
    async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<Vec<u8>, Error> {
        let api_path = contents_path(owner, repo, path);

        debug!("Making API call to: {}", api_path);
        let response: OctocrabResult<serde_json::Value> = self
            .client
            .get(api_path, Some(&RefQuery { git_ref }))
            .await;

        match response {
            Ok(value) if value.is_object() => {
                let file: contents::FileContent = serde_json::from_value(value)?;
                let bytes = file.decode()?;
                debug!(size = bytes.len(), "File content received");
                Ok(bytes)
            }
            Ok(_) => {
                error!("Expected a file but the path is a directory");
                Err(Error::InvalidResponse)
            }
            Err(e) => {
                let mapped = map_octocrab_error(&e);
                log_octocrab_error("Failed to get file content", e);
                Err(mapped)
            }
        }
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn get_default_branch(&self, owner: &str, repo: &str) -> Result<String, Error> {
        let path = format!("/repos/{}/{}", owner, repo);

        debug!("Making API call to: {}", path);
        let response: OctocrabResult<RepositoryInfo> = self.client.get(path, None::<&()>).await;

        match response {
            Ok(info) => {
                info!(
                    default_branch = info.default_branch,
                    "Successfully retrieved repository default branch"
                );
                Ok(info.default_branch)
            }
            Err(e) => {
                let mapped = map_octocrab_error(&e);
                log_octocrab_error("Failed to get repository information", e);
                Err(mapped)
            }
        }
    }
}

fn contents_path(owner: &str, repo: &str, path: &str) -> String {
    format!(
        "/repos/{}/{}/contents/{}",
        owner,
        repo,
        path.trim_matches('/')
    )
}

/// Creates an `Octocrab` client that makes unauthenticated requests.
///
/// Public repositories can be read without credentials, subject to GitHub's
/// lower anonymous rate limit.
///
/// # Arguments
///
/// * `base_uri` - Optional API base URI, used to point the client at a mock server.
///
/// # Errors
///
/// Returns an `Error::AuthError` if the client cannot be built.
#[instrument]
pub fn create_public_client(base_uri: Option<&str>) -> Result<Octocrab, Error> {
    let mut builder = Octocrab::builder();
    if let Some(uri) = base_uri {
        builder = builder
            .base_uri(uri)
            .map_err(|e| Error::AuthError(format!("Invalid base URI '{}': {}", uri, e)))?;
    }

    builder.build().map_err(|e| {
        error!(error = ?e, "Failed to build anonymous Octocrab client");
        Error::AuthError("Failed to build the GitHub client.".to_string())
    })
}

/// Creates an `Octocrab` client authenticated with a personal access token.
///
/// # Arguments
///
/// * `token` - The personal access token.
/// * `base_uri` - Optional API base URI, used to point the client at a mock server.
///
/// # Errors
///
/// Returns an `Error::AuthError` if the client cannot be built.
#[instrument(skip(token))]
pub fn create_token_client(token: &str, base_uri: Option<&str>) -> Result<Octocrab, Error> {
    let mut builder = Octocrab::builder().personal_token(token.to_string());
    if let Some(uri) = base_uri {
        builder = builder
            .base_uri(uri)
            .map_err(|e| Error::AuthError(format!("Invalid base URI '{}': {}", uri, e)))?;
    }

    builder.build().map_err(|e| {
        error!(error = ?e, "Failed to build token authenticated Octocrab client");
        Error::AuthError("Failed to build the GitHub client with the provided token.".to_string())
    })
}

/// Maps an octocrab failure onto this crate's error type.
///
/// The HTTP status decides whether a failure concerns a single resource
/// (404) or the whole repository (401, 403, 429).
fn map_octocrab_error(e: &octocrab::Error) -> Error {
    match e {
        octocrab::Error::GitHub { source, .. } => {
            let message = source.message.to_lowercase();
            match source.status_code {
                StatusCode::NOT_FOUND => Error::NotFound,
                StatusCode::UNAUTHORIZED => Error::Unauthorized(source.message.clone()),
                StatusCode::TOO_MANY_REQUESTS => Error::RateLimitExceeded,
                StatusCode::FORBIDDEN if message.contains("rate limit") => {
                    Error::RateLimitExceeded
                }
                StatusCode::FORBIDDEN => Error::Unauthorized(source.message.clone()),
                _ => Error::ApiError(),
            }
        }
        octocrab::Error::Serde { .. } | octocrab::Error::Json { .. } => Error::InvalidResponse,
        other => Error::Network(other.to_string()),
    }
}

fn log_octocrab_error(message: &str, e: octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, backtrace } => {
            let err = source;
            error!(
                error_message = err.message,
                status = err.status_code.as_u16(),
                backtrace = backtrace.to_string(),
                "{}. Received an error from GitHub",
                message
            )
        }
        octocrab::Error::UriParse { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. Failed to parse URI.",
            message
        ),
        octocrab::Error::Uri { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}, Failed to parse URI.",
            message
        ),
        octocrab::Error::InvalidUtf8 { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. The message wasn't valid UTF-8.",
            message,
        ),
        _ => error!(error_message = e.to_string(), message),
    };
}
