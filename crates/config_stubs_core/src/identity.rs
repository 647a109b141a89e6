//! Repository identity resolution.
//!
//! Determines which remote repository the stubs are read from, either from
//! explicit configuration or from the `origin` remote of the local checkout.
//! Three input forms are accepted:
//!
//! - web URL: `https://github.com/owner/name` (trailing `.git` or extra path allowed)
//! - SSH remote: `git@github.com:owner/name.git` or `ssh://git@github.com/owner/name.git`
//! - shorthand: `owner/name`

use std::path::{Path, PathBuf};

use git2::Repository;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::errors::{ConfigurationError, LocalCheckoutError};

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;

const GITHUB_HOSTS: [&str; 2] = ["github.com", "www.github.com"];

/// Remote hosts stubs can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepositoryHost {
    GitHub,
}

/// The remote repository a build reads stubs from.
///
/// Resolved once per build and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryIdentity {
    host: RepositoryHost,
    owner: String,
    name: String,
}

impl RepositoryIdentity {
    pub fn host(&self) -> RepositoryHost {
        self.host
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the identity as `owner/name`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Parses one of the three accepted repository forms.
    ///
    /// # Errors
    ///
    /// * `ConfigurationError::UnsupportedHost` - the input is a URL or SSH
    ///   remote for a host other than GitHub.
    /// * `ConfigurationError::UnsupportedRepoFormat` - any other shape.
    pub fn parse(input: &str) -> Result<Self, ConfigurationError> {
        let trimmed = input.trim();
        let unsupported = || ConfigurationError::UnsupportedRepoFormat {
            input: input.to_string(),
        };

        if let Some(rest) = trimmed.strip_prefix("git@") {
            let (host, path) = rest.split_once(':').ok_or_else(unsupported)?;
            check_host(input, host)?;
            return Self::from_path(input, path, false);
        }

        if trimmed.contains("://") {
            let url = Url::parse(trimmed).map_err(|_| unsupported())?;
            if !matches!(url.scheme(), "https" | "http" | "ssh" | "git") {
                return Err(unsupported());
            }
            let host = url.host_str().ok_or_else(unsupported)?;
            check_host(input, host)?;
            return Self::from_path(input, url.path(), true);
        }

        Self::from_path(input, trimmed, false)
    }

    fn from_path(input: &str, path: &str, allow_extra: bool) -> Result<Self, ConfigurationError> {
        let unsupported = || ConfigurationError::UnsupportedRepoFormat {
            input: input.to_string(),
        };

        let segments: Vec<&str> = path
            .trim_start_matches('/')
            .trim_end_matches('/')
            .split('/')
            .collect();
        if segments.len() < 2 || (!allow_extra && segments.len() != 2) {
            return Err(unsupported());
        }

        let owner = segments[0];
        let name = segments[1].strip_suffix(".git").unwrap_or(segments[1]);
        if !is_valid_component(owner) || !is_valid_component(name) {
            return Err(unsupported());
        }

        Ok(Self {
            host: RepositoryHost::GitHub,
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl std::fmt::Display for RepositoryIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

fn check_host(input: &str, host: &str) -> Result<(), ConfigurationError> {
    if GITHUB_HOSTS.iter().any(|h| h.eq_ignore_ascii_case(host)) {
        Ok(())
    } else {
        Err(ConfigurationError::UnsupportedHost {
            input: input.to_string(),
            host: host.to_string(),
        })
    }
}

fn is_valid_component(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

/// Read access to the local working copy the build runs from.
pub trait LocalCheckout: Send + Sync {
    /// URL of the `origin` remote.
    fn origin_url(&self) -> Result<String, LocalCheckoutError>;

    /// Name of the checked out branch.
    fn current_branch(&self) -> Result<String, LocalCheckoutError>;

    /// Root directory of the working copy.
    fn working_directory(&self) -> Result<PathBuf, LocalCheckoutError>;
}

/// A [`LocalCheckout`] backed by a git working copy on disk.
#[derive(Debug, Clone)]
pub struct GitWorkingCopy {
    path: PathBuf,
}

impl GitWorkingCopy {
    /// Creates a working copy handle rooted at, or above, `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn open(&self) -> Result<Repository, LocalCheckoutError> {
        Repository::discover(&self.path).map_err(|e| LocalCheckoutError::NotARepository {
            path: self.path.display().to_string(),
            reason: e.message().to_string(),
        })
    }
}

impl LocalCheckout for GitWorkingCopy {
    fn origin_url(&self) -> Result<String, LocalCheckoutError> {
        let repo = self.open()?;
        let remote = repo
            .find_remote("origin")
            .map_err(|e| LocalCheckoutError::NoOrigin {
                reason: e.message().to_string(),
            })?;
        remote
            .url()
            .map(|u| u.to_string())
            .ok_or(LocalCheckoutError::InvalidUtf8 {
                what: "'origin' remote URL",
            })
    }

    fn current_branch(&self) -> Result<String, LocalCheckoutError> {
        let repo = self.open()?;
        let head = repo
            .head()
            .map_err(|e| LocalCheckoutError::UnresolvedHead {
                reason: e.message().to_string(),
            })?;
        if !head.is_branch() {
            return Err(LocalCheckoutError::DetachedHead);
        }
        head.shorthand()
            .map(|s| s.to_string())
            .ok_or(LocalCheckoutError::InvalidUtf8 { what: "branch name" })
    }

    fn working_directory(&self) -> Result<PathBuf, LocalCheckoutError> {
        let repo = self.open()?;
        repo.workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| LocalCheckoutError::NoWorkingDirectory {
                path: repo.path().display().to_string(),
            })
    }
}

/// Resolves the repository identity for a build.
///
/// Uses `repo` when supplied, otherwise the `origin` remote of `local`.
///
/// # Errors
///
/// * `ConfigurationError::NoRepository` - nothing configured and no usable
///   local remote.
/// * Any error from [`RepositoryIdentity::parse`].
pub fn resolve_repository(
    repo: Option<&str>,
    local: &dyn LocalCheckout,
) -> Result<RepositoryIdentity, ConfigurationError> {
    let identity = match repo.map(str::trim).filter(|r| !r.is_empty()) {
        Some(configured) => {
            debug!(repo = configured, "Using configured repository");
            RepositoryIdentity::parse(configured)?
        }
        None => {
            let remote = local
                .origin_url()
                .map_err(|source| ConfigurationError::NoRepository { source })?;
            debug!(remote = remote, "Inferring repository from local remote");
            RepositoryIdentity::parse(&remote)?
        }
    };

    info!(repository = %identity, "GitHub repository set");
    Ok(identity)
}
