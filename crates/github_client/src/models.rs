//! # Models
//!
//! Data models for the Git refs and repository metadata read from GitHub.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// The kind of a Git ref.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    /// A branch, stored under `refs/heads/`
    Branch,
    /// A tag, stored under `refs/tags/`
    Tag,
}

impl RefKind {
    /// The namespace GitHub uses for this kind of ref in the matching-refs API.
    pub fn namespace(&self) -> &'static str {
        match self {
            RefKind::Branch => "heads",
            RefKind::Tag => "tags",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            RefKind::Branch => "refs/heads/",
            RefKind::Tag => "refs/tags/",
        }
    }
}

impl std::fmt::Display for RefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefKind::Branch => write!(f, "branch"),
            RefKind::Tag => write!(f, "tag"),
        }
    }
}

/// A branch or tag of a remote repository.
///
/// # Examples
///
/// ```
/// use github_client::models::{GitRef, RefKind};
///
/// let git_ref = GitRef::new("release-1.0", RefKind::Tag, Some("a1b2c3".to_string()));
/// assert_eq!(git_ref.revision(), "a1b2c3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GitRef {
    /// Short name of the ref, without the `refs/heads/` or `refs/tags/` prefix
    pub name: String,
    /// Whether this is a branch or a tag
    pub kind: RefKind,
    /// Commit (or tag object) the ref points at, when known
    pub sha: Option<String>,
}

impl GitRef {
    pub fn new(name: impl Into<String>, kind: RefKind, sha: Option<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            sha,
        }
    }

    /// The revision to read contents at.
    ///
    /// Prefers the SHA so that every read for a ref sees the same snapshot,
    /// even if the ref moves while the build runs.
    pub fn revision(&self) -> &str {
        self.sha.as_deref().unwrap_or(&self.name)
    }
}

impl std::fmt::Display for GitRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.sha {
            Some(sha) => write!(f, "{} ({})", self.name, sha),
            None => write!(f, "{}", self.name),
        }
    }
}

/// One element of the `git/matching-refs` response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MatchingRef {
    #[serde(rename = "ref")]
    pub full_name: String,
    pub object: RefObject,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RefObject {
    pub sha: String,
}

impl MatchingRef {
    /// Converts the API representation into a [`GitRef`] of the requested kind.
    ///
    /// Returns `None` when the full ref name is not in the expected namespace.
    pub(crate) fn into_git_ref(self, kind: RefKind) -> Option<GitRef> {
        let name = self.full_name.strip_prefix(kind.prefix())?.to_string();
        if name.is_empty() {
            return None;
        }
        Some(GitRef {
            name,
            kind,
            sha: Some(self.object.sha),
        })
    }
}

/// Repository metadata needed to resolve the main website branch.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepositoryInfo {
    /// The full name of the repository (owner/name)
    pub full_name: String,
    /// The repository's default branch
    pub default_branch: String,
}
