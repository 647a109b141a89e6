//! Repository contents domain types.
//!
//! This module contains types for working with GitHub repository contents
//! at a given ref: directory listings and single file payloads.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::Error;

#[cfg(test)]
#[path = "contents_tests.rs"]
mod tests;

/// A single entry in a GitHub repository directory listing.
///
/// Represents files, directories, symlinks, and submodules returned by
/// the GitHub Contents API.
///
/// # Examples
///
/// ```rust
/// use github_client::{TreeEntry, EntryType};
///
/// let entry = TreeEntry {
///     name: "overview.md".to_string(),
///     path: "documentation/stub/overview.md".to_string(),
///     entry_type: EntryType::File,
///     sha: "abc123".to_string(),
///     size: 512,
///     download_url: None,
/// };
///
/// assert!(entry.is_file());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Entry name (e.g., "overview.md")
    pub name: String,

    /// Full path within repository (e.g., "documentation/stub/overview.md")
    pub path: String,

    /// Entry type (file, directory, symlink, submodule)
    #[serde(rename = "type")]
    pub entry_type: EntryType,

    /// Git SHA of the entry
    pub sha: String,

    /// Size in bytes (0 for directories)
    #[serde(default)]
    pub size: u64,

    /// Download URL for files (None for directories)
    #[serde(default)]
    pub download_url: Option<String>,
}

impl TreeEntry {
    /// Returns `true` if the entry is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self.entry_type, EntryType::File)
    }
}

/// Type of entry in a repository directory.
///
/// Maps to GitHub's content type field in the Contents API response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Regular file
    File,

    /// Directory (can contain other entries)
    Dir,

    /// Symbolic link
    Symlink,

    /// Git submodule reference
    Submodule,
}

/// The body of a Contents API response for a single file.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FileContent {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl FileContent {
    /// Decodes the file payload into raw bytes.
    ///
    /// GitHub wraps base64 content at 60 characters, so whitespace is removed
    /// before decoding.
    pub(crate) fn decode(self) -> Result<Vec<u8>, Error> {
        let content = self.content.unwrap_or_default();
        match self.encoding.as_deref() {
            Some("base64") => {
                let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
                base64::engine::general_purpose::STANDARD
                    .decode(compact)
                    .map_err(|e| Error::Decode(e.to_string()))
            }
            Some("") | None => Ok(content.into_bytes()),
            Some(other) => Err(Error::Decode(format!("unsupported encoding '{}'", other))),
        }
    }
}
