//! Resolution of the stub file for each classified ref.
//!
//! A ref is accepted only when its stub directory holds exactly one file in
//! a supported format. Missing directories, empty directories and ambiguous
//! ones drop the ref without failing the build.

use futures::stream::{self, StreamExt, TryStreamExt};
use github_client::TreeEntry;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::classifier::ClassifiedRef;
use crate::errors::{ConfigurationError, StubsResult};
use crate::remote::RemoteRepository;

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

/// A supported stub file extension, stored with its leading dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StubFormat(String);

impl StubFormat {
    /// Parses an extension given with or without the leading dot.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidFileFormat` if the extension is
    /// empty or contains characters other than ASCII alphanumerics, `.`,
    /// `-` and `_`.
    ///
    /// # Examples
    ///
    /// ```
    /// use config_stubs_core::StubFormat;
    ///
    /// assert_eq!(StubFormat::parse("md").unwrap().extension(), ".md");
    /// assert_eq!(StubFormat::parse(".html").unwrap().extension(), ".html");
    /// ```
    pub fn parse(value: &str) -> Result<Self, ConfigurationError> {
        let trimmed = value.trim();
        let bare = trimmed.strip_prefix('.').unwrap_or(trimmed);

        let invalid = |reason: &str| ConfigurationError::InvalidFileFormat {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        if bare.is_empty() {
            return Err(invalid("extension is empty"));
        }
        if bare.starts_with('.') || bare.ends_with('.') || bare.contains("..") {
            return Err(invalid("extension has an empty part"));
        }
        if !bare
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
        {
            return Err(invalid("extension contains unsupported characters"));
        }

        Ok(Self(format!(".{}", bare.to_ascii_lowercase())))
    }

    /// Parses a list of extensions, dropping duplicates.
    pub fn parse_all<S: AsRef<str>>(values: &[S]) -> Result<Vec<Self>, ConfigurationError> {
        let mut formats: Vec<Self> = Vec::with_capacity(values.len());
        for value in values {
            let format = Self::parse(value.as_ref())?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        Ok(formats)
    }

    /// The extension including its leading dot, e.g. `.md`.
    pub fn extension(&self) -> &str {
        &self.0
    }

    pub fn is_html(&self) -> bool {
        matches!(self.0.as_str(), ".html" | ".htm")
    }

    /// Returns `true` if `file_name` ends with this extension and has a
    /// non-empty stem. The comparison ignores ASCII case.
    pub fn matches(&self, file_name: &str) -> bool {
        if file_name.len() <= self.0.len() {
            return false;
        }
        file_name
            .get(file_name.len() - self.0.len()..)
            .is_some_and(|suffix| suffix.eq_ignore_ascii_case(&self.0))
    }
}

impl std::fmt::Display for StubFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An accepted ref and its single stub file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubCandidate {
    pub classified_ref: ClassifiedRef,
    /// Repository path of the stub file.
    pub file_path: String,
    pub format: StubFormat,
}

/// The outcome of inspecting one stub directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubSelection {
    /// Exactly one supported file.
    Unique { file_path: String, format: StubFormat },
    /// No supported file.
    Empty,
    /// Several supported files; holds their repository paths.
    Ambiguous(Vec<String>),
}

/// Picks the stub file out of a directory listing.
///
/// Only files count; directories and other entry types are ignored, as are
/// files in unsupported formats. A file matching several formats (`.md` and
/// `.stub.md`, say) is counted once under the longest one.
pub fn select_stub(entries: &[TreeEntry], formats: &[StubFormat]) -> StubSelection {
    let mut matching: Vec<(&TreeEntry, &StubFormat)> = entries
        .iter()
        .filter(|entry| entry.is_file())
        .filter_map(|entry| {
            formats
                .iter()
                .filter(|format| format.matches(&entry.name))
                .max_by_key(|format| format.extension().len())
                .map(|format| (entry, format))
        })
        .collect();

    match matching.len() {
        0 => StubSelection::Empty,
        1 => {
            let (entry, format) = matching.remove(0);
            StubSelection::Unique {
                file_path: entry.path.clone(),
                format: format.clone(),
            }
        }
        _ => {
            let mut paths: Vec<String> = matching.iter().map(|(e, _)| e.path.clone()).collect();
            paths.sort();
            StubSelection::Ambiguous(paths)
        }
    }
}

/// Finds the stub file of every classified ref.
#[derive(Debug, Clone)]
pub struct StubResolver {
    remote: RemoteRepository,
    stubs_dir: String,
    formats: Vec<StubFormat>,
    max_concurrent_requests: usize,
}

impl StubResolver {
    pub fn new(
        remote: RemoteRepository,
        stubs_dir: impl Into<String>,
        formats: Vec<StubFormat>,
        max_concurrent_requests: usize,
    ) -> Self {
        Self {
            remote,
            stubs_dir: stubs_dir.into(),
            formats,
            max_concurrent_requests: max_concurrent_requests.max(1),
        }
    }

    /// Resolves the stub of each ref.
    ///
    /// Directory listings run concurrently, at most `max_concurrent_requests`
    /// at a time. Candidates come back in the order of `refs`.
    ///
    /// # Errors
    ///
    /// Returns `StubsError::RemoteAccess` when a listing fails for the whole
    /// repository. Failures limited to one ref only drop that ref.
    #[instrument(skip(self, refs), fields(stubs_dir = %self.stubs_dir, refs = refs.len()))]
    pub async fn resolve(&self, refs: Vec<ClassifiedRef>) -> StubsResult<Vec<StubCandidate>> {
        let resolved: Vec<Option<StubCandidate>> = stream::iter(refs)
            .map(|classified| self.resolve_ref(classified))
            .buffered(self.max_concurrent_requests)
            .try_collect()
            .await?;

        let candidates: Vec<StubCandidate> = resolved.into_iter().flatten().collect();
        info!(count = candidates.len(), "Resolved configuration stubs");
        Ok(candidates)
    }

    async fn resolve_ref(&self, classified: ClassifiedRef) -> StubsResult<Option<StubCandidate>> {
        let entries = match self
            .remote
            .list_directory(&classified.git_ref, &self.stubs_dir)
            .await?
        {
            None => return Ok(None),
            Some(None) => {
                debug!(
                    ref_name = classified.name(),
                    stubs_dir = self.stubs_dir,
                    "No stub directory at ref"
                );
                return Ok(None);
            }
            Some(Some(entries)) => entries,
        };

        match select_stub(&entries, &self.formats) {
            StubSelection::Unique { file_path, format } => {
                debug!(
                    ref_name = classified.name(),
                    file_path = file_path,
                    format = %format,
                    "Stub found"
                );
                Ok(Some(StubCandidate {
                    classified_ref: classified,
                    file_path,
                    format,
                }))
            }
            StubSelection::Empty => {
                warn!(
                    ref_name = classified.name(),
                    stubs_dir = self.stubs_dir,
                    "No stub in a supported format, skipping ref"
                );
                Ok(None)
            }
            StubSelection::Ambiguous(files) => {
                warn!(
                    ref_name = classified.name(),
                    stubs_dir = self.stubs_dir,
                    files = ?files,
                    "Multiple stubs found, skipping ref"
                );
                Ok(None)
            }
        }
    }
}
