//! The stub of the local working copy.
//!
//! When enabled, the checked out branch is shown from the files on disk
//! instead of its pushed state, so unpublished edits to its stub appear in
//! the site. The same exactly-one-file rule as for remote refs applies.

use std::io;
use std::path::Path;

use github_client::{EntryType, TreeEntry};
use tracing::{debug, info, instrument, warn};

use crate::identity::LocalCheckout;
use crate::resolver::{select_stub, StubFormat, StubSelection};

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;

/// A stub read from the local working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStub {
    /// Navigation label: the checked out branch, or the file stem when HEAD
    /// is detached.
    pub name: String,
    pub branch: Option<String>,
    /// Path of the stub file relative to the working copy root.
    pub file_path: String,
    pub format: StubFormat,
    pub content: Vec<u8>,
}

/// Reads the stub of the local working copy.
///
/// Returns `None`, with a log entry, when the working copy cannot be found
/// or its stub directory does not hold exactly one supported file. A
/// missing local stub never fails the build.
#[instrument(skip(local, formats))]
pub async fn find_local_stub(
    local: &dyn LocalCheckout,
    stubs_dir: &str,
    formats: &[StubFormat],
) -> Option<LocalStub> {
    let root = match local.working_directory() {
        Ok(root) => root,
        Err(e) => {
            warn!(error = %e, "Cannot locate the local working copy, no local stub added");
            return None;
        }
    };
    let branch = local.current_branch().ok();

    let entries = match list_local_directory(&root, stubs_dir).await {
        Ok(Some(entries)) => entries,
        Ok(None) => {
            debug!(root = ?root, "No local stub directory");
            return None;
        }
        Err(e) => {
            warn!(error = %e, root = ?root, "Cannot read the local stub directory");
            return None;
        }
    };

    let (file_path, format) = match select_stub(&entries, formats) {
        StubSelection::Unique { file_path, format } => (file_path, format),
        StubSelection::Empty => {
            warn!(root = ?root, "No local stub in a supported format");
            return None;
        }
        StubSelection::Ambiguous(files) => {
            warn!(root = ?root, files = ?files, "Multiple local stubs found, none added");
            return None;
        }
    };

    let content = match tokio::fs::read(root.join(&file_path)).await {
        Ok(content) => content,
        Err(e) => {
            warn!(error = %e, file_path = file_path, "Cannot read the local stub");
            return None;
        }
    };

    let name = match &branch {
        Some(branch) => branch.clone(),
        None => file_stem(&file_path, &format),
    };
    info!(name = name, file_path = file_path, "Local stub found");

    Some(LocalStub {
        name,
        branch,
        file_path,
        format,
        content,
    })
}

/// Lists `stubs_dir` below `root`; `Ok(None)` if it does not exist.
async fn list_local_directory(root: &Path, stubs_dir: &str) -> io::Result<Option<Vec<TreeEntry>>> {
    let mut read_dir = match tokio::fs::read_dir(root.join(stubs_dir)).await {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    let mut entries = Vec::new();
    while let Some(entry) = read_dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        // Follows symlinks, a dangling one is neither a file nor a directory.
        let entry_type = match tokio::fs::metadata(entry.path()).await {
            Ok(metadata) if metadata.is_file() => EntryType::File,
            Ok(metadata) if metadata.is_dir() => EntryType::Dir,
            _ => EntryType::Symlink,
        };
        entries.push(TreeEntry {
            path: format!("{}/{}", stubs_dir, name),
            name,
            entry_type,
            sha: String::new(),
            size: 0,
            download_url: None,
        });
    }
    Ok(Some(entries))
}

fn file_stem(file_path: &str, format: &StubFormat) -> String {
    let name = file_path.rsplit('/').next().unwrap_or(file_path);
    name.get(..name.len().saturating_sub(format.extension().len()))
        .unwrap_or(name)
        .to_string()
}
