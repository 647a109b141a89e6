//! In-memory [`RepositoryClient`] used by the unit tests of this crate.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use github_client::{EntryType, Error, GitRef, RefKind, RepositoryClient, TreeEntry};

use crate::errors::LocalCheckoutError;
use crate::identity::LocalCheckout;

/// Ways a fake remote read can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Failure {
    Network,
    NotFound,
    RateLimited,
    Unauthorized,
}

impl Failure {
    fn to_error(self) -> Error {
        match self {
            Failure::Network => Error::Network("connection reset".to_string()),
            Failure::NotFound => Error::NotFound,
            Failure::RateLimited => Error::RateLimitExceeded,
            Failure::Unauthorized => Error::Unauthorized("Bad credentials".to_string()),
        }
    }
}

/// A repository held in memory, keyed by revision and path.
#[derive(Default)]
pub(crate) struct FakeRepositoryClient {
    refs: Vec<GitRef>,
    default_branch: String,
    directories: HashMap<(String, String), Vec<TreeEntry>>,
    files: HashMap<(String, String), Vec<u8>>,
    list_refs_failure: Option<Failure>,
    directory_failures: HashMap<String, Failure>,
    file_failures: HashMap<String, Failure>,
    delays: HashMap<String, Duration>,
    pub(crate) calls: Mutex<Vec<String>>,
}

impl FakeRepositoryClient {
    pub(crate) fn new() -> Self {
        Self {
            default_branch: "main".to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn with_ref(mut self, name: &str, kind: RefKind) -> Self {
        self.refs.push(GitRef::new(name, kind, None));
        self
    }

    pub(crate) fn with_default_branch(mut self, branch: &str) -> Self {
        self.default_branch = branch.to_string();
        self
    }

    /// Adds a directory at `revision` holding `files` as `(name, content)`.
    pub(crate) fn with_directory(mut self, revision: &str, dir: &str, files: &[(&str, &str)]) -> Self {
        let entries = files
            .iter()
            .map(|(name, content)| {
                let path = format!("{}/{}", dir, name);
                self.files.insert(
                    (revision.to_string(), path.clone()),
                    content.as_bytes().to_vec(),
                );
                TreeEntry {
                    name: name.to_string(),
                    path,
                    entry_type: EntryType::File,
                    sha: format!("sha-{}", name),
                    size: content.len() as u64,
                    download_url: None,
                }
            })
            .collect();
        self.directories
            .insert((revision.to_string(), dir.to_string()), entries);
        self
    }

    pub(crate) fn with_subdirectory(mut self, revision: &str, dir: &str, name: &str) -> Self {
        let key = (revision.to_string(), dir.to_string());
        self.directories.entry(key).or_default().push(TreeEntry {
            name: name.to_string(),
            path: format!("{}/{}", dir, name),
            entry_type: EntryType::Dir,
            sha: format!("sha-{}", name),
            size: 0,
            download_url: None,
        });
        self
    }

    pub(crate) fn with_list_refs_failure(mut self, failure: Failure) -> Self {
        self.list_refs_failure = Some(failure);
        self
    }

    pub(crate) fn with_directory_failure(mut self, revision: &str, failure: Failure) -> Self {
        self.directory_failures
            .insert(revision.to_string(), failure);
        self
    }

    pub(crate) fn with_file_failure(mut self, revision: &str, failure: Failure) -> Self {
        self.file_failures.insert(revision.to_string(), failure);
        self
    }

    /// Delays every read at `revision`.
    pub(crate) fn with_delay(mut self, revision: &str, delay: Duration) -> Self {
        self.delays.insert(revision.to_string(), delay);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    async fn delay(&self, revision: &str) {
        if let Some(delay) = self.delays.get(revision) {
            tokio::time::sleep(*delay).await;
        }
    }
}

#[async_trait]
impl RepositoryClient for FakeRepositoryClient {
    async fn list_refs(&self, _owner: &str, _repo: &str, kind: RefKind) -> Result<Vec<GitRef>, Error> {
        self.record(format!("list_refs:{}", kind));
        if let Some(failure) = self.list_refs_failure {
            return Err(failure.to_error());
        }
        Ok(self
            .refs
            .iter()
            .filter(|r| r.kind == kind)
            .cloned()
            .collect())
    }

    async fn list_directory(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<Vec<TreeEntry>>, Error> {
        self.record(format!("list_directory:{}:{}", git_ref, path));
        self.delay(git_ref).await;
        if let Some(failure) = self.directory_failures.get(git_ref) {
            return Err(failure.to_error());
        }
        Ok(self
            .directories
            .get(&(git_ref.to_string(), path.to_string()))
            .cloned())
    }

    async fn get_file_content(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<Vec<u8>, Error> {
        self.record(format!("get_file_content:{}:{}", git_ref, path));
        self.delay(git_ref).await;
        if let Some(failure) = self.file_failures.get(git_ref) {
            return Err(failure.to_error());
        }
        self.files
            .get(&(git_ref.to_string(), path.to_string()))
            .cloned()
            .ok_or(Error::NotFound)
    }

    async fn get_default_branch(&self, _owner: &str, _repo: &str) -> Result<String, Error> {
        self.record("get_default_branch".to_string());
        Ok(self.default_branch.clone())
    }
}

/// A local checkout with fixed answers.
pub(crate) struct FakeCheckout {
    pub(crate) origin: Result<String, LocalCheckoutError>,
    pub(crate) branch: Result<String, LocalCheckoutError>,
    pub(crate) workdir: Result<PathBuf, LocalCheckoutError>,
}

impl FakeCheckout {
    pub(crate) fn new(origin: &str, branch: &str) -> Self {
        Self {
            origin: Ok(origin.to_string()),
            branch: Ok(branch.to_string()),
            workdir: Err(not_a_repository()),
        }
    }

    pub(crate) fn missing() -> Self {
        Self {
            origin: Err(not_a_repository()),
            branch: Err(not_a_repository()),
            workdir: Err(not_a_repository()),
        }
    }

    /// Roots the working copy at `path`.
    pub(crate) fn with_workdir(mut self, path: &Path) -> Self {
        self.workdir = Ok(path.to_path_buf());
        self
    }
}

fn not_a_repository() -> LocalCheckoutError {
    LocalCheckoutError::NotARepository {
        path: ".".to_string(),
        reason: "could not find repository".to_string(),
    }
}

impl LocalCheckout for FakeCheckout {
    fn origin_url(&self) -> Result<String, LocalCheckoutError> {
        self.origin.clone()
    }

    fn current_branch(&self) -> Result<String, LocalCheckoutError> {
        self.branch.clone()
    }

    fn working_directory(&self) -> Result<PathBuf, LocalCheckoutError> {
        self.workdir.clone()
    }
}
