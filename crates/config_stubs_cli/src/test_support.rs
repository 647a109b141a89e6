//! In-memory repository and checkout for command tests.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use config_stubs_core::{LocalCheckout, LocalCheckoutError};
use github_client::{EntryType, Error, GitRef, RefKind, RepositoryClient, TreeEntry};

/// A repository whose refs each hold the given stub files.
#[derive(Default)]
pub(crate) struct FakeRepository {
    refs: Vec<GitRef>,
    files: HashMap<String, Vec<(String, String)>>,
    fail_with_unauthorized: bool,
}

impl FakeRepository {
    pub(crate) fn with_ref(mut self, name: &str, kind: RefKind, files: &[(&str, &str)]) -> Self {
        self.refs.push(GitRef::new(name, kind, None));
        self.files.insert(
            name.to_string(),
            files
                .iter()
                .map(|(n, c)| (n.to_string(), c.to_string()))
                .collect(),
        );
        self
    }

    pub(crate) fn unauthorized() -> Self {
        Self {
            fail_with_unauthorized: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), Error> {
        if self.fail_with_unauthorized {
            Err(Error::Unauthorized("Bad credentials".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RepositoryClient for FakeRepository {
    async fn list_refs(&self, _owner: &str, _repo: &str, kind: RefKind) -> Result<Vec<GitRef>, Error> {
        self.check()?;
        Ok(self.refs.iter().filter(|r| r.kind == kind).cloned().collect())
    }

    async fn list_directory(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<Option<Vec<TreeEntry>>, Error> {
        self.check()?;
        Ok(self.files.get(git_ref).map(|files| {
            files
                .iter()
                .map(|(name, content)| TreeEntry {
                    name: name.clone(),
                    path: format!("{}/{}", path, name),
                    entry_type: EntryType::File,
                    sha: format!("sha-{}", name),
                    size: content.len() as u64,
                    download_url: None,
                })
                .collect()
        }))
    }

    async fn get_file_content(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<Vec<u8>, Error> {
        self.check()?;
        let name = path.rsplit('/').next().unwrap_or(path);
        self.files
            .get(git_ref)
            .and_then(|files| files.iter().find(|(n, _)| n == name))
            .map(|(_, content)| content.as_bytes().to_vec())
            .ok_or(Error::NotFound)
    }

    async fn get_default_branch(&self, _owner: &str, _repo: &str) -> Result<String, Error> {
        self.check()?;
        Ok("main".to_string())
    }
}

/// A checkout that cannot be inspected.
pub(crate) struct NoCheckout;

impl NoCheckout {
    fn error() -> LocalCheckoutError {
        LocalCheckoutError::NotARepository {
            path: ".".to_string(),
            reason: "could not find repository".to_string(),
        }
    }
}

impl LocalCheckout for NoCheckout {
    fn origin_url(&self) -> Result<String, LocalCheckoutError> {
        Err(Self::error())
    }

    fn current_branch(&self) -> Result<String, LocalCheckoutError> {
        Err(Self::error())
    }

    fn working_directory(&self) -> Result<PathBuf, LocalCheckoutError> {
        Err(Self::error())
    }
}

/// A checkout of `owner/configs` on `branch`, rooted at `root`.
pub(crate) struct WorkingCopy {
    pub(crate) branch: String,
    pub(crate) root: PathBuf,
}

impl LocalCheckout for WorkingCopy {
    fn origin_url(&self) -> Result<String, LocalCheckoutError> {
        Ok("https://github.com/owner/configs.git".to_string())
    }

    fn current_branch(&self) -> Result<String, LocalCheckoutError> {
        Ok(self.branch.clone())
    }

    fn working_directory(&self) -> Result<PathBuf, LocalCheckoutError> {
        Ok(self.root.clone())
    }
}
