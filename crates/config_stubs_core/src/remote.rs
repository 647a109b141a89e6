//! Remote reads with uniform timeouts and failure policy.
//!
//! Listing refs and looking up the default branch concern the whole
//! repository, so any failure aborts the build. Reads at a single ref fail
//! softly: the ref is skipped with a warning, unless the failure is
//! repository wide (rejected credentials, rate limiting).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use github_client::{Error as ClientError, GitRef, RefKind, RepositoryClient, TreeEntry};
use tracing::{error, warn};

use crate::errors::{StubsError, StubsResult};
use crate::identity::RepositoryIdentity;

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;

/// A remote repository together with the client used to read it.
#[derive(Clone)]
pub struct RemoteRepository {
    client: Arc<dyn RepositoryClient>,
    identity: RepositoryIdentity,
    request_timeout: Duration,
}

impl std::fmt::Debug for RemoteRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteRepository")
            .field("client", &"Arc<dyn RepositoryClient>")
            .field("identity", &self.identity)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl RemoteRepository {
    pub fn new(
        client: Arc<dyn RepositoryClient>,
        identity: RepositoryIdentity,
        request_timeout: Duration,
    ) -> Self {
        Self {
            client,
            identity,
            request_timeout,
        }
    }

    pub fn identity(&self) -> &RepositoryIdentity {
        &self.identity
    }

    /// Lists every ref of `kind`. Any failure is fatal.
    pub async fn list_refs(&self, kind: RefKind) -> StubsResult<Vec<GitRef>> {
        let operation = format!("listing {} refs of {}", kind, self.identity);
        let call = self
            .client
            .list_refs(self.identity.owner(), self.identity.name(), kind);
        self.fatal(&operation, call).await
    }

    /// Looks up the repository's default branch. Any failure is fatal.
    pub async fn default_branch(&self) -> StubsResult<String> {
        let operation = format!("reading the default branch of {}", self.identity);
        let call = self
            .client
            .get_default_branch(self.identity.owner(), self.identity.name());
        self.fatal(&operation, call).await
    }

    /// Lists `path` at `git_ref`.
    ///
    /// `Ok(None)` means the ref was skipped after a soft failure;
    /// `Ok(Some(None))` means the directory does not exist at that ref.
    pub async fn list_directory(
        &self,
        git_ref: &GitRef,
        path: &str,
    ) -> StubsResult<Option<Option<Vec<TreeEntry>>>> {
        let call = self.client.list_directory(
            self.identity.owner(),
            self.identity.name(),
            path,
            git_ref.revision(),
        );
        self.at_ref("listing the stub directory", git_ref, call)
            .await
    }

    /// Reads the file at `path` and `git_ref`; `Ok(None)` on a soft failure.
    pub async fn file_content(&self, git_ref: &GitRef, path: &str) -> StubsResult<Option<Vec<u8>>> {
        let call = self.client.get_file_content(
            self.identity.owner(),
            self.identity.name(),
            path,
            git_ref.revision(),
        );
        self.at_ref("reading the stub file", git_ref, call).await
    }

    async fn fatal<T, F>(&self, operation: &str, call: F) -> StubsResult<T>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        match tokio::time::timeout(self.request_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                error!(error = %e, operation = operation, "Remote access failed");
                Err(StubsError::remote(operation, e))
            }
            Err(_) => {
                error!(
                    operation = operation,
                    timeout_seconds = self.request_timeout.as_secs(),
                    "Remote access timed out"
                );
                Err(StubsError::remote(operation, ClientError::Timeout))
            }
        }
    }

    async fn at_ref<T, F>(&self, operation: &str, git_ref: &GitRef, call: F) -> StubsResult<Option<T>>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        match tokio::time::timeout(self.request_timeout, call).await {
            Ok(Ok(value)) => Ok(Some(value)),
            Ok(Err(e)) if e.is_repository_wide() => {
                error!(
                    error = %e,
                    ref_name = %git_ref.name,
                    operation = operation,
                    "Remote access failed for the whole repository"
                );
                Err(StubsError::remote(
                    format!("{} for ref '{}'", operation, git_ref.name),
                    e,
                ))
            }
            Ok(Err(e)) => {
                warn!(
                    error = %e,
                    ref_name = %git_ref.name,
                    operation = operation,
                    "Remote read failed, skipping ref"
                );
                Ok(None)
            }
            Err(_) => {
                warn!(
                    ref_name = %git_ref.name,
                    operation = operation,
                    timeout_seconds = self.request_timeout.as_secs(),
                    "Remote read timed out, skipping ref"
                );
                Ok(None)
            }
        }
    }
}
