//! End-to-end stub discovery for one site build.

use std::sync::Arc;

use github_client::{GitRef, RefKind, RepositoryClient};
use tracing::{debug, info, instrument, warn};

use crate::classifier::{ClassifiedRefs, RefClassifier};
use crate::config::StubsConfig;
use crate::errors::StubsResult;
use crate::identity::{resolve_repository, LocalCheckout, RepositoryIdentity};
use crate::integrator::StubIntegrator;
use crate::local::{find_local_stub, LocalStub};
use crate::remote::RemoteRepository;
use crate::resolver::{StubCandidate, StubResolver};
use crate::scheduler::StubRegistrationStage;
use crate::website::{detect_website_kind, WebsiteKind};

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;

/// Everything needed to register the stubs of a build.
#[derive(Debug, Clone)]
pub struct PreparedStubs {
    pub repository: RepositoryIdentity,
    pub website: WebsiteKind,
    pub classified: ClassifiedRefs,
    pub candidates: Vec<StubCandidate>,
    integrator: StubIntegrator,
}

impl PreparedStubs {
    pub fn integrator(&self) -> &StubIntegrator {
        &self.integrator
    }

    /// The stub read from the local working copy, if enabled and found.
    pub fn local_stub(&self) -> Option<&LocalStub> {
        self.integrator.local_stub()
    }

    /// The build stage that registers these stubs with the site.
    pub fn into_stage(self) -> StubRegistrationStage {
        StubRegistrationStage::new(self.integrator, self.candidates)
    }
}

/// Runs identity resolution, ref classification and stub resolution.
pub struct StubPipeline {
    config: StubsConfig,
    client: Arc<dyn RepositoryClient>,
    local: Arc<dyn LocalCheckout>,
}

impl std::fmt::Debug for StubPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StubPipeline")
            .field("config", &self.config)
            .field("client", &"Arc<dyn RepositoryClient>")
            .field("local", &"Arc<dyn LocalCheckout>")
            .finish()
    }
}

impl StubPipeline {
    pub fn new(
        config: StubsConfig,
        client: Arc<dyn RepositoryClient>,
        local: Arc<dyn LocalCheckout>,
    ) -> Self {
        Self {
            config,
            client,
            local,
        }
    }

    /// Resolves the stubs to integrate.
    ///
    /// The configuration is validated before any remote call. Listing the
    /// refs of the repository must succeed; per-ref failures only drop the
    /// affected refs.
    ///
    /// # Errors
    ///
    /// * `StubsError::Configuration` - invalid configuration or repository.
    /// * `StubsError::RemoteAccess` - a failure that affects the whole repository.
    #[instrument(skip(self))]
    pub async fn prepare(&self) -> StubsResult<PreparedStubs> {
        let validated = self.config.validate()?;
        let repository = resolve_repository(self.config.repo.as_deref(), self.local.as_ref())?;
        let remote = RemoteRepository::new(
            self.client.clone(),
            repository.clone(),
            validated.request_timeout,
        );

        let classifier = RefClassifier::new(
            validated.main_group.clone(),
            validated.preview_group.clone(),
            validated.no_main,
        );
        let mut refs = Vec::new();
        for kind in classifier.required_kinds() {
            refs.extend(remote.list_refs(kind).await?);
        }
        info!(count = refs.len(), "Found Git refs");

        let local_stub = if validated.include_local_stub {
            self.exclude_local_branch(&mut refs);
            find_local_stub(self.local.as_ref(), &validated.stubs_dir, &validated.formats).await
        } else {
            None
        };

        let classified = classifier.classify(&refs);

        let website = self.website_kind(&remote).await?;
        let selected = classified.for_website(website);
        info!(website = %website, selected = selected.len(), "Selected refs for the website");

        let resolver = StubResolver::new(
            remote.clone(),
            validated.stubs_dir.clone(),
            validated.formats.clone(),
            validated.max_concurrent_requests,
        );
        let candidates = resolver.resolve(selected).await?;
        if candidates.is_empty() && local_stub.is_none() {
            warn!(
                repository = %repository,
                stubs_dir = validated.stubs_dir,
                website = %website,
                "No configuration stubs found, the site will have no stub pages"
            );
        }

        Ok(PreparedStubs {
            repository,
            website,
            classified,
            candidates,
            integrator: StubIntegrator::new(
                remote,
                validated.placement,
                validated.max_concurrent_requests,
            )
            .with_local_stub(local_stub),
        })
    }

    /// Drops the checked out branch from `refs`; its stub comes from disk.
    fn exclude_local_branch(&self, refs: &mut Vec<GitRef>) {
        let branch = match self.local.current_branch() {
            Ok(branch) => branch,
            Err(e) => {
                debug!(error = %e, "No local branch to leave out of the remote refs");
                return;
            }
        };

        let before = refs.len();
        refs.retain(|r| !(r.kind == RefKind::Branch && r.name == branch));
        if refs.len() != before {
            info!(
                branch = branch,
                "Taking the current branch from the working copy instead of the remote"
            );
        }
    }

    async fn website_kind(&self, remote: &RemoteRepository) -> StubsResult<WebsiteKind> {
        if let Some(kind) = WebsiteKind::from_selection(self.config.website) {
            info!(website = %kind, "Website kind set by configuration");
            return Ok(kind);
        }

        let main_branch = match &self.config.main_website.branch {
            Some(branch) => branch.clone(),
            None => remote.default_branch().await?,
        };
        Ok(detect_website_kind(
            &main_branch,
            remote.identity(),
            self.local.as_ref(),
        ))
    }
}
