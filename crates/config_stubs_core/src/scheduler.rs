//! Ordering of site build stages.
//!
//! Stages declare the phase they belong to instead of relying on the order
//! they were added in. Registration stages, which add documents, always run
//! before transform stages, which rewrite documents already in the site.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::errors::StubsResult;
use crate::integrator::StubIntegrator;
use crate::resolver::StubCandidate;
use crate::sink::SiteDocuments;

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;

/// Build phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StagePhase {
    /// Adds documents to the site.
    Registration,
    /// Rewrites documents already in the site.
    Transform,
    /// Runs once every document is final.
    Finalize,
}

/// A step of the site build.
#[async_trait]
pub trait BuildStage: Send + Sync {
    fn name(&self) -> &str;

    fn phase(&self) -> StagePhase;

    async fn run(&self, site: &mut SiteDocuments) -> StubsResult<()>;
}

/// Runs build stages ordered by phase.
///
/// Stages of the same phase keep the order they were added in.
#[derive(Default)]
pub struct BuildScheduler {
    stages: Vec<Box<dyn BuildStage>>,
}

impl std::fmt::Debug for BuildScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildScheduler")
            .field("stages", &self.stage_names())
            .finish()
    }
}

impl BuildScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stage(&mut self, stage: Box<dyn BuildStage>) -> &mut Self {
        self.stages.push(stage);
        self
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<String> {
        self.ordered().iter().map(|s| s.name().to_string()).collect()
    }

    fn ordered(&self) -> Vec<&dyn BuildStage> {
        let mut ordered: Vec<&dyn BuildStage> = self.stages.iter().map(|s| s.as_ref()).collect();
        // sort_by_key is stable
        ordered.sort_by_key(|s| s.phase());
        ordered
    }

    /// Runs every stage against `site`, stopping at the first failure.
    #[instrument(skip(self, site), fields(stages = self.stages.len()))]
    pub async fn run(&self, site: &mut SiteDocuments) -> StubsResult<()> {
        for stage in self.ordered() {
            info!(stage = stage.name(), phase = ?stage.phase(), "Running build stage");
            if let Err(e) = stage.run(site).await {
                error!(stage = stage.name(), error = %e, "Build stage failed");
                return Err(e);
            }
        }
        Ok(())
    }
}

/// Registers resolved stubs with the site.
#[derive(Debug, Clone)]
pub struct StubRegistrationStage {
    integrator: StubIntegrator,
    candidates: Vec<StubCandidate>,
}

impl StubRegistrationStage {
    pub const NAME: &'static str = "include-configuration-stubs";

    pub fn new(integrator: StubIntegrator, candidates: Vec<StubCandidate>) -> Self {
        Self {
            integrator,
            candidates,
        }
    }
}

#[async_trait]
impl BuildStage for StubRegistrationStage {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn phase(&self) -> StagePhase {
        StagePhase::Registration
    }

    async fn run(&self, site: &mut SiteDocuments) -> StubsResult<()> {
        self.integrator
            .integrate(self.candidates.clone(), site)
            .await?;
        Ok(())
    }
}
