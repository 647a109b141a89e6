//! # Config Stubs Core
//!
//! This crate discovers the configuration stubs of a repository and turns
//! them into pages of a documentation site. Every branch or tag of the
//! source repository holds one configuration, summarised by a single stub
//! document in a fixed directory.
//!
//! ## Overview
//!
//! A build runs these steps in order:
//! 1. Resolve the repository, from configuration or the local `origin` remote
//! 2. List its branches and tags
//! 3. Classify the refs into the main and preview sets
//! 4. Detect whether the build is for the main website or a preview
//! 5. Find the single stub file of every selected ref
//! 6. Fetch the stubs and register them with the site as virtual documents
//!
//! ## Main Types
//!
//! - [`StubPipeline`] - runs steps 1 to 5 and returns [`PreparedStubs`]
//! - [`StubRegistrationStage`] - the build stage performing step 6
//! - [`BuildScheduler`] - runs build stages ordered by [`StagePhase`]
//! - [`DocumentSink`] - destination of the generated documents
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use config_stubs_core::{
//!     BuildScheduler, DirectorySink, DocumentSink, GitWorkingCopy, SiteDocuments, StubPipeline,
//!     StubsConfig,
//! };
//! use github_client::{create_public_client, GitHubClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(GitHubClient::new(create_public_client(None)?));
//! let local = Arc::new(GitWorkingCopy::new("."));
//! let pipeline = StubPipeline::new(StubsConfig::default(), client, local);
//!
//! let prepared = pipeline.prepare().await?;
//! let mut scheduler = BuildScheduler::new();
//! scheduler.add_stage(Box::new(prepared.into_stage()));
//!
//! let mut site = SiteDocuments::new();
//! scheduler.run(&mut site).await?;
//!
//! DirectorySink::new("site").register(site.into_documents()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Configuration errors and failures affecting the whole repository abort
//! the build with a [`StubsError`]. Problems limited to one ref, such as a
//! missing or ambiguous stub directory, drop that ref with a warning.

pub mod classifier;
pub mod config;
pub mod errors;
pub mod identity;
pub mod integrator;
pub mod local;
pub mod navigation;
pub mod patterns;
pub mod pipeline;
pub mod remote;
pub mod resolver;
pub mod scheduler;
pub mod sink;
pub mod website;

#[cfg(test)]
pub(crate) mod test_support;

pub use classifier::{Classification, ClassifiedRef, ClassifiedRefs, RefClassifier, RefGroup};
pub use config::{
    MainWebsiteConfig, PreviewWebsiteConfig, RefTypeFilter, StubsConfig, ValidatedConfig,
    WebsiteSelection,
};
pub use errors::{ConfigurationError, LocalCheckoutError, StubsError, StubsResult};
pub use identity::{
    resolve_repository, GitWorkingCopy, LocalCheckout, RepositoryHost, RepositoryIdentity,
};
pub use integrator::{extract_title, StubIntegrator, VirtualDocument};
pub use local::{find_local_stub, LocalStub};
pub use navigation::{derive_nav_path, NavigationPlacement};
pub use patterns::RefPatternSet;
pub use pipeline::{PreparedStubs, StubPipeline};
pub use remote::RemoteRepository;
pub use resolver::{select_stub, StubCandidate, StubFormat, StubResolver, StubSelection};
pub use scheduler::{BuildScheduler, BuildStage, StagePhase, StubRegistrationStage};
pub use sink::{DirectorySink, DocumentSink, NavEntry, SiteDocuments, NAV_MANIFEST_FILENAME};
pub use website::{detect_website_kind, WebsiteKind};
