use std::sync::Arc;

use clap::Args;
use config_stubs_core::{
    BuildScheduler, DirectorySink, DocumentSink, GitWorkingCopy, LocalCheckout, SiteDocuments,
    StubPipeline, WebsiteKind,
};
use github_client::RepositoryClient;
use tracing::{error, info, instrument};

use crate::commands::{create_repository_client, SourceArgs};
use crate::config::AppConfig;
use crate::errors::Error;

#[cfg(test)]
#[path = "build_cmd_tests.rs"]
mod tests;

/// Arguments for the build command
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Directory the stub pages are written to, overriding the configuration
    #[arg(short, long)]
    pub output: Option<String>,
}

/// What a build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub website: WebsiteKind,
    pub documents: usize,
    pub output_dir: String,
}

/// Execute the build command
#[instrument]
pub async fn execute(args: &BuildArgs) -> Result<(), Error> {
    let mut config = args.source.load_config()?;
    if let Some(output) = &args.output {
        config.output.dir = output.clone();
    }

    let client = create_repository_client(config.github.api_url.as_deref())?;
    let local = Arc::new(GitWorkingCopy::new("."));

    match run_build(&config, client, local).await {
        Ok(summary) => {
            println!(
                "Added {} configuration stubs for the {} website to {}",
                summary.documents, summary.website, summary.output_dir
            );
            Ok(())
        }
        Err(e) => {
            error!(message = "Stub build failed", error = ?e);
            Err(e)
        }
    }
}

/// Resolves the stubs and writes them below the configured output directory.
pub async fn run_build(
    config: &AppConfig,
    client: Arc<dyn RepositoryClient>,
    local: Arc<dyn LocalCheckout>,
) -> Result<BuildSummary, Error> {
    let pipeline = StubPipeline::new(config.stubs.clone(), client, local);
    let prepared = pipeline.prepare().await?;
    let website = prepared.website;

    let mut scheduler = BuildScheduler::new();
    scheduler.add_stage(Box::new(prepared.into_stage()));

    let mut site = SiteDocuments::new();
    scheduler.run(&mut site).await?;

    let documents = site.into_documents();
    let count = documents.len();
    let mut sink = DirectorySink::new(&config.output.dir);
    sink.register(documents).await?;

    info!(
        documents = count,
        output_dir = config.output.dir,
        website = %website,
        "Stub build complete"
    );
    Ok(BuildSummary {
        website,
        documents: count,
        output_dir: config.output.dir.clone(),
    })
}
