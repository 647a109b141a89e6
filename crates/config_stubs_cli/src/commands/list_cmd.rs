use std::sync::Arc;

use clap::Args;
use config_stubs_core::{GitWorkingCopy, LocalCheckout, PreparedStubs, StubPipeline};
use github_client::RepositoryClient;
use serde::Serialize;
use tracing::instrument;

use crate::commands::{create_repository_client, SourceArgs};
use crate::config::AppConfig;
use crate::errors::Error;

#[cfg(test)]
#[path = "list_cmd_tests.rs"]
mod tests;

/// Arguments for the list command
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the stubs as JSON
    #[arg(long)]
    pub json: bool,
}

/// One stub that a build would integrate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedStub {
    pub ref_name: String,
    pub kind: String,
    pub classification: String,
    pub file_path: String,
    pub url: String,
}

/// Execute the list command
#[instrument]
pub async fn execute(args: &ListArgs) -> Result<(), Error> {
    let config = args.source.load_config()?;
    let client = create_repository_client(config.github.api_url.as_deref())?;
    let local = Arc::new(GitWorkingCopy::new("."));

    let stubs = list_stubs(&config, client, local).await?;
    println!("{}", render(&stubs, args.json)?);
    Ok(())
}

/// Resolves the stubs of a build without fetching their contents.
pub async fn list_stubs(
    config: &AppConfig,
    client: Arc<dyn RepositoryClient>,
    local: Arc<dyn LocalCheckout>,
) -> Result<Vec<ListedStub>, Error> {
    let prepared = StubPipeline::new(config.stubs.clone(), client, local)
        .prepare()
        .await?;
    Ok(listed_stubs(&prepared))
}

fn listed_stubs(prepared: &PreparedStubs) -> Vec<ListedStub> {
    let placement = prepared.integrator().placement();
    let local = prepared.local_stub().map(|stub| ListedStub {
        ref_name: stub.name.clone(),
        kind: "local".to_string(),
        classification: "local".to_string(),
        file_path: stub.file_path.clone(),
        url: placement.stub_url(&stub.name),
    });
    let remote = prepared.candidates.iter().map(|candidate| {
        let git_ref = &candidate.classified_ref.git_ref;
        ListedStub {
            ref_name: git_ref.name.clone(),
            kind: git_ref.kind.to_string(),
            classification: candidate.classified_ref.classification.to_string(),
            file_path: candidate.file_path.clone(),
            url: placement.stub_url(&git_ref.name),
        }
    });
    local.into_iter().chain(remote).collect()
}

/// Formats the stubs as aligned text lines or pretty JSON.
pub fn render(stubs: &[ListedStub], json: bool) -> Result<String, Error> {
    if json {
        return serde_json::to_string_pretty(stubs).map_err(|e| Error::Output(e.to_string()));
    }

    if stubs.is_empty() {
        return Ok("No configuration stubs found".to_string());
    }

    let width = stubs.iter().map(|s| s.ref_name.len()).max().unwrap_or(0);
    Ok(stubs
        .iter()
        .map(|s| {
            format!(
                "{:<width$}  {:<6}  {:<7}  {}  -> {}",
                s.ref_name,
                s.kind,
                s.classification,
                s.file_path,
                s.url,
                width = width
            )
        })
        .collect::<Vec<_>>()
        .join("\n"))
}
