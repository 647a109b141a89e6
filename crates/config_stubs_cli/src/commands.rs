//! Command modules for the config-stubs CLI.
//!
//! - `build_cmd`: resolves the stubs and writes them to the output directory
//! - `list_cmd`: shows which refs would be integrated, without fetching stubs
//! - `config_cmd`: configuration file management

use std::sync::Arc;

use clap::{Args, ValueEnum};
use config_stubs_core::WebsiteSelection;
use github_client::{create_public_client, create_token_client, GitHubClient, RepositoryClient};
use tracing::info;

use crate::config::{AppConfig, GITHUB_TOKEN_ENV};
use crate::errors::Error;

pub mod build_cmd;
pub mod config_cmd;
pub mod list_cmd;

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

/// Which website to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WebsiteArg {
    /// Decide from the local checkout
    Auto,
    Main,
    Preview,
}

impl From<WebsiteArg> for WebsiteSelection {
    fn from(value: WebsiteArg) -> Self {
        match value {
            WebsiteArg::Auto => WebsiteSelection::Auto,
            WebsiteArg::Main => WebsiteSelection::Main,
            WebsiteArg::Preview => WebsiteSelection::Preview,
        }
    }
}

/// Arguments shared by the commands that query the repository.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Repository to read stubs from, overriding the configuration
    #[arg(long)]
    pub repo: Option<String>,

    /// Website to produce, overriding the configuration
    #[arg(long, value_enum)]
    pub website: Option<WebsiteArg>,

    /// Show the checked out branch from the working copy instead of the remote
    #[arg(long)]
    pub include_local_stub: bool,
}

impl SourceArgs {
    /// Loads the configuration and applies the command line overrides.
    pub fn load_config(&self) -> Result<AppConfig, Error> {
        let mut config = AppConfig::resolve(self.config.as_deref())?;
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut AppConfig) {
        if let Some(repo) = &self.repo {
            config.stubs.repo = Some(repo.clone());
        }
        if let Some(website) = self.website {
            config.stubs.website = website.into();
        }
        if self.include_local_stub {
            config.stubs.include_local_stub = true;
        }
    }
}

/// Returns the token to authenticate with, ignoring blank values.
pub fn select_token(value: Option<String>) -> Option<String> {
    value
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Creates the GitHub client, authenticated when `GITHUB_TOKEN` is set.
pub fn create_repository_client(api_url: Option<&str>) -> Result<Arc<dyn RepositoryClient>, Error> {
    let octocrab = match select_token(std::env::var(GITHUB_TOKEN_ENV).ok()) {
        Some(token) => {
            info!("Using token authentication for GitHub");
            create_token_client(&token, api_url)?
        }
        None => {
            info!(
                "No {} set, making anonymous GitHub requests",
                GITHUB_TOKEN_ENV
            );
            create_public_client(api_url)?
        }
    };
    Ok(Arc::new(GitHubClient::new(octocrab)))
}
