//! Detection of which website a build produces.
//!
//! A build produces the main website when it runs on the main website branch
//! of the configured repository itself. Anything else, including forks and
//! checkouts that cannot be inspected, produces a preview.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::WebsiteSelection;
use crate::identity::{LocalCheckout, RepositoryIdentity};

#[cfg(test)]
#[path = "website_tests.rs"]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebsiteKind {
    Main,
    Preview,
}

impl std::fmt::Display for WebsiteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebsiteKind::Main => write!(f, "main"),
            WebsiteKind::Preview => write!(f, "preview"),
        }
    }
}

impl WebsiteKind {
    /// The kind forced by configuration, if any.
    pub fn from_selection(selection: WebsiteSelection) -> Option<Self> {
        match selection {
            WebsiteSelection::Auto => None,
            WebsiteSelection::Main => Some(WebsiteKind::Main),
            WebsiteSelection::Preview => Some(WebsiteKind::Preview),
        }
    }
}

/// Decides whether the local checkout builds the main website.
///
/// Returns [`WebsiteKind::Main`] only if the checked out branch is
/// `main_branch` and the `origin` remote points at `repository`.
pub fn detect_website_kind(
    main_branch: &str,
    repository: &RepositoryIdentity,
    local: &dyn LocalCheckout,
) -> WebsiteKind {
    let branch = match local.current_branch() {
        Ok(branch) => branch,
        Err(e) => {
            debug!(error = %e, "Cannot read the local branch, building a preview");
            return WebsiteKind::Preview;
        }
    };

    let origin = match local.origin_url() {
        Ok(url) => url,
        Err(e) => {
            debug!(error = %e, "Cannot read the local remote, building a preview");
            return WebsiteKind::Preview;
        }
    };

    let same_repository = RepositoryIdentity::parse(&origin)
        .map(|local_identity| local_identity == *repository)
        .unwrap_or(false);

    let kind = if branch == main_branch && same_repository {
        WebsiteKind::Main
    } else {
        WebsiteKind::Preview
    };

    info!(
        local_branch = branch,
        main_branch = main_branch,
        origin = origin,
        website = %kind,
        "Detected website kind"
    );
    kind
}
