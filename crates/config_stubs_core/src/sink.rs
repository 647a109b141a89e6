//! Destinations for generated documents.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::errors::{StubsError, StubsResult};
use crate::integrator::VirtualDocument;

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;

/// Name of the navigation manifest written by [`DirectorySink`].
pub const NAV_MANIFEST_FILENAME: &str = "stubs-nav.json";

/// Accepts the documents of a build.
///
/// Implementations receive every document of the build in one call, in
/// navigation order.
#[async_trait]
pub trait DocumentSink: Send {
    async fn register(&mut self, documents: Vec<VirtualDocument>) -> StubsResult<()>;
}

/// The in-memory document set of a site build.
///
/// Build stages register documents into it and transform them in place.
#[derive(Debug, Default, Clone)]
pub struct SiteDocuments {
    documents: Vec<VirtualDocument>,
}

impl SiteDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &[VirtualDocument] {
        &self.documents
    }

    pub fn documents_mut(&mut self) -> &mut Vec<VirtualDocument> {
        &mut self.documents
    }

    pub fn into_documents(self) -> Vec<VirtualDocument> {
        self.documents
    }
}

#[async_trait]
impl DocumentSink for SiteDocuments {
    async fn register(&mut self, documents: Vec<VirtualDocument>) -> StubsResult<()> {
        self.documents.extend(documents);
        Ok(())
    }
}

/// One navigation entry of the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    pub url: String,
    pub path: String,
    pub title: Option<String>,
    pub breadcrumb: Vec<String>,
}

impl From<&VirtualDocument> for NavEntry {
    fn from(doc: &VirtualDocument) -> Self {
        Self {
            url: doc.url.clone(),
            path: doc.site_relative_path.clone(),
            title: doc.title.clone(),
            breadcrumb: doc.nav_breadcrumb.clone(),
        }
    }
}

/// A sink that writes documents below a directory.
///
/// Each document is written to its site-relative path and a
/// [`NAV_MANIFEST_FILENAME`] manifest lists the navigation entries in order.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn write(&self, relative: &str, content: &[u8]) -> StubsResult<()> {
        let target = self.root.join(relative);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StubsError::Sink {
                    reason: format!("cannot create {}: {}", parent.display(), e),
                })?;
        }
        tokio::fs::write(&target, content)
            .await
            .map_err(|e| StubsError::Sink {
                reason: format!("cannot write {}: {}", target.display(), e),
            })?;
        debug!(path = %target.display(), size = content.len(), "Document written");
        Ok(())
    }
}

#[async_trait]
impl DocumentSink for DirectorySink {
    #[instrument(skip(self, documents), fields(root = %self.root.display(), count = documents.len()))]
    async fn register(&mut self, documents: Vec<VirtualDocument>) -> StubsResult<()> {
        for doc in &documents {
            self.write(&doc.site_relative_path, &doc.content).await?;
        }

        let entries: Vec<NavEntry> = documents.iter().map(NavEntry::from).collect();
        let manifest = serde_json::to_vec_pretty(&entries).map_err(|e| StubsError::Sink {
            reason: format!("cannot serialize the navigation manifest: {}", e),
        })?;
        self.write(NAV_MANIFEST_FILENAME, &manifest).await?;

        info!(count = documents.len(), "Documents written");
        Ok(())
    }
}
