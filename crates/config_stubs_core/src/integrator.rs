//! Conversion of resolved stubs into virtual site documents.

use std::collections::HashSet;

use futures::stream::{self, StreamExt, TryStreamExt};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::errors::StubsResult;
use crate::local::LocalStub;
use crate::navigation::NavigationPlacement;
use crate::remote::RemoteRepository;
use crate::resolver::{StubCandidate, StubFormat};
use crate::sink::DocumentSink;

#[cfg(test)]
#[path = "integrator_tests.rs"]
mod tests;

/// A generated page handed to the site build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualDocument {
    /// Source path of the page, relative to the site root.
    pub site_relative_path: String,
    pub content: Vec<u8>,
    /// Site URL of the rendered page.
    pub url: String,
    /// Navigation sections leading to the page; the last entry is the ref name.
    pub nav_breadcrumb: Vec<String>,
    /// First level-1 heading of the content.
    pub title: Option<String>,
    pub ref_name: String,
}

/// Fetches stub contents and registers them with a [`DocumentSink`].
#[derive(Debug, Clone)]
pub struct StubIntegrator {
    remote: RemoteRepository,
    placement: NavigationPlacement,
    max_concurrent_requests: usize,
    local_stub: Option<LocalStub>,
}

impl StubIntegrator {
    pub fn new(
        remote: RemoteRepository,
        placement: NavigationPlacement,
        max_concurrent_requests: usize,
    ) -> Self {
        Self {
            remote,
            placement,
            max_concurrent_requests: max_concurrent_requests.max(1),
            local_stub: None,
        }
    }

    /// Adds the stub of the local working copy ahead of the remote stubs.
    pub fn with_local_stub(mut self, local_stub: Option<LocalStub>) -> Self {
        self.local_stub = local_stub;
        self
    }

    pub fn placement(&self) -> &NavigationPlacement {
        &self.placement
    }

    pub fn local_stub(&self) -> Option<&LocalStub> {
        self.local_stub.as_ref()
    }

    /// Builds one document per candidate, in candidate order, preceded by
    /// the local stub if there is one.
    ///
    /// Candidates whose content cannot be read are skipped. Documents that
    /// would share a URL get a numeric suffix, later documents first.
    ///
    /// # Errors
    ///
    /// Returns `StubsError::RemoteAccess` when a read fails for the whole
    /// repository.
    #[instrument(skip(self, candidates), fields(candidates = candidates.len()))]
    pub async fn build_documents(
        &self,
        candidates: Vec<StubCandidate>,
    ) -> StubsResult<Vec<VirtualDocument>> {
        let fetched: Vec<Option<VirtualDocument>> = stream::iter(candidates)
            .map(|candidate| self.build_document(candidate))
            .buffered(self.max_concurrent_requests)
            .try_collect()
            .await?;

        let mut documents: Vec<VirtualDocument> = self
            .local_stub
            .iter()
            .map(|stub| self.local_document(stub))
            .chain(fetched.into_iter().flatten())
            .collect();
        let stems: Vec<String> = documents.iter().map(url_stem).collect();
        let unique_stems = assign_unique_stems(&stems);
        for ((doc, natural), unique) in documents.iter_mut().zip(&stems).zip(unique_stems) {
            if unique == *natural {
                continue;
            }
            let extension = doc
                .site_relative_path
                .strip_prefix(natural.as_str())
                .unwrap_or_default()
                .to_string();
            warn!(
                ref_name = doc.ref_name,
                url = doc.url,
                renamed_to = unique,
                "Stub URL already in use, renamed"
            );
            doc.site_relative_path = format!("{}{}", unique, extension);
            doc.url = format!("{}/", unique);
        }

        Ok(documents)
    }

    /// Builds the documents and hands them to `sink` in a single call.
    ///
    /// Returns the number of registered documents.
    pub async fn integrate(
        &self,
        candidates: Vec<StubCandidate>,
        sink: &mut dyn DocumentSink,
    ) -> StubsResult<usize> {
        let documents = self.build_documents(candidates).await?;
        let count = documents.len();
        for doc in &documents {
            info!(ref_name = doc.ref_name, url = doc.url, "Adding stub to the site");
        }
        sink.register(documents).await?;
        info!(
            count = count,
            nav_path = self.placement.nav_path().join(" > "),
            "Added configuration stubs to the site navigation"
        );
        Ok(count)
    }

    fn local_document(&self, stub: &LocalStub) -> VirtualDocument {
        VirtualDocument {
            site_relative_path: self.placement.stub_source_path(&stub.name, &stub.format),
            content: stub.content.clone(),
            url: self.placement.stub_url(&stub.name),
            nav_breadcrumb: self.placement.stub_breadcrumb(&stub.name),
            title: extract_title(&stub.content, &stub.format),
            ref_name: stub.name.clone(),
        }
    }

    async fn build_document(&self, candidate: StubCandidate) -> StubsResult<Option<VirtualDocument>> {
        let git_ref = &candidate.classified_ref.git_ref;
        let content = match self
            .remote
            .file_content(git_ref, &candidate.file_path)
            .await?
        {
            Some(content) => content,
            None => return Ok(None),
        };

        let title = extract_title(&content, &candidate.format);
        debug!(
            ref_name = git_ref.name,
            file_path = candidate.file_path,
            title = ?title,
            "Stub content fetched"
        );

        Ok(Some(VirtualDocument {
            site_relative_path: self
                .placement
                .stub_source_path(&git_ref.name, &candidate.format),
            content,
            url: self.placement.stub_url(&git_ref.name),
            nav_breadcrumb: self.placement.stub_breadcrumb(&git_ref.name),
            title,
            ref_name: git_ref.name.clone(),
        }))
    }
}

/// Extracts the first level-1 heading of a stub.
///
/// Markdown stubs use the first ATX `# ` heading outside fenced code blocks;
/// HTML stubs the first `<h1>` element with inner tags removed.
pub fn extract_title(content: &[u8], format: &StubFormat) -> Option<String> {
    let text = String::from_utf8_lossy(content);
    if format.is_html() {
        html_title(&text)
    } else {
        markdown_title(&text)
    }
}

fn html_title(text: &str) -> Option<String> {
    let heading = Regex::new(r"(?is)<h1\b[^>]*>(.*?)</h1\s*>").ok()?;
    let tags = Regex::new(r"<[^>]*>").ok()?;
    let raw = heading.captures(text)?.get(1)?.as_str();

    let title = tags
        .replace_all(raw, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

fn markdown_title(text: &str) -> Option<String> {
    let heading = Regex::new(r"^ {0,3}#[ \t]+(.+?)(?:[ \t]+#+)?[ \t]*$").ok()?;
    let fence = Regex::new(r"^ {0,3}(`{3,}|~{3,})").ok()?;

    // Marker of the code fence the scan is inside, if any.
    let mut open_fence: Option<&str> = None;
    for line in text.lines() {
        if let Some(marker) = fence.captures(line).and_then(|c| c.get(1)) {
            let marker = marker.as_str();
            match open_fence {
                None => open_fence = Some(marker),
                Some(open) if closes_fence(open, marker, line) => open_fence = None,
                Some(_) => {}
            }
            continue;
        }
        if open_fence.is_some() {
            continue;
        }

        if let Some(title) = heading.captures(line).and_then(|c| c.get(1)) {
            let title = title.as_str().trim();
            if !title.is_empty() {
                return Some(title.to_string());
            }
        }
    }
    None
}

/// A fence closes with the same character, at least as long as the opening
/// one, and with nothing but whitespace after it.
fn closes_fence(open: &str, marker: &str, line: &str) -> bool {
    marker.chars().next() == open.chars().next()
        && marker.len() >= open.len()
        && line.trim_start().trim_start_matches(marker).trim().is_empty()
}

/// The URL of `doc` without its trailing slash.
fn url_stem(doc: &VirtualDocument) -> String {
    doc.url.trim_end_matches('/').to_string()
}

/// Picks a distinct URL stem for each entry of `stems`, in order.
///
/// The first claimant of a stem keeps it. Later ones get the lowest numeric
/// suffix that is neither taken nor the natural stem of another entry.
fn assign_unique_stems(stems: &[String]) -> Vec<String> {
    let natural: HashSet<&str> = stems.iter().map(String::as_str).collect();
    let mut taken: HashSet<String> = HashSet::with_capacity(stems.len());
    let mut unique = Vec::with_capacity(stems.len());

    for stem in stems {
        if taken.insert(stem.clone()) {
            unique.push(stem.clone());
            continue;
        }

        let mut counter: u32 = 1;
        loop {
            let candidate = format!("{}{}", stem, counter);
            if !natural.contains(candidate.as_str()) && taken.insert(candidate.clone()) {
                unique.push(candidate);
                break;
            }
            counter += 1;
        }
    }
    unique
}
