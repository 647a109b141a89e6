//! Partitioning of repository refs into the main and preview sets.

use std::collections::BTreeSet;

use github_client::{GitRef, RefKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::RefTypeFilter;
use crate::errors::ConfigurationError;
use crate::patterns::RefPatternSet;
use crate::website::WebsiteKind;

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;

/// A ref kind filter combined with a set of name patterns.
#[derive(Debug, Clone)]
pub struct RefGroup {
    patterns: RefPatternSet,
    ref_type: RefTypeFilter,
}

impl RefGroup {
    /// Compiles a group from its space-separated pattern string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidPattern` if a pattern is not a
    /// valid glob.
    pub fn new(patterns: &str, ref_type: RefTypeFilter) -> Result<Self, ConfigurationError> {
        let patterns = RefPatternSet::parse(patterns)?;
        if patterns.is_empty() {
            info!(ref_type = ?ref_type, "Empty pattern, no refs will be selected");
        }
        Ok(Self { patterns, ref_type })
    }

    /// Returns `true` if the ref's kind passes the filter and its name
    /// matches at least one pattern.
    pub fn matches(&self, git_ref: &GitRef) -> bool {
        self.ref_type.accepts(git_ref.kind) && self.patterns.is_match(&git_ref.name)
    }

    pub fn ref_type(&self) -> RefTypeFilter {
        self.ref_type
    }

    pub fn patterns(&self) -> &RefPatternSet {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Main,
    Preview,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Main => write!(f, "main"),
            Classification::Preview => write!(f, "preview"),
        }
    }
}

/// A ref together with the set it was selected for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRef {
    pub git_ref: GitRef,
    pub classification: Classification,
}

impl ClassifiedRef {
    pub fn new(git_ref: GitRef, classification: Classification) -> Self {
        Self {
            git_ref,
            classification,
        }
    }

    pub fn name(&self) -> &str {
        &self.git_ref.name
    }

    fn key(&self) -> (&str, RefKind) {
        (&self.git_ref.name, self.git_ref.kind)
    }
}

/// Classifies refs against the main and preview groups.
#[derive(Debug, Clone)]
pub struct RefClassifier {
    main: RefGroup,
    preview: RefGroup,
    no_main: bool,
}

impl RefClassifier {
    pub fn new(main: RefGroup, preview: RefGroup, no_main: bool) -> Self {
        Self {
            main,
            preview,
            no_main,
        }
    }

    /// Ref kinds that must be listed from the remote to classify.
    pub fn required_kinds(&self) -> Vec<RefKind> {
        let kinds: BTreeSet<RefKind> = [&self.main, &self.preview]
            .into_iter()
            .filter(|group| !group.is_empty())
            .flat_map(|group| group.ref_type().kinds().iter().copied())
            .collect();
        kinds.into_iter().collect()
    }

    /// Partitions `refs` into the main and preview sets.
    ///
    /// Both sets are ordered by ref name (branches before tags of the same
    /// name) and free of duplicates, whatever the input order.
    pub fn classify(&self, refs: &[GitRef]) -> ClassifiedRefs {
        let mut sorted: Vec<&GitRef> = refs.iter().collect();
        sorted.sort_by(|a, b| (&a.name, a.kind).cmp(&(&b.name, b.kind)));
        // Keyed by name and kind, so refs sharing a commit stay separate pages.
        sorted.dedup_by(|a, b| a.name == b.name && a.kind == b.kind);

        let main: Vec<ClassifiedRef> = sorted
            .iter()
            .filter(|r| self.main.matches(r))
            .map(|r| ClassifiedRef::new((*r).clone(), Classification::Main))
            .collect();

        let preview: Vec<ClassifiedRef> = sorted
            .iter()
            .filter(|r| self.preview.matches(r))
            .filter(|r| {
                !self.no_main || !main.iter().any(|m| m.key() == (r.name.as_str(), r.kind))
            })
            .map(|r| ClassifiedRef::new((*r).clone(), Classification::Preview))
            .collect();

        info!(
            total = refs.len(),
            main = main.len(),
            preview = preview.len(),
            no_main = self.no_main,
            "Classified repository refs"
        );
        for classified in main.iter().chain(preview.iter()) {
            debug!(
                ref_name = classified.name(),
                kind = %classified.git_ref.kind,
                classification = %classified.classification,
                "Ref selected"
            );
        }

        ClassifiedRefs {
            main,
            preview,
            no_main: self.no_main,
        }
    }
}

/// The outcome of classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRefs {
    main: Vec<ClassifiedRef>,
    preview: Vec<ClassifiedRef>,
    no_main: bool,
}

impl ClassifiedRefs {
    pub fn main(&self) -> &[ClassifiedRef] {
        &self.main
    }

    /// Refs matched by the preview group alone.
    pub fn preview(&self) -> &[ClassifiedRef] {
        &self.preview
    }

    /// The refs shown on a preview website.
    ///
    /// Unless `no_main` is set this is the union of the preview and main
    /// sets; refs in both keep their main classification.
    pub fn rendered_preview(&self) -> Vec<ClassifiedRef> {
        if self.no_main {
            return self.preview.clone();
        }

        let mut rendered = self.main.clone();
        for candidate in &self.preview {
            if !rendered.iter().any(|r| r.key() == candidate.key()) {
                rendered.push(candidate.clone());
            }
        }
        rendered.sort_by(|a, b| a.key().cmp(&b.key()));
        rendered
    }

    /// The refs integrated for a website of the given kind.
    pub fn for_website(&self, kind: WebsiteKind) -> Vec<ClassifiedRef> {
        match kind {
            WebsiteKind::Main => self.main.clone(),
            WebsiteKind::Preview => self.rendered_preview(),
        }
    }
}
