//! URL and navigation placement of stub pages.
//!
//! The placement is computed once per build from `stubs_parent_url` and the
//! optional `stubs_nav_path`; every stub is then placed below it under its
//! ref name. Ref names are a single opaque segment: `feature/x` becomes the
//! URL segment `feature%2Fx` and the navigation label `feature/x`.

use tracing::info;
use url::Url;

use crate::errors::ConfigurationError;
use crate::resolver::StubFormat;

#[cfg(test)]
#[path = "navigation_tests.rs"]
mod tests;

const LEGACY_NAV_SEPARATOR: char = '>';
const SEGMENT_ENCODING_BASE: &str = "http://stubs.invalid/";

/// Where the stub collection sits in the site URL space and navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationPlacement {
    url_prefix: Vec<String>,
    nav_path: Vec<String>,
}

impl NavigationPlacement {
    /// Computes the placement for a build.
    ///
    /// # Arguments
    ///
    /// * `parent_url` - `/`-separated URL prefix; empty places stubs at the site root.
    /// * `nav_path` - Explicit breadcrumb, `/`-separated or `>`-separated.
    ///   Derived from `parent_url` when `None`.
    ///
    /// # Errors
    ///
    /// * `ConfigurationError::InvalidParentUrl` - empty or dot segments in `parent_url`.
    /// * `ConfigurationError::InvalidNavPath` - empty segments in `nav_path`.
    pub fn compute(parent_url: &str, nav_path: Option<&str>) -> Result<Self, ConfigurationError> {
        let url_prefix = parse_parent_url(parent_url)?;
        let nav_path = match nav_path {
            Some(explicit) => parse_nav_path(explicit)?,
            None => derive_nav_path(&url_prefix),
        };

        info!(
            url_prefix = url_prefix.join("/"),
            nav_path = nav_path.join(" > "),
            "Computed stub placement"
        );

        Ok(Self {
            url_prefix,
            nav_path,
        })
    }

    pub fn url_prefix(&self) -> &[String] {
        &self.url_prefix
    }

    pub fn nav_path(&self) -> &[String] {
        &self.nav_path
    }

    /// Site URL of a stub page, ending in `/`.
    pub fn stub_url(&self, ref_name: &str) -> String {
        let mut segments = self.url_prefix.clone();
        segments.push(encode_segment(ref_name));
        format!("{}/", segments.join("/"))
    }

    /// Navigation breadcrumb of a stub page; the leaf is the ref name.
    pub fn stub_breadcrumb(&self, ref_name: &str) -> Vec<String> {
        let mut breadcrumb = self.nav_path.clone();
        breadcrumb.push(ref_name.to_string());
        breadcrumb
    }

    /// Site-relative source path of a stub document.
    pub fn stub_source_path(&self, ref_name: &str, format: &StubFormat) -> String {
        let mut segments = self.url_prefix.clone();
        segments.push(format!("{}{}", encode_segment(ref_name), format.extension()));
        segments.join("/")
    }
}

/// Derives a breadcrumb from URL prefix segments.
///
/// Underscores become spaces and the first letter of each segment is
/// uppercased: `configuration_stubs` gives `Configuration stubs`.
pub fn derive_nav_path(url_prefix: &[String]) -> Vec<String> {
    url_prefix
        .iter()
        .map(|segment| capitalize(&segment.replace('_', " ")))
        .collect()
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn parse_parent_url(value: &str) -> Result<Vec<String>, ConfigurationError> {
    let trimmed = value.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    trimmed
        .split('/')
        .map(|segment| match segment {
            "" => Err(ConfigurationError::InvalidParentUrl {
                value: value.to_string(),
                reason: "contains an empty segment".to_string(),
            }),
            "." | ".." => Err(ConfigurationError::InvalidParentUrl {
                value: value.to_string(),
                reason: format!("contains the relative segment '{}'", segment),
            }),
            s if s.chars().any(char::is_whitespace) => Err(ConfigurationError::InvalidParentUrl {
                value: value.to_string(),
                reason: "segments must not contain whitespace".to_string(),
            }),
            s => Ok(s.to_string()),
        })
        .collect()
}

fn parse_nav_path(value: &str) -> Result<Vec<String>, ConfigurationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let segments: Vec<&str> = if trimmed.contains(LEGACY_NAV_SEPARATOR) {
        trimmed.split(LEGACY_NAV_SEPARATOR).collect()
    } else {
        trimmed.trim_matches('/').split('/').collect()
    };

    segments
        .into_iter()
        .map(|segment| {
            let segment = segment.trim();
            if segment.is_empty() {
                Err(ConfigurationError::InvalidNavPath {
                    value: value.to_string(),
                    reason: "contains an empty segment".to_string(),
                })
            } else {
                Ok(segment.to_string())
            }
        })
        .collect()
}

/// Percent-encodes `segment` as one URL path segment, `/` included.
fn encode_segment(segment: &str) -> String {
    let mut url = match Url::parse(SEGMENT_ENCODING_BASE) {
        Ok(url) => url,
        Err(_) => return segment.to_string(),
    };
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear().push(segment);
    }
    url.path().trim_start_matches('/').to_string()
}
