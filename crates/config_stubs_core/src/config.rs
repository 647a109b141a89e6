//! Configuration for stub discovery.
//!
//! [`StubsConfig`] is an explicit struct with every field defaulted, so a
//! configuration file only needs to mention the options it overrides.
//!
//! # Example TOML Configuration
//!
//! ```toml
//! repo = "ACCESS-NRI/access-om3-configs"
//! stubs_dir = "documentation/stub"
//! stubs_parent_url = "configurations"
//!
//! [main_website]
//! pattern = "release-*"
//! ref_type = "tag"
//!
//! [preview_website]
//! pattern = "dev-* test-*"
//! ref_type = "branch"
//! no_main = false
//! ```
//!
//! Setting `include_local_stub = true` takes the stub of the checked out
//! branch from the working copy rather than from the remote.

use github_client::RefKind;
use serde::{Deserialize, Deserializer, Serialize};

use crate::classifier::RefGroup;
use crate::errors::ConfigurationError;
use crate::navigation::NavigationPlacement;
use crate::resolver::StubFormat;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

pub const DEFAULT_MAIN_PATTERN: &str = "release-*";
pub const DEFAULT_PREVIEW_PATTERN: &str = "dev-*";
pub const DEFAULT_STUBS_DIR: &str = "documentation/stub";
pub const DEFAULT_STUBS_PARENT_URL: &str = "configurations";
pub const DEFAULT_SUPPORTED_FILE_FORMATS: [&str; 2] = [".md", ".html"];
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 8;
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Which kinds of refs a website group selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefTypeFilter {
    Branch,
    Tag,
    All,
}

impl RefTypeFilter {
    /// Returns `true` if refs of `kind` pass this filter.
    pub fn accepts(&self, kind: RefKind) -> bool {
        match self {
            RefTypeFilter::Branch => kind == RefKind::Branch,
            RefTypeFilter::Tag => kind == RefKind::Tag,
            RefTypeFilter::All => true,
        }
    }

    /// The ref kinds that have to be listed to evaluate this filter.
    pub fn kinds(&self) -> &'static [RefKind] {
        match self {
            RefTypeFilter::Branch => &[RefKind::Branch],
            RefTypeFilter::Tag => &[RefKind::Tag],
            RefTypeFilter::All => &[RefKind::Branch, RefKind::Tag],
        }
    }
}

/// Which website the build produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebsiteSelection {
    /// Decide from the local checkout (see [`crate::website::detect_website_kind`]).
    #[default]
    Auto,
    Main,
    Preview,
}

/// Options for the permanently published website.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainWebsiteConfig {
    /// Space-separated glob patterns matched against ref names.
    pub pattern: String,
    pub ref_type: RefTypeFilter,
    /// Branch whose builds produce the main website. Defaults to the
    /// repository's default branch.
    pub branch: Option<String>,
}

impl Default for MainWebsiteConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_MAIN_PATTERN.to_string(),
            ref_type: RefTypeFilter::Tag,
            branch: None,
        }
    }
}

/// Options for preview builds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewWebsiteConfig {
    /// Space-separated glob patterns matched against ref names.
    pub pattern: String,
    pub ref_type: RefTypeFilter,
    /// Leave the main website refs out of preview builds.
    pub no_main: bool,
}

impl Default for PreviewWebsiteConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PREVIEW_PATTERN.to_string(),
            ref_type: RefTypeFilter::Branch,
            no_main: false,
        }
    }
}

/// Complete configuration of a stub build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StubsConfig {
    /// Repository to read stubs from: a GitHub URL, an SSH remote or
    /// `owner/name`. Inferred from the local checkout when omitted.
    pub repo: Option<String>,
    pub main_website: MainWebsiteConfig,
    pub preview_website: PreviewWebsiteConfig,
    /// Directory inspected at every ref.
    pub stubs_dir: String,
    /// Accepted stub extensions. A comma-separated string is accepted too.
    #[serde(deserialize_with = "deserialize_file_formats")]
    pub supported_file_formats: Vec<String>,
    /// URL prefix for stub pages; empty places them at the site root.
    pub stubs_parent_url: String,
    /// Navigation breadcrumb prefix, `/`-separated (or `>` in the legacy form).
    pub stubs_nav_path: Option<String>,
    pub max_concurrent_requests: usize,
    pub request_timeout_seconds: u64,
    pub website: WebsiteSelection,
    /// Show the checked out branch from the working copy's `stubs_dir`
    /// instead of its pushed state.
    pub include_local_stub: bool,
}

impl Default for StubsConfig {
    fn default() -> Self {
        Self {
            repo: None,
            main_website: MainWebsiteConfig::default(),
            preview_website: PreviewWebsiteConfig::default(),
            stubs_dir: DEFAULT_STUBS_DIR.to_string(),
            supported_file_formats: DEFAULT_SUPPORTED_FILE_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            stubs_parent_url: DEFAULT_STUBS_PARENT_URL.to_string(),
            stubs_nav_path: None,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            website: WebsiteSelection::Auto,
            include_local_stub: false,
        }
    }
}

/// The parsed, validated form of a [`StubsConfig`].
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub main_group: RefGroup,
    pub preview_group: RefGroup,
    pub no_main: bool,
    pub stubs_dir: String,
    pub formats: Vec<StubFormat>,
    pub placement: NavigationPlacement,
    pub max_concurrent_requests: usize,
    pub request_timeout: std::time::Duration,
    pub include_local_stub: bool,
}

impl StubsConfig {
    /// Parses every option that can be malformed.
    ///
    /// Runs before any remote call so that configuration errors surface with
    /// no partial output.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigurationError` found.
    pub fn validate(&self) -> Result<ValidatedConfig, ConfigurationError> {
        let stubs_dir = self.stubs_dir.trim().trim_matches('/').to_string();
        if stubs_dir.is_empty() {
            return Err(ConfigurationError::InvalidValue {
                field: "stubs_dir".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if self.max_concurrent_requests == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "max_concurrent_requests".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.request_timeout_seconds == 0 {
            return Err(ConfigurationError::InvalidValue {
                field: "request_timeout_seconds".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        let formats = StubFormat::parse_all(&self.supported_file_formats)?;
        if formats.is_empty() {
            return Err(ConfigurationError::InvalidValue {
                field: "supported_file_formats".to_string(),
                reason: "at least one format is required".to_string(),
            });
        }

        Ok(ValidatedConfig {
            main_group: RefGroup::new(&self.main_website.pattern, self.main_website.ref_type)?,
            preview_group: RefGroup::new(
                &self.preview_website.pattern,
                self.preview_website.ref_type,
            )?,
            no_main: self.preview_website.no_main,
            stubs_dir,
            formats,
            placement: NavigationPlacement::compute(
                &self.stubs_parent_url,
                self.stubs_nav_path.as_deref(),
            )?,
            max_concurrent_requests: self.max_concurrent_requests,
            request_timeout: std::time::Duration::from_secs(self.request_timeout_seconds),
            include_local_stub: self.include_local_stub,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FileFormats {
    Joined(String),
    List(Vec<String>),
}

fn deserialize_file_formats<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match FileFormats::deserialize(deserializer)? {
        FileFormats::Joined(joined) => joined
            .split(',')
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect(),
        FileFormats::List(list) => list,
    })
}
