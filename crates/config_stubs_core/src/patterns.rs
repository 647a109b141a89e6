//! Glob matching over ref names.
//!
//! Patterns are configured as one space-separated string. Each pattern is a
//! shell-style glob supporting `*`, `?` and bracket classes, compiled with
//! `globset` so matching never shells out. `*` also matches `/`, so
//! `release-*` selects `release-1.0/hotfix`.

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::errors::ConfigurationError;

#[cfg(test)]
#[path = "patterns_tests.rs"]
mod tests;

/// A compiled set of ref name patterns.
#[derive(Debug, Clone)]
pub struct RefPatternSet {
    patterns: Vec<String>,
    set: GlobSet,
}

impl RefPatternSet {
    /// Compiles a space-separated list of glob patterns.
    ///
    /// An empty or blank string yields a set that matches nothing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidPattern` for the first pattern
    /// that is not a valid glob.
    pub fn parse(patterns: &str) -> Result<Self, ConfigurationError> {
        let mut builder = GlobSetBuilder::new();
        let mut parsed = Vec::new();

        for pattern in patterns.split_whitespace() {
            let glob = Glob::new(pattern).map_err(|e| ConfigurationError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.kind().to_string(),
            })?;
            builder.add(glob);
            parsed.push(pattern.to_string());
        }

        let set = builder
            .build()
            .map_err(|e| ConfigurationError::InvalidPattern {
                pattern: patterns.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            patterns: parsed,
            set,
        })
    }

    /// Returns `true` if `name` matches at least one pattern.
    pub fn is_match(&self, name: &str) -> bool {
        self.set.is_match(name)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl std::fmt::Display for RefPatternSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.patterns.join(" "))
    }
}
