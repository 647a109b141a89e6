use std::io;

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the config-stubs CLI application.
///
/// Every variant is fatal: the CLI reports it and exits with a non-zero
/// status.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error occurred while loading or parsing configuration.
    ///
    /// This error is returned when the configuration file is missing, cannot
    /// be parsed, or contains values the stub pipeline rejects.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The GitHub client could not be created.
    #[error("GitHub client error: {0}")]
    GitHub(#[from] github_client::Error),

    /// Failed to load a file from the filesystem.
    ///
    /// This error wraps underlying I/O errors that occur when reading files,
    /// such as permission issues or missing files.
    #[error("Failed to load file.")]
    LoadFile(io::Error),

    /// Failed to parse a TOML configuration file.
    #[error("Failed to parse TOML configuration file.")]
    ParseTomlFile(toml::de::Error),

    /// Stub discovery or integration failed.
    #[error("Stub build failed: {0}")]
    Stubs(#[from] config_stubs_core::StubsError),

    /// Failed to write output to the terminal.
    #[error("Failed to write output: {0}")]
    Output(String),
}
