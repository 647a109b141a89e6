use super::*;
use config_stubs_core::{ConfigurationError, StubsError};

#[test]
fn test_config_error_display() {
    let error = Error::Config("Configuration file not found".to_string());
    assert_eq!(
        error.to_string(),
        "Configuration error: Configuration file not found"
    );
}

#[test]
fn test_stubs_error_conversion() {
    let error: Error = StubsError::from(ConfigurationError::UnsupportedRepoFormat {
        input: "nope".to_string(),
    })
    .into();

    assert!(matches!(error, Error::Stubs(_)));
    assert_eq!(
        error.to_string(),
        "Stub build failed: Configuration error: Unsupported repo format: 'nope'"
    );
}

#[test]
fn test_github_error_conversion() {
    let error: Error = github_client::Error::AuthError("bad".to_string()).into();

    assert!(matches!(error, Error::GitHub(_)));
}

#[test]
fn test_load_file_error_display() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
    let error = Error::LoadFile(io_error);
    assert_eq!(error.to_string(), "Failed to load file.");
}

#[test]
fn test_error_debug_format() {
    let error = Error::Config("test".to_string());
    let debug_output = format!("{:?}", error);
    assert!(debug_output.contains("Config"));
    assert!(debug_output.contains("test"));
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Error>();
}
