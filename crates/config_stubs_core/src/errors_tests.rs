use super::*;
use std::error::Error as StdError;

#[test]
fn test_unsupported_repo_format_display() {
    let error = ConfigurationError::UnsupportedRepoFormat {
        input: "not a repo".to_string(),
    };

    assert_eq!(error.to_string(), "Unsupported repo format: 'not a repo'");
}

#[test]
fn test_unsupported_host_display() {
    let error = ConfigurationError::UnsupportedHost {
        input: "https://gitlab.com/o/r".to_string(),
        host: "gitlab.com".to_string(),
    };

    assert!(error.to_string().contains("Unsupported host 'gitlab.com'"));
}

#[test]
fn test_configuration_error_wraps_into_stubs_error() {
    let error: StubsError = ConfigurationError::InvalidPattern {
        pattern: "[".to_string(),
        reason: "unclosed character class".to_string(),
    }
    .into();

    assert!(matches!(error, StubsError::Configuration(_)));
    assert!(error
        .to_string()
        .starts_with("Configuration error: Invalid glob pattern '['"));
}

#[test]
fn test_remote_access_error_keeps_source() {
    let error = StubsError::remote("listing tags", github_client::Error::RateLimitExceeded);

    assert_eq!(
        error.to_string(),
        "Remote access failed during listing tags: Rate limit exceeded"
    );
    assert!(error.source().is_some());
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StubsError>();
    assert_send_sync::<ConfigurationError>();
}

#[test]
fn test_no_repository_keeps_checkout_error() {
    let error = ConfigurationError::NoRepository {
        source: LocalCheckoutError::NoOrigin {
            reason: "remote 'origin' does not exist".to_string(),
        },
    };

    assert_eq!(
        error.to_string(),
        "No repo configured and no local remote: No 'origin' remote: remote 'origin' does not exist"
    );
    assert_eq!(
        error.source().map(|s| s.to_string()).as_deref(),
        Some("No 'origin' remote: remote 'origin' does not exist")
    );
}

#[test]
fn test_local_checkout_error_display() {
    assert_eq!(LocalCheckoutError::DetachedHead.to_string(), "HEAD is detached");
    assert_eq!(
        LocalCheckoutError::InvalidUtf8 { what: "branch name" }.to_string(),
        "The branch name is not valid UTF-8"
    );
}
