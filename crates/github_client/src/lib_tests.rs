//! Unit tests for the github_client crate.

use super::*; // Import items from lib.rs
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OWNER: &str = "test-owner";
const REPO: &str = "test-repo";

fn create_test_client(mock_server: &MockServer) -> GitHubClient {
    let octocrab = create_public_client(Some(&mock_server.uri())).unwrap();
    GitHubClient::new(octocrab)
}

fn github_error(message: &str) -> serde_json::Value {
    json!({
        "message": message,
        "documentation_url": "https://docs.github.com/rest"
    })
}

#[tokio::test]
async fn test_list_refs_tags_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{OWNER}/{REPO}/git/matching-refs/tags")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "ref": "refs/tags/release-1.0",
                "node_id": "MDM6UmVmcmVmcy90YWdzL3YxLjA=",
                "url": "https://api.github.com/repos/test-owner/test-repo/git/refs/tags/release-1.0",
                "object": { "sha": "aaa111", "type": "commit", "url": "https://example.invalid" }
            },
            {
                "ref": "refs/tags/release-2.0",
                "node_id": "MDM6UmVmcmVmcy90YWdzL3YyLjA=",
                "url": "https://api.github.com/repos/test-owner/test-repo/git/refs/tags/release-2.0",
                "object": { "sha": "bbb222", "type": "tag", "url": "https://example.invalid" }
            }
        ])))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let refs = client.list_refs(OWNER, REPO, RefKind::Tag).await.unwrap();

    assert_eq!(refs.len(), 2);
    assert_eq!(refs[0].name, "release-1.0");
    assert_eq!(refs[0].kind, RefKind::Tag);
    assert_eq!(refs[0].sha.as_deref(), Some("aaa111"));
    assert_eq!(refs[1].name, "release-2.0");
}

#[tokio::test]
async fn test_list_refs_branches_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{OWNER}/{REPO}/git/matching-refs/heads")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let refs = client.list_refs(OWNER, REPO, RefKind::Branch).await.unwrap();

    assert!(refs.is_empty());
}

#[tokio::test]
async fn test_list_refs_repository_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{OWNER}/{REPO}/git/matching-refs/heads")))
        .respond_with(ResponseTemplate::new(404).set_body_json(github_error("Not Found")))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client.list_refs(OWNER, REPO, RefKind::Branch).await;

    assert!(matches!(result, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_list_refs_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{OWNER}/{REPO}/git/matching-refs/tags")))
        .respond_with(ResponseTemplate::new(403).set_body_json(github_error(
            "API rate limit exceeded for 127.0.0.1.",
        )))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client.list_refs(OWNER, REPO, RefKind::Tag).await;

    match result {
        Err(e) => {
            assert!(matches!(e, Error::RateLimitExceeded));
            assert!(e.is_repository_wide());
        }
        Ok(_) => panic!("Expected a rate limit error"),
    }
}

#[tokio::test]
async fn test_list_directory_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/repos/{OWNER}/{REPO}/contents/documentation/stub"
        )))
        .and(query_param("ref", "aaa111"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "name": "intro.md",
                "path": "documentation/stub/intro.md",
                "type": "file",
                "sha": "f1",
                "size": 42,
                "download_url": "https://raw.githubusercontent.com/test-owner/test-repo/aaa111/documentation/stub/intro.md"
            },
            {
                "name": "images",
                "path": "documentation/stub/images",
                "type": "dir",
                "sha": "d1",
                "size": 0,
                "download_url": null
            }
        ])))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let entries = client
        .list_directory(OWNER, REPO, "documentation/stub", "aaa111")
        .await
        .unwrap()
        .expect("directory should exist");

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "intro.md");
    assert!(entries[0].is_file());
    assert_eq!(entries[1].entry_type, EntryType::Dir);
}

#[tokio::test]
async fn test_list_directory_missing_path_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/repos/{OWNER}/{REPO}/contents/documentation/stub"
        )))
        .respond_with(ResponseTemplate::new(404).set_body_json(github_error("Not Found")))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client
        .list_directory(OWNER, REPO, "documentation/stub", "dev-1")
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_list_directory_file_path_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/repos/{OWNER}/{REPO}/contents/documentation/stub"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "stub",
            "path": "documentation/stub",
            "type": "file",
            "sha": "f1",
            "size": 3,
            "encoding": "base64",
            "content": "YWJj"
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client
        .list_directory(OWNER, REPO, "documentation/stub", "dev-1")
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_list_directory_unauthorized_is_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/repos/{OWNER}/{REPO}/contents/documentation/stub"
        )))
        .respond_with(ResponseTemplate::new(401).set_body_json(github_error("Bad credentials")))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client
        .list_directory(OWNER, REPO, "documentation/stub", "dev-1")
        .await;

    assert!(matches!(result, Err(Error::Unauthorized(_))));
}

#[tokio::test]
async fn test_get_file_content_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/repos/{OWNER}/{REPO}/contents/documentation/stub/intro.md"
        )))
        .and(query_param("ref", "aaa111"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "intro.md",
            "path": "documentation/stub/intro.md",
            "type": "file",
            "sha": "f1",
            "size": 14,
            "encoding": "base64",
            "content": "IyBSZWxl\nYXNlIDEuMAo=\n"
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let content = client
        .get_file_content(OWNER, REPO, "documentation/stub/intro.md", "aaa111")
        .await
        .unwrap();

    assert_eq!(content, b"# Release 1.0\n".to_vec());
}

#[tokio::test]
async fn test_get_file_content_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/repos/{OWNER}/{REPO}/contents/documentation/stub/intro.md"
        )))
        .respond_with(ResponseTemplate::new(404).set_body_json(github_error("Not Found")))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client
        .get_file_content(OWNER, REPO, "documentation/stub/intro.md", "gone")
        .await;

    assert!(matches!(result, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_get_default_branch_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{OWNER}/{REPO}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 123456,
            "name": REPO,
            "full_name": format!("{OWNER}/{REPO}"),
            "default_branch": "main",
            "private": false
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let branch = client.get_default_branch(OWNER, REPO).await.unwrap();

    assert_eq!(branch, "main");
}

#[tokio::test]
async fn test_create_token_client_success() {
    let result = create_token_client("test-token", None);

    assert!(result.is_ok());
}

#[test]
fn test_contents_path_trims_slashes() {
    assert_eq!(
        contents_path("o", "r", "/documentation/stub/"),
        "/repos/o/r/contents/documentation/stub"
    );
}
