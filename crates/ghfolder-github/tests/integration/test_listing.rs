//! Integration tests for directory listings

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use ghfolder_core::domain::EntryKind;
use ghfolder_core::ports::IRemoteTree;
use ghfolder_github::GitHubError;

use crate::common;

fn github_error(err: &anyhow::Error) -> &GitHubError {
    err.downcast_ref::<GitHubError>()
        .expect("error should wrap a GitHubError")
}

// ============================================================================
// Successful listings
// ============================================================================

#[tokio::test]
async fn test_list_children_maps_files_and_directories() {
    let (server, remote) = common::setup_github_mock().await;
    let items = serde_json::json!([
        common::file_item(&server, "docs", "intro.md", "sha-intro"),
        common::dir_item("docs", "api"),
    ]);
    common::mount_listing(&server, "docs", items).await;

    let entries = remote
        .list_children(&common::coordinate("docs"))
        .await
        .expect("listing failed");

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "intro.md");
    match &entries[0].kind {
        EntryKind::File {
            fingerprint,
            fetch_location,
        } => {
            assert_eq!(fingerprint.as_str(), "sha-intro");
            assert_eq!(
                fetch_location.as_str(),
                format!("{}/raw/docs/intro.md", server.uri())
            );
        }
        EntryKind::Directory => panic!("expected file"),
    }
    assert!(entries[1].is_directory());
}

#[tokio::test]
async fn test_list_nested_directory() {
    let (server, remote) = common::setup_github_mock().await;
    common::mount_listing(
        &server,
        "docs/api/v1",
        serde_json::json!([common::file_item(&server, "docs/api/v1", "a.md", "s1")]),
    )
    .await;

    let coord = common::coordinate("docs").child("api").child("v1");
    let entries = remote.list_children(&coord).await.unwrap();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn test_empty_directory() {
    let (server, remote) = common::setup_github_mock().await;
    common::mount_listing(&server, "empty", serde_json::json!([])).await;

    let entries = remote
        .list_children(&common::coordinate("empty"))
        .await
        .unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_requests_send_user_agent_and_accept() {
    let (server, remote) = common::setup_github_mock().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/repo/contents/docs"))
        .and(header("user-agent", "ghfolder-tests"))
        .and(header("accept", "application/vnd.github+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    remote
        .list_children(&common::coordinate("docs"))
        .await
        .unwrap();
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_missing_directory_is_not_found() {
    let (server, remote) = common::setup_github_mock().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/repo/contents/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&server)
        .await;

    let err = remote
        .list_children(&common::coordinate("nope"))
        .await
        .unwrap_err();
    assert!(matches!(github_error(&err), GitHubError::NotFound(_)));
}

#[tokio::test]
async fn test_file_coordinate_is_not_a_directory() {
    let (server, remote) = common::setup_github_mock().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/repo/contents/README.md"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::file_item(&server, "", "README.md", "sha")),
        )
        .mount(&server)
        .await;

    let err = remote
        .list_children(&common::coordinate("README.md"))
        .await
        .unwrap_err();
    assert!(matches!(github_error(&err), GitHubError::NotADirectory(_)));
}

#[tokio::test]
async fn test_exhausted_rate_limit_403() {
    let (server, remote) = common::setup_github_mock().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/repo/contents/docs"))
        .respond_with(
            ResponseTemplate::new(403)
                .append_header("x-ratelimit-remaining", "0")
                .append_header("x-ratelimit-reset", "1800000000")
                .set_body_json(serde_json::json!({"message": "API rate limit exceeded"})),
        )
        .mount(&server)
        .await;

    let err = remote
        .list_children(&common::coordinate("docs"))
        .await
        .unwrap_err();
    match github_error(&err) {
        GitHubError::RateLimited { reset_at } => {
            assert_eq!(reset_at.map(|t| t.timestamp()), Some(1_800_000_000));
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn test_secondary_rate_limit_429() {
    let (server, remote) = common::setup_github_mock().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/repo/contents/docs"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = remote
        .list_children(&common::coordinate("docs"))
        .await
        .unwrap_err();
    assert!(matches!(
        github_error(&err),
        GitHubError::RateLimited { reset_at: None }
    ));
}

#[tokio::test]
async fn test_plain_403_is_http_error() {
    let (server, remote) = common::setup_github_mock().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/repo/contents/docs"))
        .respond_with(
            ResponseTemplate::new(403)
                .append_header("x-ratelimit-remaining", "42")
                .set_body_json(serde_json::json!({"message": "Resource not accessible"})),
        )
        .mount(&server)
        .await;

    let err = remote
        .list_children(&common::coordinate("docs"))
        .await
        .unwrap_err();
    match github_error(&err) {
        GitHubError::Http { status, message } => {
            assert_eq!(status.as_u16(), 403);
            assert_eq!(message, "Resource not accessible");
        }
        other => panic!("expected Http, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error() {
    let (server, remote) = common::setup_github_mock().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/repo/contents/docs"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = remote
        .list_children(&common::coordinate("docs"))
        .await
        .unwrap_err();
    match github_error(&err) {
        GitHubError::ServerError { status, message } => {
            assert_eq!(status.as_u16(), 502);
            assert_eq!(message, "bad gateway");
        }
        other => panic!("expected ServerError, got {other:?}"),
    }
}
