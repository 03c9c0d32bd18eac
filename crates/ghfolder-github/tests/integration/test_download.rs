//! Integration tests for raw file downloads

use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use ghfolder_core::domain::FetchLocation;
use ghfolder_core::ports::IContentFetcher;
use ghfolder_github::GitHubError;

use crate::common;

fn location(server: &wiremock::MockServer, file_path: &str) -> FetchLocation {
    FetchLocation::new(format!("{}/raw/{}", server.uri(), file_path)).unwrap()
}

#[tokio::test]
async fn test_fetch_returns_content() {
    let (server, remote) = common::setup_github_mock().await;
    let content = b"# Intro\n\nHello from the mirror.\n";
    common::mount_raw(&server, "docs/intro.md", content).await;

    let data = remote
        .fetch(&location(&server, "docs/intro.md"))
        .await
        .expect("download failed");

    assert_eq!(data, content);
}

#[tokio::test]
async fn test_fetch_large_file() {
    let (server, remote) = common::setup_github_mock().await;
    let content: Vec<u8> = (0..1_048_576).map(|i| (i % 251) as u8).collect();
    common::mount_raw(&server, "bin/blob.dat", &content).await;

    let data = remote.fetch(&location(&server, "bin/blob.dat")).await.unwrap();

    assert_eq!(data.len(), 1_048_576);
    assert_eq!(data, content);
}

#[tokio::test]
async fn test_fetch_empty_file() {
    let (server, remote) = common::setup_github_mock().await;
    common::mount_raw(&server, "empty.txt", &[]).await;

    let data = remote.fetch(&location(&server, "empty.txt")).await.unwrap();
    assert!(data.is_empty());
}

#[tokio::test]
async fn test_fetch_missing_file() {
    let (server, remote) = common::setup_github_mock().await;
    Mock::given(method("GET"))
        .and(path("/raw/gone.txt"))
        .respond_with(ResponseTemplate::new(404).set_body_string("404: Not Found"))
        .mount(&server)
        .await;

    let err = remote
        .fetch(&location(&server, "gone.txt"))
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GitHubError>(),
        Some(GitHubError::NotFound(_))
    ));
}
