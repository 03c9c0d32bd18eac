//! Shared test helpers for GitHub API integration tests
//!
//! Each helper mounts the necessary mock endpoints on a wiremock server.

use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ghfolder_core::domain::TreeCoordinate;
use ghfolder_github::{GitHubClient, GitHubRemote};

/// Starts a mock server and returns a (MockServer, GitHubRemote) tuple
/// whose client points at it.
pub async fn setup_github_mock() -> (MockServer, GitHubRemote) {
    let server = MockServer::start().await;
    let client = GitHubClient::with_base_url(server.uri(), "ghfolder-tests", Duration::from_secs(5))
        .expect("build client");
    (server, GitHubRemote::new(client))
}

pub fn coordinate(path: &str) -> TreeCoordinate {
    TreeCoordinate::new("octo", "repo", "main", path).unwrap()
}

/// JSON for a file item whose download URL points back at the mock server
pub fn file_item(server: &MockServer, dir: &str, name: &str, sha: &str) -> serde_json::Value {
    let full = if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    };
    serde_json::json!({
        "name": name,
        "path": full,
        "sha": sha,
        "size": 10,
        "type": "file",
        "download_url": format!("{}/raw/{}", server.uri(), full),
    })
}

pub fn dir_item(dir: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "path": format!("{dir}/{name}"),
        "sha": "0000000000000000000000000000000000000000",
        "size": 0,
        "type": "dir",
        "download_url": null,
    })
}

/// Mounts a contents listing for `dir` on branch `main`
pub async fn mount_listing(server: &MockServer, dir: &str, items: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/octo/repo/contents/{dir}")))
        .and(query_param("ref", "main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(items))
        .mount(server)
        .await;
}

/// Mounts a raw download for `file_path`
pub async fn mount_raw(server: &MockServer, file_path: &str, content: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/raw/{file_path}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(content.to_vec())
                .append_header("Content-Type", "application/octet-stream"),
        )
        .mount(server)
        .await;
}
