//! Folder reference parsing
//!
//! A folder reference is the URL a user copies from the GitHub web UI:
//!
//! ```text
//! https://github.com/{owner}/{repo}/tree/{branch}/{path...}
//! ```
//!
//! Parsing happens before any network call; everything that does not have
//! this exact shape is rejected with `SyncError::InvalidReference`.

use std::borrow::Cow;

use url::Url;

use ghfolder_core::domain::{SyncError, TreeCoordinate};

/// Host accepted by [`parse_folder_url`] unless configured otherwise
pub const DEFAULT_HOST: &str = "github.com";

/// Marker segment between the repository and the branch
const TREE_SEGMENT: &str = "tree";

/// Parses a folder URL into a [`TreeCoordinate`]
///
/// The host must equal `expected_host` (case-insensitive). The path needs
/// at least `owner/repo/tree/branch/path`; branches containing `/` are not
/// distinguishable from the folder path and are read as a single segment.
pub fn parse_folder_url(input: &str, expected_host: &str) -> Result<TreeCoordinate, SyncError> {
    let invalid = |reason: &str| SyncError::InvalidReference(format!("{input}: {reason}"));

    let url = Url::parse(input.trim()).map_err(|e| invalid(&e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }

    match url.host_str() {
        Some(host) if host.eq_ignore_ascii_case(expected_host) => {}
        Some(host) => return Err(invalid(&format!("host must be {expected_host}, got {host}"))),
        None => return Err(invalid("missing host")),
    }

    let segments = url
        .path_segments()
        .map(|parts| {
            parts
                .filter(|s| !s.is_empty())
                .map(decode_segment)
                .collect::<Option<Vec<_>>>()
        })
        .ok_or_else(|| invalid("URL has no path"))?
        .ok_or_else(|| invalid("path is not valid percent-encoded UTF-8"))?;

    if segments.len() < 5 {
        return Err(invalid("expected /{owner}/{repo}/tree/{branch}/{path}"));
    }

    if segments[2] != TREE_SEGMENT {
        return Err(invalid("only /tree/ folder URLs are supported"));
    }

    TreeCoordinate::new(
        segments[0].clone(),
        segments[1].clone(),
        segments[3].clone(),
        segments[4..].join("/"),
    )
    .map_err(|e| invalid(&e.to_string()))
}

/// Decodes `%XX` escapes in one path segment
///
/// Malformed escapes are kept literally; only invalid UTF-8 is rejected.
fn decode_segment(segment: &str) -> Option<String> {
    urlencoding::decode(segment).ok().map(Cow::into_owned)
}
