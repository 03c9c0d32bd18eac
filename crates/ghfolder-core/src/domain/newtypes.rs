//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for the values that flow
//! between the remote listing, the decision engine and the fingerprint store.
//! Each newtype ensures data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// Fingerprint
// ============================================================================

/// Opaque content fingerprint reported by the remote listing
///
/// For GitHub this is the git blob SHA. The engine only ever compares
/// fingerprints for equality; it never hashes local content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Create a new Fingerprint
    ///
    /// # Errors
    /// Returns error if the value is empty or contains whitespace
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::InvalidFingerprint(
                "Fingerprint cannot be empty".to_string(),
            ));
        }

        if value.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidFingerprint(format!(
                "Fingerprint contains whitespace: {value:?}"
            )));
        }

        Ok(Self(value))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Fingerprint {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Fingerprint> for String {
    fn from(fingerprint: Fingerprint) -> Self {
        fingerprint.0
    }
}

// ============================================================================
// FetchLocation
// ============================================================================

/// Where a file's raw bytes can be downloaded from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FetchLocation(String);

impl FetchLocation {
    /// Create a new FetchLocation
    ///
    /// # Errors
    /// Returns error if the location is empty or not an http(s) URL
    pub fn new(location: String) -> Result<Self, DomainError> {
        if location.is_empty() {
            return Err(DomainError::InvalidFetchLocation(
                "Fetch location cannot be empty".to_string(),
            ));
        }

        if !(location.starts_with("https://") || location.starts_with("http://")) {
            return Err(DomainError::InvalidFetchLocation(format!(
                "Fetch location must be an http(s) URL: {location}"
            )));
        }

        Ok(Self(location))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FetchLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FetchLocation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for FetchLocation {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<FetchLocation> for String {
    fn from(location: FetchLocation) -> Self {
        location.0
    }
}

// ============================================================================
// RelativePath
// ============================================================================

/// Path of a file relative to the sync root, as a sequence of segments
///
/// This is the fingerprint store's key and the sub-path of the local
/// mirror. Segments are validated so that a relative path can never
/// escape the output root. The root itself is the empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelativePath(Vec<String>);

impl RelativePath {
    /// Separator used by the key form
    pub const SEPARATOR: char = '/';

    /// The empty path (the sync root)
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a path from individual segments
    ///
    /// # Errors
    /// Returns error if any segment is invalid
    pub fn from_segments<I, S>(segments: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments = segments
            .into_iter()
            .map(Into::into)
            .map(|segment| Self::validate_segment(&segment).map(|()| segment))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(segments))
    }

    /// Parse the `/`-joined key form produced by [`RelativePath::as_key`]
    ///
    /// # Errors
    /// Returns error if any segment is invalid
    pub fn parse(key: &str) -> Result<Self, DomainError> {
        if key.is_empty() {
            return Ok(Self::root());
        }
        Self::from_segments(key.split(Self::SEPARATOR))
    }

    /// Append one segment
    ///
    /// # Errors
    /// Returns error if `segment` is empty, `.`, `..`, or contains a separator
    pub fn join(&self, segment: &str) -> Result<Self, DomainError> {
        Self::validate_segment(segment)?;
        let mut segments = self.0.clone();
        segments.push(segment.to_string());
        Ok(Self(segments))
    }

    /// Segments from the root
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether this is the sync root
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Last segment, if any
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Key form: segments joined by `/`
    #[must_use]
    pub fn as_key(&self) -> String {
        self.0.join("/")
    }

    /// Resolve this path under a local base directory
    #[must_use]
    pub fn to_local_path(&self, base: &Path) -> PathBuf {
        let mut path = base.to_path_buf();
        path.extend(&self.0);
        path
    }

    /// Characters a segment cannot hold on this platform
    #[cfg(not(windows))]
    const FORBIDDEN_IN_SEGMENT: &'static [char] = &['/', '\0'];
    #[cfg(windows)]
    const FORBIDDEN_IN_SEGMENT: &'static [char] = &['/', '\\', '\0'];

    fn validate_segment(segment: &str) -> Result<(), DomainError> {
        if segment.is_empty() {
            return Err(DomainError::InvalidPath(
                "Path segment cannot be empty".to_string(),
            ));
        }

        if segment == "." || segment == ".." {
            return Err(DomainError::InvalidPath(format!(
                "Path segment is a traversal: {segment}"
            )));
        }

        if segment.contains(Self::FORBIDDEN_IN_SEGMENT) {
            return Err(DomainError::InvalidPath(format!(
                "Path segment contains a separator: {segment}"
            )));
        }

        Ok(())
    }
}

impl Display for RelativePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

impl FromStr for RelativePath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RelativePath {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<RelativePath> for String {
    fn from(path: RelativePath) -> Self {
        path.as_key()
    }
}

// ============================================================================
// Tests
// ============================================================================
