//! Tree coordinates
//!
//! A [`TreeCoordinate`] identifies one directory in a remote repository:
//! `owner/repository@branch:path`. Coordinates are produced by the
//! reference parser in the GitHub adapter and passed by value through the
//! engine; [`TreeCoordinate::child`] derives the coordinate of a
//! subdirectory during recursive traversal.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// A point in the remote hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeCoordinate {
    owner: String,
    repository: String,
    branch: String,
    path: String,
}

impl TreeCoordinate {
    /// Create a new coordinate
    ///
    /// `path` is stored without leading or trailing slashes.
    ///
    /// # Errors
    /// Returns error if owner, repository or branch is empty
    pub fn new(
        owner: impl Into<String>,
        repository: impl Into<String>,
        branch: impl Into<String>,
        path: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let owner = owner.into();
        let repository = repository.into();
        let branch = branch.into();
        let path = path.into().trim_matches('/').to_string();

        for (field, value) in [("owner", &owner), ("repository", &repository), ("branch", &branch)]
        {
            if value.is_empty() {
                return Err(DomainError::InvalidCoordinate(format!(
                    "{field} cannot be empty"
                )));
            }
        }

        Ok(Self {
            owner,
            repository,
            branch,
            path,
        })
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn repository(&self) -> &str {
        &self.repository
    }

    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Path inside the repository, `/`-separated, no leading slash
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Coordinate of the subdirectory `name` below this one
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        let path = if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}/{name}", self.path)
        };
        Self {
            path,
            ..self.clone()
        }
    }
}

impl Display for TreeCoordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}@{}:{}",
            self.owner, self.repository, self.branch, self.path
        )
    }
}
