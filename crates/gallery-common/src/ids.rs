//! Typed identifiers for images and their owners.
//!
//! [`ImageId`] doubles as the retrieval token handed out in image URLs.
//! Holding a valid token is sufficient to fetch the bytes, so ids are only
//! ever created by the store or by [`ImageId::parse`] from a well-formed token.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a stored image, used as a URL-safe retrieval token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(Uuid);

impl ImageId {
    /// Generate a new random image ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Decode a retrieval token.
    ///
    /// Only the canonical spelling produced by [`ImageId::token`] is accepted,
    /// so each image has exactly one valid token. Anything else returns
    /// `None`, which callers report exactly like an unknown id.
    pub fn parse(token: &str) -> Option<Self> {
        let id = Uuid::parse_str(token).ok().map(Self)?;
        (id.token() == token).then_some(id)
    }

    /// Render the id as the token used in URLs.
    pub fn token(&self) -> String {
        self.0.hyphenated().to_string()
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ImageId> for Uuid {
    fn from(id: ImageId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identity of a signed-in user (their email address).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserIdentity(String);

impl UserIdentity {
    pub fn new<S: Into<String>>(identity: S) -> Self {
        Self(identity.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserIdentity {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
