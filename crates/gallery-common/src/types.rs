//! Core type definitions shared by the store and the query engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of records returned by any gallery query.
pub const PAGE_SIZE: usize = 20;

/// Edge length, in pixels, of the square box uploads are resized to fit.
pub const IMAGE_SIZE: u32 = 256;

/// Visibility of an image. Every record has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible to every visitor, signed in or not.
    Public,
    /// Visible only to its owner.
    Private,
}

impl Visibility {
    pub fn from_public_flag(is_public: bool) -> Self {
        if is_public {
            Self::Public
        } else {
            Self::Private
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Self::Public)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Private => write!(f, "private"),
        }
    }
}
