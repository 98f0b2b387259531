//! Rust models matching the database schema, plus query descriptions.

use chrono::{DateTime, Utc};
use gallery_common::{ImageId, UserIdentity, Visibility, PAGE_SIZE};
use serde::{Deserialize, Serialize};

/// A stored image. Every field is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageRecord {
    pub id: ImageId,
    pub owner: UserIdentity,
    /// Final, already resized image bytes.
    #[serde(skip_serializing, default)]
    pub image: Vec<u8>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_public: bool,
}

/// Data supplied when creating an image record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewImage {
    pub owner: UserIdentity,
    pub image: Vec<u8>,
    pub description: Option<String>,
    pub is_public: bool,
    /// Creation time; the store uses the current time when unset.
    pub created_at: Option<DateTime<Utc>>,
}

impl NewImage {
    pub fn new(owner: UserIdentity, image: Vec<u8>, is_public: bool) -> Self {
        Self {
            owner,
            image,
            description: None,
            is_public,
            created_at: None,
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// Predicate for image queries. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageFilter {
    pub owner: Option<UserIdentity>,
    pub visibility: Option<Visibility>,
}

impl ImageFilter {
    /// All images with the given visibility, whoever owns them.
    pub fn visible(visibility: Visibility) -> Self {
        Self {
            owner: None,
            visibility: Some(visibility),
        }
    }

    /// All images owned by `owner`, regardless of visibility.
    pub fn owned_by(owner: &UserIdentity) -> Self {
        Self {
            owner: Some(owner.clone()),
            visibility: None,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }
}

/// Result ordering for image queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageOrder {
    /// The store's stable insertion order.
    #[default]
    Natural,
    /// `created_at` descending, newest first.
    NewestFirst,
}

/// A bounded, single-page query. There is no continuation.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageQuery {
    pub filter: ImageFilter,
    pub order: ImageOrder,
    pub limit: usize,
}

impl ImageQuery {
    pub fn new(filter: ImageFilter) -> Self {
        Self {
            filter,
            order: ImageOrder::Natural,
            limit: PAGE_SIZE,
        }
    }

    pub fn newest_first(mut self) -> Self {
        self.order = ImageOrder::NewestFirst;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}
