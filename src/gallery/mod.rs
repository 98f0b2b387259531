//! Access control and queries over the image store.
//!
//! [`Gallery`] decides which images a viewer may see and in what order.
//! The viewer is always passed in explicitly; `None` means anonymous.
//!
//! Retrieval by reference ([`Gallery::fetch`]) is not gated by owner or
//! visibility: whoever holds a valid image token can read the bytes. This is
//! the observed behavior of the gallery and is kept as is. It is a known gap:
//! a private image's token leaks its content to anyone it is shared with.

use std::sync::Arc;

use gallery_common::{Error, ImageId, Result, UserIdentity, Visibility};
use gallery_db::models::{ImageFilter, ImageQuery, ImageRecord, NewImage};
use gallery_db::store::ImageStore;
use serde::Serialize;

/// The two lists shown on the home page. They are never merged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HomeView {
    /// Public images from every owner, in the store's natural order.
    pub public_images: Vec<ImageRecord>,
    /// The viewer's own private images, newest first. Empty for anonymous viewers.
    pub private_images: Vec<ImageRecord>,
}

/// An upload that has already been through ingestion (resized and encoded).
#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub image: Option<Vec<u8>>,
    pub description: Option<String>,
    pub is_public: bool,
}

#[derive(Clone)]
pub struct Gallery {
    store: Arc<dyn ImageStore>,
}

impl Gallery {
    pub fn new(store: Arc<dyn ImageStore>) -> Self {
        Self { store }
    }

    /// Resolve the signed-in viewer or fail with `Unauthorized`.
    ///
    /// Every operation that needs an identity goes through here, whatever
    /// the caller may have checked already.
    pub fn authorize<'a>(&self, viewer: Option<&'a UserIdentity>) -> Result<&'a UserIdentity> {
        viewer.ok_or_else(|| {
            tracing::debug!("Rejected anonymous request for an identity-only operation");
            Error::Unauthorized
        })
    }

    /// Public images for everyone, plus the viewer's private images.
    ///
    /// A viewer's own public images only ever appear in `public_images`.
    pub fn home(&self, viewer: Option<&UserIdentity>) -> Result<HomeView> {
        let public_images = self
            .store
            .query(&ImageQuery::new(ImageFilter::visible(Visibility::Public)))?;

        let private_images = match viewer {
            Some(viewer) => self.store.query(
                &ImageQuery::new(ImageFilter::owned_by(viewer).with_visibility(Visibility::Private))
                    .newest_first(),
            )?,
            None => Vec::new(),
        };

        Ok(HomeView {
            public_images,
            private_images,
        })
    }

    /// All of the viewer's images regardless of visibility, newest first.
    pub fn manage(&self, viewer: Option<&UserIdentity>) -> Result<Vec<ImageRecord>> {
        let viewer = self.authorize(viewer)?;
        self.store
            .query(&ImageQuery::new(ImageFilter::owned_by(viewer)).newest_first())
    }

    /// Store a new image owned by the viewer.
    ///
    /// Nothing is written unless there is a viewer and image data.
    pub fn create(&self, viewer: Option<&UserIdentity>, upload: Upload) -> Result<ImageId> {
        let owner = self.authorize(viewer)?;

        let image = match upload.image {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => return Err(Error::invalid_input("upload has no image data")),
        };

        let id = self.store.create(NewImage {
            owner: owner.clone(),
            image,
            description: upload.description,
            is_public: upload.is_public,
            created_at: None,
        })?;

        tracing::info!(
            "{} uploaded {} image {}",
            owner,
            Visibility::from_public_flag(upload.is_public),
            id
        );
        Ok(id)
    }

    /// Look up an image by its retrieval token.
    ///
    /// A malformed token fails exactly like an unknown one. Visibility and
    /// ownership are not checked: the token is the capability.
    pub fn fetch(&self, token: &str) -> Result<ImageRecord> {
        let id = ImageId::parse(token).ok_or_else(|| Error::not_found("image"))?;
        self.store
            .get_by_id(id)
            .map_err(|e| match e {
                Error::NotFound(_) => Error::not_found("image"),
                other => other,
            })
    }
}
