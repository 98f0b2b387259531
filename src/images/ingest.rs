//! Turning a raw upload form into an [`Upload`] for the gallery core.

use gallery_common::{Result, IMAGE_SIZE};

use super::thumbnail::resize_to_fit;
use crate::gallery::Upload;

/// Fields of the upload form as they arrived.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    /// Raw bytes of the `img` field, if present.
    pub image: Option<Vec<u8>>,
    /// The `description` field. Empty descriptions are dropped.
    pub description: Option<String>,
    /// The raw `public` checkbox value; `"on"` means public.
    pub public: Option<String>,
}

impl UploadForm {
    pub fn is_public(&self) -> bool {
        self.public.as_deref() == Some("on")
    }
}

/// Resize the uploaded image and build the [`Upload`] handed to the core.
///
/// A missing or empty image is passed through as `None` so the core can
/// reject it; undecodable data fails here with `Error::InvalidInput`.
pub fn ingest(form: UploadForm) -> Result<Upload> {
    let is_public = form.is_public();

    let image = match form.image {
        Some(bytes) if !bytes.is_empty() => Some(resize_to_fit(&bytes, IMAGE_SIZE)?),
        _ => None,
    };

    let description = form
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    Ok(Upload {
        image,
        description,
        is_public,
    })
}
