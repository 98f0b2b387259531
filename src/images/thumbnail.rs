//! Thumbnail generation for uploaded images.

use std::io::Cursor;

use gallery_common::{Error, Result};
use image::imageops::FilterType;
use image::{GenericImageView, ImageFormat};

/// Resize image data to fit within a `size`×`size` box and encode it as PNG.
///
/// The aspect ratio is preserved and the longer side always ends up exactly
/// `size` pixels, so small images are scaled up to the box as well.
///
/// # Errors
///
/// Returns `Error::InvalidInput` when the data is not a decodable image.
pub fn resize_to_fit(data: &[u8], size: u32) -> Result<Vec<u8>> {
    let img = image::load_from_memory(data)
        .map_err(|e| Error::invalid_input(format!("Failed to decode image data: {}", e)))?;

    let (width, height) = img.dimensions();
    let img = img.resize(size, size, FilterType::Lanczos3);

    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| Error::internal(format!("Failed to encode image as PNG: {}", e)))?;

    tracing::debug!(
        "Resized {}x{} upload to {}x{}",
        width,
        height,
        img.width(),
        img.height()
    );

    Ok(buf.into_inner())
}
