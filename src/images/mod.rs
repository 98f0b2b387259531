//! Image ingestion.
//!
//! Uploads are decoded, resized to fit the fixed thumbnail box, and
//! re-encoded as PNG before they reach the gallery core, which only ever
//! stores final bytes.

mod ingest;
mod thumbnail;

pub use ingest::{ingest, UploadForm};
pub use thumbnail::resize_to_fit;
