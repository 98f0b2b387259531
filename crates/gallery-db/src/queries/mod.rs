//! Database query modules.
//!
//! - images: image record insertion, point lookup, and bounded predicate scans

pub mod images;
