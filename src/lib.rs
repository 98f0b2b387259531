//! Gallery - image sharing with public and private images
//!
//! This library crate exposes the service internals for integration testing.

pub mod config;
pub mod gallery;
pub mod images;
pub mod server;
