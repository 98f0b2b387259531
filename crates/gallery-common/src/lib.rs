//! Gallery-Common: Shared types, constants, and errors.
//!
//! This crate provides common functionality used across gallery:
//!
//! - **Typed IDs**: [`ImageId`] retrieval tokens and [`UserIdentity`] owners
//! - **Core Types**: [`Visibility`] and the fixed page/thumbnail sizes
//! - **Error Handling**: Common error type and result alias
//!
//! # Examples
//!
//! ```
//! use gallery_common::{Error, ImageId, Result, UserIdentity, Visibility, PAGE_SIZE};
//!
//! let owner = UserIdentity::new("alice@example.com");
//! let visibility = Visibility::from_public_flag(true);
//! assert_eq!(visibility, Visibility::Public);
//! assert_eq!(PAGE_SIZE, 20);
//!
//! // Malformed tokens never become ids
//! assert!(ImageId::parse("not-a-token").is_none());
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("image"))
//! }
//! ```

pub mod error;
pub mod ids;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
