//! Gallery-DB: Database schema, migrations, and the image store.
//!
//! This crate provides persistence for gallery using SQLite
//! with rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Image record model and query descriptions
//! - `queries` - Database query operations
//! - `store` - The [`store::ImageStore`] abstraction used by the query engine
//!
//! # Example
//!
//! ```no_run
//! use gallery_common::UserIdentity;
//! use gallery_db::models::NewImage;
//! use gallery_db::pool::init_pool;
//! use gallery_db::store::{ImageStore, SqliteImageStore};
//!
//! let pool = init_pool("/var/lib/gallery/gallery.db").unwrap();
//! let store = SqliteImageStore::new(pool);
//!
//! let id = store
//!     .create(NewImage::new(UserIdentity::new("alice@example.com"), vec![0u8; 4], true))
//!     .unwrap();
//! println!("Created image: {}", id);
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod store;
