//! The image store abstraction consumed by the query engine.
//!
//! [`ImageStore`] is the narrow surface the gallery core needs: create a
//! record, look one up by id, and run a bounded predicate scan. The SQLite
//! implementation checks out one pooled connection per call, so each
//! operation is a single atomic statement.

use gallery_common::{Error, ImageId, Result};

use crate::models::{ImageQuery, ImageRecord, NewImage};
use crate::pool::{get_conn, DbPool};
use crate::queries::images;

/// Persistence and retrieval of image records.
pub trait ImageStore: Send + Sync {
    /// Persist a new record and return its freshly assigned id.
    fn create(&self, image: NewImage) -> Result<ImageId>;

    /// Exact lookup by id. Missing records are reported as `Error::NotFound`.
    fn get_by_id(&self, id: ImageId) -> Result<ImageRecord>;

    /// Records matching `query.filter`, in `query.order`, at most `query.limit`.
    fn query(&self, query: &ImageQuery) -> Result<Vec<ImageRecord>>;
}

/// [`ImageStore`] backed by the SQLite connection pool.
#[derive(Clone)]
pub struct SqliteImageStore {
    pool: DbPool,
}

impl SqliteImageStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ImageStore for SqliteImageStore {
    fn create(&self, image: NewImage) -> Result<ImageId> {
        let conn = get_conn(&self.pool)?;
        let record = images::insert_image(&conn, &image)?;
        tracing::debug!(
            "Stored image {} for {} ({} bytes, public: {})",
            record.id,
            record.owner,
            record.image.len(),
            record.is_public
        );
        Ok(record.id)
    }

    fn get_by_id(&self, id: ImageId) -> Result<ImageRecord> {
        let conn = get_conn(&self.pool)?;
        images::get_image(&conn, id)?.ok_or_else(|| Error::not_found(format!("image {}", id)))
    }

    fn query(&self, query: &ImageQuery) -> Result<Vec<ImageRecord>> {
        let conn = get_conn(&self.pool)?;
        images::query_images(&conn, query)
    }
}
