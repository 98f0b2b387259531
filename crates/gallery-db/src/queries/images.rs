//! Image database queries.
//!
//! This module provides the append-only operations on image records:
//! insert, point lookup, and bounded predicate scans. There is deliberately
//! no update or delete.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use gallery_common::{Error, ImageId, Result, UserIdentity};
use rusqlite::types::Type;
use rusqlite::Connection;

use crate::models::{ImageFilter, ImageOrder, ImageQuery, ImageRecord, NewImage};

const IMAGE_COLUMNS: &str = "id, owner, image, description, is_public, created_at";

/// Format a timestamp so that lexical order equals chronological order.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse an image from a database row.
///
/// Expects columns in order: id, owner, image, description, is_public, created_at.
fn parse_image_row(row: &rusqlite::Row) -> rusqlite::Result<ImageRecord> {
    let id: String = row.get(0)?;
    let id = ImageId::parse(&id).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            Type::Text,
            format!("invalid image id: {}", id).into(),
        )
    })?;

    let created_at: String = row.get(5)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(ImageRecord {
        id,
        owner: UserIdentity::new(row.get::<_, String>(1)?),
        image: row.get(2)?,
        description: row.get(3)?,
        is_public: row.get(4)?,
        created_at,
    })
}

/// Insert a new image record.
///
/// Assigns a fresh id and stamps `created_at` with the current time unless
/// the caller supplied one.
///
/// # Returns
///
/// * `Ok(ImageRecord)` - The record exactly as stored
/// * `Err(Error)` - If a database error occurs
pub fn insert_image(conn: &Connection, image: &NewImage) -> Result<ImageRecord> {
    let id = ImageId::new();
    // Stored with microsecond precision; truncate so the returned record matches reads.
    let created_at = image.created_at.unwrap_or_else(Utc::now).trunc_subsecs(6);

    conn.execute(
        "INSERT INTO images (id, owner, image, description, is_public, created_at)
         VALUES (:id, :owner, :image, :description, :is_public, :created_at)",
        rusqlite::named_params! {
            ":id": id.token(),
            ":owner": image.owner.as_str(),
            ":image": &image.image,
            ":description": &image.description,
            ":is_public": image.is_public,
            ":created_at": format_timestamp(&created_at),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(ImageRecord {
        id,
        owner: image.owner.clone(),
        image: image.image.clone(),
        description: image.description.clone(),
        created_at,
        is_public: image.is_public,
    })
}

/// Get an image by ID.
///
/// # Returns
///
/// * `Ok(Some(ImageRecord))` - The image if found
/// * `Ok(None)` - If the image does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_image(conn: &Connection, id: ImageId) -> Result<Option<ImageRecord>> {
    let result = conn.query_row(
        &format!("SELECT {} FROM images WHERE id = :id", IMAGE_COLUMNS),
        rusqlite::named_params! { ":id": id.token() },
        parse_image_row,
    );

    match result {
        Ok(image) => Ok(Some(image)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

fn push_filter(sql: &mut String, filter: &ImageFilter) {
    sql.push_str(" WHERE 1=1");
    if filter.owner.is_some() {
        sql.push_str(" AND owner = :owner");
    }
    if filter.visibility.is_some() {
        sql.push_str(" AND is_public = :is_public");
    }
}

/// List images matching a query, in the requested order, up to its limit.
///
/// `ImageOrder::Natural` returns records in insertion order.
/// `ImageOrder::NewestFirst` sorts by `created_at` descending, breaking ties
/// by most recent insertion.
pub fn query_images(conn: &Connection, query: &ImageQuery) -> Result<Vec<ImageRecord>> {
    let mut sql = format!("SELECT {} FROM images", IMAGE_COLUMNS);
    push_filter(&mut sql, &query.filter);

    sql.push_str(" ORDER BY ");
    match query.order {
        ImageOrder::Natural => sql.push_str("rowid ASC"),
        ImageOrder::NewestFirst => sql.push_str("created_at DESC, rowid DESC"),
    }
    sql.push_str(" LIMIT :limit");

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| Error::database(e.to_string()))?;

    let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
    let owner = query.filter.owner.as_ref().map(|o| o.as_str().to_string());
    let is_public = query.filter.visibility.map(|v| v.is_public());

    let mut params: Vec<(&str, &dyn rusqlite::ToSql)> = vec![(":limit", &limit)];
    if let Some(ref owner) = owner {
        params.push((":owner", owner));
    }
    if let Some(ref is_public) = is_public {
        params.push((":is_public", is_public));
    }

    let images = stmt
        .query_map(&*params, parse_image_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(images)
}

/// Count images matching a filter.
pub fn count_images(conn: &Connection, filter: &ImageFilter) -> Result<u64> {
    let mut sql = String::from("SELECT COUNT(*) FROM images");
    push_filter(&mut sql, filter);

    let owner = filter.owner.as_ref().map(|o| o.as_str().to_string());
    let is_public = filter.visibility.map(|v| v.is_public());

    let mut params: Vec<(&str, &dyn rusqlite::ToSql)> = Vec::new();
    if let Some(ref owner) = owner {
        params.push((":owner", owner));
    }
    if let Some(ref is_public) = is_public {
        params.push((":is_public", is_public));
    }

    let count: i64 = conn
        .query_row(&sql, &*params, |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(count as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;
    use chrono::{Duration, TimeZone};
    use gallery_common::{Visibility, PAGE_SIZE};

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn alice() -> UserIdentity {
        UserIdentity::new("alice@example.com")
    }

    fn bob() -> UserIdentity {
        UserIdentity::new("bob@example.com")
    }

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    #[test]
    fn test_insert_and_get_image() {
        let conn = setup();
        let new = NewImage::new(alice(), vec![0x89, b'P', b'N', b'G'], false)
            .with_description("sunset");

        let stored = insert_image(&conn, &new).unwrap();
        let fetched = get_image(&conn, stored.id).unwrap().unwrap();

        assert_eq!(fetched, stored);
        assert_eq!(fetched.image, vec![0x89, b'P', b'N', b'G']);
        assert_eq!(fetched.description.as_deref(), Some("sunset"));
        assert_eq!(fetched.owner, alice());
        assert!(!fetched.is_public);
    }

    #[test]
    fn test_insert_assigns_unique_ids() {
        let conn = setup();
        let new = NewImage::new(alice(), vec![1], true);
        let a = insert_image(&conn, &new).unwrap();
        let b = insert_image(&conn, &new).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_insert_keeps_supplied_timestamp() {
        let conn = setup();
        let stored = insert_image(
            &conn,
            &NewImage::new(alice(), vec![1], true).with_created_at(at(5)),
        )
        .unwrap();
        let fetched = get_image(&conn, stored.id).unwrap().unwrap();
        assert_eq!(fetched.created_at, at(5));
    }

    #[test]
    fn test_insert_stamps_current_time() {
        let conn = setup();
        let before = Utc::now() - Duration::seconds(1);
        let stored = insert_image(&conn, &NewImage::new(alice(), vec![1], true)).unwrap();
        assert!(stored.created_at >= before);
        assert!(stored.created_at <= Utc::now() + Duration::seconds(1));
    }

    #[test]
    fn test_get_nonexistent_image() {
        let conn = setup();
        let result = get_image(&conn, ImageId::new()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_query_by_visibility() {
        let conn = setup();
        insert_image(&conn, &NewImage::new(alice(), vec![1], true)).unwrap();
        insert_image(&conn, &NewImage::new(alice(), vec![2], false)).unwrap();
        insert_image(&conn, &NewImage::new(bob(), vec![3], true)).unwrap();

        let public = query_images(
            &conn,
            &ImageQuery::new(ImageFilter::visible(Visibility::Public)),
        )
        .unwrap();
        assert_eq!(public.len(), 2);
        assert!(public.iter().all(|img| img.is_public));

        let private = query_images(
            &conn,
            &ImageQuery::new(ImageFilter::visible(Visibility::Private)),
        )
        .unwrap();
        assert_eq!(private.len(), 1);
        assert_eq!(private[0].image, vec![2]);
    }

    #[test]
    fn test_natural_order_is_insertion_order() {
        let conn = setup();
        // Timestamps deliberately out of insertion order
        for (i, minutes) in [30, 10, 20].into_iter().enumerate() {
            insert_image(
                &conn,
                &NewImage::new(alice(), vec![i as u8], true).with_created_at(at(minutes)),
            )
            .unwrap();
        }

        let images = query_images(
            &conn,
            &ImageQuery::new(ImageFilter::visible(Visibility::Public)),
        )
        .unwrap();
        let payloads: Vec<u8> = images.iter().map(|img| img.image[0]).collect();
        assert_eq!(payloads, vec![0, 1, 2]);
    }

    #[test]
    fn test_newest_first_order() {
        let conn = setup();
        for minutes in [10, 30, 20] {
            insert_image(
                &conn,
                &NewImage::new(alice(), vec![minutes as u8], false).with_created_at(at(minutes)),
            )
            .unwrap();
        }

        let images = query_images(
            &conn,
            &ImageQuery::new(ImageFilter::owned_by(&alice())).newest_first(),
        )
        .unwrap();
        let times: Vec<_> = images.iter().map(|img| img.created_at).collect();
        assert_eq!(times, vec![at(30), at(20), at(10)]);
    }

    #[test]
    fn test_newest_first_ties_break_by_latest_insert() {
        let conn = setup();
        let first = insert_image(
            &conn,
            &NewImage::new(alice(), vec![1], false).with_created_at(at(0)),
        )
        .unwrap();
        let second = insert_image(
            &conn,
            &NewImage::new(alice(), vec![2], false).with_created_at(at(0)),
        )
        .unwrap();

        let images = query_images(
            &conn,
            &ImageQuery::new(ImageFilter::owned_by(&alice())).newest_first(),
        )
        .unwrap();
        assert_eq!(images[0].id, second.id);
        assert_eq!(images[1].id, first.id);
    }

    #[test]
    fn test_query_respects_limit() {
        let conn = setup();
        for i in 0..(PAGE_SIZE + 5) {
            insert_image(&conn, &NewImage::new(bob(), vec![i as u8], true)).unwrap();
        }

        let images = query_images(
            &conn,
            &ImageQuery::new(ImageFilter::visible(Visibility::Public)),
        )
        .unwrap();
        assert_eq!(images.len(), PAGE_SIZE);

        let images = query_images(
            &conn,
            &ImageQuery::new(ImageFilter::visible(Visibility::Public)).limit(3),
        )
        .unwrap();
        assert_eq!(images.len(), 3);
    }

    #[test]
    fn test_query_owner_and_visibility_combined() {
        let conn = setup();
        insert_image(&conn, &NewImage::new(alice(), vec![1], true)).unwrap();
        insert_image(&conn, &NewImage::new(alice(), vec![2], false)).unwrap();
        insert_image(&conn, &NewImage::new(bob(), vec![3], false)).unwrap();

        let images = query_images(
            &conn,
            &ImageQuery::new(ImageFilter::owned_by(&alice()).with_visibility(Visibility::Private)),
        )
        .unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].owner, alice());
        assert!(!images[0].is_public);
    }

    #[test]
    fn test_count_images() {
        let conn = setup();
        insert_image(&conn, &NewImage::new(alice(), vec![1], true)).unwrap();
        insert_image(&conn, &NewImage::new(alice(), vec![2], false)).unwrap();
        insert_image(&conn, &NewImage::new(bob(), vec![3], false)).unwrap();

        assert_eq!(count_images(&conn, &ImageFilter::default()).unwrap(), 3);
        assert_eq!(count_images(&conn, &ImageFilter::owned_by(&alice())).unwrap(), 2);
        assert_eq!(
            count_images(&conn, &ImageFilter::visible(Visibility::Private)).unwrap(),
            2
        );
    }
}
