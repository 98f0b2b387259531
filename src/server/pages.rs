//! Values shared by every page payload, and the image summaries pages list.

use axum::http::Uri;
use chrono::{DateTime, Utc};
use gallery_common::{ImageId, UserIdentity};
use gallery_db::models::ImageRecord;
use serde::Serialize;

pub const DEFAULT_PAGE_TITLE: &str = "Gallery";

/// Common values for every page: title and the login/logout link.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageContext {
    pub page_title: String,
    pub logged_in: bool,
    pub loginout_url: String,
    pub loginout_url_linktext: String,
}

impl PageContext {
    /// Build the page values for `viewer`; `uri` is where login/logout returns to.
    pub fn new(title: &str, viewer: Option<&UserIdentity>, uri: &Uri) -> Self {
        let here = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");

        match viewer {
            Some(user) => Self {
                page_title: format!("{} - {}", DEFAULT_PAGE_TITLE, title),
                logged_in: true,
                loginout_url: logout_url(here),
                loginout_url_linktext: format!("Logout ({})", user),
            },
            None => Self {
                page_title: format!("{} - {}", DEFAULT_PAGE_TITLE, title),
                logged_in: false,
                loginout_url: login_url(here),
                loginout_url_linktext: "Login".to_string(),
            },
        }
    }
}

pub fn login_url(continue_to: &str) -> String {
    format!("/auth/login?continue={}", urlencoded(continue_to))
}

pub fn logout_url(continue_to: &str) -> String {
    format!("/auth/logout?continue={}", urlencoded(continue_to))
}

/// URL serving an image's bytes.
pub fn image_url(id: ImageId) -> String {
    format!("/img?img_id={}", id.token())
}

/// What a page shows for one image. The bytes are fetched separately via `url`.
#[derive(Debug, Clone, Serialize)]
pub struct ImageSummary {
    pub id: ImageId,
    pub owner: UserIdentity,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_public: bool,
    pub url: String,
}

impl From<&ImageRecord> for ImageSummary {
    fn from(record: &ImageRecord) -> Self {
        Self {
            id: record.id,
            owner: record.owner.clone(),
            description: record.description.clone(),
            created_at: record.created_at,
            is_public: record.is_public,
            url: image_url(record.id),
        }
    }
}

pub fn summarize(records: &[ImageRecord]) -> Vec<ImageSummary> {
    records.iter().map(ImageSummary::from).collect()
}

/// Minimal percent-encoding for query parameter values.
fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(b as char);
            }
            _ => {
                out.push('%');
                out.push(char::from(HEX[(b >> 4) as usize]));
                out.push(char::from(HEX[(b & 0x0f) as usize]));
            }
        }
    }
    out
}

const HEX: [u8; 16] = *b"0123456789ABCDEF";
