//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, a config with two
//! accounts, and a full [`AppContext`]. The [`TestHarness::with_server`]
//! constructor starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;

use gallery::config::{AccountConfig, Config};
use gallery::gallery::Gallery;
use gallery::server::auth::SESSION_COOKIE_NAME;
use gallery::server::{create_router, AppContext};
use gallery_common::UserIdentity;
use gallery_db::pool::{init_memory_pool, DbPool};
use gallery_db::store::SqliteImageStore;

pub const ALICE: &str = "alice@example.com";
pub const BOB: &str = "bob@example.com";
pub const PASSWORD: &str = "correct horse battery staple";

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let gallery = Gallery::new(Arc::new(SqliteImageStore::new(db.clone())));
        let ctx = AppContext::new(config, gallery);
        Self { ctx, db }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let app = create_router(harness.ctx.clone(), None);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    pub fn store(&self) -> SqliteImageStore {
        SqliteImageStore::new(self.db.clone())
    }

    /// `Cookie` header value carrying a valid session for `identity`.
    pub fn session_cookie(&self, identity: &str) -> String {
        let (token, _) = self
            .ctx
            .sessions
            .issue(&UserIdentity::new(identity))
            .expect("failed to sign session");
        format!("{}={}", SESSION_COOKIE_NAME, token)
    }

    pub fn image_count(&self) -> u64 {
        let conn = gallery_db::pool::get_conn(&self.db).expect("failed to get db connection");
        gallery_db::queries::images::count_images(&conn, &Default::default())
            .expect("failed to count images")
    }
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.server.auth.session_secret = Some("integration-test-secret-0123456789".to_string());
    let password_hash = bcrypt::hash(PASSWORD, 4).expect("failed to hash password");
    config.server.auth.accounts = [ALICE, BOB]
        .into_iter()
        .map(|identity| AccountConfig {
            identity: identity.to_string(),
            password_hash: password_hash.clone(),
        })
        .collect();
    config
}

/// HTTP client that does not follow redirects.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("failed to build client")
}

/// Encode a solid-colour PNG of the given size.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        width,
        height,
        image::Rgb([10, 200, 90]),
    ));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("failed to encode png");
    buf.into_inner()
}

pub fn upload_form(image: Option<Vec<u8>>, description: &str, public: bool) -> reqwest::multipart::Form {
    let mut form = reqwest::multipart::Form::new().text("description", description.to_string());
    if let Some(bytes) = image {
        form = form.part(
            "img",
            reqwest::multipart::Part::bytes(bytes)
                .file_name("upload.png")
                .mime_str("image/png")
                .expect("valid mime"),
        );
    }
    if public {
        form = form.text("public", "on");
    }
    form
}
