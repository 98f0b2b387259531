//! Gallery pages, image serving, and uploads.
//!
//! - `GET /`: public images for everyone, plus the viewer's private images
//! - `GET /manage`: all of the viewer's images (signed-in only)
//! - `GET /about`: static text
//! - `GET /img?img_id=<token>`: image bytes by token
//! - `POST /upload`: multipart upload (signed-in only)

use axum::{
    body::Body,
    extract::{FromRequest, Multipart, Query, Request, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use gallery_common::Error;
use serde::{Deserialize, Serialize};

use super::auth::CurrentViewer;
use super::error::ApiError;
use super::pages::{summarize, ImageSummary, PageContext};
use super::AppContext;
use crate::images::{ingest, UploadForm};

pub const ABOUT_TEXT: &str = "Gallery is a simple web application that lets anyone browse \
public images. Signed-in users can upload images, add a description, and choose whether \
each image is public or private. Signed-in users see all of their own images alongside \
everyone's public ones.";

/// Create gallery routes.
pub fn gallery_routes() -> Router<AppContext> {
    Router::new()
        .route("/", get(home))
        .route("/manage", get(manage))
        .route("/about", get(about))
        .route("/img", get(serve_image))
        .route("/upload", post(upload))
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Serialize)]
pub struct HomePage {
    #[serde(flatten)]
    pub page: PageContext,
    pub public_images: Vec<ImageSummary>,
    pub private_images: Vec<ImageSummary>,
}

#[derive(Serialize)]
pub struct ManagePage {
    #[serde(flatten)]
    pub page: PageContext,
    pub user_images: Vec<ImageSummary>,
}

#[derive(Serialize)]
pub struct AboutPage {
    #[serde(flatten)]
    pub page: PageContext,
    pub about: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ImgParams {
    pub img_id: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

async fn home(
    State(ctx): State<AppContext>,
    CurrentViewer(viewer): CurrentViewer,
    uri: Uri,
) -> Result<Json<HomePage>, ApiError> {
    let view = ctx.gallery.home(viewer.as_ref())?;

    Ok(Json(HomePage {
        page: PageContext::new("Home", viewer.as_ref(), &uri),
        public_images: summarize(&view.public_images),
        private_images: summarize(&view.private_images),
    }))
}

async fn manage(
    State(ctx): State<AppContext>,
    CurrentViewer(viewer): CurrentViewer,
    uri: Uri,
) -> Result<Json<ManagePage>, ApiError> {
    let images = ctx.gallery.manage(viewer.as_ref())?;

    Ok(Json(ManagePage {
        page: PageContext::new("Manage Images", viewer.as_ref(), &uri),
        user_images: summarize(&images),
    }))
}

async fn about(CurrentViewer(viewer): CurrentViewer, uri: Uri) -> Json<AboutPage> {
    Json(AboutPage {
        page: PageContext::new("About", viewer.as_ref(), &uri),
        about: ABOUT_TEXT,
    })
}

/// Serve an image's bytes by token.
///
/// The token alone grants access; visibility is not checked here.
async fn serve_image(
    State(ctx): State<AppContext>,
    Query(query): Query<ImgParams>,
) -> Result<Response, ApiError> {
    let token = query.img_id.unwrap_or_default();
    let record = ctx.gallery.fetch(&token)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "private, max-age=31536000, immutable"),
        ],
        Body::from(record.image),
    )
        .into_response())
}

/// Accept an upload and redirect to the manage page.
///
/// The viewer is checked before the body is read, so anonymous requests get
/// `401` whatever they send.
async fn upload(
    State(ctx): State<AppContext>,
    CurrentViewer(viewer): CurrentViewer,
    request: Request,
) -> Result<Redirect, ApiError> {
    let owner = ctx.gallery.authorize(viewer.as_ref())?;

    let multipart = Multipart::from_request(request, &ctx).await?;
    let form = read_upload_form(multipart).await?;

    if form.image.as_ref().map_or(true, |img| img.is_empty()) {
        tracing::debug!("Upload from {} has no image", owner);
        return Err(Error::invalid_input("No image selected").into());
    }

    let upload = ingest(form)?;
    ctx.gallery.create(Some(owner), upload)?;

    Ok(Redirect::to("/manage"))
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "img" => {
                form.image = Some(field.bytes().await?.to_vec());
            }
            "description" => {
                form.description = Some(field.text().await?);
            }
            "public" => {
                form.public = Some(field.text().await?);
            }
            other => {
                tracing::debug!("Ignoring unknown upload field {:?}", other);
            }
        }
    }

    Ok(form)
}
