//! Session handling: resolves the viewer of each request.
//!
//! Accounts come from config. A successful login sets a signed session
//! cookie; every request then resolves its viewer from that cookie through
//! the [`CurrentViewer`] extractor. Missing, tampered, expired, or revoked
//! sessions all resolve to an anonymous viewer.

use crate::config::AuthConfig;
use crate::server::pages::PageContext;
use crate::server::AppContext;
use axum::{
    async_trait,
    extract::{FromRequestParts, Query, State},
    http::{request::Parts, StatusCode, Uri},
    response::{IntoResponse, Redirect},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use gallery_common::UserIdentity;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::convert::Infallible;

pub const SESSION_COOKIE_NAME: &str = "gallery_session";

type HmacSha256 = Hmac<Sha256>;

/// Session data carried (signed) in the cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionData {
    identity: String,
    expires_at: i64,
}

/// Issues and verifies signed session tokens.
pub struct SessionSigner {
    key: Vec<u8>,
    timeout_hours: u64,
}

impl SessionSigner {
    pub fn new(key: impl Into<Vec<u8>>, timeout_hours: u64) -> Self {
        Self {
            key: key.into(),
            timeout_hours,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        let key = match config.session_secret {
            Some(ref secret) => secret.as_bytes().to_vec(),
            None => {
                tracing::warn!(
                    "No session secret configured; sessions will not survive a restart"
                );
                generate_secret().into_bytes()
            }
        };
        Self::new(key, config.session_timeout_hours)
    }

    pub fn timeout_hours(&self) -> u64 {
        self.timeout_hours
    }

    fn sign(&self, payload: &str) -> Option<Vec<u8>> {
        let mut mac = HmacSha256::new_from_slice(&self.key).ok()?;
        mac.update(payload.as_bytes());
        Some(mac.finalize().into_bytes().to_vec())
    }

    /// Create a session token for `identity`. Returns the token and its expiry (unix seconds).
    pub fn issue(&self, identity: &UserIdentity) -> Option<(String, i64)> {
        let expires_at = Utc::now().timestamp() + (self.timeout_hours as i64 * 3600);
        self.issue_until(identity, expires_at)
            .map(|token| (token, expires_at))
    }

    fn issue_until(&self, identity: &UserIdentity, expires_at: i64) -> Option<String> {
        let session = SessionData {
            identity: identity.as_str().to_string(),
            expires_at,
        };
        let json = serde_json::to_vec(&session).ok()?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = self.sign(&payload)?;
        Some(format!("{}.{}", payload, hex::encode(signature)))
    }

    /// Verify a session token, returning the identity it was issued for.
    pub fn verify(&self, token: &str) -> Option<UserIdentity> {
        let (payload, signature) = token.split_once('.')?;
        let signature = hex::decode(signature).ok()?;

        let mut mac = HmacSha256::new_from_slice(&self.key).ok()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let session: SessionData = serde_json::from_slice(&json).ok()?;
        if Utc::now().timestamp() >= session.expires_at {
            return None;
        }
        Some(UserIdentity::new(session.identity))
    }
}

/// The viewer of the current request; `None` when nobody is signed in.
#[derive(Debug, Clone)]
pub struct CurrentViewer(pub Option<UserIdentity>);

#[async_trait]
impl FromRequestParts<AppContext> for CurrentViewer {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let viewer = jar
            .get(SESSION_COOKIE_NAME)
            .and_then(|cookie| ctx.sessions.verify(cookie.value()))
            // Accounts removed from config lose their sessions
            .filter(|identity| ctx.config.server.auth.find_account(identity.as_str()).is_some());

        Ok(Self(viewer))
    }
}

/// Login request payload
#[derive(Deserialize)]
pub struct LoginRequest {
    pub identity: String,
    pub password: String,
}

/// Login response
#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl LoginResponse {
    fn failure(message: &str) -> Json<Self> {
        Json(Self {
            success: false,
            message: message.to_string(),
            expires_at: None,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ContinueQuery {
    #[serde(rename = "continue")]
    pub continue_to: Option<String>,
}

impl ContinueQuery {
    /// Where to send the user afterwards. Only local paths are honoured.
    pub fn target(&self) -> &str {
        match self.continue_to.as_deref() {
            Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
            _ => "/",
        }
    }
}

#[derive(Serialize)]
pub struct LoginPage {
    #[serde(flatten)]
    pub page: PageContext,
    #[serde(rename = "continue")]
    pub continue_to: String,
}

/// Describe the login form
pub async fn login_page(
    CurrentViewer(viewer): CurrentViewer,
    Query(query): Query<ContinueQuery>,
    uri: Uri,
) -> Json<LoginPage> {
    Json(LoginPage {
        page: PageContext::new("Login", viewer.as_ref(), &uri),
        continue_to: query.target().to_string(),
    })
}

/// Login handler
pub async fn login(
    State(ctx): State<AppContext>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), (StatusCode, Json<LoginResponse>)> {
    let Some(account) = ctx.config.server.auth.find_account(&payload.identity) else {
        tracing::info!("Login attempt for unknown account {}", payload.identity);
        return Err((
            StatusCode::UNAUTHORIZED,
            LoginResponse::failure("Invalid credentials"),
        ));
    };

    match bcrypt::verify(&payload.password, &account.password_hash) {
        Ok(true) => {
            let identity = UserIdentity::new(account.identity.clone());
            let Some((token, expires_at)) = ctx.sessions.issue(&identity) else {
                tracing::error!("Failed to sign session for {}", identity);
                return Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    LoginResponse::failure("Could not create session"),
                ));
            };

            let cookie = Cookie::build((SESSION_COOKIE_NAME, token))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .max_age(time::Duration::hours(ctx.sessions.timeout_hours() as i64))
                .build();

            tracing::info!("{} logged in", identity);

            Ok((
                jar.add(cookie),
                Json(LoginResponse {
                    success: true,
                    message: "Login successful".to_string(),
                    expires_at: Some(expires_at),
                }),
            ))
        }
        Ok(false) | Err(_) => {
            tracing::info!("Failed login for {}", payload.identity);
            Err((
                StatusCode::UNAUTHORIZED,
                LoginResponse::failure("Invalid credentials"),
            ))
        }
    }
}

/// Logout handler
pub async fn logout(jar: CookieJar, Query(query): Query<ContinueQuery>) -> impl IntoResponse {
    let cookie = Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build();

    (jar.remove(cookie), Redirect::to(query.target()))
}

#[derive(Serialize)]
pub struct AuthStatusResponse {
    pub page_title: String,
    pub logged_in: bool,
    pub identity: Option<UserIdentity>,
    pub loginout_url: String,
    pub loginout_url_linktext: String,
}

/// Check current auth status
pub async fn auth_status(CurrentViewer(viewer): CurrentViewer, uri: Uri) -> Json<AuthStatusResponse> {
    let page = PageContext::new("Status", viewer.as_ref(), &uri);
    Json(AuthStatusResponse {
        page_title: page.page_title,
        logged_in: page.logged_in,
        identity: viewer,
        loginout_url: page.loginout_url,
        loginout_url_linktext: page.loginout_url_linktext,
    })
}

/// Generate a bcrypt password hash
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

/// Generate a random session secret
pub fn generate_secret() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    hex::encode(bytes)
}
