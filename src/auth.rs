use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::Cookie;

use crate::{
    config::{AppConfig, Env},
    error::ApiError,
    token::{self, TOKEN_TTL_SECS},
};

/// Name of the session cookie carrying the signed token.
pub const TOKEN_COOKIE: &str = "token";

/// AuthUser
///
/// The resolved identity of an authenticated request: the email claim of a
/// verified session token. Handlers take this as an argument to require a
/// session; the extractor rejects before the handler body runs otherwise.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
}

/// AuthUser Extractor Implementation
///
/// Implements axum's FromRequestParts, making AuthUser usable as a function
/// argument in any protected handler. The gate is a synchronous, single-pass
/// check run before the handler: it never retries and never mutates state.
///
/// State machine per request:
/// - no `token` cookie        -> 401 AuthMissing
/// - cookie fails verification -> 403 AuthInvalid
/// - cookie verifies           -> request proceeds with the email attached
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    // Allows the extractor to pull the AppConfig (for the signing secret).
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        let cookie_header = parts
            .headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        let token = Cookie::split_parse(cookie_header.to_string())
            .filter_map(Result::ok)
            .find(|c| c.name() == TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or(ApiError::AuthMissing)?;

        let claims =
            token::verify(&config.jwt_secret, &token).map_err(|_| ApiError::AuthInvalid)?;

        Ok(AuthUser { email: claims.sub })
    }
}

impl AuthUser {
    /// Admin status is derived from the verified token identity only,
    /// compared by exact string equality against the configured allowlist
    /// email. Client-supplied emails are never consulted.
    pub fn is_admin(&self, config: &AppConfig) -> bool {
        self.email == config.admin_email
    }

    /// Convenience for admin-only handlers.
    pub fn require_admin(&self, config: &AppConfig) -> Result<(), ApiError> {
        if self.is_admin(config) {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Admins only".to_string()))
        }
    }
}

/// session_cookie
///
/// Builds the Set-Cookie value for a freshly issued token. HttpOnly always;
/// production adds Secure and SameSite=None (required for the browser to
/// send the cookie cross-origin), development uses SameSite=Lax without
/// Secure so plain-http local setups work.
pub fn session_cookie(config: &AppConfig, token: &str) -> String {
    match config.env {
        Env::Production => format!(
            "{}={}; Path=/; HttpOnly; Secure; SameSite=None; Max-Age={}",
            TOKEN_COOKIE, token, TOKEN_TTL_SECS
        ),
        Env::Development => format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            TOKEN_COOKIE, token, TOKEN_TTL_SECS
        ),
    }
}

/// clear_session_cookie
///
/// Builds the Set-Cookie value that removes the session cookie. The
/// attributes must match the ones used at login or the browser will not
/// delete the stored cookie.
pub fn clear_session_cookie(config: &AppConfig) -> String {
    match config.env {
        Env::Production => format!(
            "{}=; Path=/; HttpOnly; Secure; SameSite=None; Max-Age=0",
            TOKEN_COOKIE
        ),
        Env::Development => format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
            TOKEN_COOKIE
        ),
    }
}
