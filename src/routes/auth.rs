use crate::{AppState, handlers};
use axum::{Router, routing::post};

/// Auth Router Module
///
/// The session gateway. Both endpoints are public: issuing a token is how a
/// session starts, and logout must work even with an expired cookie.
///
/// Cookie contract: the `token` cookie is HttpOnly always; in production it
/// additionally carries Secure and SameSite=None so browsers deliver it on
/// cross-origin requests from the deployed frontend. The logout response
/// repeats the same attributes, otherwise the browser keeps the old cookie.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        // POST /auth/jwt
        // Issues a signed 24h token for the supplied email and sets the
        // session cookie. 400 when the email is missing.
        .route("/jwt", post(handlers::issue_jwt))
        // POST /auth/logout
        // Clears the session cookie with matching attributes.
        .route("/logout", post(handlers::logout))
}
