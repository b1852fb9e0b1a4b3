use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get},
};

/// Applicants Router Module
///
/// Admin-only access to the applicant projection.
///
/// Access Control:
/// Every handler here first passes the session gate (`AuthUser` extractor)
/// and then compares the verified token email against the configured admin
/// allowlist. The admin decision never trusts client-supplied input.
pub fn applicant_routes() -> Router<AppState> {
    Router::new()
        // GET /applicants — full projection listing.
        .route("/", get(handlers::get_applicants))
        // DELETE /applicants/{id} — remove a projection row. Moderation
        // only; the canonical user record is untouched.
        .route("/{id}", delete(handlers::delete_applicant))
}
