use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get},
};

/// Recruiters Router Module
///
/// Admin-only access to the recruiter projection. Mirrors the applicants
/// router: session gate first, then the allowlist check against the
/// verified token identity.
pub fn recruiter_routes() -> Router<AppState> {
    Router::new()
        // GET /recruiters — full projection listing.
        .route("/", get(handlers::get_recruiters))
        // DELETE /recruiters/{id} — remove a projection row.
        .route("/{id}", delete(handlers::delete_recruiter))
}
