use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Applications Router Module
///
/// Application submissions. Submission is a multipart POST carrying the
/// resume file and a JSON metadata part; it is accepted without a session
/// (the upload flow runs before the applicant necessarily has a fresh
/// token). The listing is session-gated and role-scoped: the admin sees
/// everything, a job owner sees applications to their jobs, everyone else
/// sees only their own submissions.
pub fn application_routes() -> Router<AppState> {
    Router::new()
        // POST /applications — multipart submission (resume + metadata).
        // GET /applications — session-gated, role-scoped listing.
        .route(
            "/",
            get(handlers::get_applications).post(handlers::create_application),
        )
        // GET /applications/{id} — public detail view.
        // PATCH /applications/{id} — session-gated multipart update; a
        // replacement resume stores the new blob and deletes the old one.
        // DELETE /applications/{id} — session-gated delete.
        .route(
            "/{id}",
            get(handlers::get_application)
                .patch(handlers::update_application)
                .delete(handlers::delete_application),
        )
}
