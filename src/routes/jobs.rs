use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Jobs Router Module
///
/// Job postings. Read access is public so anonymous visitors can browse;
/// every mutation requires a session, and the per-company listing checks
/// that the path email matches the authenticated identity.
pub fn job_routes() -> Router<AppState> {
    Router::new()
        // GET /jobs — public listing.
        // POST /jobs — session-gated insert.
        .route("/", get(handlers::get_jobs).post(handlers::create_job))
        // GET /jobs/email/{email}
        // Jobs posted under a company email. 403 unless the path email
        // equals the token email.
        .route("/email/{email}", get(handlers::get_jobs_by_company))
        // GET /jobs/{id} — public detail view.
        // PATCH /jobs/{id} — session-gated partial update.
        // DELETE /jobs/{id} — session-gated delete.
        .route(
            "/{id}",
            get(handlers::get_job)
                .patch(handlers::update_job)
                .delete(handlers::delete_job),
        )
}
