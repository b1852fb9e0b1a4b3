use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, patch},
};

/// Users Router Module
///
/// The canonical identity collection. Creation is public (it runs as part
/// of first sign-in, before a token exists); reads are scoped to the
/// authenticated email; the role endpoint drives the role synchronizer,
/// which is the only writer of the applicant/recruiter projections.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        // POST /users — create on first sign-in, no-op if the email exists.
        // GET /users — records matching the authenticated email.
        .route("/", get(handlers::get_users).post(handlers::create_user))
        // PATCH /users/{id}/role
        // Invokes the role synchronizer. 404 when the id does not resolve,
        // otherwise a {success, message} envelope echoing the new role.
        .route("/{id}/role", patch(handlers::set_user_role))
}
