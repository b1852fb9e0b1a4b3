/// Router Module Index
///
/// Organizes the routing logic into one module per resource, mirroring the
/// five collections plus the auth gateway. Access control is applied
/// per-handler through the `AuthUser` extractor (session gate) and the
/// admin allowlist check, so each module documents which of its endpoints
/// are public, session-gated, or admin-only.

/// Token issue / logout. Sets and clears the session cookie.
pub mod auth;

/// Canonical user records and the role-synchronization endpoint.
pub mod users;

/// Job postings. Listings are public, mutations are session-gated.
pub mod jobs;

/// Application submissions with resume uploads.
pub mod applications;

/// Applicant projection. Admin-only.
pub mod applicants;

/// Recruiter projection. Admin-only.
pub mod recruiters;
