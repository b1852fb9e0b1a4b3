use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// The canonical identity record in the `users` collection. Created on first
/// sign-in and never deleted by the core. The `role` field drives the
/// projection reconciliation performed by the role synchronizer.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// The user's primary identifier. Unique, compared case-sensitively.
    pub email: String,
    pub photo_url: Option<String>,
    /// "Applicant", "Recruiter", or empty for unset. Stored as an opaque
    /// string: unrecognized values are accepted and written as-is.
    pub role: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// RoleProfile
///
/// A denormalized projection of a user, keyed by email. The same shape backs
/// both the `applicants` and `recruiters` collections. Rows here are owned
/// exclusively by the role synchronizer: a profile exists iff the matching
/// user currently holds the corresponding role.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct RoleProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub photo_url: Option<String>,
    /// Refreshed on every role-set, not preserved from first creation.
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// Job
///
/// A job posting owned by a recruiter (identified by `company_email`).
/// Opaque to the core; the role synchronizer never touches it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Job {
    pub id: Uuid,
    pub company_email: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    #[ts(type = "string")]
    pub posted_at: DateTime<Utc>,
}

/// Application
///
/// A submitted job application with an uploaded resume. `job_id` holds the
/// string form of the job's id, matching how the documents were originally
/// linked across collections.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Application {
    pub id: Uuid,
    pub job_id: String,
    pub job_title: Option<String>,
    pub applicant_email: String,
    pub applicant_name: Option<String>,
    /// Retrieval path assigned by the blob store.
    pub resume_url: String,
    pub status: String,
    #[ts(type = "string")]
    pub submitted_at: DateTime<Utc>,
}

/// --- Request Payloads (Input Schemas) ---

/// IssueTokenRequest
///
/// Input for POST /auth/jwt. The email is optional at the serde level so a
/// missing field maps to a 400 with a message rather than a decode failure.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct IssueTokenRequest {
    pub email: Option<String>,
}

/// CreateUserRequest
///
/// Input for POST /users, sent on first sign-in. The role is optional and
/// defaults to unset; assignment happens later through the role endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// SetRoleRequest
///
/// Input for PATCH /users/{id}/role. Any string is accepted; values other
/// than "Applicant" or "Recruiter" clear both projections.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SetRoleRequest {
    pub role: String,
}

/// CreateJobRequest
///
/// Input for POST /jobs.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateJobRequest {
    pub company_email: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
}

/// UpdateJobRequest
///
/// Partial update payload for PATCH /jobs/{id}. Uses `Option<T>` so only
/// provided fields are written (COALESCE at the query level).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateJobRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
}

/// ApplicationMetadata
///
/// The JSON `metadata` part of the multipart application submission. The
/// resume itself travels as a separate file part.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ApplicationMetadata {
    pub job_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    pub applicant_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant_name: Option<String>,
}

/// --- Output Schemas ---

/// ApiMessage
///
/// The `{success, message}` envelope used by the auth endpoints, the role
/// synchronizer result, and duplicate-user responses.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
