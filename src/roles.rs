use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{ApiMessage, RoleProfile},
    repository::Repository,
};

pub const ROLE_APPLICANT: &str = "Applicant";
pub const ROLE_RECRUITER: &str = "Recruiter";

/// apply_role_change
///
/// Writes `new_role` onto the user record and reconciles the two role
/// projections so that afterwards exactly one of
/// {applicants[email], recruiters[email]} exists — the one matching the new
/// role — or neither, for any other value.
///
/// Sequence:
/// 1. Resolve the user by id; `NotFound` if absent, nothing written.
/// 2. Write the role unconditionally (no enum validation; an unrecognized
///    string is stored as-is and treated as unset by the branch below).
/// 3. Snapshot {name, email, photo_url} from the updated record, stamping
///    `created_at` with now. The projection timestamp is therefore refreshed
///    on every role-set, not preserved from first creation.
/// 4. Branch on the role: upsert the matching projection, delete the other;
///    unknown roles delete both.
///
/// The writes are sequential per-document store calls with no surrounding
/// transaction. The projection matching the new role is written before the
/// opposite one is deleted, so a reader in the window between steps can see
/// a stale extra projection but never a missing one once the call returns.
/// Re-running with the same arguments converges to the same end state.
pub async fn apply_role_change(
    repo: &dyn Repository,
    user_id: Uuid,
    new_role: &str,
) -> Result<ApiMessage, ApiError> {
    let user = repo
        .update_user_role(user_id, new_role)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let profile = RoleProfile {
        id: Uuid::new_v4(),
        email: user.email.clone(),
        name: user.name.clone(),
        photo_url: user.photo_url.clone(),
        created_at: Utc::now(),
    };

    match new_role {
        ROLE_APPLICANT => {
            repo.upsert_applicant(profile).await?;
            repo.delete_recruiter_by_email(&user.email).await?;
        }
        ROLE_RECRUITER => {
            repo.upsert_recruiter(profile).await?;
            repo.delete_applicant_by_email(&user.email).await?;
        }
        other => {
            // Unset or unrecognized: the user keeps the stored string but no
            // projection may remain for this email.
            tracing::debug!(role = other, email = %user.email, "clearing role projections");
            repo.delete_applicant_by_email(&user.email).await?;
            repo.delete_recruiter_by_email(&user.email).await?;
        }
    }

    tracing::info!(user_id = %user_id, role = new_role, "role synchronized");
    Ok(ApiMessage::ok(format!("Role updated to {}", new_role)))
}
