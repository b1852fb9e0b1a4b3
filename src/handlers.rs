use crate::{
    AppState,
    auth::{self, AuthUser},
    error::ApiError,
    models::{
        ApiMessage, Application, ApplicationMetadata, CreateJobRequest, CreateUserRequest,
        IssueTokenRequest, Job, RoleProfile, SetRoleRequest, UpdateJobRequest, User,
    },
    roles,
    token::{self, TokenError},
};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use uuid::Uuid;

// --- Auth Handlers ---

/// issue_jwt
///
/// [Public Route] Signs a session token for the supplied email and delivers
/// it via the `token` cookie. There is no credential check here: the token
/// only asserts which email the session speaks for, and the allowlist /
/// ownership checks downstream decide what that identity may do.
#[utoipa::path(
    post,
    path = "/auth/jwt",
    request_body = IssueTokenRequest,
    responses(
        (status = 200, description = "Token issued, cookie set", body = ApiMessage),
        (status = 400, description = "Email missing")
    )
)]
pub async fn issue_jwt(
    State(state): State<AppState>,
    Json(payload): Json<IssueTokenRequest>,
) -> Result<Response, ApiError> {
    let email = payload
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::Validation("Email required".to_string()))?;

    let token = token::issue(&state.config.jwt_secret, &email).map_err(|e| match e {
        TokenError::MissingSecret => ApiError::Config(e.to_string()),
        TokenError::Invalid => ApiError::Config("Token signing failed".to_string()),
    })?;

    let cookie = auth::session_cookie(&state.config, &token);
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(ApiMessage::ok("JWT issued successfully")),
    )
        .into_response())
}

/// logout
///
/// [Public Route] Clears the session cookie. The cookie attributes must
/// match the ones set at login so the browser removes the right entry.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 200, description = "Cookie cleared", body = ApiMessage))
)]
pub async fn logout(State(state): State<AppState>) -> Response {
    let cookie = auth::clear_session_cookie(&state.config);
    (
        [(header::SET_COOKIE, cookie)],
        Json(ApiMessage::ok("Logged out successfully")),
    )
        .into_response()
}

// --- User Handlers ---

/// create_user
///
/// [Public Route] Creates the canonical user record on first sign-in. If a
/// record with the same email already exists nothing is written and a
/// `{success: false}` envelope is returned with a 200, matching the
/// idempotent sign-in flow the frontend drives.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created", body = User),
        (status = 200, description = "Already exists", body = ApiMessage)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Response, ApiError> {
    let existing = state.repo.find_users_by_email(&payload.email).await?;
    if !existing.is_empty() {
        return Ok(Json(ApiMessage::failure("User already exists")).into_response());
    }

    let user = User {
        id: Uuid::new_v4(),
        name: payload.name,
        email: payload.email,
        photo_url: payload.photo_url,
        role: payload.role.unwrap_or_default(),
        created_at: Utc::now(),
    };
    let created = state.repo.insert_user(user).await?;
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// get_users
///
/// [Protected Route] Returns the user records matching the authenticated
/// email. The identity comes from the verified token, never from a query
/// parameter.
#[utoipa::path(
    get,
    path = "/users",
    responses((status = 200, description = "Matching users", body = [User]))
)]
pub async fn get_users(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.repo.find_users_by_email(&auth.email).await?;
    Ok(Json(users))
}

/// set_user_role
///
/// [Protected Route] Invokes the role synchronizer: writes the requested
/// role onto the user and reconciles the applicant/recruiter projections so
/// at most one holds the user's email afterwards.
#[utoipa::path(
    patch,
    path = "/users/{id}/role",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = SetRoleRequest,
    responses(
        (status = 200, description = "Role synchronized", body = ApiMessage),
        (status = 404, description = "User not found")
    )
)]
pub async fn set_user_role(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetRoleRequest>,
) -> Result<Json<ApiMessage>, ApiError> {
    let outcome = roles::apply_role_change(state.repo.as_ref(), id, &payload.role).await?;
    Ok(Json(outcome))
}

// --- Job Handlers ---

/// create_job
///
/// [Protected Route] Inserts a new job posting.
#[utoipa::path(
    post,
    path = "/jobs",
    request_body = CreateJobRequest,
    responses((status = 200, description = "Created", body = Job))
)]
pub async fn create_job(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateJobRequest>,
) -> Result<Json<Job>, ApiError> {
    let job = Job {
        id: Uuid::new_v4(),
        company_email: payload.company_email,
        title: payload.title,
        description: payload.description,
        location: payload.location,
        salary: payload.salary,
        posted_at: Utc::now(),
    };
    let created = state.repo.insert_job(job).await?;
    Ok(Json(created))
}

/// get_jobs
///
/// [Public Route] Lists every job posting.
#[utoipa::path(
    get,
    path = "/jobs",
    responses((status = 200, description = "All jobs", body = [Job]))
)]
pub async fn get_jobs(State(state): State<AppState>) -> Result<Json<Vec<Job>>, ApiError> {
    let jobs = state.repo.list_jobs().await?;
    Ok(Json(jobs))
}

/// get_jobs_by_company
///
/// [Protected Route] Lists the jobs posted under a company email. The path
/// email must equal the authenticated email; a mismatch is a 403.
#[utoipa::path(
    get,
    path = "/jobs/email/{email}",
    params(("email" = String, Path, description = "Company email")),
    responses(
        (status = 200, description = "Company jobs", body = [Job]),
        (status = 403, description = "Email does not match session")
    )
)]
pub async fn get_jobs_by_company(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Job>>, ApiError> {
    if email != auth.email {
        return Err(ApiError::Forbidden("Forbidden".to_string()));
    }
    let jobs = state.repo.jobs_by_company(&email).await?;
    Ok(Json(jobs))
}

/// get_job
///
/// [Public Route] Retrieves a single job by id.
#[utoipa::path(
    get,
    path = "/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses((status = 200, description = "Found", body = Job))
)]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, ApiError> {
    match state.repo.find_job(id).await? {
        Some(job) => Ok(Json(job)),
        None => Err(ApiError::NotFound("Job")),
    }
}

/// update_job
///
/// [Protected Route] Partial update of a job posting.
#[utoipa::path(
    patch,
    path = "/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = UpdateJobRequest,
    responses((status = 200, description = "Updated", body = Job))
)]
pub async fn update_job(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobRequest>,
) -> Result<Json<Job>, ApiError> {
    match state.repo.update_job(id, payload).await? {
        Some(job) => Ok(Json(job)),
        None => Err(ApiError::NotFound("Job")),
    }
}

/// delete_job
///
/// [Protected Route] Deletes a job posting.
#[utoipa::path(
    delete,
    path = "/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_job(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.repo.delete_job(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Job"))
    }
}

// --- Application Handlers ---

/// object_key
///
/// Derives a unique blob key from the uploaded filename, keeping only the
/// extension. The key doubles as the retrieval path stored on the record.
fn object_key(filename: &str) -> String {
    let extension = std::path::Path::new(filename)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("bin");
    format!("uploads/{}.{}", Uuid::new_v4(), extension)
}

/// Accumulates the parts of a multipart application submission.
struct ResumeUpload {
    key: String,
    content_type: String,
    bytes: Vec<u8>,
}

async fn read_application_parts(
    multipart: &mut Multipart,
) -> Result<(Option<ResumeUpload>, Option<String>, Option<String>), ApiError> {
    let mut resume = None;
    let mut metadata = None;
    let mut status = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        match field.name() {
            Some("resume") => {
                let filename = field.file_name().unwrap_or("resume.bin").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(e.to_string()))?
                    .to_vec();
                resume = Some(ResumeUpload {
                    key: object_key(&filename),
                    content_type,
                    bytes,
                });
            }
            Some("metadata") => {
                metadata = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::Validation(e.to_string()))?,
                );
            }
            Some("status") => {
                status = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::Validation(e.to_string()))?,
                );
            }
            _ => {}
        }
    }

    Ok((resume, metadata, status))
}

/// create_application
///
/// [Public Route] Accepts a multipart submission: a `resume` file part and a
/// `metadata` JSON part. The resume is stored in the blob store first; the
/// record is inserted with the returned retrieval path, `submitted_at = now`
/// and an initial `pending` status.
#[utoipa::path(
    post,
    path = "/applications",
    responses(
        (status = 200, description = "Submitted", body = Application),
        (status = 400, description = "Resume or metadata missing")
    )
)]
pub async fn create_application(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Application>, ApiError> {
    let (resume, metadata, _) = read_application_parts(&mut multipart).await?;

    let resume = resume.ok_or_else(|| ApiError::Validation("Resume missing".to_string()))?;
    let metadata: ApplicationMetadata = metadata
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| ApiError::Validation(format!("Invalid metadata: {}", e)))?
        .ok_or_else(|| ApiError::Validation("Metadata missing".to_string()))?;

    let resume_url = state
        .storage
        .store_object(&resume.key, &resume.content_type, resume.bytes)
        .await
        .map_err(ApiError::Storage)?;

    let application = Application {
        id: Uuid::new_v4(),
        job_id: metadata.job_id,
        job_title: metadata.job_title,
        applicant_email: metadata.applicant_email,
        applicant_name: metadata.applicant_name,
        resume_url,
        status: "pending".to_string(),
        submitted_at: Utc::now(),
    };
    let created = state.repo.insert_application(application).await?;
    Ok(Json(created))
}

/// get_applications
///
/// [Protected Route] Role-scoped listing. The admin sees everything; a
/// caller who owns jobs sees the applications submitted to them; anyone
/// else sees the applications filed under their own email.
#[utoipa::path(
    get,
    path = "/applications",
    responses((status = 200, description = "Applications visible to the caller", body = [Application]))
)]
pub async fn get_applications(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Application>>, ApiError> {
    if auth.is_admin(&state.config) {
        return Ok(Json(state.repo.list_applications().await?));
    }

    let owned_jobs = state.repo.jobs_by_company(&auth.email).await?;
    let apps = if owned_jobs.is_empty() {
        state.repo.applications_by_applicant(&auth.email).await?
    } else {
        let job_ids: Vec<String> = owned_jobs.iter().map(|j| j.id.to_string()).collect();
        state.repo.applications_for_jobs(&job_ids).await?
    };
    Ok(Json(apps))
}

/// get_application
///
/// [Public Route] Retrieves a single application by id.
#[utoipa::path(
    get,
    path = "/applications/{id}",
    params(("id" = Uuid, Path, description = "Application ID")),
    responses((status = 200, description = "Found", body = Application))
)]
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Application>, ApiError> {
    match state.repo.find_application(id).await? {
        Some(app) => Ok(Json(app)),
        None => Err(ApiError::NotFound("Application")),
    }
}

/// update_application
///
/// [Protected Route] Multipart partial update: an optional `status` text
/// part and an optional replacement `resume` file. Replacing the resume
/// stores the new blob, then deletes the old one by its recorded path.
/// The delete is best-effort and unsynchronized: a concurrent reader
/// holding the old path can race it, and a failure only logs a warning.
#[utoipa::path(
    patch,
    path = "/applications/{id}",
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Updated", body = Application),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_application(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<Application>, ApiError> {
    let existing = state
        .repo
        .find_application(id)
        .await?
        .ok_or(ApiError::NotFound("Application"))?;

    let (resume, _, status) = read_application_parts(&mut multipart).await?;

    let new_resume_url = match resume {
        Some(upload) => {
            let path = state
                .storage
                .store_object(&upload.key, &upload.content_type, upload.bytes)
                .await
                .map_err(ApiError::Storage)?;
            if let Err(e) = state.storage.delete_object(&existing.resume_url).await {
                tracing::warn!(path = %existing.resume_url, error = %e, "failed to delete replaced resume");
            }
            Some(path)
        }
        None => None,
    };

    match state
        .repo
        .update_application(id, status, new_resume_url)
        .await?
    {
        Some(app) => Ok(Json(app)),
        None => Err(ApiError::NotFound("Application")),
    }
}

/// delete_application
///
/// [Protected Route] Deletes an application record.
#[utoipa::path(
    delete,
    path = "/applications/{id}",
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_application(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.repo.delete_application(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Application"))
    }
}

// --- Projection Handlers (Admin) ---

/// get_applicants
///
/// [Admin Route] Lists the applicant projection. The allowlist check runs
/// against the verified token identity.
#[utoipa::path(
    get,
    path = "/applicants",
    responses(
        (status = 200, description = "All applicants", body = [RoleProfile]),
        (status = 403, description = "Not the admin")
    )
)]
pub async fn get_applicants(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<RoleProfile>>, ApiError> {
    auth.require_admin(&state.config)?;
    Ok(Json(state.repo.list_applicants().await?))
}

/// delete_applicant
///
/// [Admin Route] Removes an applicant projection row by id. This is a
/// moderation action on the projection only; the canonical user record is
/// never deleted by the core.
#[utoipa::path(
    delete,
    path = "/applicants/{id}",
    params(("id" = Uuid, Path, description = "Applicant profile ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not the admin"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_applicant(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    auth.require_admin(&state.config)?;
    if state.repo.delete_applicant(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Applicant"))
    }
}

/// get_recruiters
///
/// [Admin Route] Lists the recruiter projection.
#[utoipa::path(
    get,
    path = "/recruiters",
    responses(
        (status = 200, description = "All recruiters", body = [RoleProfile]),
        (status = 403, description = "Not the admin")
    )
)]
pub async fn get_recruiters(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<RoleProfile>>, ApiError> {
    auth.require_admin(&state.config)?;
    Ok(Json(state.repo.list_recruiters().await?))
}

/// delete_recruiter
///
/// [Admin Route] Removes a recruiter projection row by id.
#[utoipa::path(
    delete,
    path = "/recruiters/{id}",
    params(("id" = Uuid, Path, description = "Recruiter profile ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not the admin"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_recruiter(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    auth.require_admin(&state.config)?;
    if state.repo.delete_recruiter(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Recruiter"))
    }
}
