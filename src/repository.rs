use crate::models::{Application, Job, RoleProfile, UpdateJobRequest, User};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// StoreError
///
/// A store failure carrying the underlying driver message. Surfaced to the
/// caller as a 500; there is no retry layer anywhere in the system.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StoreError(pub String);

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError(e.to_string())
    }
}

/// Repository Trait
///
/// The document-store facade: generic find/insert/update/delete operations
/// against the five named collections (users, applicants, recruiters, jobs,
/// applications), keyed by opaque identifiers. Handlers and the role
/// synchronizer interact with this contract only, never with a concrete
/// driver, so the backing store can be swapped for an in-memory double in
/// tests.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across axum's task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    // Filter form used by the protected GET /users route and the duplicate
    // check on registration.
    async fn find_users_by_email(&self, email: &str) -> Result<Vec<User>, StoreError>;
    async fn insert_user(&self, user: User) -> Result<User, StoreError>;
    // Writes the role unconditionally. Returns the updated record, or None
    // when the id does not resolve.
    async fn update_user_role(&self, id: Uuid, role: &str) -> Result<Option<User>, StoreError>;

    // --- Role projections (written only by the role synchronizer) ---
    async fn upsert_applicant(&self, profile: RoleProfile) -> Result<(), StoreError>;
    async fn upsert_recruiter(&self, profile: RoleProfile) -> Result<(), StoreError>;
    async fn delete_applicant_by_email(&self, email: &str) -> Result<bool, StoreError>;
    async fn delete_recruiter_by_email(&self, email: &str) -> Result<bool, StoreError>;

    // Admin listing and moderation of the projections.
    async fn list_applicants(&self) -> Result<Vec<RoleProfile>, StoreError>;
    async fn list_recruiters(&self) -> Result<Vec<RoleProfile>, StoreError>;
    async fn delete_applicant(&self, id: Uuid) -> Result<bool, StoreError>;
    async fn delete_recruiter(&self, id: Uuid) -> Result<bool, StoreError>;

    // --- Jobs ---
    async fn insert_job(&self, job: Job) -> Result<Job, StoreError>;
    async fn list_jobs(&self) -> Result<Vec<Job>, StoreError>;
    async fn jobs_by_company(&self, email: &str) -> Result<Vec<Job>, StoreError>;
    async fn find_job(&self, id: Uuid) -> Result<Option<Job>, StoreError>;
    async fn update_job(
        &self,
        id: Uuid,
        req: UpdateJobRequest,
    ) -> Result<Option<Job>, StoreError>;
    async fn delete_job(&self, id: Uuid) -> Result<bool, StoreError>;

    // --- Applications ---
    async fn insert_application(&self, app: Application) -> Result<Application, StoreError>;
    async fn list_applications(&self) -> Result<Vec<Application>, StoreError>;
    // Applications to any of the given jobs (ids in string form).
    async fn applications_for_jobs(
        &self,
        job_ids: &[String],
    ) -> Result<Vec<Application>, StoreError>;
    async fn applications_by_applicant(
        &self,
        email: &str,
    ) -> Result<Vec<Application>, StoreError>;
    async fn find_application(&self, id: Uuid) -> Result<Option<Application>, StoreError>;
    async fn update_application(
        &self,
        id: Uuid,
        status: Option<String>,
        resume_url: Option<String>,
    ) -> Result<Option<Application>, StoreError>;
    async fn delete_application(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by
/// PostgreSQL. One table per collection; all queries use the runtime sqlx
/// API so the crate builds without a live database.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn find_users_by_email(&self, email: &str) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, email, photo_url, role, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, photo_url, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, email, photo_url, role, created_at
            "#,
        )
        .bind(user.id)
        .bind(user.name)
        .bind(user.email)
        .bind(user.photo_url)
        .bind(user.role)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update_user_role(&self, id: Uuid, role: &str) -> Result<Option<User>, StoreError> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET role = $2 WHERE id = $1
            RETURNING id, name, email, photo_url, role, created_at
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    /// upsert_applicant
    ///
    /// Keyed by email. A repeated upsert overwrites every field including
    /// `created_at`; the projection timestamp reflects the latest role-set,
    /// not the first.
    async fn upsert_applicant(&self, profile: RoleProfile) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO applicants (id, email, name, photo_url, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO UPDATE
            SET name = EXCLUDED.name,
                photo_url = EXCLUDED.photo_url,
                created_at = EXCLUDED.created_at
            "#,
        )
        .bind(profile.id)
        .bind(profile.email)
        .bind(profile.name)
        .bind(profile.photo_url)
        .bind(profile.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn upsert_recruiter(&self, profile: RoleProfile) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO recruiters (id, email, name, photo_url, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO UPDATE
            SET name = EXCLUDED.name,
                photo_url = EXCLUDED.photo_url,
                created_at = EXCLUDED.created_at
            "#,
        )
        .bind(profile.id)
        .bind(profile.email)
        .bind(profile.name)
        .bind(profile.photo_url)
        .bind(profile.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_applicant_by_email(&self, email: &str) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM applicants WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete_recruiter_by_email(&self, email: &str) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM recruiters WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_applicants(&self) -> Result<Vec<RoleProfile>, StoreError> {
        let rows = sqlx::query_as::<_, RoleProfile>(
            "SELECT id, email, name, photo_url, created_at FROM applicants ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_recruiters(&self) -> Result<Vec<RoleProfile>, StoreError> {
        let rows = sqlx::query_as::<_, RoleProfile>(
            "SELECT id, email, name, photo_url, created_at FROM recruiters ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete_applicant(&self, id: Uuid) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM applicants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete_recruiter(&self, id: Uuid) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM recruiters WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn insert_job(&self, job: Job) -> Result<Job, StoreError> {
        let created = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (id, company_email, title, description, location, salary, posted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, company_email, title, description, location, salary, posted_at
            "#,
        )
        .bind(job.id)
        .bind(job.company_email)
        .bind(job.title)
        .bind(job.description)
        .bind(job.location)
        .bind(job.salary)
        .bind(job.posted_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, StoreError> {
        let jobs = sqlx::query_as::<_, Job>(
            "SELECT id, company_email, title, description, location, salary, posted_at FROM jobs ORDER BY posted_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    async fn jobs_by_company(&self, email: &str) -> Result<Vec<Job>, StoreError> {
        let jobs = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, company_email, title, description, location, salary, posted_at
            FROM jobs WHERE company_email = $1 ORDER BY posted_at DESC
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        let job = sqlx::query_as::<_, Job>(
            "SELECT id, company_email, title, description, location, salary, posted_at FROM jobs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(job)
    }

    /// update_job
    ///
    /// Partial update using COALESCE so only the fields present in the
    /// request overwrite existing values.
    async fn update_job(
        &self,
        id: Uuid,
        req: UpdateJobRequest,
    ) -> Result<Option<Job>, StoreError> {
        let updated = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                salary = COALESCE($5, salary)
            WHERE id = $1
            RETURNING id, company_email, title, description, location, salary, posted_at
            "#,
        )
        .bind(id)
        .bind(req.title)
        .bind(req.description)
        .bind(req.location)
        .bind(req.salary)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn insert_application(&self, app: Application) -> Result<Application, StoreError> {
        let created = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications
                (id, job_id, job_title, applicant_email, applicant_name, resume_url, status, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, job_id, job_title, applicant_email, applicant_name, resume_url, status, submitted_at
            "#,
        )
        .bind(app.id)
        .bind(app.job_id)
        .bind(app.job_title)
        .bind(app.applicant_email)
        .bind(app.applicant_name)
        .bind(app.resume_url)
        .bind(app.status)
        .bind(app.submitted_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list_applications(&self) -> Result<Vec<Application>, StoreError> {
        let apps = sqlx::query_as::<_, Application>(
            r#"
            SELECT id, job_id, job_title, applicant_email, applicant_name, resume_url, status, submitted_at
            FROM applications ORDER BY submitted_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(apps)
    }

    async fn applications_for_jobs(
        &self,
        job_ids: &[String],
    ) -> Result<Vec<Application>, StoreError> {
        let apps = sqlx::query_as::<_, Application>(
            r#"
            SELECT id, job_id, job_title, applicant_email, applicant_name, resume_url, status, submitted_at
            FROM applications WHERE job_id = ANY($1) ORDER BY submitted_at DESC
            "#,
        )
        .bind(job_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(apps)
    }

    async fn applications_by_applicant(
        &self,
        email: &str,
    ) -> Result<Vec<Application>, StoreError> {
        let apps = sqlx::query_as::<_, Application>(
            r#"
            SELECT id, job_id, job_title, applicant_email, applicant_name, resume_url, status, submitted_at
            FROM applications WHERE applicant_email = $1 ORDER BY submitted_at DESC
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        Ok(apps)
    }

    async fn find_application(&self, id: Uuid) -> Result<Option<Application>, StoreError> {
        let app = sqlx::query_as::<_, Application>(
            r#"
            SELECT id, job_id, job_title, applicant_email, applicant_name, resume_url, status, submitted_at
            FROM applications WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(app)
    }

    async fn update_application(
        &self,
        id: Uuid,
        status: Option<String>,
        resume_url: Option<String>,
    ) -> Result<Option<Application>, StoreError> {
        let updated = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET status = COALESCE($2, status),
                resume_url = COALESCE($3, resume_url)
            WHERE id = $1
            RETURNING id, job_id, job_title, applicant_email, applicant_name, resume_url, status, submitted_at
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(resume_url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete_application(&self, id: Uuid) -> Result<bool, StoreError> {
        let res = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
