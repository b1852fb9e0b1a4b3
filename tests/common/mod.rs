#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use job_portal::{
    AppConfig, AppState, MockStorageService,
    models::{Application, Job, RoleProfile, UpdateJobRequest, User},
    repository::{Repository, RepositoryState, StoreError},
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";

/// InMemoryRepository
///
/// A full in-memory implementation of the `Repository` trait, backed by
/// mutex-guarded maps. Projections are keyed by email, mirroring the unique
/// index the real store enforces. Used by the role synchronizer and handler
/// tests so the invariant logic runs without a database.
#[derive(Default)]
pub struct InMemoryRepository {
    pub users: Mutex<HashMap<Uuid, User>>,
    pub applicants: Mutex<HashMap<String, RoleProfile>>,
    pub recruiters: Mutex<HashMap<String, RoleProfile>>,
    pub jobs: Mutex<HashMap<Uuid, Job>>,
    pub applications: Mutex<HashMap<Uuid, Application>>,
}

impl InMemoryRepository {
    pub fn seed_user(&self, name: &str, email: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            photo_url: None,
            role: String::new(),
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().insert(user.id, user.clone());
        user
    }

    pub fn seed_job(&self, company_email: &str, title: &str) -> Job {
        let job = Job {
            id: Uuid::new_v4(),
            company_email: company_email.to_string(),
            title: title.to_string(),
            description: None,
            location: None,
            salary: None,
            posted_at: Utc::now(),
        };
        self.jobs.lock().unwrap().insert(job.id, job.clone());
        job
    }

    pub fn applicant_emails(&self) -> Vec<String> {
        self.applicants.lock().unwrap().keys().cloned().collect()
    }

    pub fn recruiter_emails(&self) -> Vec<String> {
        self.recruiters.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn find_users_by_email(&self, email: &str) -> Result<Vec<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.email == email)
            .cloned()
            .collect())
    }

    async fn insert_user(&self, user: User) -> Result<User, StoreError> {
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user_role(&self, id: Uuid, role: &str) -> Result<Option<User>, StoreError> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&id) {
            Some(user) => {
                user.role = role.to_string();
                Ok(Some(user.clone()))
            }
            None => Ok(None),
        }
    }

    async fn upsert_applicant(&self, profile: RoleProfile) -> Result<(), StoreError> {
        self.applicants
            .lock()
            .unwrap()
            .insert(profile.email.clone(), profile);
        Ok(())
    }

    async fn upsert_recruiter(&self, profile: RoleProfile) -> Result<(), StoreError> {
        self.recruiters
            .lock()
            .unwrap()
            .insert(profile.email.clone(), profile);
        Ok(())
    }

    async fn delete_applicant_by_email(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.applicants.lock().unwrap().remove(email).is_some())
    }

    async fn delete_recruiter_by_email(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.recruiters.lock().unwrap().remove(email).is_some())
    }

    async fn list_applicants(&self) -> Result<Vec<RoleProfile>, StoreError> {
        Ok(self.applicants.lock().unwrap().values().cloned().collect())
    }

    async fn list_recruiters(&self) -> Result<Vec<RoleProfile>, StoreError> {
        Ok(self.recruiters.lock().unwrap().values().cloned().collect())
    }

    async fn delete_applicant(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut applicants = self.applicants.lock().unwrap();
        let key = applicants
            .iter()
            .find(|(_, p)| p.id == id)
            .map(|(email, _)| email.clone());
        Ok(key.and_then(|k| applicants.remove(&k)).is_some())
    }

    async fn delete_recruiter(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut recruiters = self.recruiters.lock().unwrap();
        let key = recruiters
            .iter()
            .find(|(_, p)| p.id == id)
            .map(|(email, _)| email.clone());
        Ok(key.and_then(|k| recruiters.remove(&k)).is_some())
    }

    async fn insert_job(&self, job: Job) -> Result<Job, StoreError> {
        self.jobs.lock().unwrap().insert(job.id, job.clone());
        Ok(job)
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, StoreError> {
        Ok(self.jobs.lock().unwrap().values().cloned().collect())
    }

    async fn jobs_by_company(&self, email: &str) -> Result<Vec<Job>, StoreError> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .values()
            .filter(|j| j.company_email == email)
            .cloned()
            .collect())
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<Job>, StoreError> {
        Ok(self.jobs.lock().unwrap().get(&id).cloned())
    }

    async fn update_job(
        &self,
        id: Uuid,
        req: UpdateJobRequest,
    ) -> Result<Option<Job>, StoreError> {
        let mut jobs = self.jobs.lock().unwrap();
        match jobs.get_mut(&id) {
            Some(job) => {
                if let Some(title) = req.title {
                    job.title = title;
                }
                if let Some(description) = req.description {
                    job.description = Some(description);
                }
                if let Some(location) = req.location {
                    job.location = Some(location);
                }
                if let Some(salary) = req.salary {
                    job.salary = Some(salary);
                }
                Ok(Some(job.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.jobs.lock().unwrap().remove(&id).is_some())
    }

    async fn insert_application(&self, app: Application) -> Result<Application, StoreError> {
        self.applications
            .lock()
            .unwrap()
            .insert(app.id, app.clone());
        Ok(app)
    }

    async fn list_applications(&self) -> Result<Vec<Application>, StoreError> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .values()
            .cloned()
            .collect())
    }

    async fn applications_for_jobs(
        &self,
        job_ids: &[String],
    ) -> Result<Vec<Application>, StoreError> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .values()
            .filter(|a| job_ids.contains(&a.job_id))
            .cloned()
            .collect())
    }

    async fn applications_by_applicant(
        &self,
        email: &str,
    ) -> Result<Vec<Application>, StoreError> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.applicant_email == email)
            .cloned()
            .collect())
    }

    async fn find_application(&self, id: Uuid) -> Result<Option<Application>, StoreError> {
        Ok(self.applications.lock().unwrap().get(&id).cloned())
    }

    async fn update_application(
        &self,
        id: Uuid,
        status: Option<String>,
        resume_url: Option<String>,
    ) -> Result<Option<Application>, StoreError> {
        let mut applications = self.applications.lock().unwrap();
        match applications.get_mut(&id) {
            Some(app) => {
                if let Some(status) = status {
                    app.status = status;
                }
                if let Some(resume_url) = resume_url {
                    app.resume_url = resume_url;
                }
                Ok(Some(app.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_application(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.applications.lock().unwrap().remove(&id).is_some())
    }
}

/// Builds an AppState over the in-memory repository and mock storage, with
/// the test signing secret and a known admin email.
pub fn test_state(repo: Arc<InMemoryRepository>) -> AppState {
    let mut config = AppConfig::default();
    config.jwt_secret = TEST_JWT_SECRET.to_string();
    config.admin_email = "admin@jobportal.test".to_string();

    AppState {
        repo: repo as RepositoryState,
        storage: Arc::new(MockStorageService::new()),
        config,
    }
}
