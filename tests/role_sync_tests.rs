mod common;

use axum::http::StatusCode;
use common::InMemoryRepository;
use job_portal::roles::{self, ROLE_APPLICANT, ROLE_RECRUITER};
use std::time::Duration;
use uuid::Uuid;

#[tokio::test]
async fn setting_recruiter_creates_exactly_one_projection() {
    let repo = InMemoryRepository::default();
    let user = repo.seed_user("Ada", "a@x.com");

    let outcome = roles::apply_role_change(&repo, user.id, ROLE_RECRUITER)
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.message, "Role updated to Recruiter");
    assert_eq!(repo.recruiter_emails(), vec!["a@x.com".to_string()]);
    assert!(repo.applicant_emails().is_empty());

    let stored = repo.users.lock().unwrap()[&user.id].clone();
    assert_eq!(stored.role, ROLE_RECRUITER);
}

#[tokio::test]
async fn switching_roles_moves_the_projection() {
    let repo = InMemoryRepository::default();
    let user = repo.seed_user("Ada", "a@x.com");

    roles::apply_role_change(&repo, user.id, ROLE_RECRUITER)
        .await
        .unwrap();
    assert_eq!(repo.recruiter_emails(), vec!["a@x.com".to_string()]);
    assert!(repo.applicant_emails().is_empty());

    roles::apply_role_change(&repo, user.id, ROLE_APPLICANT)
        .await
        .unwrap();
    assert_eq!(repo.applicant_emails(), vec!["a@x.com".to_string()]);
    assert!(repo.recruiter_emails().is_empty());
}

#[tokio::test]
async fn unset_role_clears_both_projections() {
    let repo = InMemoryRepository::default();
    let user = repo.seed_user("Ada", "a@x.com");

    roles::apply_role_change(&repo, user.id, ROLE_APPLICANT)
        .await
        .unwrap();
    let outcome = roles::apply_role_change(&repo, user.id, "").await.unwrap();

    assert!(outcome.success);
    assert!(repo.applicant_emails().is_empty());
    assert!(repo.recruiter_emails().is_empty());
}

#[tokio::test]
async fn unrecognized_role_is_stored_verbatim_and_clears_projections() {
    let repo = InMemoryRepository::default();
    let user = repo.seed_user("Ada", "a@x.com");

    roles::apply_role_change(&repo, user.id, ROLE_RECRUITER)
        .await
        .unwrap();
    let outcome = roles::apply_role_change(&repo, user.id, "Wizard")
        .await
        .unwrap();

    // No enum validation: the string is written as-is.
    assert_eq!(outcome.message, "Role updated to Wizard");
    let stored = repo.users.lock().unwrap()[&user.id].clone();
    assert_eq!(stored.role, "Wizard");
    assert!(repo.applicant_emails().is_empty());
    assert!(repo.recruiter_emails().is_empty());
}

#[tokio::test]
async fn missing_user_is_not_found_and_writes_nothing() {
    let repo = InMemoryRepository::default();
    repo.seed_user("Ada", "a@x.com");

    let err = roles::apply_role_change(&repo, Uuid::new_v4(), ROLE_APPLICANT)
        .await
        .unwrap_err();

    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert!(repo.applicant_emails().is_empty());
    assert!(repo.recruiter_emails().is_empty());
}

#[tokio::test]
async fn repeating_a_role_refreshes_the_projection_timestamp() {
    let repo = InMemoryRepository::default();
    let user = repo.seed_user("Ada", "a@x.com");

    roles::apply_role_change(&repo, user.id, ROLE_APPLICANT)
        .await
        .unwrap();
    let first = repo.applicants.lock().unwrap()["a@x.com"].clone();

    tokio::time::sleep(Duration::from_millis(10)).await;

    roles::apply_role_change(&repo, user.id, ROLE_APPLICANT)
        .await
        .unwrap();
    let second = repo.applicants.lock().unwrap()["a@x.com"].clone();

    // Still exactly one projection, with created_at overwritten on the
    // repeat — the timestamp reflects the latest role-set.
    assert_eq!(repo.applicant_emails().len(), 1);
    assert!(second.created_at > first.created_at);
    assert_eq!(second.email, first.email);
}

#[tokio::test]
async fn projection_snapshot_carries_the_user_fields() {
    let repo = InMemoryRepository::default();
    let mut user = repo.seed_user("Ada Lovelace", "a@x.com");
    user.photo_url = Some("https://cdn.example/ada.png".to_string());
    repo.users.lock().unwrap().insert(user.id, user.clone());

    roles::apply_role_change(&repo, user.id, ROLE_RECRUITER)
        .await
        .unwrap();

    let profile = repo.recruiters.lock().unwrap()["a@x.com"].clone();
    assert_eq!(profile.name, "Ada Lovelace");
    assert_eq!(profile.email, "a@x.com");
    assert_eq!(
        profile.photo_url.as_deref(),
        Some("https://cdn.example/ada.png")
    );
}
