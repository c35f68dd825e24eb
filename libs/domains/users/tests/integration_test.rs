//! Integration tests for the Users domain against real PostgreSQL
//!
//! These use testcontainers and need a Docker daemon:
//!
//! ```bash
//! cargo test -p domain_users --test integration_test -- --ignored
//! ```

use domain_users::*;
use std::sync::Arc;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

fn user(builder: &TestDataBuilder, local: &str, role: Role) -> User {
    User::new(
        builder.name("user", local),
        builder.email(local),
        "$argon2id$placeholder".to_string(),
        Some("123.456.789-09".to_string()),
        None,
        role,
    )
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_create_and_get_user() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("pg_create_and_get");

    let created = repo.create(user(&builder, "ana", Role::Admin)).await.unwrap();

    let by_id = assert_some(repo.get_by_id(created.id).await.unwrap(), "user by id");
    assert_uuid_eq(by_id.id, created.id, "user id");
    assert_eq!(by_id.role, Role::Admin);

    let by_email = repo
        .get_by_email(&builder.email("ana").to_uppercase())
        .await
        .unwrap();
    assert_some(by_email, "lookup by email is case-insensitive");
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_unique_email_constraint() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("pg_unique_email");

    repo.create(user(&builder, "dup", Role::User)).await.unwrap();
    let result = repo.create(user(&builder, "dup", Role::User)).await;

    assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_list_update_delete() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("pg_list_update_delete");

    let mut ana = repo.create(user(&builder, "ana", Role::User)).await.unwrap();
    repo.create(user(&builder, "bob", Role::Admin)).await.unwrap();

    let admins = repo
        .list(UserFilter {
            role: Some(Role::Admin),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(admins.len(), 1);

    ana.apply_update(
        UpdateUser {
            name: Some("Ana Maria".to_string()),
            ..Default::default()
        },
        None,
    );
    let updated = repo.update(ana.clone()).await.unwrap();
    assert_eq!(updated.name, "Ana Maria");

    assert!(repo.delete(ana.id).await.unwrap());
    assert!(repo.get_by_id(ana.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_service_persists_queued_candidate() {
    let db = TestDatabase::new().await;
    let service = UserService::new(Arc::new(PgUserRepository::new(db.connection())));
    let builder = TestDataBuilder::from_test_name("pg_persist_candidate");

    let candidate = CandidateUser {
        name: builder.name("user", "queued"),
        email: builder.email("queued"),
        password: builder.password(),
        tax_id: String::new(),
        birth_date: None,
        role: Role::User,
    };

    service.persist(&candidate).await.unwrap();
    assert!(matches!(
        service.persist(&candidate).await,
        Err(PersistenceError::Rejected(_))
    ));
}
