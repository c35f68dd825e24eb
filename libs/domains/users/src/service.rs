use async_trait::async_trait;
use axum_helpers::JwtAuth;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::candidate::{CandidateUser, password_issues, validate_candidate};
use crate::error::{UserError, UserResult};
use crate::models::{
    CreateUser, LoginRequest, LoginResponse, UpdateUser, User, UserFilter, UserResponse,
};
use crate::password::{hash_password, verify_password};
use crate::registration::{PersistenceError, UserPersister};
use crate::repository::UserRepository;

/// Service layer for User business logic
pub struct UserService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: UserRepository + ?Sized> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

fn check_password(password: &str) -> UserResult<()> {
    let issues = password_issues(password);
    if issues.is_empty() {
        return Ok(());
    }

    let messages: Vec<String> = issues.iter().map(ToString::to_string).collect();
    Err(UserError::Validation(messages.join(", ")))
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> Arc<R> {
        Arc::clone(&self.repository)
    }

    /// Create a new user with validation and password hashing
    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserResponse> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;
        check_password(&input.password)?;

        let email = input.email.to_lowercase();
        if self.repository.get_by_email(&email).await?.is_some() {
            return Err(UserError::DuplicateEmail(email));
        }

        let password_hash = hash_password(&input.password)?;
        let user = User::new(
            input.name,
            email,
            password_hash,
            input.tax_id,
            input.birth_date,
            input.role,
        );

        let created = self.repository.create(user).await?;
        Ok(created.into())
    }

    pub async fn get_user(&self, id: Uuid) -> UserResult<UserResponse> {
        self.repository
            .get_by_id(id)
            .await?
            .map(Into::into)
            .ok_or(UserError::NotFound(id))
    }

    pub async fn list_users(&self, filter: UserFilter) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.list(filter).await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    /// Partial update. A new password goes through the same rules as on create.
    pub async fn update_user(&self, id: Uuid, mut input: UpdateUser) -> UserResult<UserResponse> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let mut user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        if let Some(email) = input.email.take() {
            let email = email.to_lowercase();
            let taken = self
                .repository
                .get_by_email(&email)
                .await?
                .is_some_and(|existing| existing.id != id);
            if taken {
                return Err(UserError::DuplicateEmail(email));
            }
            input.email = Some(email);
        }

        let new_hash = match input.password.take() {
            Some(password) => {
                check_password(&password)?;
                Some(hash_password(&password)?)
            }
            None => None,
        };

        user.apply_update(input, new_hash);
        let updated = self.repository.update(user).await?;
        Ok(updated.into())
    }

    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(UserError::NotFound(id))
        }
    }

    /// Verify credentials and issue an access token.
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, input: LoginRequest, auth: &JwtAuth) -> UserResult<LoginResponse> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let user = self
            .repository
            .get_by_email(&input.email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(&input.password, &user.password_hash)? {
            tracing::info!(user_id = %user.id, "Login failed: wrong password");
            return Err(UserError::InvalidCredentials);
        }

        let issued = auth
            .issue(
                &user.id.to_string(),
                &user.email,
                &user.name,
                &[user.role.to_string()],
            )
            .map_err(|e| UserError::Token(e.to_string()))?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginResponse {
            access_token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in,
            user: user.into(),
        })
    }

    pub async fn ping(&self) -> UserResult<()> {
        self.repository.ping().await
    }
}

#[async_trait]
impl<R: UserRepository + ?Sized> UserPersister for UserService<R> {
    async fn persist(&self, candidate: &CandidateUser) -> Result<(), PersistenceError> {
        let validation = validate_candidate(candidate);
        if !validation.is_valid() {
            return Err(PersistenceError::Rejected(validation.messages().join(", ")));
        }

        let input = CreateUser {
            name: candidate.name.clone(),
            email: candidate.email.clone(),
            password: candidate.password.clone(),
            tax_id: Some(candidate.tax_id.clone()).filter(|t| !t.is_empty()),
            birth_date: candidate.birth_date,
            role: candidate.role,
        };

        match self.create_user(input).await {
            Ok(_) => Ok(()),
            Err(e @ (UserError::DuplicateEmail(_) | UserError::Validation(_))) => {
                Err(PersistenceError::Rejected(e.to_string()))
            }
            Err(e) => Err(PersistenceError::Unavailable(e.to_string())),
        }
    }
}
