use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// User roles. Serialized as `User` / `Admin`, parsed case-insensitively.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Unique, compared case-insensitively
    pub email: String,
    /// Argon2 password hash (never exposed in API responses)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub tax_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user (password must already be hashed)
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        tax_id: Option<String>,
        birth_date: Option<NaiveDate>,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name,
            email,
            password_hash,
            tax_id,
            birth_date,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply updates (password should already be hashed if provided)
    pub fn apply_update(&mut self, update: UpdateUser, new_password_hash: Option<String>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(hash) = new_password_hash {
            self.password_hash = hash;
        }
        if let Some(tax_id) = update.tax_id {
            self.tax_id = Some(tax_id);
        }
        if let Some(birth_date) = update.birth_date {
            self.birth_date = Some(birth_date);
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        self.updated_at = Utc::now();
    }
}

/// User response DTO (without password_hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub tax_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            tax_id: user.tax_id,
            birth_date: user.birth_date,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// DTO for creating a new user
///
/// Password rules (length, special character) are enforced by the service.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    pub password: String,
    #[validate(length(max = 32))]
    pub tax_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub role: Role,
}

/// DTO for updating an existing user
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    pub password: Option<String>,
    #[validate(length(max = 32))]
    pub tax_id: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub role: Option<Role>,
}

/// Query filters for listing users
#[derive(Debug, Clone, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct UserFilter {
    /// Case-insensitive substring match on email
    pub email: Option<String>,
    pub role: Option<Role>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

impl Default for UserFilter {
    fn default() -> Self {
        Self {
            email: None,
            role: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

fn default_limit() -> u64 {
    50
}

/// DTO for user login
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Response after successful login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing_is_case_insensitive() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("USER".parse::<Role>().unwrap(), Role::User);
        assert!("moderator".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "Admin");
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = User::new(
            "Ana".into(),
            "ana@example.com".into(),
            "$argon2id$secret".into(),
            None,
            None,
            Role::User,
        );
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "User");
    }

    #[test]
    fn test_apply_update_only_touches_provided_fields() {
        let mut user = User::new(
            "Ana".into(),
            "ana@example.com".into(),
            "hash".into(),
            Some("123".into()),
            None,
            Role::User,
        );
        let before = user.updated_at;

        user.apply_update(
            UpdateUser {
                role: Some(Role::Admin),
                ..Default::default()
            },
            None,
        );

        assert_eq!(user.name, "Ana");
        assert_eq!(user.tax_id.as_deref(), Some("123"));
        assert_eq!(user.role, Role::Admin);
        assert!(user.updated_at >= before);
    }
}
