//! Registration candidates and the rules every candidate must pass.
//!
//! The same rules run when a batch is accepted over HTTP and again when the
//! queued message is consumed; nothing read back from the queue is trusted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use validator::ValidateEmail;

use crate::models::Role;

/// Characters that satisfy the password special-character rule.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+-=[]{}|;:',.<>?/`~";

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// An unvalidated user-creation request.
///
/// Every field may be absent on the wire; a missing email or password then
/// fails [`validate_candidate`] for that record alone instead of rejecting
/// the whole batch at deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CandidateUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// CPF-like tax identifier
    #[serde(default)]
    pub tax_id: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateIssue {
    InvalidEmail,
    PasswordRequired,
    PasswordTooShort,
    MissingSpecialCharacter,
}

impl fmt::Display for CandidateIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CandidateIssue::InvalidEmail => "invalid email format",
            CandidateIssue::PasswordRequired => "password required",
            CandidateIssue::PasswordTooShort => "password too short",
            CandidateIssue::MissingSpecialCharacter => "missing special character",
        })
    }
}

/// Result of [`validate_candidate`]: every failed rule, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateValidation {
    pub errors: Vec<CandidateIssue>,
}

impl CandidateValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Human readable messages, e.g. for logs or a 400 body.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Checks the email grammar and the password rules. All failures are
/// collected; nothing short-circuits.
pub fn validate_candidate(candidate: &CandidateUser) -> CandidateValidation {
    let mut errors = Vec::new();

    if !candidate.email.validate_email() {
        errors.push(CandidateIssue::InvalidEmail);
    }
    errors.extend(password_issues(&candidate.password));

    CandidateValidation { errors }
}

/// Password rules on their own, shared with direct user creation and updates.
pub fn password_issues(password: &str) -> Vec<CandidateIssue> {
    let mut issues = Vec::new();

    if password.is_empty() {
        issues.push(CandidateIssue::PasswordRequired);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        issues.push(CandidateIssue::PasswordTooShort);
    }
    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        issues.push(CandidateIssue::MissingSpecialCharacter);
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(email: &str, password: &str) -> CandidateUser {
        CandidateUser {
            name: "Ana".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            tax_id: "123.456.789-00".to_string(),
            birth_date: None,
            role: Role::User,
        }
    }

    #[test]
    fn test_valid_candidate() {
        let result = validate_candidate(&candidate("a@b.com", "Passw0rd!"));
        assert!(result.is_valid());
        assert!(result.messages().is_empty());
    }

    #[test]
    fn test_invalid_email_regardless_of_password() {
        for password in ["Passw0rd!", "x", ""] {
            let result = validate_candidate(&candidate("bad", password));
            assert!(!result.is_valid());
            assert_eq!(result.errors[0], CandidateIssue::InvalidEmail);
        }
    }

    #[test]
    fn test_short_password() {
        let result = validate_candidate(&candidate("a@b.com", "Ab1!"));
        assert_eq!(result.errors, vec![CandidateIssue::PasswordTooShort]);
        assert_eq!(result.messages(), vec!["password too short"]);
    }

    #[test]
    fn test_missing_special_character() {
        let result = validate_candidate(&candidate("a@b.com", "Password1"));
        assert_eq!(result.errors, vec![CandidateIssue::MissingSpecialCharacter]);
    }

    #[test]
    fn test_empty_password_collects_every_password_error() {
        let result = validate_candidate(&candidate("a@b.com", ""));
        assert_eq!(
            result.errors,
            vec![
                CandidateIssue::PasswordRequired,
                CandidateIssue::PasswordTooShort,
                CandidateIssue::MissingSpecialCharacter,
            ]
        );
    }

    #[test]
    fn test_all_errors_in_rule_order() {
        let result = validate_candidate(&candidate("nope", "x"));
        assert_eq!(
            result.messages(),
            vec![
                "invalid email format",
                "password too short",
                "missing special character"
            ]
        );
    }

    #[test]
    fn test_every_special_character_is_accepted() {
        for c in SPECIAL_CHARACTERS.chars() {
            let password = format!("abcdefgh{c}");
            assert!(
                password_issues(&password).is_empty(),
                "{c:?} should count as special"
            );
        }
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 7 characters, more than 8 bytes
        assert!(password_issues("ççççç!a").contains(&CandidateIssue::PasswordTooShort));
    }
}
