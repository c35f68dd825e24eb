use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or, env_required};

const MIN_SECRET_LEN: usize = 32;

/// Token signing settings.
///
/// - `JWT_SECRET` (required, at least 32 characters)
/// - `JWT_ISSUER` (default `playhub`)
/// - `JWT_TTL_SECS` (default 3600)
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub ttl_secs: i64,
}

impl JwtConfig {
    /// # Panics
    /// Panics if the secret is shorter than 32 characters.
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        assert!(
            secret.len() >= MIN_SECRET_LEN,
            "JWT secret must be at least 32 characters"
        );
        Self {
            secret,
            issuer: "playhub".to_string(),
            ttl_secs: 3600,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_ttl_secs(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;

        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::ParseError {
                key: "JWT_SECRET".to_string(),
                details: format!(
                    "must be at least 32 characters (got {}). Generate one with: openssl rand -base64 32",
                    secret.len()
                ),
            });
        }

        let issuer = env_or_default("JWT_ISSUER", "playhub");
        let ttl_secs: i64 = env_parse_or("JWT_TTL_SECS", 3600)?;
        if ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_TTL_SECS".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        Ok(Self {
            secret,
            issuer,
            ttl_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "this-is-a-valid-secret-with-32-chars!";

    #[test]
    #[should_panic(expected = "JWT secret must be at least 32 characters")]
    fn test_jwt_config_new_too_short() {
        JwtConfig::new("short");
    }

    #[test]
    fn test_jwt_config_from_env_defaults() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some(SECRET)),
                ("JWT_ISSUER", None),
                ("JWT_TTL_SECS", None),
            ],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.secret, SECRET);
                assert_eq!(config.issuer, "playhub");
                assert_eq!(config.ttl_secs, 3600);
            },
        );
    }

    #[test]
    fn test_jwt_config_from_env_overrides() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some(SECRET)),
                ("JWT_ISSUER", Some("playhub-staging")),
                ("JWT_TTL_SECS", Some("600")),
            ],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.issuer, "playhub-staging");
                assert_eq!(config.ttl_secs, 600);
            },
        );
    }

    #[test]
    fn test_jwt_config_from_env_missing() {
        temp_env::with_var_unset("JWT_SECRET", || {
            let err = JwtConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("JWT_SECRET"));
        });
    }

    #[test]
    fn test_jwt_config_from_env_too_short() {
        temp_env::with_var("JWT_SECRET", Some("short"), || {
            let err = JwtConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("32 characters"));
        });
    }

    #[test]
    fn test_jwt_config_rejects_non_positive_ttl() {
        temp_env::with_vars(
            [("JWT_SECRET", Some(SECRET)), ("JWT_TTL_SECS", Some("0"))],
            || {
                assert!(JwtConfig::from_env().is_err());
            },
        );
    }
}
