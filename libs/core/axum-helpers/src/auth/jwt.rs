use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JwtClaims {
    pub sub: String,        // user id
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

impl JwtClaims {
    /// Role names compare case-insensitively.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// A signed token together with its lifetime.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies HS256 access tokens. Cheap to clone.
#[derive(Clone)]
pub struct JwtAuth {
    keys: Arc<Keys>,
    issuer: String,
    ttl_secs: i64,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        tracing::info!(issuer = %config.issuer, ttl_secs = config.ttl_secs, "JWT auth initialized");
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(config.secret.as_bytes()),
                decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            }),
            issuer: config.issuer.clone(),
            ttl_secs: config.ttl_secs,
        }
    }

    pub fn issue(
        &self,
        user_id: &str,
        email: &str,
        name: &str,
        roles: &[String],
    ) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            roles: roles.to_vec(),
            iss: self.issuer.clone(),
            exp: (now + Duration::seconds(self.ttl_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)?;
        Ok(IssuedToken {
            token,
            expires_in: self.ttl_secs,
        })
    }

    /// Checks signature, expiry and issuer.
    pub fn verify(&self, token: &str) -> Result<JwtClaims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        decode::<JwtClaims>(token, &self.keys.decoding, &validation).map(|data| data.claims)
    }
}
