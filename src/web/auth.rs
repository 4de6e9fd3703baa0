//! # Token Authentication
//!
//! HS256 JWTs signed with the configured secret, plus argon2 password hashing.
//! Every token carries the id of a server-side session row; the middleware
//! rejects tokens whose session has been deleted.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::constants::Role;

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("JWT processing error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuthHeader,

    #[error("Invalid authorization header format")]
    InvalidAuthFormat,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

/// JWT claims for an authenticated user
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserClaims {
    /// Subject (user id)
    pub sub: String,
    pub role: Role,
    /// Session id backing this token
    pub sid: Uuid,
    pub iss: String,
    pub aud: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

impl UserClaims {
    pub fn user_id(&self) -> Result<i32, AuthError> {
        self.sub
            .parse()
            .map_err(|_| AuthError::InvalidToken(format!("Invalid subject '{}'", self.sub)))
    }
}

/// Issues and validates user tokens
#[derive(Clone)]
pub struct JwtAuthenticator {
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAuthenticator")
            .field("issuer", &self.config.jwt_issuer)
            .field("audience", &self.config.jwt_audience)
            .finish_non_exhaustive()
    }
}

impl JwtAuthenticator {
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        if config.jwt_secret.is_empty() {
            return Err(AuthError::ConfigurationError(
                "JWT secret not configured".to_string(),
            ));
        }

        debug!(issuer = %config.jwt_issuer, "JWT authenticator configured");

        Ok(Self {
            config: config.clone(),
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        })
    }

    /// Moment a token issued now stops being valid
    pub fn expiry_from_now(&self) -> DateTime<Utc> {
        Utc::now() + Duration::hours(self.config.token_expiry_hours as i64)
    }

    pub fn generate_user_token(
        &self,
        user_id: i32,
        role: Role,
        session_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = UserClaims {
            sub: user_id.to_string(),
            role,
            sid: session_id,
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
            exp: expires_at.timestamp(),
            iat: Utc::now().timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    pub fn validate_user_token(&self, token: &str) -> Result<UserClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.jwt_issuer]);
        validation.set_audience(&[&self.config.jwt_audience]);

        let data = decode::<UserClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            warn!(error = %e, "Token validation failed");
            AuthError::InvalidToken(e.to_string())
        })?;

        Ok(data.claims)
    }

    /// Extract the token from `Authorization: Bearer <t>` or `Authorization: Token <t>`
    pub fn extract_token(header_value: Option<&str>) -> Result<&str, AuthError> {
        let value = header_value.ok_or(AuthError::MissingAuthHeader)?;
        let token = value
            .strip_prefix("Bearer ")
            .or_else(|| value.strip_prefix("Token "))
            .ok_or(AuthError::InvalidAuthFormat)?
            .trim();
        if token.is_empty() {
            return Err(AuthError::InvalidAuthFormat);
        }
        Ok(token)
    }
}

/// Hash a password into an argon2 PHC string
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// Check a password against a stored PHC string; malformed hashes never verify
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!(error = %e, "Stored password hash is not a valid PHC string");
            false
        }
    }
}
