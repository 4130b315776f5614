// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session token management.
//!
//! The in-memory credential store issues signed bearer tokens as its
//! session handles. Tokens carry the identity only; roles live on the
//! profile and are fetched fresh on every identity change.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use campus_core::Identity;

// =============================================================================
// TokenError
// =============================================================================

/// Errors from token creation and validation.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The signing secret is empty.
    #[error("token secret is not configured")]
    NotConfigured,

    /// The token has expired.
    #[error("token has expired")]
    Expired,

    /// The token is malformed or its signature does not verify.
    #[error("invalid token: {message}")]
    Invalid {
        /// Validation failure description.
        message: String,
    },

    /// Token creation failed.
    #[error("failed to create token: {message}")]
    Creation {
        /// Encoding failure description.
        message: String,
    },
}

// =============================================================================
// TokenConfig
// =============================================================================

/// Session token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Secret key for signing tokens.
    #[serde(skip_serializing)]
    pub secret: String,
    /// Token issuer.
    pub issuer: String,
    /// Token lifetime in seconds.
    pub expiration_secs: i64,
    /// Clock skew tolerance in seconds.
    pub leeway_secs: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // must be set by the deployment
            issuer: "campus".to_string(),
            expiration_secs: 3600,
            leeway_secs: 60,
        }
    }
}

impl TokenConfig {
    /// Creates a configuration with the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), TokenError> {
        if self.secret.is_empty() {
            return Err(TokenError::NotConfigured);
        }
        if self.secret.len() < 32 {
            tracing::warn!("token secret is shorter than recommended (32 bytes)");
        }
        Ok(())
    }
}

// =============================================================================
// SessionClaims
// =============================================================================

/// Claims embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Identity id.
    pub sub: String,
    /// Sign-in email.
    pub email: String,
    /// Whether the email is verified.
    #[serde(default)]
    pub email_verified: bool,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Issuer.
    pub iss: String,
}

impl SessionClaims {
    /// Creates claims for an identity.
    pub fn new(identity: &Identity, issuer: &str, expires_in_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: identity.id.clone(),
            email: identity.email.clone(),
            email_verified: identity.email_verified,
            exp: now + expires_in_secs,
            iat: now,
            iss: issuer.to_string(),
        }
    }

    /// Reconstructs the identity these claims were issued for.
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.sub.clone(),
            email: self.email.clone(),
            email_verified: self.email_verified,
        }
    }
}

// =============================================================================
// TokenManager
// =============================================================================

/// Creates and validates session tokens.
#[derive(Clone)]
pub struct TokenManager {
    config: Arc<TokenConfig>,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl TokenManager {
    /// Creates a manager from configuration.
    pub fn new(config: TokenConfig) -> Result<Self, TokenError> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.leeway = config.leeway_secs;
        validation.validate_aud = false;

        Ok(Self {
            config: Arc::new(config),
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
        })
    }

    /// Creates a session token for an identity.
    pub fn create_session_token(&self, identity: &Identity) -> Result<String, TokenError> {
        let claims = SessionClaims::new(identity, &self.config.issuer, self.config.expiration_secs);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            TokenError::Creation {
                message: e.to_string(),
            }
        })
    }

    /// Validates a token and returns its claims.
    pub fn validate(&self, token: &str) -> Result<SessionClaims, TokenError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid {
                    message: e.to_string(),
                },
            })
    }

    /// Returns the configured token lifetime in seconds.
    pub fn expiration_secs(&self) -> i64 {
        self.config.expiration_secs
    }
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("issuer", &self.config.issuer)
            .field("expiration_secs", &self.config.expiration_secs)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> TokenConfig {
        TokenConfig::new("test-secret-key-that-is-long-enough-for-tests")
    }

    fn test_identity() -> Identity {
        Identity::new("u1", "karim@school.example").verified()
    }

    #[test]
    fn test_create_and_validate() {
        let manager = TokenManager::new(test_config()).unwrap();
        let identity = test_identity();

        let token = manager.create_session_token(&identity).unwrap();
        let claims = manager.validate(&token).unwrap();

        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.identity(), identity);
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            TokenManager::new(TokenConfig::default()),
            Err(TokenError::NotConfigured)
        ));
    }

    #[test]
    fn test_invalid_token() {
        let manager = TokenManager::new(test_config()).unwrap();
        assert!(manager.validate("not.a.token").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let a = TokenManager::new(TokenConfig::new("secret-one-long-enough-for-testing!")).unwrap();
        let b = TokenManager::new(TokenConfig::new("secret-two-long-enough-for-testing!")).unwrap();

        let token = a.create_session_token(&test_identity()).unwrap();
        assert!(b.validate(&token).is_err());
    }

    #[test]
    fn test_expired_token() {
        let mut config = test_config();
        config.expiration_secs = -3600;
        config.leeway_secs = 0;
        let manager = TokenManager::new(config).unwrap();

        let token = manager.create_session_token(&test_identity()).unwrap();
        assert!(matches!(manager.validate(&token), Err(TokenError::Expired)));
    }
}
