// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Unified error hierarchy for CAMPUS.
//!
//! The error taxonomy follows the session/profile data flow:
//!
//! - [`AuthError`] surfaces to the sign-in caller for display and is the
//!   only error an end user sees on a form.
//! - [`ProfileError`] never reaches the user; the session controller
//!   collapses every profile failure into the degraded-profile fallback
//!   and only logs it.
//!
//! There is no retry or backoff anywhere in this core; every operation is
//! single-attempt.

use thiserror::Error;

// =============================================================================
// CampusError - Root Error Type
// =============================================================================

/// The root error type for CAMPUS.
#[derive(Debug, Error)]
pub enum CampusError {
    /// Authentication error.
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Profile store error.
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),
}

impl CampusError {
    /// Returns the error type as a string for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            CampusError::Auth(_) => "auth",
            CampusError::Profile(_) => "profile",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            CampusError::Auth(e) => e.status_code(),
            CampusError::Profile(e) => e.status_code(),
        }
    }
}

// =============================================================================
// AuthError
// =============================================================================

/// Errors from the credential store's authenticate operation.
///
/// These propagate to the caller of the sign-in action and are recoverable
/// by re-entering credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password pair did not match any account.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The account exists but has been disabled.
    #[error("account is disabled")]
    AccountDisabled,

    /// The credential store rejected the request for another reason.
    #[error("authentication failed: {message}")]
    Provider {
        /// Provider-reported message.
        message: String,
    },
}

impl AuthError {
    /// Creates a provider error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Returns the error code for categorization.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::AccountDisabled => "ACCOUNT_DISABLED",
            AuthError::Provider { .. } => "AUTH_PROVIDER",
        }
    }

    /// Returns a message safe to show on the login form.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials => "Invalid email or password".to_string(),
            AuthError::AccountDisabled => "This account has been disabled".to_string(),
            AuthError::Provider { .. } => "Sign-in failed, please try again".to_string(),
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::InvalidCredentials | AuthError::AccountDisabled => 401,
            AuthError::Provider { .. } => 502,
        }
    }
}

// =============================================================================
// ProfileError
// =============================================================================

/// Errors from the profile store.
///
/// `NotFound` and `Fetch` are handled identically by the session
/// controller: both produce a degraded fallback profile. The distinction
/// exists for logging only.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// No profile record exists for the identity.
    #[error("no profile for identity {identity_id}")]
    NotFound {
        /// The identity that was looked up.
        identity_id: String,
    },

    /// The lookup itself failed (network, permission).
    #[error("profile fetch failed: {message}")]
    Fetch {
        /// Underlying failure description.
        message: String,
    },

    /// A profile record violates its invariants.
    #[error("invalid profile: {message}")]
    Invalid {
        /// What was violated.
        message: String,
    },
}

impl ProfileError {
    /// Creates a not-found error.
    pub fn not_found(identity_id: impl Into<String>) -> Self {
        Self::NotFound {
            identity_id: identity_id.into(),
        }
    }

    /// Creates a fetch error.
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Creates an invalid-profile error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Returns `true` if the session controller should fall back to a
    /// degraded profile for this error. Always true: availability over
    /// correctness is the documented policy.
    pub fn is_benign(&self) -> bool {
        true
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ProfileError::NotFound { .. } => 404,
            ProfileError::Fetch { .. } => 502,
            ProfileError::Invalid { .. } => 500,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_codes() {
        assert_eq!(AuthError::InvalidCredentials.code(), "INVALID_CREDENTIALS");
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::provider("timeout").status_code(), 502);
    }

    #[test]
    fn test_profile_error_constructors() {
        let e = ProfileError::not_found("u1");
        assert_eq!(e.status_code(), 404);
        assert!(e.is_benign());

        let e = ProfileError::fetch("connection reset");
        assert_eq!(e.status_code(), 502);
        assert!(e.is_benign());
    }

    #[test]
    fn test_root_error_conversion() {
        let root: CampusError = AuthError::InvalidCredentials.into();
        assert_eq!(root.error_type(), "auth");
        assert_eq!(root.status_code(), 401);

        let root: CampusError = ProfileError::not_found("u1").into();
        assert_eq!(root.error_type(), "profile");
    }
}
