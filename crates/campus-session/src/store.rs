// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Collaborator contracts for the credential and profile stores.
//!
//! Both stores are managed external services in deployment; this core only
//! consumes the contracts below. [`crate::memory`] provides in-process
//! implementations for development and tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use campus_core::{AuthError, Identity, Profile, ProfileError};

// =============================================================================
// AuthSession
// =============================================================================

/// The session handle returned by a successful authenticate call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// The authenticated identity.
    pub identity: Identity,
    /// Signed bearer token for subsequent requests.
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

// =============================================================================
// CredentialStore
// =============================================================================

/// The identity provider contract.
///
/// The store owns identity lifecycle exclusively: identities are created on
/// sign-in and destroyed on sign-out. Consumers observe changes through
/// [`subscribe`](CredentialStore::subscribe), which delivers the current
/// identity immediately and again on every change (login, logout, token
/// refresh).
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Authenticates an email/password pair and issues a session handle.
    async fn authenticate(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Ends the current session.
    async fn sign_out(&self);

    /// Subscribes to identity-change events.
    ///
    /// The receiver's current value is the store's current identity, so a
    /// new subscriber observes the state at least once without waiting for
    /// a change.
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}

// =============================================================================
// ProfileStore
// =============================================================================

/// The profile record store contract.
///
/// A keyed document lookup; profile provisioning and mutation happen out of
/// band and are not part of this contract.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetches the profile for an identity.
    async fn get_profile(&self, identity_id: &str) -> Result<Profile, ProfileError>;
}
