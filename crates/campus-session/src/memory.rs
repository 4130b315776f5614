// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory credential and profile stores.
//!
//! In-process reference implementations of the store contracts, used by
//! the development server and the test suites. Passwords are argon2
//! hashed; session handles are signed tokens from [`TokenManager`].

use std::collections::HashMap;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::watch;
use uuid::Uuid;

use campus_core::{AuthError, Identity, Profile, ProfileError};

use crate::store::{AuthSession, CredentialStore, ProfileStore};
use crate::token::{TokenError, TokenManager};

// =============================================================================
// MemoryCredentialStore
// =============================================================================

struct UserRecord {
    identity_id: String,
    password_hash: String,
    email_verified: bool,
    disabled: bool,
}

/// An in-memory identity provider.
///
/// Holds one current identity at a time and publishes changes through a
/// watch channel, mirroring the single-session shape of the managed
/// provider it stands in for.
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<String, UserRecord>>,
    current: watch::Sender<Option<Identity>>,
    tokens: TokenManager,
}

impl MemoryCredentialStore {
    /// Creates an empty store issuing tokens with the given manager.
    pub fn new(tokens: TokenManager) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            users: RwLock::new(HashMap::new()),
            current,
            tokens,
        }
    }

    /// Registers a user with a freshly hashed password.
    pub fn register(&self, email: &str, password: &str, verified: bool) -> Result<(), AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::provider(e.to_string()))?
            .to_string();

        self.users.write().insert(
            email.to_lowercase(),
            UserRecord {
                identity_id: Uuid::new_v4().to_string(),
                password_hash: hash,
                email_verified: verified,
                disabled: false,
            },
        );
        Ok(())
    }

    /// Registers a user with a fixed identity id, for deterministic tests.
    pub fn register_with_id(
        &self,
        identity_id: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        self.register(email, password, true)?;
        if let Some(record) = self.users.write().get_mut(&email.to_lowercase()) {
            record.identity_id = identity_id.to_string();
        }
        Ok(())
    }

    /// Disables an account.
    pub fn disable(&self, email: &str) {
        if let Some(record) = self.users.write().get_mut(&email.to_lowercase()) {
            record.disabled = true;
        }
    }

    /// Returns the token manager used to sign session handles.
    pub fn token_manager(&self) -> &TokenManager {
        &self.tokens
    }

    fn verify_password(record: &UserRecord, password: &str) -> bool {
        PasswordHash::new(&record.password_hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn authenticate(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let identity = {
            let users = self.users.read();
            let record = users
                .get(&email.to_lowercase())
                .ok_or(AuthError::InvalidCredentials)?;

            if !Self::verify_password(record, password) {
                return Err(AuthError::InvalidCredentials);
            }
            if record.disabled {
                return Err(AuthError::AccountDisabled);
            }

            Identity {
                id: record.identity_id.clone(),
                email: email.to_lowercase(),
                email_verified: record.email_verified,
            }
        };

        let token = self
            .tokens
            .create_session_token(&identity)
            .map_err(|e| AuthError::provider(e.to_string()))?;

        // Publish after the token is issued so subscribers never observe
        // an identity without a valid session behind it.
        let _ = self.current.send(Some(identity.clone()));

        tracing::info!(identity_id = %identity.id, "user signed in");

        Ok(AuthSession {
            identity,
            token,
            expires_in: self.tokens.expiration_secs(),
        })
    }

    async fn sign_out(&self) {
        let _ = self.current.send(None);
        tracing::info!("user signed out");
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.current.subscribe()
    }
}

impl MemoryCredentialStore {
    /// Resolves a bearer token back to its identity.
    ///
    /// Stateless: validation is purely against the token signature and
    /// claims, so a restarted server accepts tokens issued before the
    /// restart as long as the secret matches.
    pub fn identity_for_token(&self, token: &str) -> Result<Identity, TokenError> {
        self.tokens.validate(token).map(|claims| claims.identity())
    }
}

// =============================================================================
// MemoryProfileStore
// =============================================================================

/// An in-memory profile record store.
#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<String, Profile>>,
}

impl MemoryProfileStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a profile after validating its invariants.
    pub fn insert(&self, profile: Profile) -> Result<(), ProfileError> {
        profile.validate()?;
        self.profiles.write().insert(profile.id.clone(), profile);
        Ok(())
    }

    /// Removes a profile.
    pub fn remove(&self, identity_id: &str) {
        self.profiles.write().remove(identity_id);
    }

    /// Returns the number of stored profiles.
    pub fn len(&self) -> usize {
        self.profiles.read().len()
    }

    /// Returns `true` if the store holds no profiles.
    pub fn is_empty(&self) -> bool {
        self.profiles.read().is_empty()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get_profile(&self, identity_id: &str) -> Result<Profile, ProfileError> {
        self.profiles
            .read()
            .get(identity_id)
            .cloned()
            .ok_or_else(|| ProfileError::not_found(identity_id))
    }
}

// =============================================================================
// Tests
// =============================================================================
