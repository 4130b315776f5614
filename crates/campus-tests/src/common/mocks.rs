// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! Mock store implementations for testing the session controller in
//! isolation.
//!
//! ## Design Principles
//!
//! - Configurable latency and error injection
//! - Recording of interactions for verification
//! - Thread-safe for concurrent testing

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;

use campus_core::{AuthError, Identity, Profile, ProfileError};
use campus_session::{AuthSession, CredentialStore, ProfileStore};

// =============================================================================
// Mock Profile Store
// =============================================================================

/// A configurable mock profile store.
#[derive(Debug)]
pub struct MockProfileStore {
    /// Stored profiles keyed by identity id.
    profiles: RwLock<HashMap<String, Profile>>,

    /// Simulated fetch latency.
    latency: Mutex<Duration>,

    /// Force all fetches to fail.
    fail_all: AtomicBool,

    /// Force the next fetch to fail.
    fail_next: AtomicBool,

    /// Fetch count for verification.
    fetch_count: AtomicU64,
}

impl MockProfileStore {
    /// Create an empty mock store with no latency.
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
            latency: Mutex::new(Duration::ZERO),
            fail_all: AtomicBool::new(false),
            fail_next: AtomicBool::new(false),
            fetch_count: AtomicU64::new(0),
        }
    }

    /// Insert a profile record.
    pub fn insert(&self, profile: Profile) {
        self.profiles.write().insert(profile.id.clone(), profile);
    }

    /// Set the simulated fetch latency.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = latency;
    }

    /// Force every fetch to fail.
    pub fn fail_all(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    /// Force the next fetch to fail.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Number of fetches issued so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

impl Default for MockProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileStore for MockProfileStore {
    async fn get_profile(&self, identity_id: &str) -> Result<Profile, ProfileError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        let latency = *self.latency.lock();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self.fail_all.load(Ordering::SeqCst) || self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ProfileError::fetch("injected fetch failure"));
        }

        self.profiles
            .read()
            .get(identity_id)
            .cloned()
            .ok_or_else(|| ProfileError::not_found(identity_id))
    }
}

// =============================================================================
// Scripted Credential Store
// =============================================================================

/// A credential store driven by explicit identity events.
///
/// Tests push sign-in and sign-out events directly instead of going
/// through password authentication.
pub struct ScriptedCredentialStore {
    current: watch::Sender<Option<Identity>>,
}

impl ScriptedCredentialStore {
    /// Create a store with no current identity.
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self { current }
    }

    /// Push an identity event to all subscribers.
    pub fn push(&self, identity: Option<Identity>) {
        // Send failures mean no subscriber is left; tests assert through
        // their own receivers, so this is not an error here.
        let _ = self.current.send(identity);
    }
}

impl Default for ScriptedCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for ScriptedCredentialStore {
    async fn authenticate(&self, _email: &str, _password: &str) -> Result<AuthSession, AuthError> {
        Err(AuthError::provider(
            "scripted store does not authenticate; push identities directly",
        ))
    }

    async fn sign_out(&self) {
        self.push(None);
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.current.subscribe()
    }
}
