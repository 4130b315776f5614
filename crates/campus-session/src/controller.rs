// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The session controller.
//!
//! Subscribes to the credential store's identity events and publishes
//! [`SessionState`] snapshots through a watch channel. Exactly one profile
//! fetch is issued per identity-change event; a fetch whose identity was
//! superseded while it was in flight is discarded without being published,
//! so readers never observe a profile belonging to a previous sign-in.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use campus_core::{Identity, Profile, SessionState};

use crate::store::{CredentialStore, ProfileStore};

// =============================================================================
// Profile resolution
// =============================================================================

/// Resolves the profile for an identity, falling back to a degraded
/// profile on any failure.
///
/// This function never fails: a missing record, a fetch error, and an
/// invalid record all collapse into [`Profile::degraded_fallback`] so the
/// session can always reach the authenticated phase. Failures are logged
/// and otherwise swallowed.
pub async fn resolve_profile(profiles: &dyn ProfileStore, identity: &Identity) -> Profile {
    match profiles.get_profile(&identity.id).await {
        Ok(profile) => match profile.validate() {
            Ok(()) => profile,
            Err(e) => {
                tracing::warn!(
                    identity_id = %identity.id,
                    error = %e,
                    "profile record invalid, using degraded fallback"
                );
                Profile::degraded_fallback(identity)
            }
        },
        Err(e) => {
            tracing::warn!(
                identity_id = %identity.id,
                error = %e,
                "profile fetch failed, using degraded fallback"
            );
            Profile::degraded_fallback(identity)
        }
    }
}

// =============================================================================
// SessionController
// =============================================================================

/// Drives the session state machine for one credential/profile store pair.
pub struct SessionController;

impl SessionController {
    /// Spawns the controller task and returns a handle to its published
    /// state.
    ///
    /// The task runs until the credential store's watch sender is dropped
    /// or the handle is dropped, whichever comes first.
    pub fn spawn(
        credentials: Arc<dyn CredentialStore>,
        profiles: Arc<dyn ProfileStore>,
    ) -> SessionHandle {
        let (state_tx, state_rx) = watch::channel(SessionState::unknown());
        let mut identity_rx = credentials.subscribe();

        let task = tokio::spawn(async move {
            // Incremented on every identity event; carried in log lines so
            // a discarded fetch can be matched to the event it served.
            let mut generation: u64 = 0;

            loop {
                let identity = identity_rx.borrow_and_update().clone();
                generation += 1;

                match identity {
                    None => {
                        tracing::debug!(generation, "identity cleared, session anonymous");
                        if state_tx.send(SessionState::anonymous()).is_err() {
                            break;
                        }
                    }
                    Some(identity) => {
                        tracing::debug!(
                            generation,
                            identity_id = %identity.id,
                            "identity changed, fetching profile"
                        );
                        if state_tx
                            .send(SessionState::authenticated(identity.clone(), None))
                            .is_err()
                        {
                            break;
                        }

                        let profile = resolve_profile(profiles.as_ref(), &identity).await;

                        // A newer identity event arrived while the fetch was
                        // in flight; its result belongs to a stale generation.
                        if identity_rx.has_changed().unwrap_or(false) {
                            tracing::debug!(generation, "discarding superseded profile fetch");
                            continue;
                        }

                        tracing::info!(
                            generation,
                            identity_id = %identity.id,
                            role = %profile.role,
                            degraded = profile.degraded,
                            "session authenticated"
                        );
                        if state_tx
                            .send(SessionState::authenticated(identity, Some(profile)))
                            .is_err()
                        {
                            break;
                        }
                    }
                }

                if identity_rx.changed().await.is_err() {
                    tracing::debug!("credential store closed, session controller stopping");
                    break;
                }
            }
        });

        SessionHandle {
            state: state_rx,
            task,
        }
    }
}

// =============================================================================
// SessionHandle
// =============================================================================

/// A handle to a running session controller.
///
/// Dropping the handle aborts the controller task.
pub struct SessionHandle {
    state: watch::Receiver<SessionState>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Returns the current session snapshot.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Returns a fresh receiver for session state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryCredentialStore, MemoryProfileStore};
    use crate::token::{TokenConfig, TokenManager};
    use campus_core::{Role, SessionPhase};
    use std::time::Duration;

    fn stores() -> (Arc<MemoryCredentialStore>, Arc<MemoryProfileStore>) {
        let tokens =
            TokenManager::new(TokenConfig::new("test-secret-key-that-is-long-enough!")).unwrap();
        let credentials = Arc::new(MemoryCredentialStore::new(tokens));
        credentials
            .register_with_id("u1", "karim@school.example", "hunter22")
            .unwrap();
        (credentials, Arc::new(MemoryProfileStore::new()))
    }

    async fn wait_for_phase(
        rx: &mut watch::Receiver<SessionState>,
        phase: SessionPhase,
    ) -> SessionState {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if rx.borrow().phase() == phase {
                    return rx.borrow().clone();
                }
                rx.changed().await.unwrap();
            }
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_sign_in_reaches_authenticated() {
        let (credentials, profiles) = stores();
        profiles
            .insert(Profile::new("u1", Role::Teacher, "Karim", "s1"))
            .unwrap();

        let handle = SessionController::spawn(credentials.clone(), profiles);
        let mut rx = handle.subscribe();
        wait_for_phase(&mut rx, SessionPhase::Anonymous).await;

        credentials
            .authenticate("karim@school.example", "hunter22")
            .await
            .unwrap();

        let state = wait_for_phase(&mut rx, SessionPhase::Authenticated).await;
        let profile = state.profile.unwrap();
        assert_eq!(profile.role, Role::Teacher);
        assert!(!profile.degraded);
    }

    #[tokio::test]
    async fn test_missing_profile_degrades() {
        let (credentials, profiles) = stores();

        let handle = SessionController::spawn(credentials.clone(), profiles);
        let mut rx = handle.subscribe();

        credentials
            .authenticate("karim@school.example", "hunter22")
            .await
            .unwrap();

        let state = wait_for_phase(&mut rx, SessionPhase::Authenticated).await;
        let profile = state.profile.unwrap();
        assert!(profile.degraded);
        assert_eq!(profile.role, Role::Admin);
        assert_eq!(profile.name, "karim");
    }

    #[tokio::test]
    async fn test_sign_out_returns_to_anonymous() {
        let (credentials, profiles) = stores();
        profiles
            .insert(Profile::new("u1", Role::Teacher, "Karim", "s1"))
            .unwrap();

        let handle = SessionController::spawn(credentials.clone(), profiles);
        let mut rx = handle.subscribe();

        credentials
            .authenticate("karim@school.example", "hunter22")
            .await
            .unwrap();
        wait_for_phase(&mut rx, SessionPhase::Authenticated).await;

        credentials.sign_out().await;
        let state = wait_for_phase(&mut rx, SessionPhase::Anonymous).await;
        assert!(state.identity.is_none());
        assert!(state.profile.is_none());
    }

    #[tokio::test]
    async fn test_snapshot_matches_latest() {
        let (credentials, profiles) = stores();
        profiles
            .insert(Profile::new("u1", Role::Teacher, "Karim", "s1"))
            .unwrap();

        let handle = SessionController::spawn(credentials.clone(), profiles);
        let mut rx = handle.subscribe();

        credentials
            .authenticate("karim@school.example", "hunter22")
            .await
            .unwrap();
        wait_for_phase(&mut rx, SessionPhase::Authenticated).await;

        assert_eq!(handle.snapshot().phase(), SessionPhase::Authenticated);
    }
}
