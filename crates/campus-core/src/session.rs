// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session state snapshots.

use serde::{Deserialize, Serialize};

use crate::profile::{Identity, Profile};
use crate::role::Role;

// =============================================================================
// SessionState
// =============================================================================

/// An immutable snapshot of the session at a point in time.
///
/// Published by the session controller through a watch channel; readers
/// never observe partial transitions. The snapshot is transient and
/// process-local, rebuilt from the credential store on every fresh start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// The authenticated identity, if any.
    pub identity: Option<Identity>,
    /// The resolved profile; `None` while a fetch is pending or when
    /// signed out.
    pub profile: Option<Profile>,
    /// True only before the credential store has reported its initial
    /// state.
    pub loading: bool,
}

impl SessionState {
    /// The initial state before the credential store has reported.
    pub fn unknown() -> Self {
        Self {
            identity: None,
            profile: None,
            loading: true,
        }
    }

    /// The signed-out state.
    pub fn anonymous() -> Self {
        Self {
            identity: None,
            profile: None,
            loading: false,
        }
    }

    /// A signed-in state; `profile` is `None` while the fetch is pending.
    pub fn authenticated(identity: Identity, profile: Option<Profile>) -> Self {
        Self {
            identity: Some(identity),
            profile,
            loading: false,
        }
    }

    /// Returns the session phase this snapshot is in.
    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            SessionPhase::Unknown
        } else if self.identity.is_none() {
            SessionPhase::Anonymous
        } else if self.profile.is_none() {
            SessionPhase::ProfileLoading
        } else {
            SessionPhase::Authenticated
        }
    }

    /// Returns the role of the resolved profile, if any.
    pub fn role(&self) -> Option<Role> {
        self.profile.as_ref().map(|p| p.role)
    }

    /// Returns `true` if an identity is present.
    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::unknown()
    }
}

// =============================================================================
// SessionPhase
// =============================================================================

/// The phases of the session state machine.
///
/// `Unknown -> Anonymous | Authenticated`, with `ProfileLoading` as the
/// transient sub-state between an identity event and its profile fetch
/// resolving. There is no terminal phase; the machine runs for the
/// lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Credential store has not reported yet.
    Unknown,
    /// Signed out.
    Anonymous,
    /// Signed in; profile fetch pending.
    ProfileLoading,
    /// Signed in with a resolved profile.
    Authenticated,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phases() {
        assert_eq!(SessionState::unknown().phase(), SessionPhase::Unknown);
        assert_eq!(SessionState::anonymous().phase(), SessionPhase::Anonymous);

        let identity = Identity::new("u1", "k@s.example");
        let pending = SessionState::authenticated(identity.clone(), None);
        assert_eq!(pending.phase(), SessionPhase::ProfileLoading);

        let profile = Profile::new("u1", Role::Teacher, "Karim", "s1");
        let full = SessionState::authenticated(identity, Some(profile));
        assert_eq!(full.phase(), SessionPhase::Authenticated);
        assert_eq!(full.role(), Some(Role::Teacher));
    }

    #[test]
    fn test_default_is_unknown() {
        let state = SessionState::default();
        assert!(state.loading);
        assert!(!state.is_signed_in());
    }
}
