// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Pre-built test data for consistent and reproducible testing.
//!
//! Fixtures cover the standard five-role cast used across the suites:
//! one account per role, all attached to school `s1` except the super
//! admin.

use std::sync::Arc;

use campus_api::{ApiConfig, ApiServerBuilder};
use campus_core::{profile::ALL_SCHOOLS, Identity, Profile, Role};
use campus_session::{
    CredentialStore, MemoryCredentialStore, MemoryProfileStore, ProfileStore, TokenConfig,
    TokenManager,
};

/// Signing secret shared by every test token manager.
pub const TEST_SECRET: &str = "test-secret-key-for-token-signing-at-least-32-chars";

/// Password shared by every seeded account.
pub const TEST_PASSWORD: &str = "hunter22";

// =============================================================================
// Identity Fixtures
// =============================================================================

/// Fixture providing standard identities.
pub struct IdentityFixtures;

impl IdentityFixtures {
    /// The teacher account.
    pub fn teacher() -> Identity {
        Identity::new("u-teacher", "karim@school.example").verified()
    }

    /// The student account.
    pub fn student() -> Identity {
        Identity::new("u-student", "mina@school.example").verified()
    }

    /// An account with no profile record.
    pub fn orphan() -> Identity {
        Identity::new("u-orphan", "ghost@school.example").verified()
    }
}

// =============================================================================
// Profile Fixtures
// =============================================================================

/// Fixture providing one profile per role.
pub struct ProfileFixtures;

impl ProfileFixtures {
    /// A super admin over all schools.
    pub fn super_admin() -> Profile {
        Profile::new("u-super", Role::SuperAdmin, "Root", ALL_SCHOOLS)
    }

    /// A school admin.
    pub fn admin() -> Profile {
        Profile::new("u-admin", Role::Admin, "Sana", "s1")
    }

    /// A teacher with a class assignment.
    pub fn teacher() -> Profile {
        Profile::new("u-teacher", Role::Teacher, "Karim", "s1").with_class("c1")
    }

    /// A parent linked to the student account.
    pub fn parent() -> Profile {
        Profile::new("u-parent", Role::Parent, "Yuna", "s1").with_student("u-student")
    }

    /// A student in class c1.
    pub fn student() -> Profile {
        Profile::new("u-student", Role::Student, "Mina", "s1").with_class("c1")
    }

    /// All five profiles.
    pub fn all() -> Vec<Profile> {
        vec![
            Self::super_admin(),
            Self::admin(),
            Self::teacher(),
            Self::parent(),
            Self::student(),
        ]
    }

    /// The sign-in email for a seeded profile.
    pub fn email_for(profile: &Profile) -> String {
        match profile.id.as_str() {
            "u-teacher" => IdentityFixtures::teacher().email,
            "u-student" => IdentityFixtures::student().email,
            other => format!("{}@school.example", other.trim_start_matches("u-")),
        }
    }
}

// =============================================================================
// Store Fixtures
// =============================================================================

/// A test token configuration with the shared secret.
pub fn test_token_config() -> TokenConfig {
    TokenConfig::new(TEST_SECRET)
}

/// Builds a token manager over the shared test secret.
pub fn test_token_manager() -> TokenManager {
    match TokenManager::new(test_token_config()) {
        Ok(tokens) => tokens,
        Err(e) => panic!("test token manager: {}", e),
    }
}

/// Builds credential and profile stores seeded with the five-role cast.
pub fn seeded_stores() -> (Arc<MemoryCredentialStore>, Arc<MemoryProfileStore>) {
    let credentials = MemoryCredentialStore::new(test_token_manager());
    let profiles = MemoryProfileStore::new();

    for profile in ProfileFixtures::all() {
        let email = ProfileFixtures::email_for(&profile);
        credentials
            .register_with_id(&profile.id, &email, TEST_PASSWORD)
            .unwrap_or_else(|e| panic!("seeding {}: {}", email, e));
        profiles
            .insert(profile)
            .unwrap_or_else(|e| panic!("seeding profile: {}", e));
    }

    (Arc::new(credentials), Arc::new(profiles))
}

// =============================================================================
// Server Fixtures
// =============================================================================

/// A fully wired test server over seeded in-memory stores.
pub struct TestServer {
    /// The router, ready for `tower::ServiceExt::oneshot`.
    pub router: axum::Router,
    /// The seeded credential store.
    pub credentials: Arc<MemoryCredentialStore>,
    /// The seeded profile store.
    pub profiles: Arc<MemoryProfileStore>,
}

/// Builds a test server with the standard seeded cast.
pub fn test_server() -> TestServer {
    let (credentials, profiles) = seeded_stores();

    let server = ApiServerBuilder::new()
        .config(ApiConfig::new().with_token(test_token_config()))
        .credentials(credentials.clone() as Arc<dyn CredentialStore>)
        .profiles(profiles.clone() as Arc<dyn ProfileStore>)
        .build()
        .unwrap_or_else(|e| panic!("test server: {}", e));

    TestServer {
        router: server.router(),
        credentials,
        profiles,
    }
}
