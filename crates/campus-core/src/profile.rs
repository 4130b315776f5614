// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Identities and profiles.

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;
use crate::role::Role;

/// School id sentinel carried by super-admin profiles.
///
/// Kept as a plain string rather than a type-level sentinel; the profile
/// store treats it the same as any other school id.
pub const ALL_SCHOOLS: &str = "all";

// =============================================================================
// Identity
// =============================================================================

/// An authenticated-session handle issued by the credential store.
///
/// The identity is owned by the credential store; everything else holds a
/// non-owning copy. It carries no role information, only who signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable identity id.
    pub id: String,
    /// Sign-in email address.
    pub email: String,
    /// Whether the email address has been verified.
    pub email_verified: bool,
}

impl Identity {
    /// Creates a new identity.
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            email_verified: false,
        }
    }

    /// Marks the email as verified.
    pub fn verified(mut self) -> Self {
        self.email_verified = true;
        self
    }

    /// Returns the local part of the email address.
    ///
    /// Used to derive a display name when no profile exists.
    pub fn email_local_part(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

// =============================================================================
// Profile
// =============================================================================

/// One profile record per identity.
///
/// Profiles are provisioned out of band and never mutated by this core;
/// role changes are an administrative operation on the profile store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Identity id this profile belongs to (1:1).
    pub id: String,
    /// The user's role.
    pub role: Role,
    /// Display name.
    pub name: String,
    /// School affiliation; [`ALL_SCHOOLS`] for super admins.
    pub school_id: String,
    /// Class assignment, when the role has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    /// Linked student id (parents and students).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    /// Set when this profile was synthesized because the real one could
    /// not be fetched. Degraded profiles are distinguishable so callers
    /// can warn the user instead of trusting the fallback silently.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
}

impl Profile {
    /// Creates a new profile.
    pub fn new(
        id: impl Into<String>,
        role: Role,
        name: impl Into<String>,
        school_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            name: name.into(),
            school_id: school_id.into(),
            class_id: None,
            student_id: None,
            degraded: false,
        }
    }

    /// Sets the class id.
    pub fn with_class(mut self, class_id: impl Into<String>) -> Self {
        self.class_id = Some(class_id.into());
        self
    }

    /// Sets the linked student id.
    pub fn with_student(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    /// Synthesizes the degraded fallback profile for an identity.
    ///
    /// Used when the profile store has no record for the identity or the
    /// fetch failed. The session controller never blocks navigation on a
    /// missing profile, so this stands in with the admin role and a name
    /// derived from the email local part.
    pub fn degraded_fallback(identity: &Identity) -> Self {
        Self {
            id: identity.id.clone(),
            role: Role::Admin,
            name: identity.email_local_part().to_string(),
            school_id: String::new(),
            class_id: None,
            student_id: None,
            degraded: true,
        }
    }

    /// Validates the profile invariants.
    ///
    /// Every school-scoped role must carry a non-empty school id. Degraded
    /// fallback profiles are exempt; they exist precisely because no real
    /// record was available.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.degraded {
            return Ok(());
        }
        if self.role.is_school_scoped() && self.school_id.is_empty() {
            return Err(ProfileError::invalid(format!(
                "profile {} has role {} but no school id",
                self.id, self.role
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_local_part() {
        let identity = Identity::new("u1", "karim@school.example");
        assert_eq!(identity.email_local_part(), "karim");

        let odd = Identity::new("u2", "no-at-sign");
        assert_eq!(odd.email_local_part(), "no-at-sign");
    }

    #[test]
    fn test_degraded_fallback() {
        let identity = Identity::new("u1", "karim@school.example");
        let profile = Profile::degraded_fallback(&identity);

        assert_eq!(profile.id, "u1");
        assert_eq!(profile.role, Role::Admin);
        assert_eq!(profile.name, "karim");
        assert!(profile.degraded);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_school_id_invariant() {
        let ok = Profile::new("u1", Role::Teacher, "Karim", "s1");
        assert!(ok.validate().is_ok());

        let missing = Profile::new("u2", Role::Teacher, "Karim", "");
        assert!(missing.validate().is_err());

        let super_admin = Profile::new("u3", Role::SuperAdmin, "Root", ALL_SCHOOLS);
        assert!(super_admin.validate().is_ok());
    }

    #[test]
    fn test_degraded_flag_not_serialized_when_false() {
        let profile = Profile::new("u1", Role::Teacher, "Karim", "s1");
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("degraded"));

        let identity = Identity::new("u1", "k@s.example");
        let fallback = Profile::degraded_fallback(&identity);
        let json = serde_json::to_string(&fallback).unwrap();
        assert!(json.contains("\"degraded\":true"));
    }
}
