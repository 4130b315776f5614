// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User roles.

use serde::{Deserialize, Serialize};

/// The closed set of user roles.
///
/// A role determines the landing route after sign-in and which path
/// prefixes a user may access. There is no inheritance between roles;
/// super admins are simply allowed everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// School-spanning administrator with access to every path.
    SuperAdmin,
    /// Administrator of a single school.
    Admin,
    /// Teaching staff.
    Teacher,
    /// Parent or guardian of enrolled students.
    Parent,
    /// Enrolled student.
    Student,
}

impl Role {
    /// Returns the role name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Parent => "parent",
            Role::Student => "student",
        }
    }

    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "super_admin" | "superadmin" | "super-admin" => Some(Role::SuperAdmin),
            "admin" | "administrator" => Some(Role::Admin),
            "teacher" => Some(Role::Teacher),
            "parent" | "guardian" => Some(Role::Parent),
            "student" => Some(Role::Student),
            _ => None,
        }
    }

    /// Returns all roles.
    pub fn all() -> &'static [Role] {
        &[
            Role::SuperAdmin,
            Role::Admin,
            Role::Teacher,
            Role::Parent,
            Role::Student,
        ]
    }

    /// Returns `true` if this role is scoped to a single school.
    ///
    /// Every role except super admin must carry a non-empty school id on
    /// its profile.
    pub fn is_school_scoped(&self) -> bool {
        !matches!(self, Role::SuperAdmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in Role::all() {
            assert_eq!(Role::parse(role.as_str()), Some(*role));
        }
    }

    #[test]
    fn test_role_parse_aliases() {
        assert_eq!(Role::parse("superadmin"), Some(Role::SuperAdmin));
        assert_eq!(Role::parse("super-admin"), Some(Role::SuperAdmin));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("guardian"), Some(Role::Parent));
        assert_eq!(Role::parse("janitor"), None);
    }

    #[test]
    fn test_school_scoped() {
        assert!(!Role::SuperAdmin.is_school_scoped());
        assert!(Role::Admin.is_school_scoped());
        assert!(Role::Student.is_school_scoped());
    }

    #[test]
    fn test_role_serde_names() {
        let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(json, "\"super_admin\"");
        let back: Role = serde_json::from_str("\"teacher\"").unwrap();
        assert_eq!(back, Role::Teacher);
    }
}
