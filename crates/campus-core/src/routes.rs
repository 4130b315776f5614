// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role resolution: landing routes and path-prefix authorization.

use std::collections::HashMap;
use std::sync::Arc;

use crate::role::Role;

/// The login route, the redirect target for unauthenticated access.
pub const LOGIN_ROUTE: &str = "/login";

// =============================================================================
// RoutePolicy
// =============================================================================

/// The single role-to-route table.
///
/// This is the central component for deciding where a role lands after
/// sign-in and which path prefixes it may access. It is created once at
/// startup and shared; menus, guards, and handlers all consume this table
/// rather than declaring their own copies.
///
/// Authorization is a flat prefix match with two fixed rules:
///
/// - super admin is authorized for every path (explicit override)
/// - every other role is authorized only for paths under its prefix
///   (closed-world default-deny)
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    prefixes: Arc<HashMap<Role, &'static str>>,
}

impl RoutePolicy {
    /// Creates the policy with the standard five-role table.
    pub fn new() -> Self {
        let mut prefixes = HashMap::new();
        for role in Role::all() {
            prefixes.insert(*role, Self::standard_prefix(*role));
        }
        Self {
            prefixes: Arc::new(prefixes),
        }
    }

    fn standard_prefix(role: Role) -> &'static str {
        match role {
            Role::SuperAdmin => "/super-admin",
            Role::Admin => "/admin",
            Role::Teacher => "/teacher",
            Role::Parent => "/parent",
            Role::Student => "/student",
        }
    }

    /// Returns the landing route for a role.
    ///
    /// Total over the enum; every role has a distinct, stable dashboard
    /// path.
    pub fn landing_route(&self, role: Role) -> &'static str {
        match role {
            Role::SuperAdmin => "/super-admin/dashboard",
            Role::Admin => "/admin/dashboard",
            Role::Teacher => "/teacher/dashboard",
            Role::Parent => "/parent/dashboard",
            Role::Student => "/student/dashboard",
        }
    }

    /// Returns the landing route for a role string.
    ///
    /// Unrecognized input falls open to the admin landing path rather than
    /// erroring; a wrong dashboard is less surprising than a dead end.
    pub fn landing_route_for(&self, role: &str) -> &'static str {
        self.landing_route(Role::parse(role).unwrap_or(Role::Admin))
    }

    /// Returns `true` if the role may access the given path.
    pub fn is_authorized_for_path(&self, role: Role, path: &str) -> bool {
        if role == Role::SuperAdmin {
            return true;
        }
        match self.prefixes.get(&role) {
            Some(prefix) => path.starts_with(prefix),
            // A role with no prefix rule is unauthorized everywhere.
            None => false,
        }
    }

    /// Returns the path prefix for a role, if it has one.
    pub fn prefix_for(&self, role: Role) -> Option<&'static str> {
        self.prefixes.get(&role).copied()
    }
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_landing_routes_distinct() {
        let policy = RoutePolicy::new();
        let routes: HashSet<&str> = Role::all()
            .iter()
            .map(|r| policy.landing_route(*r))
            .collect();
        assert_eq!(routes.len(), Role::all().len());
    }

    #[test]
    fn test_landing_route_table() {
        let policy = RoutePolicy::new();
        assert_eq!(policy.landing_route(Role::SuperAdmin), "/super-admin/dashboard");
        assert_eq!(policy.landing_route(Role::Admin), "/admin/dashboard");
        assert_eq!(policy.landing_route(Role::Teacher), "/teacher/dashboard");
        assert_eq!(policy.landing_route(Role::Parent), "/parent/dashboard");
        assert_eq!(policy.landing_route(Role::Student), "/student/dashboard");
    }

    #[test]
    fn test_unknown_role_string_falls_open_to_admin() {
        let policy = RoutePolicy::new();
        assert_eq!(policy.landing_route_for("teacher"), "/teacher/dashboard");
        assert_eq!(policy.landing_route_for("nonsense"), "/admin/dashboard");
        assert_eq!(policy.landing_route_for(""), "/admin/dashboard");
    }

    #[test]
    fn test_prefix_authorization() {
        let policy = RoutePolicy::new();

        assert!(policy.is_authorized_for_path(Role::Teacher, "/teacher/dashboard"));
        assert!(policy.is_authorized_for_path(Role::Teacher, "/teacher/attendance"));
        assert!(!policy.is_authorized_for_path(Role::Teacher, "/admin/dashboard"));
        assert!(!policy.is_authorized_for_path(Role::Student, "/teacher/dashboard"));
    }

    #[test]
    fn test_super_admin_authorized_everywhere() {
        let policy = RoutePolicy::new();
        for role in Role::all() {
            let path = policy.landing_route(*role);
            assert!(policy.is_authorized_for_path(Role::SuperAdmin, path));
        }
        assert!(policy.is_authorized_for_path(Role::SuperAdmin, "/anywhere/else"));
    }
}
