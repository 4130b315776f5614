// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Route-guard decision functions.
//!
//! Both guards are pure functions over the current [`SessionState`]:
//! evaluating twice with the same snapshot always yields the same
//! decision. Enforcement (redirects, denied responses) lives with the
//! caller; the HTTP middleware in `campus-api` is one such caller.

use crate::role::Role;
use crate::routes::RoutePolicy;
use crate::session::SessionState;

// =============================================================================
// GuardDecision
// =============================================================================

/// The outcome of evaluating a route guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session state is still unknown; render a placeholder, never
    /// redirect.
    Loading,
    /// Render the requested page.
    Render,
    /// Redirect to the login route.
    RedirectToLogin,
    /// Redirect an authenticated user away from a public-only page to
    /// their role's landing route.
    RedirectToLanding(&'static str),
}

/// Evaluates the route guard for a page.
///
/// - while loading, hold: no redirect decisions are made on an unknown
///   session
/// - a protected page with no identity redirects to login
/// - a public-only page (login itself) with an identity redirects to the
///   landing route for the session's role; a pending profile falls open
///   to the admin landing, same as an unrecognized role
/// - everything else renders
pub fn decide(require_auth: bool, state: &SessionState, policy: &RoutePolicy) -> GuardDecision {
    if state.loading {
        return GuardDecision::Loading;
    }

    match (require_auth, state.is_signed_in()) {
        (true, false) => GuardDecision::RedirectToLogin,
        (false, true) => {
            let landing = policy.landing_route(state.role().unwrap_or(Role::Admin));
            GuardDecision::RedirectToLanding(landing)
        }
        _ => GuardDecision::Render,
    }
}

// =============================================================================
// DashboardDecision
// =============================================================================

/// The outcome of the page-local dashboard guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardDecision {
    /// The profile role matches the dashboard.
    Render,
    /// Wrong role for this dashboard: terminal denial, no redirect.
    AccessDenied,
}

/// Evaluates the stricter per-dashboard guard.
///
/// Layered on top of [`decide`]: the route guard has already admitted the
/// user past the prefix check; this compares the resolved profile role
/// against the dashboard's expected role. A missing profile is denied.
/// Super admins pass every dashboard.
pub fn decide_dashboard(expected: Role, state: &SessionState) -> DashboardDecision {
    match state.role() {
        Some(role) if role == expected || role == Role::SuperAdmin => DashboardDecision::Render,
        _ => DashboardDecision::AccessDenied,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Identity, Profile};

    fn teacher_state() -> SessionState {
        let identity = Identity::new("u1", "karim@school.example");
        let profile = Profile::new("u1", Role::Teacher, "Karim", "s1");
        SessionState::authenticated(identity, Some(profile))
    }

    #[test]
    fn test_loading_never_redirects() {
        let policy = RoutePolicy::new();
        let state = SessionState::unknown();

        assert_eq!(decide(true, &state, &policy), GuardDecision::Loading);
        assert_eq!(decide(false, &state, &policy), GuardDecision::Loading);
    }

    #[test]
    fn test_protected_page_without_identity_redirects_to_login() {
        let policy = RoutePolicy::new();
        let state = SessionState::anonymous();

        assert_eq!(decide(true, &state, &policy), GuardDecision::RedirectToLogin);
    }

    #[test]
    fn test_public_page_with_identity_redirects_to_landing() {
        let policy = RoutePolicy::new();
        let state = teacher_state();

        assert_eq!(
            decide(false, &state, &policy),
            GuardDecision::RedirectToLanding("/teacher/dashboard")
        );
    }

    #[test]
    fn test_pending_profile_lands_on_admin() {
        let policy = RoutePolicy::new();
        let identity = Identity::new("u1", "karim@school.example");
        let state = SessionState::authenticated(identity, None);

        assert_eq!(
            decide(false, &state, &policy),
            GuardDecision::RedirectToLanding("/admin/dashboard")
        );
    }

    #[test]
    fn test_render_cases() {
        let policy = RoutePolicy::new();

        assert_eq!(
            decide(true, &teacher_state(), &policy),
            GuardDecision::Render
        );
        assert_eq!(
            decide(false, &SessionState::anonymous(), &policy),
            GuardDecision::Render
        );
    }

    #[test]
    fn test_decide_is_idempotent() {
        let policy = RoutePolicy::new();
        let state = teacher_state();

        let first = decide(true, &state, &policy);
        for _ in 0..3 {
            assert_eq!(decide(true, &state, &policy), first);
        }
    }

    #[test]
    fn test_dashboard_guard() {
        let state = teacher_state();

        assert_eq!(
            decide_dashboard(Role::Teacher, &state),
            DashboardDecision::Render
        );
        assert_eq!(
            decide_dashboard(Role::Admin, &state),
            DashboardDecision::AccessDenied
        );
        assert_eq!(
            decide_dashboard(Role::Teacher, &SessionState::anonymous()),
            DashboardDecision::AccessDenied
        );
    }

    #[test]
    fn test_dashboard_guard_super_admin_passes() {
        let identity = Identity::new("root", "root@campus.example");
        let profile = Profile::new("root", Role::SuperAdmin, "Root", "all");
        let state = SessionState::authenticated(identity, Some(profile));

        assert_eq!(
            decide_dashboard(Role::Teacher, &state),
            DashboardDecision::Render
        );
    }
}
