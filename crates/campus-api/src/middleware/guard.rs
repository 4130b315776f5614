// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Route guard middleware.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use tower::{Layer, Service};

use campus_core::{guard, GuardDecision, Role, RoutePolicy, SessionState};

use crate::error::ApiError;

// =============================================================================
// RouteGuardLayer
// =============================================================================

/// Layer enforcing the route guard for a group of routes.
///
/// Wraps [`guard::decide`] over the session snapshot left in the request
/// extensions by the session layer:
///
/// - `Loading` answers with a placeholder body, never a redirect
/// - `RedirectToLogin` / `RedirectToLanding` answer 303 with a Location
/// - `Render` additionally runs the prefix check for protected routes
///   before passing the request through
#[derive(Clone)]
pub struct RouteGuardLayer {
    require_auth: bool,
    policy: RoutePolicy,
}

impl RouteGuardLayer {
    /// Creates a guard for routes that require a signed-in session.
    pub fn protected(policy: RoutePolicy) -> Self {
        Self {
            require_auth: true,
            policy,
        }
    }

    /// Creates a guard for public-only routes such as the login page.
    pub fn public_only(policy: RoutePolicy) -> Self {
        Self {
            require_auth: false,
            policy,
        }
    }
}

impl<S> Layer<S> for RouteGuardLayer {
    type Service = RouteGuardMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RouteGuardMiddleware {
            inner,
            require_auth: self.require_auth,
            policy: self.policy.clone(),
        }
    }
}

/// Middleware for route guard enforcement.
#[derive(Clone)]
pub struct RouteGuardMiddleware<S> {
    inner: S,
    require_auth: bool,
    policy: RoutePolicy,
}

impl<S> Service<Request<Body>> for RouteGuardMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let require_auth = self.require_auth;
        let policy = self.policy.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            // Absent snapshot means the session layer has not run; hold
            // rather than render or redirect.
            let state = req
                .extensions()
                .get::<SessionState>()
                .cloned()
                .unwrap_or_else(SessionState::unknown);

            match guard::decide(require_auth, &state, &policy) {
                GuardDecision::Loading => Ok(loading_response()),
                GuardDecision::RedirectToLogin => {
                    tracing::debug!(path = %req.uri().path(), "unauthenticated, redirecting to login");
                    Ok(Redirect::to(campus_core::LOGIN_ROUTE).into_response())
                }
                GuardDecision::RedirectToLanding(landing) => {
                    tracing::debug!(path = %req.uri().path(), landing, "already signed in, redirecting");
                    Ok(Redirect::to(landing).into_response())
                }
                GuardDecision::Render => {
                    if require_auth {
                        let path = req.uri().path();
                        let authorized = state
                            .role()
                            .map(|role| policy.is_authorized_for_path(role, path))
                            .unwrap_or(false);

                        if !authorized {
                            tracing::warn!(
                                path = %path,
                                role = ?state.role(),
                                "Path access denied"
                            );
                            return Ok(
                                ApiError::forbidden("Not authorized for this path").into_response()
                            );
                        }
                    }
                    inner.call(req).await
                }
            }
        })
    }
}

/// Placeholder answer for an unknown session; no page, no redirect.
fn loading_response() -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "loading" })),
    )
        .into_response()
}

// =============================================================================
// DashboardGuardLayer
// =============================================================================

/// Layer enforcing the stricter per-dashboard role check.
///
/// Applied to a single dashboard route on top of [`RouteGuardLayer`]. A
/// role mismatch is a terminal denial, not a redirect.
#[derive(Clone)]
pub struct DashboardGuardLayer {
    expected: Role,
}

impl DashboardGuardLayer {
    /// Creates a guard for the given dashboard role.
    pub fn for_role(expected: Role) -> Self {
        Self { expected }
    }
}

impl<S> Layer<S> for DashboardGuardLayer {
    type Service = DashboardGuardMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        DashboardGuardMiddleware {
            inner,
            expected: self.expected,
        }
    }
}

/// Middleware for the per-dashboard role check.
#[derive(Clone)]
pub struct DashboardGuardMiddleware<S> {
    inner: S,
    expected: Role,
}

impl<S> Service<Request<Body>> for DashboardGuardMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let expected = self.expected;
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let state = req
                .extensions()
                .get::<SessionState>()
                .cloned()
                .unwrap_or_else(SessionState::unknown);

            match guard::decide_dashboard(expected, &state) {
                guard::DashboardDecision::Render => inner.call(req).await,
                guard::DashboardDecision::AccessDenied => {
                    tracing::warn!(
                        expected = %expected,
                        actual = ?state.role(),
                        "Dashboard access denied"
                    );
                    Ok(ApiError::forbidden("Access denied").into_response())
                }
            }
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;
    use campus_core::{Identity, Profile};
    use tower::ServiceExt;

    fn ok_service() -> impl Service<
        Request<Body>,
        Response = Response,
        Error = std::convert::Infallible,
        Future = impl Future<Output = Result<Response, std::convert::Infallible>> + Send,
    > + Clone
           + Send {
        tower::service_fn(|_req: Request<Body>| async {
            Ok::<_, std::convert::Infallible>(Response::new(Body::empty()))
        })
    }

    fn request_with(path: &str, state: SessionState) -> Request<Body> {
        let mut req = Request::builder().uri(path).body(Body::empty()).unwrap();
        req.extensions_mut().insert(state);
        req
    }

    fn teacher_state() -> SessionState {
        let identity = Identity::new("u1", "karim@school.example");
        let profile = Profile::new("u1", Role::Teacher, "Karim", "s1");
        SessionState::authenticated(identity, Some(profile))
    }

    #[tokio::test]
    async fn test_protected_route_redirects_anonymous_to_login() {
        let service = RouteGuardLayer::protected(RoutePolicy::new()).layer(ok_service());

        let req = request_with("/teacher/dashboard", SessionState::anonymous());
        let response = service.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            campus_core::LOGIN_ROUTE
        );
    }

    #[tokio::test]
    async fn test_protected_route_renders_for_matching_prefix() {
        let service = RouteGuardLayer::protected(RoutePolicy::new()).layer(ok_service());

        let req = request_with("/teacher/dashboard", teacher_state());
        let response = service.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_route_denies_foreign_prefix() {
        let service = RouteGuardLayer::protected(RoutePolicy::new()).layer(ok_service());

        let req = request_with("/admin/dashboard", teacher_state());
        let response = service.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_public_only_route_redirects_signed_in_to_landing() {
        let service = RouteGuardLayer::public_only(RoutePolicy::new()).layer(ok_service());

        let req = request_with("/login", teacher_state());
        let response = service.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/teacher/dashboard"
        );
    }

    #[tokio::test]
    async fn test_missing_snapshot_holds() {
        let service = RouteGuardLayer::protected(RoutePolicy::new()).layer(ok_service());

        let req = Request::builder()
            .uri("/teacher/dashboard")
            .body(Body::empty())
            .unwrap();
        let response = service.oneshot(req).await.unwrap();

        // Placeholder answer, no Location header.
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::LOCATION).is_none());
    }

    #[tokio::test]
    async fn test_dashboard_guard_denies_wrong_role() {
        let service = DashboardGuardLayer::for_role(Role::Admin).layer(ok_service());

        let req = request_with("/admin/dashboard", teacher_state());
        let response = service.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_dashboard_guard_passes_super_admin() {
        let service = DashboardGuardLayer::for_role(Role::Teacher).layer(ok_service());

        let identity = Identity::new("root", "root@campus.example");
        let profile = Profile::new("root", Role::SuperAdmin, "Root", "all");
        let req = request_with(
            "/teacher/dashboard",
            SessionState::authenticated(identity, Some(profile)),
        );
        let response = service.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
