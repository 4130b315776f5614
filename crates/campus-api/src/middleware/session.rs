// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session resolution middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
};
use tower::{Layer, Service};

use campus_core::SessionState;
use campus_session::{resolve_profile, ProfileStore, TokenManager};

// =============================================================================
// SessionLayer
// =============================================================================

/// Layer that resolves the request's session snapshot.
///
/// Every request gets a [`SessionState`] in its extensions: a valid bearer
/// token resolves to an authenticated snapshot with its profile, anything
/// else resolves to the anonymous snapshot. This layer never rejects a
/// request; enforcement belongs to the guard layers downstream.
#[derive(Clone)]
pub struct SessionLayer {
    tokens: Arc<TokenManager>,
    profiles: Arc<dyn ProfileStore>,
}

impl SessionLayer {
    /// Creates a new session layer.
    pub fn new(tokens: Arc<TokenManager>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { tokens, profiles }
    }
}

impl<S> Layer<S> for SessionLayer {
    type Service = SessionMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionMiddleware {
            inner,
            tokens: self.tokens.clone(),
            profiles: self.profiles.clone(),
        }
    }
}

// =============================================================================
// SessionMiddleware
// =============================================================================

/// Middleware for session resolution.
#[derive(Clone)]
pub struct SessionMiddleware<S> {
    inner: S,
    tokens: Arc<TokenManager>,
    profiles: Arc<dyn ProfileStore>,
}

impl<S> Service<Request<Body>> for SessionMiddleware<S>
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

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let tokens = self.tokens.clone();
        let profiles = self.profiles.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let state = match extract_bearer_token(&req) {
                Some(token) => match tokens.validate(&token) {
                    Ok(claims) => {
                        let identity = claims.identity();
                        let profile = resolve_profile(profiles.as_ref(), &identity).await;
                        SessionState::authenticated(identity, Some(profile))
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "Token validation failed");
                        SessionState::anonymous()
                    }
                },
                None => SessionState::anonymous(),
            };

            req.extensions_mut().insert(state);
            inner.call(req).await
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token<B>(req: &Request<B>) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer ").map(|s| s.to_string()))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::{Identity, Profile, Role, SessionPhase};
    use campus_session::{MemoryProfileStore, TokenConfig};
    use tower::ServiceExt;

    fn test_tokens() -> Arc<TokenManager> {
        Arc::new(
            TokenManager::new(TokenConfig::new("test-secret-key-that-is-long-enough!")).unwrap(),
        )
    }

    fn capture_service() -> impl Service<
        Request<Body>,
        Response = Response,
        Error = std::convert::Infallible,
        Future = impl Future<Output = Result<Response, std::convert::Infallible>> + Send,
    > + Clone
           + Send {
        tower::service_fn(|req: Request<Body>| async move {
            let state = req
                .extensions()
                .get::<SessionState>()
                .cloned()
                .unwrap_or_default();
            let body = serde_json::to_string(&state).unwrap();
            Ok::<_, std::convert::Infallible>(Response::new(Body::from(body)))
        })
    }

    async fn session_from(response: Response) -> SessionState {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_extract_bearer_token() {
        use axum::http::HeaderValue;

        let mut req = Request::builder().uri("/test").body(Body::empty()).unwrap();
        assert!(extract_bearer_token(&req).is_none());

        req.headers_mut()
            .insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(extract_bearer_token(&req).is_none());

        req.headers_mut().insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer mytoken123"),
        );
        assert_eq!(extract_bearer_token(&req), Some("mytoken123".to_string()));
    }

    #[tokio::test]
    async fn test_no_token_resolves_anonymous() {
        let layer = SessionLayer::new(test_tokens(), Arc::new(MemoryProfileStore::new()));
        let service = layer.layer(capture_service());

        let req = Request::builder().uri("/test").body(Body::empty()).unwrap();
        let response = service.oneshot(req).await.unwrap();

        let state = session_from(response).await;
        assert_eq!(state.phase(), SessionPhase::Anonymous);
    }

    #[tokio::test]
    async fn test_valid_token_resolves_profile() {
        let tokens = test_tokens();
        let profiles = Arc::new(MemoryProfileStore::new());
        profiles
            .insert(Profile::new("u1", Role::Teacher, "Karim", "s1"))
            .unwrap();

        let identity = Identity::new("u1", "karim@school.example").verified();
        let token = tokens.create_session_token(&identity).unwrap();

        let layer = SessionLayer::new(tokens, profiles);
        let service = layer.layer(capture_service());

        let req = Request::builder()
            .uri("/test")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = service.oneshot(req).await.unwrap();

        let state = session_from(response).await;
        assert_eq!(state.phase(), SessionPhase::Authenticated);
        assert_eq!(state.role(), Some(Role::Teacher));
    }

    #[tokio::test]
    async fn test_garbage_token_resolves_anonymous() {
        let layer = SessionLayer::new(test_tokens(), Arc::new(MemoryProfileStore::new()));
        let service = layer.layer(capture_service());

        let req = Request::builder()
            .uri("/test")
            .header(header::AUTHORIZATION, "Bearer not.a.token")
            .body(Body::empty())
            .unwrap();
        let response = service.oneshot(req).await.unwrap();

        let state = session_from(response).await;
        assert_eq!(state.phase(), SessionPhase::Anonymous);
    }

    #[tokio::test]
    async fn test_missing_profile_degrades_not_rejects() {
        let tokens = test_tokens();
        let identity = Identity::new("u1", "karim@school.example");
        let token = tokens.create_session_token(&identity).unwrap();

        let layer = SessionLayer::new(tokens, Arc::new(MemoryProfileStore::new()));
        let service = layer.layer(capture_service());

        let req = Request::builder()
            .uri("/test")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = service.oneshot(req).await.unwrap();

        let state = session_from(response).await;
        assert_eq!(state.phase(), SessionPhase::Authenticated);
        assert!(state.profile.unwrap().degraded);
    }
}
