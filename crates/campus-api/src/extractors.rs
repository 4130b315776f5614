// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Custom extractors for API handlers.

use axum::{extract::FromRequestParts, http::request::Parts};

use campus_core::SessionState;

use crate::error::ApiError;

// =============================================================================
// Session Extractor
// =============================================================================

/// Extractor for signed-in requests.
///
/// Pulls the session snapshot from the request extensions. Returns 401 if
/// the session is not signed in.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Session(state): Session) -> impl IntoResponse {
///     format!("Hello, {:?}", state.role())
/// }
/// ```
pub struct Session(pub SessionState);

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionState>()
            .cloned()
            .filter(|state| state.is_signed_in())
            .map(Session)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

// =============================================================================
// Optional Session Extractor
// =============================================================================

/// Extractor for optionally signed-in requests.
///
/// Returns `None` for anonymous or unresolved sessions.
pub struct OptionalSession(pub Option<SessionState>);

impl<S> FromRequestParts<S> for OptionalSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let state = parts
            .extensions
            .get::<SessionState>()
            .cloned()
            .filter(|state| state.is_signed_in());
        Ok(OptionalSession(state))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use campus_core::{Identity, Profile, Role};

    fn parts_with(state: Option<SessionState>) -> Parts {
        let mut req = Request::builder().uri("/test").body(()).unwrap();
        if let Some(state) = state {
            req.extensions_mut().insert(state);
        }
        req.into_parts().0
    }

    fn teacher_state() -> SessionState {
        let identity = Identity::new("u1", "karim@school.example");
        let profile = Profile::new("u1", Role::Teacher, "Karim", "s1");
        SessionState::authenticated(identity, Some(profile))
    }

    #[tokio::test]
    async fn test_session_requires_sign_in() {
        let mut parts = parts_with(Some(SessionState::anonymous()));
        assert!(Session::from_request_parts(&mut parts, &()).await.is_err());

        let mut parts = parts_with(None);
        assert!(Session::from_request_parts(&mut parts, &()).await.is_err());

        let mut parts = parts_with(Some(teacher_state()));
        let Session(state) = Session::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(state.role(), Some(Role::Teacher));
    }

    #[tokio::test]
    async fn test_optional_session() {
        let mut parts = parts_with(Some(SessionState::anonymous()));
        let OptionalSession(state) = OptionalSession::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(state.is_none());

        let mut parts = parts_with(Some(teacher_state()));
        let OptionalSession(state) = OptionalSession::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(state.is_some());
    }
}
