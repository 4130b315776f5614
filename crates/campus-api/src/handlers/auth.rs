// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication handlers.

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use campus_core::{Profile, SessionPhase};
use campus_session::resolve_profile;

use crate::error::{ApiError, ApiResult};
use crate::extractors::Session;
use crate::response::AuthResponse;
use crate::state::AppState;

// =============================================================================
// Login
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Sign-in email.
    pub email: String,
    /// Password.
    pub password: String,
}

/// POST /api/v1/auth/login
///
/// Authenticates a user, resolves their profile, and returns a session
/// token with the landing route for the resolved role.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.email.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let session = state
        .credentials
        .authenticate(&request.email, &request.password)
        .await?;

    // One fetch per sign-in; failures collapse into the degraded profile.
    let profile = resolve_profile(state.profiles.as_ref(), &session.identity).await;
    let landing = state.routes.landing_route(profile.role);

    tracing::info!(
        identity_id = %session.identity.id,
        role = %profile.role,
        landing,
        "User logged in"
    );

    Ok(Json(AuthResponse::new(
        session.token,
        session.expires_in,
        landing,
        profile,
    )))
}

// =============================================================================
// Logout
// =============================================================================

/// POST /api/v1/auth/logout
///
/// Signs out the current session.
pub async fn logout(
    State(state): State<AppState>,
    Session(session): Session,
) -> ApiResult<impl IntoResponse> {
    state.credentials.sign_out().await;

    if let Some(identity) = &session.identity {
        tracing::info!(identity_id = %identity.id, "User logged out");
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Logged out successfully"
    })))
}

// =============================================================================
// Current Session
// =============================================================================

/// Current session response.
#[derive(Debug, Serialize)]
pub struct CurrentSessionResponse {
    /// Session phase.
    pub phase: SessionPhase,
    /// The resolved profile.
    pub profile: Profile,
    /// Landing route for the profile's role.
    pub landing_route: String,
}

/// GET /api/v1/auth/me
///
/// Returns the resolved session for the current bearer token.
pub async fn current_session(
    State(state): State<AppState>,
    Session(session): Session,
) -> ApiResult<impl IntoResponse> {
    let profile = session
        .profile
        .clone()
        .ok_or_else(|| ApiError::unauthorized("Session has no resolved profile"))?;

    let landing_route = state.routes.landing_route(profile.role).to_string();

    Ok(Json(CurrentSessionResponse {
        phase: session.phase(),
        profile,
        landing_route,
    }))
}
