// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use campus_core::Profile;

// =============================================================================
// ApiResponse
// =============================================================================

/// Generic API response wrapper.
///
/// Provides consistent response structure across all endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation was successful.
    pub success: bool,
    /// Response data (if successful).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (if failed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Creates a successful response with data.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

// =============================================================================
// Typed Responses
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Version string.
    pub version: String,
}

impl HealthResponse {
    /// Creates a healthy response.
    pub fn healthy() -> Self {
        Self {
            status: "ok".to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

/// Authentication response.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Session token.
    pub token: String,
    /// Token type (always "Bearer").
    pub token_type: String,
    /// Expires in seconds.
    pub expires_in: i64,
    /// Landing route for the resolved role.
    pub landing_route: String,
    /// The resolved profile.
    pub profile: Profile,
}

impl AuthResponse {
    /// Creates a new auth response.
    pub fn new(token: String, expires_in: i64, landing_route: &str, profile: Profile) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
            landing_route: landing_route.to_string(),
            profile,
        }
    }
}

/// Attendance QR issue response.
#[derive(Debug, Serialize, Deserialize)]
pub struct QrCodeResponse {
    /// Base64-encoded image bytes.
    pub image: String,
    /// MIME type of the encoded image.
    pub mime: String,
    /// The JSON payload carried by the image.
    pub payload: String,
    /// Issue sequence number.
    pub sequence: u64,
}

/// Attendance scan response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScanResponse {
    /// Whether the scan was a recognized attendance payload.
    pub recognized: bool,
    /// The student that checked in, when recognized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    /// The student's school, when recognized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,
}

impl ScanResponse {
    /// Creates a response for a recognized attendance payload.
    pub fn recognized(student_id: String, school_id: String) -> Self {
        Self {
            recognized: true,
            student_id: Some(student_id),
            school_id: Some(school_id),
        }
    }

    /// Creates the no-op response for an unrecognized scan.
    pub fn unrecognized() -> Self {
        Self {
            recognized: false,
            student_id: None,
            school_id: None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
