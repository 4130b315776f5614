// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Attendance QR handlers.

use axum::{extract::State, response::IntoResponse, Json};
use base64::Engine;
use serde::Deserialize;

use campus_core::{qr, Role};

use crate::error::{ApiError, ApiResult};
use crate::extractors::Session;
use crate::response::{ApiResponse, QrCodeResponse, ScanResponse};
use crate::state::AppState;

// =============================================================================
// Issue QR
// =============================================================================

/// QR issue request body.
#[derive(Debug, Deserialize)]
pub struct QrIssueRequest {
    /// The student the code is for.
    pub student_id: String,
    /// The student's school.
    pub school_id: String,
}

/// POST /api/v1/attendance/qr
///
/// Issues an attendance QR code for a student. Restricted to staff roles;
/// parents and students cannot mint codes.
pub async fn issue_qr(
    State(state): State<AppState>,
    Session(session): Session,
    Json(request): Json<QrIssueRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.student_id.is_empty() || request.school_id.is_empty() {
        return Err(ApiError::bad_request("student_id and school_id are required"));
    }

    let role = session
        .role()
        .ok_or_else(|| ApiError::unauthorized("Session has no resolved profile"))?;
    if !matches!(role, Role::SuperAdmin | Role::Admin | Role::Teacher) {
        return Err(ApiError::forbidden("Only staff can issue attendance codes"));
    }

    let sequence = state.next_qr_sequence();
    let (image, payload) = qr::generate(
        state.qr_codec.as_ref(),
        &request.student_id,
        &request.school_id,
        sequence,
    );

    tracing::info!(
        student_id = %request.student_id,
        school_id = %request.school_id,
        sequence,
        "Attendance QR issued"
    );

    Ok(Json(ApiResponse::success(QrCodeResponse {
        image: base64::engine::general_purpose::STANDARD.encode(&image.data),
        mime: image.mime.to_string(),
        payload,
        sequence,
    })))
}

// =============================================================================
// Scan
// =============================================================================

/// Scan request body.
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    /// The raw text decoded from a scanned code.
    pub raw: String,
}

/// POST /api/v1/attendance/scan
///
/// Records a scanned code. Unrecognized payloads are a no-op answered
/// with 200, never an error; scanners retry constantly and a malformed
/// frame is normal.
pub async fn scan(
    State(_state): State<AppState>,
    Session(_session): Session,
    Json(request): Json<ScanRequest>,
) -> ApiResult<impl IntoResponse> {
    let response = match qr::parse(&request.raw) {
        qr::QrScan::Attendance(payload) => {
            tracing::info!(
                student_id = %payload.student_id,
                school_id = %payload.school_id,
                sequence = payload.sequence,
                "Attendance check-in"
            );
            ScanResponse::recognized(payload.student_id, payload.school_id)
        }
        qr::QrScan::Unknown => {
            tracing::debug!("Unrecognized scan ignored");
            ScanResponse::unrecognized()
        }
    };

    Ok(Json(ApiResponse::success(response)))
}
