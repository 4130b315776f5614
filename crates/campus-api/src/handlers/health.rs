// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Health check handler.

use axum::{response::IntoResponse, Json};

use crate::response::HealthResponse;

/// GET /health
///
/// Liveness check. Always answers while the process is up.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse::healthy())
}
