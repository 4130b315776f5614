// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API handlers for all endpoints.
//!
//! This module contains the handler implementations for all API endpoints:
//!
//! - [`health`]: Health check endpoint
//! - [`auth`]: Sign-in, sign-out, and current-session endpoints
//! - [`attendance`]: Attendance QR issue and scan endpoints

mod attendance;
mod auth;
mod health;

pub use attendance::*;
pub use auth::*;
pub use health::*;
