// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Middleware implementations for the API server.
//!
//! This module provides the two-stage guard stack:
//!
//! - [`SessionLayer`]: resolves the bearer token to a session snapshot
//! - [`RouteGuardLayer`]: enforces the route guard over that snapshot
//! - [`DashboardGuardLayer`]: per-dashboard role check

mod guard;
mod session;

pub use guard::{DashboardGuardLayer, RouteGuardLayer};
pub use session::{SessionLayer, SessionMiddleware};
