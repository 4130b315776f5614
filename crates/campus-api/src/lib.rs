// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # campus-api
//!
//! HTTP API server for the CAMPUS school-management core.
//!
//! This crate exposes the session and guard machinery over HTTP: bearer
//! tokens resolve to per-request session snapshots, route guards enforce
//! the role/route table as middleware, and the attendance QR flow is a
//! pair of endpoints.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;

pub use config::{ApiConfig, CorsConfig};
pub use error::{ApiError, ApiResult};
pub use server::{ApiServer, ApiServerBuilder};
pub use state::AppState;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
