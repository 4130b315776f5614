// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # campus-core
//!
//! Domain types and pure logic for the CAMPUS school-management core:
//!
//! - [`Role`]: the closed set of user roles
//! - [`Profile`] / [`Identity`]: per-user records and credential handles
//! - [`SessionState`]: the snapshot published by the session controller
//! - [`RoutePolicy`]: landing routes and path-prefix authorization
//! - [`guard`]: route-guard decision functions
//! - [`qr`]: attendance QR payload codec
//! - [`error`]: unified error hierarchy

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod guard;
pub mod profile;
pub mod qr;
pub mod role;
pub mod routes;
pub mod session;

pub use error::{AuthError, CampusError, ProfileError};
pub use guard::{DashboardDecision, GuardDecision};
pub use profile::{Identity, Profile};
pub use qr::{AttendancePayload, QrImage, QrImageCodec, QrScan, TextQrCodec};
pub use role::Role;
pub use routes::{RoutePolicy, LOGIN_ROUTE};
pub use session::{SessionPhase, SessionState};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
