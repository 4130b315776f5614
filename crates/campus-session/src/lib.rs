// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # campus-session
//!
//! The session controller state machine and the collaborator contracts it
//! consumes:
//!
//! - [`CredentialStore`] / [`ProfileStore`]: managed-provider contracts
//! - [`SessionController`]: identity events in, session snapshots out
//! - [`TokenManager`]: signed session handles for the in-memory store
//! - [`memory`]: in-memory reference implementations of both stores

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod controller;
pub mod memory;
pub mod store;
pub mod token;

pub use controller::{resolve_profile, SessionController, SessionHandle};
pub use memory::{MemoryCredentialStore, MemoryProfileStore};
pub use store::{AuthSession, CredentialStore, ProfileStore};
pub use token::{SessionClaims, TokenConfig, TokenError, TokenManager};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
