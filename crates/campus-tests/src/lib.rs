// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # CAMPUS Integration Tests
//!
//! This crate provides integration tests for the CAMPUS role-based
//! access control and session core. It includes test utilities,
//! fixtures, and mocks shared across the test suites.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: Pre-built profiles, identities, and server setups
//!   - `mocks`: Mock store implementations with error injection
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test -p campus-tests
//!
//! # Run specific test suite
//! cargo test -p campus-tests --test integration_core
//! cargo test -p campus-tests --test integration_session
//! cargo test -p campus-tests --test integration_api
//! ```
//!
//! ## Test Categories
//!
//! ### Core Tests (`integration_core.rs`)
//! - Role parsing and landing routes
//! - Path-prefix authorization
//! - Route and dashboard guard decisions
//! - Attendance QR payload round trips
//!
//! ### Session Tests (`integration_session.rs`)
//! - Controller state machine over scripted identity events
//! - One profile fetch per identity event
//! - Superseded-fetch discard
//! - Degraded profile fallback
//!
//! ### API Tests (`integration_api.rs`)
//! - Login flow end to end through the router
//! - Guard redirects and denials at the HTTP layer
//! - Attendance QR issue and scan endpoints

pub mod common;
