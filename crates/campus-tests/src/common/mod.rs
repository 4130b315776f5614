// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Common Test Utilities
//!
//! Shared test utilities, fixtures, and mocks for the integration tests.
//!
//! ## Module Structure
//!
//! - `fixtures`: Pre-built profiles, identities, and server setups
//! - `mocks`: Mock store implementations with error injection

pub mod fixtures;
pub mod mocks;

// Re-exports for convenience
pub use fixtures::*;
pub use mocks::*;

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize test logging. Call this at the start of each test module.
pub fn init_test_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("warn,campus=debug")),
            )
            .with_test_writer()
            .init();
    });
}
