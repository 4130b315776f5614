// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use campus_core::{QrImageCodec, RoutePolicy, TextQrCodec};
use campus_session::{CredentialStore, ProfileStore, TokenManager};

use crate::config::ApiConfig;
use crate::error::ApiResult;

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers.
///
/// The central state container passed to handlers via Axum's state
/// extraction mechanism.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Credential store for sign-in.
    pub credentials: Arc<dyn CredentialStore>,
    /// Profile store for role resolution.
    pub profiles: Arc<dyn ProfileStore>,
    /// Token manager for session tokens.
    pub tokens: Arc<TokenManager>,
    /// Role-to-route table.
    pub routes: RoutePolicy,
    /// QR image renderer.
    pub qr_codec: Arc<dyn QrImageCodec>,
    /// Issue counter for attendance QR codes.
    qr_sequence: Arc<AtomicU64>,
}

impl AppState {
    /// Creates a new app state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the token manager.
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Returns the role-to-route table.
    pub fn routes(&self) -> &RoutePolicy {
        &self.routes
    }

    /// Returns the next QR issue sequence number.
    pub fn next_qr_sequence(&self) -> u64 {
        self.qr_sequence.fetch_add(1, Ordering::Relaxed) + 1
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing AppState.
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    credentials: Option<Arc<dyn CredentialStore>>,
    profiles: Option<Arc<dyn ProfileStore>>,
    tokens: Option<Arc<TokenManager>>,
    routes: Option<RoutePolicy>,
    qr_codec: Option<Arc<dyn QrImageCodec>>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            credentials: None,
            profiles: None,
            tokens: None,
            routes: None,
            qr_codec: None,
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the credential store.
    pub fn credentials(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credentials = Some(store);
        self
    }

    /// Sets the profile store.
    pub fn profiles(mut self, store: Arc<dyn ProfileStore>) -> Self {
        self.profiles = Some(store);
        self
    }

    /// Sets the token manager.
    pub fn tokens(mut self, tokens: Arc<TokenManager>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Sets the role-to-route table.
    pub fn routes(mut self, routes: RoutePolicy) -> Self {
        self.routes = Some(routes);
        self
    }

    /// Sets the QR image renderer.
    pub fn qr_codec(mut self, codec: Arc<dyn QrImageCodec>) -> Self {
        self.qr_codec = Some(codec);
        self
    }

    /// Builds the AppState.
    ///
    /// Credential and profile stores are required. The token manager is
    /// created from the config when not supplied; the route table and QR
    /// codec fall back to the standard table and the text codec.
    pub fn build(self) -> ApiResult<AppState> {
        let config = self.config.unwrap_or_default();

        let credentials = self
            .credentials
            .ok_or_else(|| crate::error::ApiError::internal("Credential store is required"))?;
        let profiles = self
            .profiles
            .ok_or_else(|| crate::error::ApiError::internal("Profile store is required"))?;

        let tokens = match self.tokens {
            Some(tokens) => tokens,
            None => Arc::new(TokenManager::new(config.token.clone())?),
        };

        let routes = self.routes.unwrap_or_default();
        let qr_codec = self
            .qr_codec
            .unwrap_or_else(|| Arc::new(TextQrCodec) as Arc<dyn QrImageCodec>);

        Ok(AppState {
            config: Arc::new(config),
            credentials,
            profiles,
            tokens,
            routes,
            qr_codec,
            qr_sequence: Arc::new(AtomicU64::new(0)),
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// FromRef implementations for extracting parts of state
// =============================================================================

impl axum::extract::FromRef<AppState> for Arc<TokenManager> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

impl axum::extract::FromRef<AppState> for RoutePolicy {
    fn from_ref(state: &AppState) -> Self {
        state.routes.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<ApiConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use campus_session::{MemoryCredentialStore, MemoryProfileStore, TokenConfig};

    fn test_token_manager() -> Arc<TokenManager> {
        Arc::new(
            TokenManager::new(TokenConfig::new("test-secret-key-that-is-long-enough!")).unwrap(),
        )
    }

    #[test]
    fn test_app_state_builder() {
        let tokens = test_token_manager();
        let credentials = Arc::new(MemoryCredentialStore::new(tokens.as_ref().clone()));

        let state = AppState::builder()
            .credentials(credentials)
            .profiles(Arc::new(MemoryProfileStore::new()))
            .tokens(tokens)
            .build()
            .unwrap();

        assert_eq!(state.config.port, 8080);
    }

    #[test]
    fn test_missing_stores_rejected() {
        let result = AppState::builder().build();
        assert!(result.is_err());
    }

    #[test]
    fn test_qr_sequence_increments() {
        let tokens = test_token_manager();
        let credentials = Arc::new(MemoryCredentialStore::new(tokens.as_ref().clone()));

        let state = AppState::builder()
            .credentials(credentials)
            .profiles(Arc::new(MemoryProfileStore::new()))
            .tokens(tokens)
            .build()
            .unwrap();

        assert_eq!(state.next_qr_sequence(), 1);
        assert_eq!(state.next_qr_sequence(), 2);
    }
}
