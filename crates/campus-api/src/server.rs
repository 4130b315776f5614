// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server implementation.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, Method},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use campus_core::{QrImageCodec, Role, RoutePolicy, LOGIN_ROUTE};
use campus_session::{CredentialStore, ProfileStore, TokenManager};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::extractors::Session;
use crate::handlers;
use crate::middleware::{DashboardGuardLayer, RouteGuardLayer, SessionLayer};
use crate::state::AppState;

// =============================================================================
// ApiServer
// =============================================================================

/// The API server.
///
/// This is the main entry point for creating and running the HTTP server.
pub struct ApiServer {
    state: AppState,
    config: Arc<ApiConfig>,
}

impl ApiServer {
    /// Creates a new API server with the given state.
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        Self { state, config }
    }

    /// Creates the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let policy = self.state.routes.clone();

        let cors = create_cors_layer(&self.config);
        let session = SessionLayer::new(self.state.tokens.clone(), self.state.profiles.clone());

        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(self.config.request_timeout))
            .layer(cors)
            .layer(session);

        // The login page is public-only; each dashboard sits behind the
        // route guard plus its own role check, all reading the same table.
        let mut router = Router::new()
            .route("/health", get(handlers::health))
            .route(
                LOGIN_ROUTE,
                get(login_page).layer(RouteGuardLayer::public_only(policy.clone())),
            );

        for role in Role::all() {
            router = router.route(
                policy.landing_route(*role),
                get(dashboard_page)
                    .layer::<_, std::convert::Infallible>(DashboardGuardLayer::for_role(*role))
                    .layer(RouteGuardLayer::protected(policy.clone())),
            );
        }

        router
            // Auth endpoints
            .route("/api/v1/auth/login", post(handlers::login))
            .route("/api/v1/auth/logout", post(handlers::logout))
            .route("/api/v1/auth/me", get(handlers::current_session))
            // Attendance endpoints
            .route("/api/v1/attendance/qr", post(handlers::issue_qr))
            .route("/api/v1/attendance/scan", post(handlers::scan))
            // Unmatched paths get a structured 404 body
            .fallback(route_not_found)
            // Apply middleware and state
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server.
    pub async fn run(self) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let router = self.router();

        info!("Starting API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| crate::error::ApiError::internal(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| crate::error::ApiError::internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Runs the server with graceful shutdown.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let router = self.router();

        info!("Starting API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| crate::error::ApiError::internal(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| crate::error::ApiError::internal(format!("Server error: {}", e)))?;

        info!("API server shutdown complete");

        Ok(())
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.config.socket_addr()
    }
}

// =============================================================================
// Page Handlers
// =============================================================================

/// GET /login
///
/// The sign-in page; the public-only guard redirects signed-in sessions
/// away before this renders.
async fn login_page() -> impl IntoResponse {
    Json(serde_json::json!({ "page": "login" }))
}

/// GET /{role}/dashboard
///
/// Rendered only after the route guard and the dashboard role check have
/// both admitted the session.
async fn dashboard_page(Session(session): Session) -> impl IntoResponse {
    Json(serde_json::json!({
        "page": "dashboard",
        "role": session.role(),
        "degraded": session.profile.map(|p| p.degraded).unwrap_or(false),
    }))
}

/// Fallback for paths no route matches.
async fn route_not_found(uri: axum::http::Uri) -> ApiError {
    ApiError::not_found(format!("Route '{}'", uri.path()))
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Creates the CORS layer from configuration.
fn create_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = &config.cors;

    let mut layer = CorsLayer::new().max_age(Duration::from_secs(cors.max_age));

    if cors.allowed_origins.contains(&"*".to_string()) {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<header::HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer.allow_origin(AllowOrigin::list(origins));
    }

    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    layer = layer.allow_methods(methods);

    layer = layer.allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);

    if cors.allow_credentials {
        layer = layer.allow_credentials(true);
    }

    layer
}

// =============================================================================
// Server Builder
// =============================================================================

/// Builder for creating the API server.
pub struct ApiServerBuilder {
    state_builder: crate::state::AppStateBuilder,
}

impl ApiServerBuilder {
    /// Creates a new server builder.
    pub fn new() -> Self {
        Self {
            state_builder: AppState::builder(),
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.state_builder = self.state_builder.config(config);
        self
    }

    /// Sets the credential store.
    pub fn credentials(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.state_builder = self.state_builder.credentials(store);
        self
    }

    /// Sets the profile store.
    pub fn profiles(mut self, store: Arc<dyn ProfileStore>) -> Self {
        self.state_builder = self.state_builder.profiles(store);
        self
    }

    /// Sets the token manager.
    pub fn tokens(mut self, tokens: Arc<TokenManager>) -> Self {
        self.state_builder = self.state_builder.tokens(tokens);
        self
    }

    /// Sets the role-to-route table.
    pub fn routes(mut self, routes: RoutePolicy) -> Self {
        self.state_builder = self.state_builder.routes(routes);
        self
    }

    /// Sets the QR image renderer.
    pub fn qr_codec(mut self, codec: Arc<dyn QrImageCodec>) -> Self {
        self.state_builder = self.state_builder.qr_codec(codec);
        self
    }

    /// Builds the server.
    pub fn build(self) -> ApiResult<ApiServer> {
        let state = self.state_builder.build()?;
        Ok(ApiServer::new(state))
    }
}

impl Default for ApiServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
