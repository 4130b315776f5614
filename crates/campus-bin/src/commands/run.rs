// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `run` command.

use std::sync::Arc;

use tracing::{info, warn};

use campus_api::ApiServerBuilder;
use campus_session::{
    CredentialStore, MemoryCredentialStore, MemoryProfileStore, ProfileStore, SessionController,
    TokenManager,
};

use crate::cli::{Cli, RunArgs};
use crate::config::load_config;
use crate::error::{BinError, BinResult};

/// Executes the `run` command to start the API server.
pub async fn run(cli: &Cli, args: RunArgs) -> BinResult<()> {
    info!("Starting CAMPUS API server...");

    let mut config = load_config(&cli.config)?;

    for warning in config.validate()? {
        warn!("Configuration warning: {}", warning);
    }

    if let Some(port) = args.port {
        config.api.port = port;
    }
    if args.dev_mode {
        warn!("Development mode enabled: CORS is open to all origins");
        config.api.cors.allowed_origins = vec!["*".to_string()];
        config.api.cors.allow_credentials = false;
    }

    // Seed the in-memory stores from the configuration.
    let tokens = TokenManager::new(config.api.token.clone())
        .map_err(|e| BinError::init(format!("token manager: {}", e)))?;

    let credentials = MemoryCredentialStore::new(tokens.clone());
    for user in &config.users {
        credentials
            .register_with_id(&user.identity_id, &user.email, &user.password)
            .map_err(|e| BinError::init(format!("seeding user {}: {}", user.email, e)))?;
    }

    let profiles = MemoryProfileStore::new();
    for profile in config.profiles.iter().cloned() {
        profiles
            .insert(profile)
            .map_err(|e| BinError::init(format!("seeding profiles: {}", e)))?;
    }

    info!(
        users = config.users.len(),
        profiles = profiles.len(),
        "Seeded in-memory stores"
    );

    let credentials: Arc<dyn CredentialStore> = Arc::new(credentials);
    let profiles: Arc<dyn ProfileStore> = Arc::new(profiles);

    // The controller tracks server-side sign-ins; the handle keeps the
    // task alive for the lifetime of the server.
    let _session = SessionController::spawn(credentials.clone(), profiles.clone());

    let server = ApiServerBuilder::new()
        .config(config.api)
        .credentials(credentials)
        .profiles(profiles)
        .tokens(Arc::new(tokens))
        .build()?;

    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to install Ctrl-C handler: {}", e);
            }
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
