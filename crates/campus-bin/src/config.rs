// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration file loading.
//!
//! The configuration is a single YAML (or JSON) document holding the API
//! server settings plus the seeded users and profile records for the
//! in-memory stores.

use std::path::Path;

use serde::{Deserialize, Serialize};

use campus_api::ApiConfig;
use campus_core::Profile;

use crate::error::{BinError, BinResult};

// =============================================================================
// AppConfig
// =============================================================================

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// API server settings.
    pub api: ApiConfig,
    /// User accounts seeded into the credential store at startup.
    pub users: Vec<UserSeed>,
    /// Profile records seeded into the profile store at startup.
    pub profiles: Vec<Profile>,
}

/// A seeded user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSeed {
    /// Stable identity id, matching a profile record's id.
    pub identity_id: String,
    /// Sign-in email.
    pub email: String,
    /// Plaintext password, hashed on load.
    pub password: String,
}

impl AppConfig {
    /// Validates the configuration, returning non-fatal warnings.
    pub fn validate(&self) -> BinResult<Vec<String>> {
        let mut warnings = Vec::new();

        if self.api.token.secret.is_empty() {
            return Err(BinError::config("token secret is not configured"));
        }
        if self.api.token.secret.len() < 32 {
            warnings.push("token secret is shorter than recommended (32 bytes)".to_string());
        }

        if self.users.is_empty() {
            warnings.push("no users configured".to_string());
        }

        for profile in &self.profiles {
            if let Err(e) = profile.validate() {
                return Err(BinError::config(format!("invalid profile: {}", e)));
            }
        }

        for user in &self.users {
            if !self.profiles.iter().any(|p| p.id == user.identity_id) {
                warnings.push(format!(
                    "user {} has no profile record; sign-ins will degrade to the admin fallback",
                    user.email
                ));
            }
        }

        Ok(warnings)
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Loads a configuration document from a YAML or JSON file.
///
/// The format is chosen by file extension; anything that is not `.json`
/// parses as YAML.
pub fn load_config(path: &Path) -> BinResult<AppConfig> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        BinError::config(format!("cannot read {}: {}", path.display(), e))
    })?;

    let config = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&raw)
            .map_err(|e| BinError::config(format!("invalid JSON in {}: {}", path.display(), e)))?
    } else {
        serde_yaml::from_str(&raw)
            .map_err(|e| BinError::config(format!("invalid YAML in {}: {}", path.display(), e)))?
    };

    Ok(config)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::Role;
    use std::io::Write;

    const SAMPLE_YAML: &str = r#"
api:
  port: 9000
  token:
    secret: "a-test-secret-key-that-is-long-enough!"
users:
  - identity_id: u1
    email: karim@school.example
    password: hunter22
profiles:
  - id: u1
    role: teacher
    name: Karim
    school_id: s1
"#;

    #[test]
    fn test_load_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(SAMPLE_YAML.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.users.len(), 1);
        assert_eq!(config.profiles[0].role, Role::Teacher);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config(Path::new("/nonexistent/campus.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_warnings() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(SAMPLE_YAML.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        let warnings = config.validate().unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_validate_rejects_missing_secret() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_flags_orphan_user() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(SAMPLE_YAML.as_bytes()).unwrap();

        let mut config = load_config(file.path()).unwrap();
        config.profiles.clear();

        let warnings = config.validate().unwrap();
        assert!(warnings.iter().any(|w| w.contains("karim@school.example")));
    }
}
