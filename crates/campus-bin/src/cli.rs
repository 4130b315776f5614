// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! This module provides the command-line interface for CAMPUS using clap.
//! It supports multiple subcommands for different operations:
//!
//! - `run`: Start the API server (default)
//! - `validate`: Validate configuration file
//! - `version`: Show version information
//! - `qr`: Generate an attendance QR payload

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// CAMPUS - role-based access control and session core for school management
#[derive(Parser, Debug)]
#[command(
    name = "campus",
    author = "Sylvex <contact@sylvex.io>",
    version = campus_core::VERSION,
    about = "Role-based access control and session core for school management",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "campus.yaml",
        env = "CAMPUS_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        default_value = "info",
        env = "CAMPUS_LOG_LEVEL",
        global = true
    )]
    pub log_level: String,

    /// Log format (text, json, compact)
    #[arg(long, default_value = "text", env = "CAMPUS_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    /// Enable quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands for the CAMPUS CLI.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the API server
    ///
    /// This is the default command when no subcommand is specified.
    /// It starts the HTTP server with the configured users and profiles.
    Run(RunArgs),

    /// Validate the configuration file
    ///
    /// Parses and validates the configuration file without starting the
    /// server. Useful for checking configuration before deployment.
    Validate(ValidateArgs),

    /// Show detailed version information
    Version,

    /// Generate an attendance QR payload
    ///
    /// Prints the JSON payload an attendance code carries, for testing
    /// scanners without a running server.
    Qr(QrArgs),
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `run` command.
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Override the configured port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Enable development mode (relaxed CORS, detailed errors)
    #[arg(long, env = "CAMPUS_DEV_MODE")]
    pub dev_mode: bool,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Show parsed configuration after validation
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Strict mode: treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `qr` command.
#[derive(Args, Debug, Clone)]
pub struct QrArgs {
    /// The student the code is for
    #[arg(short, long)]
    pub student_id: String,

    /// The student's school
    #[arg(long)]
    pub school_id: String,

    /// Issue sequence number
    #[arg(long, default_value = "1")]
    pub sequence: u64,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective command, defaulting to `Run` if none specified.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Run(RunArgs::default()))
    }

    /// Get the effective log level based on flags.
    pub fn effective_log_level(&self) -> &str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            &self.log_level
        }
    }
}

impl Default for ValidateArgs {
    fn default() -> Self {
        Self {
            show_config: false,
            format: OutputFormat::Text,
            strict: false,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["campus"]);
        assert!(cli.command.is_none());
        matches!(cli.effective_command(), Commands::Run(_));
    }

    #[test]
    fn test_run_command() {
        let cli = Cli::parse_from(["campus", "run", "-p", "9000"]);
        if let Some(Commands::Run(args)) = cli.command {
            assert_eq!(args.port, Some(9000));
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_validate_command() {
        let cli = Cli::parse_from(["campus", "validate", "--show-config"]);
        if let Some(Commands::Validate(args)) = cli.command {
            assert!(args.show_config);
        } else {
            panic!("Expected Validate command");
        }
    }

    #[test]
    fn test_config_path() {
        let cli = Cli::parse_from(["campus", "-c", "/etc/campus/config.yaml"]);
        assert_eq!(cli.config, PathBuf::from("/etc/campus/config.yaml"));
    }

    #[test]
    fn test_quiet_mode() {
        let cli = Cli::parse_from(["campus", "-q"]);
        assert!(cli.quiet);
        assert_eq!(cli.effective_log_level(), "warn");
    }

    #[test]
    fn test_verbose_mode() {
        let cli = Cli::parse_from(["campus", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.effective_log_level(), "debug");
    }

    #[test]
    fn test_qr_command() {
        let cli = Cli::parse_from([
            "campus",
            "qr",
            "-s",
            "st-42",
            "--school-id",
            "s1",
            "--sequence",
            "7",
        ]);
        if let Some(Commands::Qr(args)) = cli.command {
            assert_eq!(args.student_id, "st-42");
            assert_eq!(args.school_id, "s1");
            assert_eq!(args.sequence, 7);
        } else {
            panic!("Expected Qr command");
        }
    }
}
