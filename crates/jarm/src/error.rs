//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help text.

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

use jarm_config::ConfigError;
use jarm_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const UNAVAILABLE: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the JARM backend at {url}")]
    #[diagnostic(
        code(jarm::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Try: jarm status --health --server http://localhost:5000"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout:?}")]
    #[diagnostic(
        code(jarm::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout { timeout: Duration },

    // ── Backend ──────────────────────────────────────────────────────
    #[error("Backend rejected the request: {message}")]
    #[diagnostic(code(jarm::rejected))]
    Rejected { message: String },

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(jarm::not_found),
        help("Run: jarm {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Backend is not ready: {failing}")]
    #[diagnostic(
        code(jarm::not_ready),
        help("Run: jarm diagnostics for store details")
    )]
    NotReady { failing: String },

    #[error("Unexpected backend response: {message}")]
    #[diagnostic(code(jarm::internal))]
    Internal { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(jarm::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(jarm::profile_not_found),
        help(
            "Add it to {path}\n\
             or pass the backend directly with --server"
        )
    )]
    ProfileNotFound { name: String, path: String },

    #[error("No backend configured")]
    #[diagnostic(
        code(jarm::no_server),
        help(
            "Pass --server <URL>, set JARM_SERVER, or add a profile to\n\
             {path}"
        )
    )]
    NoServer { path: String },

    #[error(transparent)]
    #[diagnostic(code(jarm::config))]
    Config(Box<ConfigError>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render output: {0}")]
    #[diagnostic(code(jarm::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::NotReady { .. } => exit_code::UNAVAILABLE,
            Self::Validation { .. } | Self::ProfileNotFound { .. } | Self::NoServer { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout { timeout } => Self::Timeout { timeout },
            CoreError::Rejected { message } => Self::Rejected { message },
            CoreError::NotFound {
                entity_type,
                identifier,
            } => Self::NotFound {
                list_command: format!("{entity_type}s list"),
                resource_type: entity_type,
                identifier,
            },
            CoreError::Validation { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::Internal { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        let path = jarm_config::config_path().display().to_string();
        match err {
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound { name, path },
            ConfigError::NoServer => Self::NoServer { path },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}
