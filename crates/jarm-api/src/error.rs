use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `jarm-api` crate.
///
/// Covers every failure mode across both API surfaces: the HTTP
/// request/response endpoints and the push channel. `jarm-core` maps these
/// into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request exceeded the configured client timeout.
    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// A caller-supplied path segment that cannot name a resource.
    #[error("Invalid path segment: {0:?}")]
    InvalidPathSegment(String),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Application ─────────────────────────────────────────────────
    /// The backend answered with `success: false` (or a non-2xx status
    /// without a usable body).
    #[error("Request rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Push channel ────────────────────────────────────────────────
    /// Push channel connection failed.
    #[error("Push channel connection failed: {0}")]
    WebSocketConnect(String),

    /// Push channel closed unexpectedly.
    #[error("Push channel closed (code {code}): {reason}")]
    WebSocketClosed { code: u16, reason: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying on the
    /// next scheduled tick.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } | Self::WebSocketConnect(_) => true,
            Self::Rejected { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Rejected { status: 404, .. } => true,
            _ => false,
        }
    }

    /// The backend-provided message for application-level failures.
    pub fn rejection_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_side_rejections_are_transient() {
        let err = Error::Rejected {
            status: 500,
            message: "database unavailable".into(),
        };
        assert!(err.is_transient());

        let err = Error::Rejected {
            status: 200,
            message: "Monitoring already running".into(),
        };
        assert!(!err.is_transient());
        assert_eq!(err.rejection_message(), Some("Monitoring already running"));
    }

    #[test]
    fn rejected_404_is_not_found() {
        let err = Error::Rejected {
            status: 404,
            message: "Notification not found".into(),
        };
        assert!(err.is_not_found());
    }

    #[test]
    fn timeout_reports_configured_duration() {
        let err = Error::Timeout {
            timeout: Duration::from_secs(3),
        };
        assert!(err.is_transient());
        assert_eq!(err.to_string(), "Request timed out after 3s");
    }
}
