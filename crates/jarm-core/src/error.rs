// ── Core error types ──
//
// User-facing errors from jarm-core. Consumers never see raw HTTP or JSON
// failures; the `From<jarm_api::Error>` impl translates them into
// domain-appropriate variants.

use std::time::Duration;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Request rejected by backend: {message}")]
    Rejected { message: String },

    #[error("Not found: {entity_type} {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<jarm_api::Error> for CoreError {
    fn from(err: jarm_api::Error) -> Self {
        match err {
            jarm_api::Error::Transport(ref e) => {
                let url = e.url().map(ToString::to_string).unwrap_or_default();
                if e.status().is_some_and(|s| s.as_u16() == 404) {
                    CoreError::NotFound {
                        entity_type: "resource".into(),
                        identifier: e.url().map(|u| u.path().to_owned()).unwrap_or_default(),
                    }
                } else {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                }
            }
            jarm_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            jarm_api::Error::Timeout { timeout } => CoreError::Timeout { timeout },
            jarm_api::Error::InvalidPathSegment(segment) => CoreError::Validation {
                message: format!("{segment:?} is not a valid identifier"),
            },
            jarm_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            jarm_api::Error::Rejected { status: 404, message } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: message,
            },
            jarm_api::Error::Rejected { message, .. } => CoreError::Rejected { message },
            jarm_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            jarm_api::Error::WebSocketConnect(reason) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("push channel connection failed: {reason}"),
            },
            jarm_api::Error::WebSocketClosed { code, reason } => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("push channel closed (code {code}): {reason}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_keep_backend_message() {
        let err = CoreError::from(jarm_api::Error::Rejected {
            status: 200,
            message: "Monitoring not running".into(),
        });
        assert!(
            matches!(&err, CoreError::Rejected { message } if message == "Monitoring not running")
        );
    }

    #[test]
    fn rejected_404_maps_to_not_found() {
        let err = CoreError::from(jarm_api::Error::Rejected {
            status: 404,
            message: "Notification not found".into(),
        });
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn timeout_keeps_its_duration() {
        let err = CoreError::from(jarm_api::Error::Timeout {
            timeout: Duration::from_secs(15),
        });
        assert!(matches!(err, CoreError::Timeout { timeout } if timeout.as_secs() == 15));
    }

    #[test]
    fn bad_path_segment_is_a_validation_error() {
        let err = CoreError::from(jarm_api::Error::InvalidPathSegment("..".into()));
        assert!(matches!(err, CoreError::Validation { .. }));
    }
}
