// ── Core error types ──
//
// User-facing errors from pwmon-core. Consumers never match on HTTP status
// codes or JSON parse failures directly; the `From<pwmon_api::Error>` impl
// translates transport-layer errors into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach collector at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Collector request timed out")]
    Timeout,

    // ── Response errors ──────────────────────────────────────────────
    #[error("Collector answered HTTP {status} for {path}")]
    Rejected { status: u16, path: String },

    #[error("Unexpected collector response: {message}")]
    InvalidResponse { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Whether a later attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout => true,
            Self::Rejected { status, .. } => *status >= 500,
            Self::InvalidResponse { .. } | Self::Config { .. } => false,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<pwmon_api::Error> for CoreError {
    fn from(err: pwmon_api::Error) -> Self {
        match err {
            pwmon_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            pwmon_api::Error::Status { status, path } => CoreError::Rejected { status, path },
            pwmon_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidResponse { message }
            }
            pwmon_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            pwmon_api::Error::ClientBuild(message) => CoreError::Config { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_keep_code_and_path() {
        let err = CoreError::from(pwmon_api::Error::Status {
            status: 502,
            path: "/api/status".into(),
        });

        assert!(matches!(err, CoreError::Rejected { status: 502, .. }));
        assert!(err.is_transient());
        assert_eq!(err.to_string(), "Collector answered HTTP 502 for /api/status");
    }

    #[test]
    fn bad_body_is_not_transient() {
        let err = CoreError::from(pwmon_api::Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        });

        assert!(!err.is_transient());
        assert!(matches!(err, CoreError::InvalidResponse { .. }));
    }
}
