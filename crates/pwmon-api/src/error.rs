use thiserror::Error;

/// Top-level error type for the `pwmon-api` crate.
///
/// Every failure mode of a collector request lands here: transport,
/// non-success status, and undecodable bodies. `pwmon-core` maps these
/// into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Collector ───────────────────────────────────────────────────
    /// The collector answered with a non-success status code.
    /// The body is ignored regardless of its content.
    #[error("Collector returned HTTP {status} for {path}")]
    Status { status: u16, path: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}
