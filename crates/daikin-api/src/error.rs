use thiserror::Error;

use crate::client::Endpoint;

/// Top-level error type for the `daikin-api` crate.
///
/// Covers transport failures (connect, DNS, timeout) and protocol failures
/// (short payloads, missing success marker). `daikin-core` maps these into
/// device-level diagnostics; callers of the controller never see them raw.
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

    // ── Protocol ────────────────────────────────────────────────────
    /// Non-2xx status from the adapter.
    #[error("{endpoint} returned HTTP {status}")]
    Http { endpoint: Endpoint, status: u16 },

    /// Body did not split into at least two `key=value` tokens.
    #[error("Malformed payload from {endpoint}: {body:?}")]
    MalformedPayload { endpoint: Endpoint, body: String },

    /// Payload parsed but did not carry the success marker.
    #[error("{endpoint} rejected the request (ret={ret})")]
    Rejected { endpoint: Endpoint, ret: String },
}

impl Error {
    /// Returns `true` for connect/timeout failures that may clear up on their own.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` if the adapter answered but the answer was unusable.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::MalformedPayload { .. } | Self::Rejected { .. }
        )
    }

    /// The endpoint involved, when the failure happened after a response arrived.
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::Http { endpoint, .. }
            | Self::MalformedPayload { endpoint, .. }
            | Self::Rejected { endpoint, .. } => Some(*endpoint),
            _ => None,
        }
    }
}
