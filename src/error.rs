//! Error types for modelmux.

use crate::types::ProviderId;

/// Result type alias for modelmux operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for modelmux.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// The chosen provider's call failed. Surfaced to the caller unchanged,
    /// annotated with which provider and model were attempted; never
    /// downgraded to a partial response.
    #[error("{provider} request for model '{model}' failed: {source}")]
    Upstream {
        provider: ProviderId,
        model: String,
        #[source]
        source: UpstreamError,
    },
}

/// Failure of a single upstream round-trip.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed response payload: {0}")]
    Payload(String),
}

impl Error {
    /// Provider attempted by a failed upstream call, if this is one.
    pub fn provider(&self) -> Option<ProviderId> {
        match self {
            Error::Upstream { provider, .. } => Some(*provider),
            _ => None,
        }
    }
}
