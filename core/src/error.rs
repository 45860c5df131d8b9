//! Error types for the clinic API client.
//!
//! # Design
//! Candidate-level failures (`Http`, `Transport`) are recorded by the
//! resilient client and only surface to the caller when every candidate
//! endpoint has failed. The remaining variants come from the typed layer
//! and from configuration loading.

use thiserror::Error;

/// Errors returned by `ResilientClient` and `ClinicApi`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status. `body` is the raw response
    /// text kept for diagnostics.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response (connection refused, DNS,
    /// timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A 2xx response declared JSON but its body did not parse. Treated as
    /// a failed attempt.
    #[error("malformed JSON from {url}: {message}")]
    MalformedBody { url: String, message: String },

    /// No candidate produced a response or an error. Only reachable with an
    /// empty candidate list.
    #[error("all attempts failed")]
    AllAttemptsFailed,

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Status code of an HTTP error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Failure to complete a round trip at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{url}: {message}")]
pub struct TransportError {
    pub url: String,
    pub message: String,
}

impl TransportError {
    pub fn new(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// Failure while reading a credential source. Never escapes the credential
/// store; it is logged and treated as "no credentials".
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential storage unavailable: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed credential data: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Invalid client configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown build mode `{0}` (expected `production` or `development`)")]
    UnknownBuildMode(String),

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}
