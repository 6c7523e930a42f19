//! Error types for the HTTP client façade.
//!
//! # Design
//! A transport failure is a value, not a panic: `TransportError` carries the
//! numeric code and message reported by the transfer collaborator and is
//! surfaced to the caller verbatim. Configuration mistakes are caught when the
//! option is set, before any request is built, and reported as `ConfigError`.

use thiserror::Error;

use crate::option::{OptionKind, TransportOption};

/// Malformed or unsupported URL.
pub const CODE_URL_MALFORMAT: i32 = 3;
/// Host name could not be resolved.
pub const CODE_COULDNT_RESOLVE_HOST: i32 = 6;
/// TCP connection could not be established.
pub const CODE_COULDNT_CONNECT: i32 = 7;
/// The transfer timed out.
pub const CODE_OPERATION_TIMEDOUT: i32 = 28;
/// Redirect limit was reached.
pub const CODE_TOO_MANY_REDIRECTS: i32 = 47;
/// Failure while receiving network data, and the catch-all.
pub const CODE_RECV_ERROR: i32 = 56;

/// The transfer collaborator failed to produce a response.
///
/// Codes follow the libcurl numbering so callers used to curl error codes can
/// match on familiar values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code} - {message}")]
pub struct TransportError {
    pub code: i32,
    pub message: String,
}

impl TransportError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Errors raised while building a `ClientConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The option name does not match any known transport option.
    #[error("unknown transport option: {0}")]
    UnknownOption(String),

    /// The option exists but the value has the wrong shape.
    #[error("invalid value for {option}: expected {expected}")]
    InvalidOptionValue {
        option: TransportOption,
        expected: OptionKind,
    },

    /// The configuration document is not valid JSON or has the wrong layout.
    #[error("invalid configuration document: {0}")]
    Json(#[from] serde_json::Error),
}
