//! Minimal blocking HTTP client façade.
//!
//! # Overview
//! `Client` issues GET/POST/PUT/DELETE/HEAD requests through a pluggable
//! `Transfer` collaborator and returns either a `ParsedResponse` (status,
//! headers, body) or the collaborator's `TransportError`.
//!
//! # Design
//! - Configuration (`ClientConfig`) is owned by each client; there is no
//!   process-wide state.
//! - `build_request` maps configuration onto an ordered log of typed
//!   transport options without I/O, so the mapping is testable on its own.
//! - The collaborator returns the header block and body as one byte stream;
//!   `parse` splits it at the reported boundary and never fails.
//! - `UreqTransfer` (feature `ureq`, on by default) is the shipped
//!   collaborator.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod option;
pub mod parse;
pub mod payload;
#[cfg(feature = "ureq")]
pub mod transport;

pub use client::{build_request, Client, RequestOutcome, Transfer};
pub use config::ClientConfig;
pub use error::{ConfigError, TransportError};
pub use http::{ParsedResponse, RawResponse, TransferMethod, TransferRequest, Verb};
pub use option::{OptionSet, OptionValue, TransportOption};
pub use parse::{parse, parse_raw};
pub use payload::Payload;
#[cfg(feature = "ureq")]
pub use transport::UreqTransfer;
