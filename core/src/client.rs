//! Verb methods and the mapping from configuration to transfer options.
//!
//! # Design
//! `Client` owns its `ClientConfig` and a `Transfer` collaborator. Each verb
//! method is split the same way: `build_request` turns the configuration,
//! URL and payload into a `TransferRequest` without any I/O, the collaborator
//! performs it, and `parse` turns the raw bytes into a `ParsedResponse`.
//! Keeping `build_request` public means the option mapping can be checked
//! without a network.

use log::{debug, warn};

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::http::{ParsedResponse, RawResponse, TransferMethod, TransferRequest, Verb};
use crate::option::{OptionSet, TransportOption};
use crate::parse::parse_raw;
use crate::payload::{append_query, Payload};

/// Result of a single request: a parsed response or the transport failure.
pub type RequestOutcome = Result<ParsedResponse, TransportError>;

/// Performs a transfer described by a `TransferRequest`.
///
/// On success the returned bytes are the header block followed by the body,
/// with `header_length` marking the boundary.
pub trait Transfer {
    fn perform(&mut self, request: &TransferRequest) -> Result<RawResponse, TransportError>;
}

impl<T: Transfer + ?Sized> Transfer for &mut T {
    fn perform(&mut self, request: &TransferRequest) -> Result<RawResponse, TransportError> {
        (**self).perform(request)
    }
}

impl<T: Transfer + ?Sized> Transfer for Box<T> {
    fn perform(&mut self, request: &TransferRequest) -> Result<RawResponse, TransportError> {
        (**self).perform(request)
    }
}

/// Blocking HTTP client over a `Transfer` collaborator.
#[derive(Debug)]
pub struct Client<T> {
    config: ClientConfig,
    transfer: T,
}

impl<T: Transfer> Client<T> {
    pub fn new(config: ClientConfig, transfer: T) -> Self {
        Self { config, transfer }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ClientConfig {
        &mut self.config
    }

    pub fn transfer(&self) -> &T {
        &self.transfer
    }

    pub fn into_parts(self) -> (ClientConfig, T) {
        (self.config, self.transfer)
    }

    /// `GET url`, with `query` appended to the URL.
    pub fn get(&mut self, url: &str, query: impl Into<Payload>) -> RequestOutcome {
        self.request(Verb::Get, url, query.into())
    }

    /// `POST url`, with `body` as the request body.
    pub fn post(&mut self, url: &str, body: impl Into<Payload>) -> RequestOutcome {
        self.request(Verb::Post, url, body.into())
    }

    pub fn put(&mut self, url: &str, body: impl Into<Payload>) -> RequestOutcome {
        self.request(Verb::Put, url, body.into())
    }

    pub fn delete(&mut self, url: &str, body: impl Into<Payload>) -> RequestOutcome {
        self.request(Verb::Delete, url, body.into())
    }

    /// `HEAD url`, with `query` appended to the URL. Never sends a body.
    pub fn head(&mut self, url: &str, query: impl Into<Payload>) -> RequestOutcome {
        self.request(Verb::Head, url, query.into())
    }

    /// Build, perform and parse one request.
    pub fn request(&mut self, verb: Verb, url: &str, payload: Payload) -> RequestOutcome {
        let request = build_request(&self.config, verb, url, &payload);
        debug!("{verb} {}", request.url());

        match self.transfer.perform(&request) {
            Ok(raw) => {
                let response = parse_raw(&raw);
                debug!("{verb} {} -> {}", request.url(), response.status_code);
                Ok(response)
            }
            Err(err) => {
                warn!("{verb} {} failed: {err}", request.url());
                Err(err)
            }
        }
    }
}

/// Map configuration, verb, URL and payload onto a `TransferRequest`.
///
/// Options are applied in a fixed order: method, URL, body, the defaults
/// (header passthrough, return transfer, user agent), cookie file, redirect
/// flag, referer, custom header lines, and finally the custom options from
/// `config`, which override anything set before them.
pub fn build_request(
    config: &ClientConfig,
    verb: Verb,
    url: &str,
    payload: &Payload,
) -> TransferRequest {
    let encoded = payload.encode();
    let (url, body) = if verb.payload_in_query() {
        (append_query(url, &encoded), None)
    } else {
        (url.to_string(), Some(encoded).filter(|b| !b.is_empty()))
    };

    let method = verb.transfer_method();
    let mut options = OptionSet::new();
    match &method {
        TransferMethod::NoBody => options.set(TransportOption::NoBody, true),
        TransferMethod::Get => options.set(TransportOption::HttpGet, true),
        TransferMethod::Post => options.set(TransportOption::Post, true),
        TransferMethod::Custom(m) => options.set(TransportOption::CustomRequest, m.as_str()),
    }

    options.set(TransportOption::Url, url);
    if let Some(body) = body {
        options.set(TransportOption::PostFields, body);
    }

    options.set(TransportOption::Header, true);
    options.set(TransportOption::ReturnTransfer, true);
    options.set(TransportOption::UserAgent, config.user_agent.as_str());

    if let Some(path) = &config.cookie_file {
        let path = path.to_string_lossy().into_owned();
        options.set(TransportOption::CookieFile, path.as_str());
        options.set(TransportOption::CookieJar, path);
    }
    if config.follow_redirects {
        options.set(TransportOption::FollowLocation, true);
    }
    if let Some(referer) = &config.referer {
        options.set(TransportOption::Referer, referer.as_str());
    }
    if !config.headers.is_empty() {
        let lines: Vec<String> = config
            .headers
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect();
        options.set(TransportOption::HttpHeader, lines);
    }

    for (option, value) in config.options() {
        options.set(*option, value.clone());
    }

    TransferRequest { method, options }
}
