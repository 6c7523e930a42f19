//! `Transfer` implementation backed by `ureq`.
//!
//! A fresh agent is configured for every request from the request's option
//! log, the call is executed, and the response is reassembled into an
//! HTTP-style byte stream so it goes through the same parser as any other
//! collaborator's output. Only the final hop of a redirect chain is
//! available from `ureq`, so the header block holds a single response.

use std::io::ErrorKind;
use std::time::Duration;

use log::debug;
use ureq::{http, Agent, AsSendBody};

use crate::client::Transfer;
use crate::error::{
    TransportError, CODE_COULDNT_CONNECT, CODE_COULDNT_RESOLVE_HOST, CODE_OPERATION_TIMEDOUT,
    CODE_RECV_ERROR, CODE_TOO_MANY_REDIRECTS, CODE_URL_MALFORMAT,
};
use crate::http::{RawResponse, TransferRequest};
use crate::option::TransportOption;

/// Redirect limit when following is on and `MAXREDIRS` is not set.
const DEFAULT_MAX_REDIRECTS: u32 = 10;

/// Blocking transfer over `ureq`.
///
/// Cookie file options are accepted but not persisted.
#[derive(Debug, Clone, Default)]
pub struct UreqTransfer;

impl UreqTransfer {
    pub fn new() -> Self {
        Self
    }

    fn agent(request: &TransferRequest) -> Agent {
        let options = &request.options;
        let max_redirects = if request.follow_redirects() {
            options
                .get_int(TransportOption::MaxRedirs)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(DEFAULT_MAX_REDIRECTS)
        } else {
            0
        };

        let mut builder = Agent::config_builder()
            .http_status_as_error(false)
            .max_redirects(max_redirects);
        if let Some(secs) = positive_secs(options.get_int(TransportOption::Timeout)) {
            builder = builder.timeout_global(Some(secs));
        }
        if let Some(secs) = positive_secs(options.get_int(TransportOption::ConnectTimeout)) {
            builder = builder.timeout_connect(Some(secs));
        }
        builder.build().new_agent()
    }

    fn http_request(request: &TransferRequest) -> Result<http::request::Builder, TransportError> {
        let mut builder = http::Request::builder()
            .method(request.effective_method().as_str())
            .uri(request.url());

        if let Some(agent) = request.user_agent() {
            builder = builder.header("User-Agent", agent);
        }
        if let Some(referer) = request.referer() {
            builder = builder.header("Referer", referer);
        }
        if request.body().is_some() {
            builder = builder.header("Content-Type", "application/x-www-form-urlencoded");
        }
        for line in request.headers() {
            let Some((name, value)) = line.split_once(':') else {
                return Err(TransportError::new(
                    CODE_URL_MALFORMAT,
                    format!("malformed header line: {line:?}"),
                ));
            };
            builder = builder.header(name.trim(), value.trim());
        }
        Ok(builder)
    }

    fn send<B: AsSendBody>(
        agent: &Agent,
        built: Result<http::Request<B>, http::Error>,
    ) -> Result<http::Response<ureq::Body>, TransportError> {
        let req = built.map_err(|e| TransportError::new(CODE_URL_MALFORMAT, e.to_string()))?;
        agent.run(req).map_err(transport_error)
    }
}

impl Transfer for UreqTransfer {
    fn perform(&mut self, request: &TransferRequest) -> Result<RawResponse, TransportError> {
        if let Some(path) = request.cookie_file().or(request.cookie_jar()) {
            debug!("cookie file {path} is not persisted by the ureq transfer");
        }

        let agent = Self::agent(request);
        let builder = Self::http_request(request)?;

        let method = request.effective_method();
        let body = match request.body() {
            Some(body) => Some(body.as_bytes()),
            // ureq frames these as chunked unless the length is known.
            None if matches!(method.as_str(), "POST" | "PUT" | "PATCH") => Some(&[][..]),
            None => None,
        };
        // `run` sends any attached body, DELETE included.
        let mut response = match body {
            Some(bytes) => Self::send(&agent, builder.body(bytes))?,
            None => Self::send(&agent, builder.body(()))?,
        };

        let status = response.status();
        let status_line = format!(
            "{:?} {} {}",
            response.version(),
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        );
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.body_mut().read_to_vec().map_err(transport_error)?;

        if !request.include_headers() {
            return Ok(RawResponse::new(body, 0));
        }
        Ok(RawResponse::assemble(
            status_line.trim_end(),
            headers.iter().map(|(n, v)| (n.as_str(), v.as_str())),
            &body,
        ))
    }
}

fn positive_secs(value: Option<i64>) -> Option<Duration> {
    value
        .filter(|n| *n > 0)
        .and_then(|n| u64::try_from(n).ok())
        .map(Duration::from_secs)
}

fn transport_error(err: ureq::Error) -> TransportError {
    let code = match &err {
        ureq::Error::BadUri(_) | ureq::Error::Http(_) => CODE_URL_MALFORMAT,
        ureq::Error::HostNotFound => CODE_COULDNT_RESOLVE_HOST,
        ureq::Error::ConnectionFailed => CODE_COULDNT_CONNECT,
        ureq::Error::Io(e) if e.kind() == ErrorKind::ConnectionRefused => CODE_COULDNT_CONNECT,
        ureq::Error::Io(e) if e.kind() == ErrorKind::TimedOut => CODE_OPERATION_TIMEDOUT,
        ureq::Error::Timeout(_) => CODE_OPERATION_TIMEDOUT,
        ureq::Error::TooManyRedirects => CODE_TOO_MANY_REDIRECTS,
        _ => CODE_RECV_ERROR,
    };
    TransportError::new(code, err.to_string())
}
