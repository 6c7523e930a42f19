//! HTTP transfer types exchanged with the transfer collaborator.
//!
//! # Design
//! The client never touches the network itself. It describes each request as
//! a `TransferRequest` (a method plus an ordered option log) and receives a
//! `RawResponse` (header block and body as one byte stream) back from
//! whatever `Transfer` implementation the caller plugged in. Everything the
//! collaborator needs is derived from the option log, so an override applied
//! late in the log is what the collaborator sees.

use std::collections::HashMap;
use std::fmt;

use crate::option::{OptionSet, TransportOption};

/// Verb method invoked on the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
    Head,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
            Verb::Head => "HEAD",
        }
    }

    /// Whether the payload goes into the query string rather than the body.
    pub fn payload_in_query(self) -> bool {
        matches!(self, Verb::Get | Verb::Head)
    }

    /// Transport method used for this verb.
    pub fn transfer_method(self) -> TransferMethod {
        match self {
            Verb::Head => TransferMethod::NoBody,
            Verb::Get => TransferMethod::Get,
            Verb::Post => TransferMethod::Post,
            other => TransferMethod::Custom(other.as_str().to_string()),
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request method as the transfer collaborator understands it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferMethod {
    Get,
    Post,
    /// A GET that asks for headers only, i.e. `HEAD`.
    NoBody,
    /// Any other method, sent verbatim.
    Custom(String),
}

impl TransferMethod {
    /// Wire method name.
    pub fn as_str(&self) -> &str {
        match self {
            TransferMethod::Get => "GET",
            TransferMethod::Post => "POST",
            TransferMethod::NoBody => "HEAD",
            TransferMethod::Custom(m) => m,
        }
    }
}

/// A request described as plain data, ready for a `Transfer` implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub method: TransferMethod,
    pub options: OptionSet,
}

impl TransferRequest {
    pub fn url(&self) -> &str {
        self.options.get_text(TransportOption::Url).unwrap_or("")
    }

    pub fn body(&self) -> Option<&str> {
        self.options.get_text(TransportOption::PostFields)
    }

    /// Raw `"Name: value"` request header lines.
    pub fn headers(&self) -> &[String] {
        self.options.get_list(TransportOption::HttpHeader).unwrap_or(&[])
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.options.get_text(TransportOption::UserAgent)
    }

    pub fn referer(&self) -> Option<&str> {
        self.options.get_text(TransportOption::Referer)
    }

    pub fn follow_redirects(&self) -> bool {
        self.options.get_bool(TransportOption::FollowLocation).unwrap_or(false)
    }

    /// Whether the header block is kept in the returned byte stream.
    pub fn include_headers(&self) -> bool {
        self.options.get_bool(TransportOption::Header).unwrap_or(false)
    }

    pub fn cookie_file(&self) -> Option<&str> {
        self.options.get_text(TransportOption::CookieFile)
    }

    pub fn cookie_jar(&self) -> Option<&str> {
        self.options.get_text(TransportOption::CookieJar)
    }

    /// Method after applying every method-setting option in log order.
    ///
    /// `NOBODY`, `HTTPGET` and `POST` select their method when set to true;
    /// `CUSTOMREQUEST` selects its string. A later entry replaces an earlier
    /// one, so a custom override can change the verb's method.
    pub fn effective_method(&self) -> TransferMethod {
        let mut method = self.method.clone();
        for (option, value) in self.options.iter() {
            match option {
                TransportOption::NoBody if value.as_bool() == Some(true) => {
                    method = TransferMethod::NoBody;
                }
                TransportOption::HttpGet if value.as_bool() == Some(true) => {
                    method = TransferMethod::Get;
                }
                TransportOption::Post if value.as_bool() == Some(true) => {
                    method = TransferMethod::Post;
                }
                TransportOption::CustomRequest => {
                    if let Some(m) = value.as_text() {
                        method = TransferMethod::Custom(m.to_string());
                    }
                }
                _ => {}
            }
        }
        method
    }
}

/// Raw bytes returned by a successful transfer: header block then body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub bytes: Vec<u8>,
    /// Length of the leading header block, in bytes.
    pub header_length: usize,
}

impl RawResponse {
    pub fn new(bytes: Vec<u8>, header_length: usize) -> Self {
        Self { bytes, header_length }
    }

    /// Build an HTTP-style stream from a status line, headers and a body.
    ///
    /// The header block is the status line and one `Name: value` line per
    /// header, each CRLF-terminated, followed by an empty line.
    pub fn assemble<'a, I>(status_line: &str, headers: I, body: &[u8]) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut block = String::with_capacity(128);
        block.push_str(status_line);
        block.push_str("\r\n");
        for (name, value) in headers {
            block.push_str(name);
            block.push_str(": ");
            block.push_str(value);
            block.push_str("\r\n");
        }
        block.push_str("\r\n");

        let header_length = block.len();
        let mut bytes = block.into_bytes();
        bytes.extend_from_slice(body);
        Self { bytes, header_length }
    }
}

/// A parsed response.
///
/// `headers` holds one value per name; when a name repeats, the last line
/// wins. A response whose status line could not be read has
/// `status_code == 0` and no headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub status_code: u16,
    pub http_version: Option<String>,
    pub reason: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl ParsedResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
