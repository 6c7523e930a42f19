//! Splits a raw transfer result into status, headers and body.
//!
//! # Design
//! The collaborator reports where the header block ends, so the split is a
//! byte offset, not a search for `\r\n\r\n` in the body. Parsing never fails:
//! a boundary past the end of the data, or a header block without a readable
//! status line, degrades to status 0 with no headers.
//!
//! When redirects were followed the header block holds one block per hop.
//! Only the last block describes the response whose body follows, so that is
//! the one parsed.

use std::collections::HashMap;

use log::debug;

use crate::http::{ParsedResponse, RawResponse};

/// Parse a `RawResponse` as returned by a `Transfer`.
pub fn parse_raw(raw: &RawResponse) -> ParsedResponse {
    parse(&raw.bytes, raw.header_length)
}

/// Parse `raw`, whose first `header_length` bytes are the header block.
pub fn parse(raw: &[u8], header_length: usize) -> ParsedResponse {
    if header_length > raw.len() {
        debug!(
            "header length {header_length} exceeds response size {}, keeping raw body",
            raw.len()
        );
        return degraded(String::from_utf8_lossy(raw).into_owned());
    }

    let (head, body) = raw.split_at(header_length);
    let body = String::from_utf8_lossy(body).into_owned();
    let head = String::from_utf8_lossy(head);

    let Some(block) = head.split("\r\n\r\n").filter(|b| !b.trim().is_empty()).last() else {
        return degraded(body);
    };

    let mut lines = block.split("\r\n");
    let status_line = lines.next().unwrap_or("");
    let Some((http_version, status_code, reason)) = parse_status_line(status_line) else {
        debug!("unparseable status line: {status_line:?}");
        return degraded(body);
    };

    let mut headers = HashMap::new();
    for line in lines.filter(|l| !l.is_empty()) {
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_string(), value.trim().to_string());
        }
    }

    ParsedResponse {
        status_code,
        http_version,
        reason,
        headers,
        body,
    }
}

/// Returns `(version, code, reason)`; the code is the second token.
fn parse_status_line(line: &str) -> Option<(Option<String>, u16, String)> {
    let (protocol, rest) = line.trim().split_once(char::is_whitespace)?;
    let rest = rest.trim_start();
    let (code, reason) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let code = code.parse::<u16>().ok()?;
    let reason = reason.trim().to_string();
    let version = protocol.strip_prefix("HTTP/").map(str::to_string);
    Some((version, code, reason))
}

fn degraded(body: String) -> ParsedResponse {
    ParsedResponse {
        status_code: 0,
        http_version: None,
        reason: String::new(),
        headers: HashMap::new(),
        body,
    }
}
