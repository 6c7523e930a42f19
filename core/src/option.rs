//! Typed transport options.
//!
//! # Design
//! Options are passed to the transfer collaborator as an ordered log of
//! `(TransportOption, OptionValue)` pairs, in exactly the order the client
//! applied them. Setting an option twice keeps both entries in the log; the
//! last one is the effective value. This keeps "custom override wins over
//! default" observable instead of hiding it inside a map.
//!
//! Option names accepted from callers are case-insensitive and may carry a
//! `CURLOPT_` prefix, so `useragent`, `USERAGENT` and `CURLOPT_USERAGENT` all
//! resolve to `TransportOption::UserAgent`. Unknown names are rejected.

use std::fmt;

use serde_json::Value;

/// Prefix accepted (and stripped) in front of option names.
const OPTION_PREFIX: &str = "CURLOPT_";

/// A transport option understood by the client and its collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransportOption {
    Url,
    PostFields,
    /// Include the response header block in the returned byte stream.
    Header,
    ReturnTransfer,
    UserAgent,
    /// Cookie file read before the request.
    CookieFile,
    /// Cookie file written after the request.
    CookieJar,
    FollowLocation,
    MaxRedirs,
    Referer,
    /// List of raw `"Name: value"` request header lines.
    HttpHeader,
    /// Whole-transfer timeout, in seconds.
    Timeout,
    /// Connect timeout, in seconds.
    ConnectTimeout,
    NoBody,
    HttpGet,
    Post,
    CustomRequest,
}

impl TransportOption {
    pub const ALL: [TransportOption; 17] = [
        TransportOption::Url,
        TransportOption::PostFields,
        TransportOption::Header,
        TransportOption::ReturnTransfer,
        TransportOption::UserAgent,
        TransportOption::CookieFile,
        TransportOption::CookieJar,
        TransportOption::FollowLocation,
        TransportOption::MaxRedirs,
        TransportOption::Referer,
        TransportOption::HttpHeader,
        TransportOption::Timeout,
        TransportOption::ConnectTimeout,
        TransportOption::NoBody,
        TransportOption::HttpGet,
        TransportOption::Post,
        TransportOption::CustomRequest,
    ];

    /// Canonical upper-case name, without prefix.
    pub fn name(self) -> &'static str {
        match self {
            TransportOption::Url => "URL",
            TransportOption::PostFields => "POSTFIELDS",
            TransportOption::Header => "HEADER",
            TransportOption::ReturnTransfer => "RETURNTRANSFER",
            TransportOption::UserAgent => "USERAGENT",
            TransportOption::CookieFile => "COOKIEFILE",
            TransportOption::CookieJar => "COOKIEJAR",
            TransportOption::FollowLocation => "FOLLOWLOCATION",
            TransportOption::MaxRedirs => "MAXREDIRS",
            TransportOption::Referer => "REFERER",
            TransportOption::HttpHeader => "HTTPHEADER",
            TransportOption::Timeout => "TIMEOUT",
            TransportOption::ConnectTimeout => "CONNECTTIMEOUT",
            TransportOption::NoBody => "NOBODY",
            TransportOption::HttpGet => "HTTPGET",
            TransportOption::Post => "POST",
            TransportOption::CustomRequest => "CUSTOMREQUEST",
        }
    }

    /// The value shape this option expects.
    pub fn kind(self) -> OptionKind {
        match self {
            TransportOption::Header
            | TransportOption::ReturnTransfer
            | TransportOption::FollowLocation
            | TransportOption::NoBody
            | TransportOption::HttpGet
            | TransportOption::Post => OptionKind::Bool,
            TransportOption::MaxRedirs
            | TransportOption::Timeout
            | TransportOption::ConnectTimeout => OptionKind::Int,
            TransportOption::HttpHeader => OptionKind::List,
            TransportOption::Url
            | TransportOption::PostFields
            | TransportOption::UserAgent
            | TransportOption::CookieFile
            | TransportOption::CookieJar
            | TransportOption::Referer
            | TransportOption::CustomRequest => OptionKind::Text,
        }
    }

    /// Resolve a caller-supplied option name.
    ///
    /// Matching is case-insensitive and an optional `CURLOPT_` prefix is
    /// stripped first. Returns `None` for names that match nothing.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        let bare = upper.strip_prefix(OPTION_PREFIX).unwrap_or(upper.as_str());
        TransportOption::ALL.into_iter().find(|opt| opt.name() == bare)
    }
}

impl fmt::Display for TransportOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape of an option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Bool,
    Int,
    Text,
    List,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OptionKind::Bool => "boolean",
            OptionKind::Int => "integer",
            OptionKind::Text => "string",
            OptionKind::List => "list of strings",
        };
        f.write_str(s)
    }
}

/// A transport option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<String>),
}

impl OptionValue {
    pub fn kind(&self) -> OptionKind {
        match self {
            OptionValue::Bool(_) => OptionKind::Bool,
            OptionValue::Int(_) => OptionKind::Int,
            OptionValue::Text(_) => OptionKind::Text,
            OptionValue::List(_) => OptionKind::List,
        }
    }

    /// Convert the value to `kind`, if it can stand in for it.
    ///
    /// Integers are accepted for boolean options (`0` is false, anything else
    /// true); every other mismatch returns `None`.
    pub fn coerce(self, kind: OptionKind) -> Option<Self> {
        match (self, kind) {
            (OptionValue::Int(n), OptionKind::Bool) => Some(OptionValue::Bool(n != 0)),
            (value, kind) if value.kind() == kind => Some(value),
            _ => None,
        }
    }

    /// Read a value from a JSON configuration document.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(OptionValue::Bool(*b)),
            Value::Number(n) => n.as_i64().map(OptionValue::Int),
            Value::String(s) => Some(OptionValue::Text(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(OptionValue::List),
            Value::Null | Value::Object(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            OptionValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            OptionValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<i64> for OptionValue {
    fn from(n: i64) -> Self {
        OptionValue::Int(n)
    }
}

impl From<i32> for OptionValue {
    fn from(n: i32) -> Self {
        OptionValue::Int(i64::from(n))
    }
}

impl From<u32> for OptionValue {
    fn from(n: u32) -> Self {
        OptionValue::Int(i64::from(n))
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Text(s)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(items: Vec<String>) -> Self {
        OptionValue::List(items)
    }
}

impl From<Vec<&str>> for OptionValue {
    fn from(items: Vec<&str>) -> Self {
        OptionValue::List(items.into_iter().map(str::to_string).collect())
    }
}

/// Ordered log of applied options. Lookups return the last value set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    entries: Vec<(TransportOption, OptionValue)>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an option to the log.
    pub fn set(&mut self, option: TransportOption, value: impl Into<OptionValue>) {
        self.entries.push((option, value.into()));
    }

    /// The effective (last set) value of `option`.
    pub fn get(&self, option: TransportOption) -> Option<&OptionValue> {
        self.entries
            .iter()
            .rev()
            .find(|(opt, _)| *opt == option)
            .map(|(_, value)| value)
    }

    pub fn get_bool(&self, option: TransportOption) -> Option<bool> {
        self.get(option).and_then(OptionValue::as_bool)
    }

    pub fn get_int(&self, option: TransportOption) -> Option<i64> {
        self.get(option).and_then(OptionValue::as_int)
    }

    pub fn get_text(&self, option: TransportOption) -> Option<&str> {
        self.get(option).and_then(OptionValue::as_text)
    }

    pub fn get_list(&self, option: TransportOption) -> Option<&[String]> {
        self.get(option).and_then(OptionValue::as_list)
    }

    pub fn contains(&self, option: TransportOption) -> bool {
        self.get(option).is_some()
    }

    /// Entries in the order they were applied.
    pub fn iter(&self) -> impl Iterator<Item = &(TransportOption, OptionValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_ignores_case_and_prefix() {
        assert_eq!(TransportOption::from_name("useragent"), Some(TransportOption::UserAgent));
        assert_eq!(TransportOption::from_name("USERAGENT"), Some(TransportOption::UserAgent));
        assert_eq!(
            TransportOption::from_name("curlopt_UserAgent"),
            Some(TransportOption::UserAgent)
        );
        assert_eq!(
            TransportOption::from_name("CURLOPT_FOLLOWLOCATION"),
            Some(TransportOption::FollowLocation)
        );
    }

    #[test]
    fn from_name_rejects_unknown() {
        assert_eq!(TransportOption::from_name("SSL_VERIFYPEER"), None);
        assert_eq!(TransportOption::from_name(""), None);
        assert_eq!(TransportOption::from_name("CURLOPT_"), None);
    }

    #[test]
    fn every_option_resolves_from_its_own_name() {
        for opt in TransportOption::ALL {
            assert_eq!(TransportOption::from_name(opt.name()), Some(opt));
        }
    }

    #[test]
    fn int_coerces_to_bool() {
        assert_eq!(OptionValue::Int(1).coerce(OptionKind::Bool), Some(OptionValue::Bool(true)));
        assert_eq!(OptionValue::Int(0).coerce(OptionKind::Bool), Some(OptionValue::Bool(false)));
        assert_eq!(OptionValue::Text("1".into()).coerce(OptionKind::Bool), None);
        assert_eq!(OptionValue::Bool(true).coerce(OptionKind::Int), None);
    }

    #[test]
    fn json_values_map_to_option_values() {
        let v: Value = serde_json::json!(["A: 1", "B: 2"]);
        assert_eq!(
            OptionValue::from_json(&v),
            Some(OptionValue::List(vec!["A: 1".into(), "B: 2".into()]))
        );
        assert_eq!(OptionValue::from_json(&serde_json::json!(30)), Some(OptionValue::Int(30)));
        assert_eq!(OptionValue::from_json(&serde_json::json!([1, 2])), None);
        assert_eq!(OptionValue::from_json(&serde_json::json!({})), None);
        assert_eq!(OptionValue::from_json(&Value::Null), None);
    }

    #[test]
    fn last_set_value_wins() {
        let mut set = OptionSet::new();
        set.set(TransportOption::UserAgent, "default/1.0");
        set.set(TransportOption::Header, true);
        set.set(TransportOption::UserAgent, "custom/2.0");

        assert_eq!(set.get_text(TransportOption::UserAgent), Some("custom/2.0"));
        assert_eq!(set.len(), 3);
        assert!(!set.contains(TransportOption::Referer));
    }
}
