//! Request payloads: pre-encoded strings or form mappings.

use std::collections::{BTreeMap, HashMap};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything but the RFC 3986 unreserved characters is escaped.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Query string or request body handed to a verb method.
///
/// A `Text` payload is sent as-is. A `Form` payload is encoded as
/// `key=value` pairs joined by `&`, with keys and values percent-escaped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Payload {
    #[default]
    Empty,
    Text(String),
    Form(Vec<(String, String)>),
}

impl Payload {
    pub fn encode(&self) -> String {
        match self {
            Payload::Empty => String::new(),
            Payload::Text(s) => s.clone(),
            Payload::Form(pairs) => pairs
                .iter()
                .map(|(k, v)| {
                    format!(
                        "{}={}",
                        utf8_percent_encode(k, FORM_ENCODE_SET),
                        utf8_percent_encode(v, FORM_ENCODE_SET)
                    )
                })
                .collect::<Vec<_>>()
                .join("&"),
        }
    }
}

/// Append an encoded query to `url`, using `&` when it already has a query.
pub fn append_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}{query}")
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Text(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Text(s)
    }
}

impl From<()> for Payload {
    fn from(_: ()) -> Self {
        Payload::Empty
    }
}

impl<K: ToString, V: ToString> From<Vec<(K, V)>> for Payload {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Payload::Form(pairs.into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }
}

impl<K: ToString, V: ToString> From<&[(K, V)]> for Payload {
    fn from(pairs: &[(K, V)]) -> Self {
        Payload::Form(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }
}

impl<K: ToString, V: ToString, const N: usize> From<[(K, V); N]> for Payload {
    fn from(pairs: [(K, V); N]) -> Self {
        Payload::Form(pairs.into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }
}

impl<K: ToString, V: ToString> From<BTreeMap<K, V>> for Payload {
    fn from(map: BTreeMap<K, V>) -> Self {
        Payload::Form(map.into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }
}

/// Pairs are sorted by key so the encoding does not depend on hash order.
impl<K: ToString, V: ToString, S> From<HashMap<K, V, S>> for Payload {
    fn from(map: HashMap<K, V, S>) -> Self {
        let mut pairs: Vec<(String, String)> =
            map.into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        pairs.sort();
        Payload::Form(pairs)
    }
}
