//! Header normalization: ordering hints, canonical names and cookie merging.
//!
//! Fingerprint-aware clients send headers in a fixed order. That order travels
//! next to the header map as a [`HeaderOrder`] value (usually stored in the
//! request's `http::Extensions`) and is replayed when converting headers.

use std::collections::HashSet;

use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH};

use crate::cookie::Cookie;
use crate::har::Header;

/// Desired output order of header names.
///
/// Names are matched case-insensitively. Headers not listed keep the header
/// map's own order and follow the listed ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderOrder(Vec<String>);

impl HeaderOrder {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for HeaderOrder {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Canonical header name: first letter of each hyphen segment upper-cased,
/// the rest lower-cased (`content-type` -> `Content-Type`).
pub fn canonical_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c.to_ascii_lowercase());
        }
        upper = c == '-';
    }
    out
}

/// Convert a header map to ordered archive headers.
///
/// Hinted names come first in hint order, each with all its values; the rest
/// follow in map order. Values of one name keep their relative order.
pub fn convert_headers(headers: &HeaderMap, order: Option<&HeaderOrder>) -> Vec<Header> {
    let mut out = Vec::with_capacity(headers.len());
    let mut seen: HashSet<HeaderName> = HashSet::new();

    for name in order.into_iter().flat_map(|o| o.iter()) {
        // Names the map could never hold are skipped rather than rejected.
        let Ok(key) = HeaderName::from_bytes(name.as_bytes()) else {
            continue;
        };
        if !seen.insert(key.clone()) {
            continue;
        }
        push_values(&mut out, &key, headers);
    }

    for key in headers.keys() {
        if !seen.contains(key) {
            push_values(&mut out, key, headers);
        }
    }

    out
}

fn push_values(out: &mut Vec<Header>, key: &HeaderName, headers: &HeaderMap) {
    let name = canonical_name(key.as_str());
    for value in headers.get_all(key) {
        out.push(Header::new(name.clone(), value_str(value)));
    }
}

pub(crate) fn value_str(value: &HeaderValue) -> String {
    String::from_utf8_lossy(value.as_bytes()).into_owned()
}

/// Copy of `headers` with a `Content-Length` added when the body is non-empty
/// and none is declared. The caller's map is left untouched.
pub fn with_content_length(headers: &HeaderMap, body_len: usize) -> HeaderMap {
    let mut cloned = headers.clone();
    if body_len > 0 && !cloned.contains_key(CONTENT_LENGTH) {
        cloned.insert(CONTENT_LENGTH, HeaderValue::from(body_len));
    }
    cloned
}

/// First value of `name`, lossily decoded.
pub fn get_header(headers: &HeaderMap, name: impl http::header::AsHeaderName) -> Option<String> {
    headers.get(name).map(value_str)
}

/// Append `cookies` to the archive `Cookie` header, creating it if absent.
pub fn merge_cookie_header(headers: &mut Vec<Header>, cookies: &[Cookie]) {
    if cookies.is_empty() {
        return;
    }

    let joined = cookies
        .iter()
        .map(|c| format!("{}={}", c.name, c.value))
        .collect::<Vec<_>>()
        .join("; ");

    match headers.iter_mut().find(|h| h.name.eq_ignore_ascii_case("cookie")) {
        Some(header) if header.value.is_empty() => header.value = joined,
        Some(header) => header.value = format!("{}; {}", header.value, joined),
        None => headers.push(Header::new("Cookie", joined)),
    }
}
