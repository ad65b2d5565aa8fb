//! Cookie parsing and conversion to archive cookies.
//!
//! Request cookies come from `Cookie` headers, response cookies from
//! `Set-Cookie` headers. Jar cookies handed to the entry builder use the same
//! [`Cookie`] type.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use http::header::{HeaderMap, COOKIE, SET_COOKIE};

use crate::har;
use crate::headers::value_str;

/// RFC 6265 cookie as seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub domain: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: Option<String>,
    pub expires: Option<DateTime<Utc>>,
    pub max_age: Option<i64>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: String::new(),
            domain: String::new(),
            secure: false,
            http_only: false,
            same_site: None,
            expires: None,
            max_age: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Parse one `Set-Cookie` header value. Returns `None` when the header has
    /// no `name=value` pair or an empty name.
    pub fn from_set_cookie_header(header: &str) -> Option<Self> {
        let mut parts = header.split(';').map(str::trim);
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = Cookie::new(name, unquote(value.trim()));
        for attr in parts {
            if attr.eq_ignore_ascii_case("secure") {
                cookie.secure = true;
            } else if attr.eq_ignore_ascii_case("httponly") {
                cookie.http_only = true;
            } else if let Some((key, val)) = attr.split_once('=') {
                let val = val.trim();
                match key.trim().to_ascii_lowercase().as_str() {
                    "domain" => cookie.domain = val.strip_prefix('.').unwrap_or(val).to_lowercase(),
                    "path" => cookie.path = val.to_string(),
                    "expires" => cookie.expires = parse_cookie_date(val),
                    "max-age" => cookie.max_age = val.parse().ok(),
                    "samesite" => cookie.same_site = Some(val.to_string()),
                    _ => {}
                }
            }
        }
        Some(cookie)
    }

    /// Archive form. Session cookies get an empty expiry.
    ///
    /// Expiry is RFC 3339 in UTC (`Z`) with fractional seconds padded to 0, 3,
    /// 6 or 9 digits, e.g. `2025-05-12T00:00:00.500Z`.
    pub fn to_har(&self) -> har::Cookie {
        har::Cookie {
            name: self.name.clone(),
            value: self.value.clone(),
            path: self.path.clone(),
            domain: self.domain.clone(),
            expires: self
                .expires
                .map(|dt| dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
                .unwrap_or_default(),
            http_only: self.http_only,
            secure: self.secure,
        }
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Cookies carried by a request's `Cookie` headers, in header order.
pub fn request_cookies(headers: &HeaderMap) -> Vec<Cookie> {
    headers
        .get_all(COOKIE)
        .iter()
        .flat_map(|value| {
            let header = value_str(value);
            let cookies: Vec<Cookie> = header
                .split(';')
                .filter_map(|pair| {
                    let (name, value) = pair.trim().split_once('=')?;
                    let name = name.trim();
                    (!name.is_empty()).then(|| Cookie::new(name, unquote(value.trim())))
                })
                .collect();
            cookies
        })
        .collect()
}

/// Cookies set by a response's `Set-Cookie` headers. Unparseable headers are skipped.
pub fn response_cookies(headers: &HeaderMap) -> Vec<Cookie> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| Cookie::from_set_cookie_header(&value_str(value)))
        .collect()
}

pub fn to_har_cookies(cookies: &[Cookie]) -> Vec<har::Cookie> {
    cookies.iter().map(Cookie::to_har).collect()
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn parse_cookie_date(date_str: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(date_str) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in [
        "%a, %d-%b-%Y %H:%M:%S GMT",
        "%a, %d-%b-%y %H:%M:%S GMT",
        "%A, %d-%b-%y %H:%M:%S GMT",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, fmt) {
            return Some(dt.and_utc());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.with_timezone(&Utc));
    }
    date_str.parse::<i64>().ok().and_then(|ts| Utc.timestamp_opt(ts, 0).single())
}
