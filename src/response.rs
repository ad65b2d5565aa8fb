//! Conversion of `http::Response<Body>` into an archive response.

use std::io::Read;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use http::header::{CONTENT_ENCODING, CONTENT_TYPE, LOCATION};
use http::{HeaderMap, Response};
use url::{ParseError, Url};

use crate::body::{self, Body};
use crate::cookie::{response_cookies, to_har_cookies};
use crate::error::Result;
use crate::har::{self, Content};
use crate::headers::{convert_headers, get_header, HeaderOrder};
use crate::request::skip_body;
use crate::size::NOT_COMPUTED;
use crate::version::protocol_str;

/// Convert a response into its archive form.
///
/// `base` is the request URL; relative `Location` headers are resolved against it.
pub fn convert_response(resp: &mut Response<Body>, base: Option<&Url>) -> Result<har::Response> {
    let buffered = if skip_body(resp.headers(), resp.body()) {
        Bytes::new()
    } else {
        body::buffer_in_place(resp.body_mut())?
    };

    let status = resp.status();
    Ok(har::Response {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        http_version: protocol_str(resp.version()).to_string(),
        cookies: to_har_cookies(&response_cookies(resp.headers())),
        headers: convert_headers(resp.headers(), resp.extensions().get::<HeaderOrder>()),
        content: build_content(resp.headers(), &buffered),
        redirect_url: redirect_url(resp, base),
        headers_size: NOT_COMPUTED,
        body_size: buffered.len() as i64,
        comment: None,
    })
}

/// `Location` of a 3xx response, empty otherwise.
///
/// Absolute locations are kept exactly as sent; only relative ones are joined
/// onto `base`.
fn redirect_url(resp: &Response<Body>, base: Option<&Url>) -> String {
    if !resp.status().is_redirection() {
        return String::new();
    }
    let Some(location) = get_header(resp.headers(), LOCATION) else {
        return String::new();
    };
    if !matches!(Url::parse(&location), Err(ParseError::RelativeUrlWithoutBase)) {
        return location;
    }
    match base.map(|b| b.join(&location)) {
        Some(Ok(resolved)) => resolved.to_string(),
        _ => location,
    }
}

fn build_content(headers: &HeaderMap, raw: &Bytes) -> Content {
    let mime_type = get_header(headers, CONTENT_TYPE).unwrap_or_default();
    if raw.is_empty() {
        return Content {
            size: 0,
            compression: None,
            mime_type,
            text: None,
            encoding: None,
        };
    }

    let (payload, compression) = match decode_body(headers, raw) {
        Some(decoded) => {
            let saved = decoded.len() as i64 - raw.len() as i64;
            (decoded, Some(saved))
        }
        None => (raw.clone(), None),
    };

    let (text, encoding) = match std::str::from_utf8(&payload) {
        Ok(text) => (text.to_string(), None),
        Err(_) => (BASE64.encode(&payload), Some("base64".to_string())),
    };

    Content {
        size: payload.len() as i64,
        compression,
        mime_type,
        text: Some(text),
        encoding,
    }
}

/// Decode body based on Content-Encoding (gzip, deflate, br, zstd).
///
/// `None` when the body is not encoded or cannot be decoded; the archive then
/// keeps the raw bytes.
fn decode_body(headers: &HeaderMap, raw: &[u8]) -> Option<Bytes> {
    let encoding = get_header(headers, CONTENT_ENCODING)?.trim().to_ascii_lowercase();
    let decoded = match encoding.as_str() {
        "gzip" | "x-gzip" => decode_gzip(raw),
        "deflate" => decode_deflate(raw),
        "br" => decode_brotli(raw),
        "zstd" => decode_zstd(raw),
        "" | "identity" => return None,
        other => {
            tracing::debug!("Unsupported Content-Encoding {:?}, keeping raw body", other);
            return None;
        }
    };
    match decoded {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            tracing::warn!("Failed to decode {} body, keeping raw bytes: {}", encoding, e);
            None
        }
    }
}

fn decode_gzip(data: &[u8]) -> std::io::Result<Bytes> {
    let mut decoder = flate2::read::GzDecoder::new(data);
    let mut decoded = Vec::new();
    decoder.read_to_end(&mut decoded)?;
    Ok(Bytes::from(decoded))
}

fn decode_deflate(data: &[u8]) -> std::io::Result<Bytes> {
    let mut decoded = Vec::new();
    if flate2::read::ZlibDecoder::new(data).read_to_end(&mut decoded).is_ok() {
        return Ok(Bytes::from(decoded));
    }
    decoded.clear();
    flate2::read::DeflateDecoder::new(data).read_to_end(&mut decoded)?;
    Ok(Bytes::from(decoded))
}

fn decode_brotli(data: &[u8]) -> std::io::Result<Bytes> {
    let mut decoder = brotli::Decompressor::new(data, 4096);
    let mut decoded = Vec::new();
    decoder.read_to_end(&mut decoded)?;
    Ok(Bytes::from(decoded))
}

fn decode_zstd(data: &[u8]) -> std::io::Result<Bytes> {
    zstd::stream::decode_all(data).map(Bytes::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.append(*k, v.parse().unwrap());
        }
        map
    }

    #[test]
    fn test_gzip_content_is_decoded() {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&b"hello ".repeat(100)).unwrap();
        let raw = Bytes::from(encoder.finish().unwrap());

        let content = build_content(
            &headers(&[("content-type", "text/plain"), ("content-encoding", "gzip")]),
            &raw,
        );
        assert_eq!(content.size, 600);
        assert_eq!(content.text.as_deref(), Some("hello ".repeat(100).as_str()));
        assert_eq!(content.compression, Some(600 - raw.len() as i64));
    }

    #[test]
    fn test_corrupt_encoding_keeps_raw_bytes() {
        let raw = Bytes::from_static(b"not gzip");
        let content = build_content(&headers(&[("content-encoding", "gzip")]), &raw);
        assert_eq!(content.text.as_deref(), Some("not gzip"));
        assert_eq!(content.compression, None);
    }

    #[test]
    fn test_binary_content_is_base64() {
        let raw = Bytes::from_static(&[0xff, 0xfe, 0x00]);
        let content = build_content(&headers(&[("content-type", "image/png")]), &raw);
        assert_eq!(content.encoding.as_deref(), Some("base64"));
        assert_eq!(content.text.as_deref(), Some("//4A"));
        assert_eq!(content.size, 3);
    }

    #[test]
    fn test_relative_location_is_resolved() {
        let mut resp = Response::builder()
            .status(301)
            .header(LOCATION, "/moved")
            .body(Body::empty())
            .unwrap();
        let base = Url::parse("https://example.com/old?x=1").unwrap();

        let har = convert_response(&mut resp, Some(&base)).unwrap();
        assert_eq!(har.redirect_url, "https://example.com/moved");

        let har = convert_response(&mut resp, None).unwrap();
        assert_eq!(har.redirect_url, "/moved");
    }

    #[test]
    fn test_absolute_location_is_kept_verbatim() {
        let mut resp = Response::builder()
            .status(302)
            .header(LOCATION, "https://Other.example.com")
            .body(Body::empty())
            .unwrap();
        let base = Url::parse("https://example.com/a").unwrap();

        let har = convert_response(&mut resp, Some(&base)).unwrap();
        assert_eq!(har.redirect_url, "https://Other.example.com");
    }
}
