//! Response conversion tests: status, cookies, headers, content and redirects.

use harwire::{convert_response, Body};

mod helpers;
use helpers::fixtures::*;

const BODY_TEXT: &str = "response";
const CONTENT_TYPE: &str = "text/plain";

#[test]
fn test_status_and_protocol() {
    let mut resp = response(200, Body::empty(), None);
    let har = convert_response(&mut resp, None).unwrap();

    assert_eq!(har.status, 200);
    assert_eq!(har.status_text, "OK");
    assert_eq!(har.http_version, "HTTP/1.1");
    assert_eq!(har.headers_size, -1);
}

#[test]
fn test_unknown_status_has_empty_text() {
    let mut resp = response(599, Body::empty(), None);
    let har = convert_response(&mut resp, None).unwrap();
    assert_eq!(har.status_text, "");
}

#[test]
fn test_set_cookie_is_materialized() {
    let mut resp = response(200, Body::empty(), None);
    let har = convert_response(&mut resp, None).unwrap();

    assert_eq!(har.cookies.len(), 1);
    let cookie = &har.cookies[0];
    assert_eq!(cookie.name, "name");
    assert_eq!(cookie.value, "value");
    assert_eq!(cookie.path, "/");
    assert_eq!(cookie.domain, "example.com");
    assert_eq!(cookie.expires, "2025-05-12T00:00:00Z");
    assert!(cookie.http_only);
    assert!(cookie.secure);
}

#[test]
fn test_headers_keep_map_order() {
    let mut resp = response(200, Body::empty(), None);
    let har = convert_response(&mut resp, None).unwrap();

    assert_eq!(har.headers.len(), 2);
    assert_eq!(har.headers[0].name, "Name");
    assert_eq!(har.headers[0].value, "value");
    assert_eq!(har.headers[1].name, "Set-Cookie");
}

#[test]
fn test_content_and_body_size() {
    let mut resp = response(200, BODY_TEXT, Some(CONTENT_TYPE));
    let har = convert_response(&mut resp, None).unwrap();

    assert_eq!(har.content.size, BODY_TEXT.len() as i64);
    assert_eq!(har.content.mime_type, CONTENT_TYPE);
    assert_eq!(har.content.text.as_deref(), Some(BODY_TEXT));
    assert_eq!(har.body_size, BODY_TEXT.len() as i64);

    // The caller can still consume the response body.
    assert_eq!(resp.body().as_bytes().map(|b| b.as_ref()), Some(BODY_TEXT.as_bytes()));
}

#[test]
fn test_empty_body_has_no_text() {
    let mut resp = response(204, Body::empty(), None);
    let har = convert_response(&mut resp, None).unwrap();

    assert_eq!(har.content.size, 0);
    assert_eq!(har.content.text, None);
    assert_eq!(har.body_size, 0);
}

#[test]
fn test_redirect_url() {
    let mut found = response(302, Body::empty(), None);
    let har = convert_response(&mut found, None).unwrap();
    assert_eq!(har.redirect_url, LOCATION);

    let mut ok = response(200, Body::empty(), None);
    let har = convert_response(&mut ok, None).unwrap();
    assert_eq!(har.redirect_url, "");
}

#[test]
fn test_streamed_body_is_buffered() {
    let reader = std::io::Cursor::new(BODY_TEXT.as_bytes().to_vec());
    let mut resp = response(200, Body::from_reader(reader), Some(CONTENT_TYPE));
    let har = convert_response(&mut resp, None).unwrap();

    assert_eq!(har.content.text.as_deref(), Some(BODY_TEXT));
    assert_eq!(resp.body().size_hint(), Some(BODY_TEXT.len() as u64));
}
