//! Shared request/response fixtures.

use std::io;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};

use harwire::{Body, HeaderOrder, Resolve};
use http::{Request, Response, Version};

pub const URL: &str = "https://example.com/api?foo=bar";

pub const HEADER1_NAME: &str = "NaMe1";
pub const HEADER1_VALUE: &str = "value1";
pub const HEADER2_NAME: &str = "nAmE2";
pub const HEADER2_VALUE: &str = "value2";

pub const COOKIE_NAME: &str = "name";
pub const COOKIE_VALUE: &str = "value";

pub const PART1_NAME: &str = "name1";
pub const PART1_VALUE: &str = "value1";
pub const PART2_NAME: &str = "file";
pub const PART2_VALUE: &str = "content";
pub const PART2_FILENAME: &str = "test.txt";
pub const PART2_CONTENT_TYPE: &str = "application/octet-stream";

pub const BOUNDARY: &str = "X-HARWIRE-BOUNDARY";

pub const LOCATION: &str = "https://example.com/redirect";

/// POST request with a cookie, two custom headers and an ordering hint that
/// reverses them.
pub fn request(body: impl Into<Body>, content_type: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(URL)
        .version(Version::HTTP_11)
        .header("Cookie", format!("{COOKIE_NAME}={COOKIE_VALUE}"))
        .header(HEADER1_NAME, HEADER1_VALUE)
        .header(HEADER2_NAME, HEADER2_VALUE)
        .extension(HeaderOrder::new([HEADER2_NAME, HEADER1_NAME]));
    if let Some(content_type) = content_type {
        builder = builder.header("Content-Type", content_type);
    }
    builder.body(body.into()).unwrap()
}

/// Multipart body with one plain field and one file part.
pub fn multipart_body() -> (Vec<u8>, String) {
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"{PART1_NAME}\"\r\n\
         \r\n\
         {PART1_VALUE}\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"{PART2_NAME}\"; filename=\"{PART2_FILENAME}\"\r\n\
         Content-Type: {PART2_CONTENT_TYPE}\r\n\
         \r\n\
         {PART2_VALUE}\r\n\
         --{b}--\r\n",
        b = BOUNDARY
    );
    (body.into_bytes(), format!("multipart/form-data; boundary={BOUNDARY}"))
}

/// Response with a custom header, a full `Set-Cookie` and, for 3xx, a `Location`.
pub fn response(status: u16, body: impl Into<Body>, content_type: Option<&str>) -> Response<Body> {
    let mut builder = Response::builder()
        .status(status)
        .version(Version::HTTP_11)
        .header("Name", "value")
        .header(
            "Set-Cookie",
            "name=value;path=/;domain=example.com;expires=Mon, 12 May 2025 00:00:00 GMT;httponly;secure",
        );
    if let Some(content_type) = content_type {
        builder = builder.header("Content-Type", content_type);
    }
    if (300..400).contains(&status) {
        builder = builder.header("Location", LOCATION);
    }
    builder.body(body.into()).unwrap()
}

/// Resolver double that counts lookups and answers with a fixed address.
#[derive(Default)]
pub struct CountingResolver {
    pub calls: AtomicUsize,
}

impl CountingResolver {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Resolve for CountingResolver {
    fn resolve(&self, _host: &str) -> io::Result<Vec<IpAddr>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec!["93.184.216.34".parse().unwrap(), "2606:2800:220:1::".parse().unwrap()])
    }
}

/// Resolver double that always fails.
pub struct FailingResolver;

impl Resolve for FailingResolver {
    fn resolve(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        Err(io::Error::new(io::ErrorKind::NotFound, format!("{host}: no such host")))
    }
}
