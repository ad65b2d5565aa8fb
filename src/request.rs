//! Conversion of `http::Request<Body>` into an archive request.

use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, Request, Uri};
use url::{Position, Url};

use crate::body::{self, Body};
use crate::cookie::{request_cookies, to_har_cookies};
use crate::error::{Error, Result};
use crate::har::{self, QueryParam};
use crate::headers::{convert_headers, get_header, with_content_length, HeaderOrder};
use crate::post_data;
use crate::size::request_headers_size;
use crate::version::protocol_str;

/// Convert a request into its archive form.
///
/// The body is buffered and put back, so `req` can still be sent afterwards.
/// Header order follows a [`HeaderOrder`] stored in the request extensions.
pub fn convert_request(req: &mut Request<Body>) -> Result<har::Request> {
    let url = absolute_url(req.uri())?;

    let buffered = if skip_body(req.headers(), req.body()) {
        None
    } else {
        Some(body::buffer_in_place(req.body_mut())?)
    };
    let body_len = buffered.as_ref().map_or(0, |b| b.len());

    let mime_type = get_header(req.headers(), CONTENT_TYPE).unwrap_or_default();
    let post_data = match &buffered {
        Some(bytes) if !bytes.is_empty() => Some(post_data::extract(&mime_type, bytes)?),
        _ => None,
    };

    let wire_headers = with_content_length(req.headers(), body_len);
    let headers = convert_headers(&wire_headers, req.extensions().get::<HeaderOrder>());

    let method = req.method().as_str().to_string();
    let protocol = protocol_str(req.version());
    let headers_size = request_headers_size(&method, request_target(&url), protocol, &headers);

    Ok(har::Request {
        method,
        url: req.uri().to_string(),
        http_version: protocol.to_string(),
        cookies: to_har_cookies(&request_cookies(req.headers())),
        headers,
        query_string: query_params(&url),
        post_data,
        headers_size,
        body_size: body_len as i64,
        comment: None,
    })
}

/// Parse the request URI, which must carry scheme and authority.
///
/// The parsed form is normalized, so it only feeds the query string and the
/// request target; the archive keeps the URI as written.
pub(crate) fn absolute_url(uri: &Uri) -> Result<Url> {
    if uri.scheme().is_none() || uri.authority().is_none() {
        return Err(Error::missing(format!("absolute request URL (got {uri})")));
    }
    Ok(Url::parse(&uri.to_string())?)
}

/// Bodies that are absent or declared empty are not read at all.
pub(crate) fn skip_body(headers: &HeaderMap, body: &Body) -> bool {
    body.is_empty() || declared_length(headers) == Some(0)
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    get_header(headers, CONTENT_LENGTH)?.trim().parse().ok()
}

fn request_target(url: &Url) -> &str {
    &url[Position::BeforePath..Position::AfterQuery]
}

fn query_params(url: &Url) -> Vec<QueryParam> {
    url.query_pairs()
        .map(|(name, value)| QueryParam {
            name: name.into_owned(),
            value: value.into_owned(),
        })
        .collect()
}
