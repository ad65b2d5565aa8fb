//! Entry builder: accumulates one archive entry across a request's lifecycle.
//!
//! ```text
//! start(request) --> request attached --attach(response)--> response attached
//! ```
//!
//! Once a response is attached the entry no longer changes; `finish` hands it
//! out, optionally filling in the server address.

use std::time::{Duration, Instant};

use chrono::Utc;
use http::{Request, Response};
use url::Url;

use crate::body::Body;
use crate::cookie::{to_har_cookies, Cookie};
use crate::error::{Error, Result};
use crate::har::{Cache, Entry, Timings};
use crate::headers::merge_cookie_header;
use crate::request::convert_request;
use crate::resolve::{first_address, first_address_async, Resolve, SystemResolver};
use crate::response::convert_response;

/// Builds a single [`Entry`] from a request and, later, its response.
///
/// One builder per in-flight transaction; builders share nothing.
#[derive(Debug)]
pub struct EntryBuilder {
    entry: Entry,
    started: Instant,
    request_url: Option<Url>,
}

impl EntryBuilder {
    /// Convert `req` and start the clock.
    ///
    /// `extra_cookies` are cookies a jar adds at send time without touching
    /// `req`; they are merged into both the `Cookie` header and the cookie list.
    pub fn start(req: &mut Request<Body>, extra_cookies: &[Cookie]) -> Result<Self> {
        let started_date_time = Utc::now();
        let started = Instant::now();

        let mut request = convert_request(req)?;
        merge_cookie_header(&mut request.headers, extra_cookies);
        request.cookies.extend(to_har_cookies(extra_cookies));

        tracing::debug!(
            "Entry started: {} {} ({} jar cookies)",
            request.method,
            request.url,
            extra_cookies.len()
        );

        let request_url = Url::parse(&request.url).ok();
        Ok(Self {
            entry: Entry {
                started_date_time,
                time: Timings::UNMEASURED,
                request,
                response: None,
                cache: Cache::default(),
                timings: Timings::default(),
                server_ip_address: None,
            },
            started,
            request_url,
        })
    }

    /// Record time spent sending the request.
    pub fn record_send(&mut self, elapsed: Duration) -> Result<()> {
        self.ensure_open("send")?;
        self.entry.timings.send = millis(elapsed);
        Ok(())
    }

    /// Record time spent waiting for the first response byte.
    pub fn record_wait(&mut self, elapsed: Duration) -> Result<()> {
        self.ensure_open("wait")?;
        self.entry.timings.wait = millis(elapsed);
        Ok(())
    }

    /// Convert and attach the response, closing the timing window.
    ///
    /// On error the entry stays without a response.
    pub fn attach(&mut self, resp: &mut Response<Body>) -> Result<()> {
        if self.entry.response.is_some() {
            return Err(Error::ResponseAlreadyAttached);
        }

        let response = convert_response(resp, self.request_url.as_ref())?;
        self.entry.timings.receive = millis(self.started.elapsed());
        self.entry.time = self.entry.timings.total();

        tracing::debug!(
            "Entry completed: {} {} -> {} in {}ms",
            self.entry.request.method,
            self.entry.request.url,
            response.status,
            self.entry.time
        );

        self.entry.response = Some(response);
        Ok(())
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    pub fn has_response(&self) -> bool {
        self.entry.response.is_some()
    }

    /// Hand out the entry, resolving the server address through the system
    /// resolver when `resolve_address` is set. This blocks on DNS.
    pub fn finish(self, resolve_address: bool) -> Entry {
        self.finish_using(&SystemResolver, resolve_address)
    }

    /// Hand out the entry with the server address looked up through `resolver`.
    /// Lookup failure leaves the address empty.
    pub fn finish_with<R: Resolve + ?Sized>(self, resolver: &R) -> Entry {
        self.finish_using(resolver, true)
    }

    /// Hand out the entry, consulting `resolver` only when `resolve_address` is set.
    pub fn finish_using<R: Resolve + ?Sized>(
        mut self,
        resolver: &R,
        resolve_address: bool,
    ) -> Entry {
        if resolve_address {
            self.entry.server_ip_address =
                first_address(resolver, &self.entry.request.url).map(|ip| ip.to_string());
        }
        self.entry
    }

    /// Like [`finish`](Self::finish) but resolves without blocking the thread.
    pub async fn finish_async(mut self, resolve_address: bool) -> Entry {
        if resolve_address {
            self.entry.server_ip_address = first_address_async(&self.entry.request.url)
                .await
                .map(|ip| ip.to_string());
        }
        self.entry
    }

    fn ensure_open(&self, phase: &'static str) -> Result<()> {
        if self.entry.response.is_some() {
            return Err(Error::RequestPhaseClosed(phase));
        }
        Ok(())
    }
}

fn millis(elapsed: Duration) -> f64 {
    elapsed.as_millis() as f64
}
