//! Server address lookup for finished entries.

use std::io;
use std::net::{IpAddr, ToSocketAddrs};

use url::{Host, Url};

/// Host name resolution used when finishing an entry.
pub trait Resolve {
    /// All addresses for `host`, in resolver order.
    fn resolve(&self, host: &str) -> io::Result<Vec<IpAddr>>;
}

/// Blocking lookup through the system resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl Resolve for SystemResolver {
    fn resolve(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        Ok((host, 0).to_socket_addrs()?.map(|addr| addr.ip()).collect())
    }
}

/// Target of a lookup: a literal address needs no resolver.
pub(crate) enum Lookup {
    Literal(IpAddr),
    Domain(String),
}

pub(crate) fn lookup_target(url: &str) -> Option<Lookup> {
    let url = Url::parse(url).ok()?;
    match url.host()? {
        Host::Ipv4(addr) => Some(Lookup::Literal(addr.into())),
        Host::Ipv6(addr) => Some(Lookup::Literal(addr.into())),
        Host::Domain(domain) => Some(Lookup::Domain(domain.to_string())),
    }
}

/// First address for the host of `url`, `None` on any failure.
pub(crate) fn first_address<R: Resolve + ?Sized>(resolver: &R, url: &str) -> Option<IpAddr> {
    match lookup_target(url)? {
        Lookup::Literal(addr) => Some(addr),
        Lookup::Domain(host) => match resolver.resolve(&host) {
            Ok(addrs) => addrs.into_iter().next(),
            Err(e) => {
                tracing::debug!("Address lookup for {} failed: {}", host, e);
                None
            }
        },
    }
}

/// Async variant of [`first_address`] using the runtime's resolver.
pub(crate) async fn first_address_async(url: &str) -> Option<IpAddr> {
    match lookup_target(url)? {
        Lookup::Literal(addr) => Some(addr),
        Lookup::Domain(host) => match tokio::net::lookup_host((host.as_str(), 0)).await {
            Ok(mut addrs) => addrs.next().map(|addr| addr.ip()),
            Err(e) => {
                tracing::debug!("Address lookup for {} failed: {}", host, e);
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unreachable;

    impl Resolve for Unreachable {
        fn resolve(&self, _host: &str) -> io::Result<Vec<IpAddr>> {
            Err(io::Error::new(io::ErrorKind::NotFound, "no such host"))
        }
    }

    #[test]
    fn test_literal_addresses_skip_resolver() {
        assert_eq!(
            first_address(&Unreachable, "http://127.0.0.1:8080/"),
            Some("127.0.0.1".parse().unwrap())
        );
        assert_eq!(
            first_address(&Unreachable, "http://[::1]/"),
            Some("::1".parse().unwrap())
        );
    }

    #[test]
    fn test_lookup_failure_is_none() {
        assert_eq!(first_address(&Unreachable, "https://example.invalid/"), None);
        assert_eq!(first_address(&Unreachable, "not a url"), None);
    }
}
