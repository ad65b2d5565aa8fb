//! Protocol version strings as they appear in the archive.

use http::Version;

/// Get the wire form of an HTTP version (`HTTP/1.1`, `HTTP/2.0`, ...).
pub fn protocol_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_strings() {
        assert_eq!(protocol_str(Version::HTTP_11), "HTTP/1.1");
        assert_eq!(protocol_str(Version::HTTP_2), "HTTP/2.0");
        assert_eq!(protocol_str(Version::HTTP_3), "HTTP/3.0");
    }
}
