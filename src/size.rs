//! Header block size accounting.
//!
//! The request head is counted as it would appear on an HTTP/1.x wire:
//!
//! ```text
//! <METHOD> <PATH?QUERY> <PROTOCOL>\r\n
//! <Name>: <Value>\r\n        (one line per archive header)
//! \r\n                       (single blank line)
//! ```

use crate::har::Header;

/// Response header size is not computed.
pub const NOT_COMPUTED: i64 = -1;

const CRLF: &str = "\r\n";

/// Byte size of the request line, header lines and terminating blank line.
pub fn request_headers_size(method: &str, target: &str, protocol: &str, headers: &[Header]) -> i64 {
    let request_line = method.len() + 1 + target.len() + 1 + protocol.len() + CRLF.len();
    let header_lines: usize = headers
        .iter()
        .map(|h| h.name.len() + ": ".len() + h.value.len() + CRLF.len())
        .sum();
    (request_line + header_lines + CRLF.len()) as i64
}
