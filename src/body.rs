//! Single-consumption message bodies and the buffer-and-rewrap operation.

use std::fmt;
use std::io::{self, Read};

use bytes::{Buf, Bytes};

use crate::error::{Error, Result};

/// Body of an `http::Request<Body>` or `http::Response<Body>`.
///
/// A `Stream` body can be read exactly once. After [`buffer_in_place`] the body
/// is `Buffered` and the same bytes can be handed out again without copying.
#[derive(Default)]
pub enum Body {
    #[default]
    Empty,
    Buffered(Bytes),
    Stream(Box<dyn Read + Send>),
}

impl Body {
    pub fn empty() -> Self {
        Self::Empty
    }

    pub fn from_reader(reader: impl Read + Send + 'static) -> Self {
        Self::Stream(Box::new(reader))
    }

    /// Known length in bytes, `None` for unread streams.
    pub fn size_hint(&self) -> Option<u64> {
        match self {
            Self::Empty => Some(0),
            Self::Buffered(bytes) => Some(bytes.len() as u64),
            Self::Stream(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size_hint() == Some(0)
    }

    /// Buffered bytes, if the body has already been read into memory.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Buffered(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Body::Empty"),
            Self::Buffered(bytes) => write!(f, "Body::Buffered({} bytes)", bytes.len()),
            Self::Stream(_) => f.write_str("Body::Stream(..)"),
        }
    }
}

impl Read for Body {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Empty => Ok(0),
            Self::Buffered(bytes) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                bytes.advance(n);
                Ok(n)
            }
            Self::Stream(reader) => reader.read(buf),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        if bytes.is_empty() {
            Self::Empty
        } else {
            Self::Buffered(bytes)
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes::from(bytes).into()
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Bytes::from(text).into()
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Bytes::from_static(text.as_bytes()).into()
    }
}

impl From<&'static [u8]> for Body {
    fn from(bytes: &'static [u8]) -> Self {
        Bytes::from_static(bytes).into()
    }
}

/// Read `body` fully, leave a re-readable copy of the same bytes in its place
/// and return an owned handle to them.
///
/// On read failure the bytes received so far are put back and
/// [`Error::BodyRead`] is returned.
pub fn buffer_in_place(body: &mut Body) -> Result<Bytes> {
    match std::mem::take(body) {
        Body::Empty => Ok(Bytes::new()),
        Body::Buffered(bytes) => {
            *body = Body::Buffered(bytes.clone());
            Ok(bytes)
        }
        Body::Stream(mut reader) => {
            let mut buf = Vec::new();
            let outcome = reader.read_to_end(&mut buf);
            let bytes = Bytes::from(buf);
            *body = Body::from(bytes.clone());
            match outcome {
                Ok(_) => Ok(bytes),
                Err(e) => Err(Error::body_read(e)),
            }
        }
    }
}
