//! # Harwire
//!
//! Turns in-memory HTTP transactions into HTTP Archive (HAR 1.2) entries.
//!
//! Requests and responses are `http::Request<Body>` / `http::Response<Body>`.
//! Converting reads each body once and puts a re-readable copy back, so the
//! caller can still send the request or consume the response afterwards.
//!
//! ```rust,ignore
//! use harwire::{Archive, Body, EntryBuilder};
//!
//! let archive = Archive::default();
//! let mut builder = EntryBuilder::start(&mut request, &jar_cookies)?;
//! // ... send request, receive response ...
//! builder.attach(&mut response)?;
//! archive.add(builder.finish(false));
//! archive.save("session.har").await?;
//! ```

pub mod archive;
pub mod body;
pub mod cookie;
pub mod entry;
pub mod error;
pub mod har;
pub mod headers;
pub mod post_data;
pub mod request;
pub mod resolve;
pub mod response;
pub mod size;
pub mod version;

// Re-exports
pub use archive::{build_har, Archive};
pub use body::Body;
pub use cookie::Cookie;
pub use entry::EntryBuilder;
pub use error::{Error, Result};
pub use har::{Creator, Har};
pub use headers::HeaderOrder;
pub use request::convert_request;
pub use resolve::{Resolve, SystemResolver};
pub use response::convert_response;
