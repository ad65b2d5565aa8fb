//! Request body classification into archive post-data.

use bytes::Bytes;
use futures::executor::block_on;
use multer::{Constraints, Multipart, SizeLimit};

use crate::error::Result;
use crate::har::{Param, PostBody, PostData};

/// Upper bound for a multipart/form-data body held in memory (32 MiB).
pub const MAX_MULTIPART_MEMORY: u64 = 32 << 20;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART_FORM: &str = "multipart/form-data";

/// Classify a buffered body by its declared `Content-Type`.
///
/// Form bodies become parameter lists, everything else raw text.
pub fn extract(mime_type: &str, body: &Bytes) -> Result<PostData> {
    let lowered = mime_type.to_ascii_lowercase();
    let body = if lowered.starts_with(FORM_URLENCODED) {
        PostBody::Params(parse_urlencoded(body))
    } else if lowered.starts_with(MULTIPART_FORM) {
        PostBody::Params(parse_multipart(mime_type, body.clone())?)
    } else {
        PostBody::Text(String::from_utf8_lossy(body).into_owned())
    };

    Ok(PostData {
        mime_type: mime_type.to_string(),
        body,
    })
}

/// Split on `&` then on the first `=`. Pieces without `=` are dropped and
/// nothing is percent-decoded.
fn parse_urlencoded(body: &[u8]) -> Vec<Param> {
    String::from_utf8_lossy(body)
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| Param::field(name, value))
        .collect()
}

fn parse_multipart(content_type: &str, body: Bytes) -> Result<Vec<Param>> {
    let boundary = multer::parse_boundary(content_type)?;
    let stream = futures::stream::once(futures::future::ready(Ok::<_, std::io::Error>(body)));
    let constraints =
        Constraints::new().size_limit(SizeLimit::new().whole_stream(MAX_MULTIPART_MEMORY));
    let mut multipart = Multipart::with_constraints(stream, boundary, constraints);

    // The whole body is already in memory, so every poll completes immediately.
    block_on(async move {
        let mut params = Vec::new();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(|m| m.to_string());
            let data = field.bytes().await?;
            let value = Some(String::from_utf8_lossy(&data).into_owned());

            // Only file parts carry a filename and declared content type.
            params.push(Param {
                name,
                value,
                content_type: file_name.as_ref().and(content_type),
                file_name,
            });
        }
        Ok::<_, crate::Error>(params)
    })
}
