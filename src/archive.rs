//! Archive assembly and persistence.

use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use http::{Request, Response};

use crate::body::Body;
use crate::entry::EntryBuilder;
use crate::error::{Error, Result};
use crate::har::{Creator, Entry, Har, Log, HAR_VERSION};

/// Ordered collection of finished entries.
///
/// `add` may be called from many threads; entries keep insertion order.
#[derive(Debug, Default)]
pub struct Archive {
    creator: Creator,
    entries: Mutex<Vec<Entry>>,
}

impl Archive {
    pub fn new(creator: Creator) -> Self {
        Self {
            creator,
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn creator(&self) -> &Creator {
        &self.creator
    }

    pub fn add(&self, entry: Entry) {
        self.lock().push(entry);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of the archive as a HAR document.
    pub fn to_har(&self) -> Har {
        Har {
            log: Log {
                version: HAR_VERSION.to_string(),
                creator: self.creator.clone(),
                entries: self.lock().clone(),
            },
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_har())?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_har())?)
    }

    /// Write the pretty-printed archive to `writer`.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        Ok(serde_json::to_writer_pretty(writer, &self.to_har())?)
    }

    /// Render and write the archive to `path`. The write is not atomic.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json_pretty()?;
        tokio::fs::write(path.as_ref(), json)
            .await
            .map_err(Error::persist)?;
        tracing::debug!("Saved {} entries to {}", self.len(), path.as_ref().display());
        Ok(())
    }

    /// Blocking variant of [`save`](Self::save).
    pub fn save_blocking(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json_pretty()?;
        std::fs::write(path.as_ref(), json).map_err(Error::persist)?;
        tracing::debug!("Saved {} entries to {}", self.len(), path.as_ref().display());
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One-shot conversion of a single transaction into a complete document.
pub fn build_har(
    req: &mut Request<Body>,
    resp: &mut Response<Body>,
    resolve_address: bool,
) -> Result<Har> {
    let mut builder = EntryBuilder::start(req, &[])?;
    builder.attach(resp)?;

    let archive = Archive::default();
    archive.add(builder.finish(resolve_address));
    Ok(archive.to_har())
}
