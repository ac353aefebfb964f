//! Body spooling into a uniquely named temp file under the output root.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{TEMP_PREFIX, TEMP_SUFFIX};
use crate::checksum::DigestWriter;
use crate::transport::BodySink;

/// Streams a response body to disk. The temp file is created on the first
/// chunk, so responses that never produce a body leave nothing behind.
/// Dropping a `Spool` (or the [`Spooled`] it finishes into) removes the file.
pub struct Spool {
    dir: PathBuf,
    file: Option<DigestWriter<NamedTempFile>>,
}

impl Spool {
    /// Spool into `dir`, which must be on the same filesystem as the final
    /// location for the rename to be atomic.
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            file: None,
        }
    }

    /// Path of the temp file, once created.
    pub fn temp_path(&self) -> Option<&Path> {
        self.file.as_ref().map(|f| f.get_ref().path())
    }

    /// Flushes and closes the writer side. `None` when no body arrived.
    pub fn finish(self) -> io::Result<Option<Spooled>> {
        let Some(mut writer) = self.file else {
            return Ok(None);
        };
        writer.flush()?;
        let size = writer.written();
        let (file, sha256) = writer.finish();
        Ok(Some(Spooled { file, size, sha256 }))
    }

    fn open(&mut self) -> io::Result<&mut DigestWriter<NamedTempFile>> {
        if self.file.is_none() {
            let tmp = tempfile::Builder::new()
                .prefix(TEMP_PREFIX)
                .suffix(TEMP_SUFFIX)
                .tempfile_in(&self.dir)?;
            self.file = Some(DigestWriter::new(tmp));
        }
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "spool file missing"))
    }
}

impl BodySink for Spool {
    fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        self.open()?.write_all(data)
    }
}

/// A completely spooled body awaiting inspection and the final rename.
pub struct Spooled {
    file: NamedTempFile,
    size: u64,
    sha256: String,
}

impl Spooled {
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    pub fn temp_path(&self) -> &Path {
        self.file.path()
    }

    /// Reads up to `limit` bytes from the start of the spooled body.
    pub fn read_prefix(&self, limit: usize) -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(limit.min(self.size as usize));
        self.file.reopen()?.take(limit as u64).read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Creates missing parent directories and atomically renames the temp file
    /// to `final_path`. On failure the temp file is removed.
    pub fn persist(self, final_path: &Path) -> io::Result<()> {
        if let Some(parent) = final_path.parent() {
            // create_dir_all treats a concurrent creator as success.
            std::fs::create_dir_all(parent)?;
        }
        self.file
            .persist(final_path)
            .map(|_| ())
            .map_err(|e| e.error)
    }
}
