//! Functions that enable extracting or streaming a `.tar.gz` archive for objects that implement the
//! [`std::io::Read`] trait.

use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::entry::ArchiveEntry;
use crate::materialize::{materialize, Materialized};
use crate::{ExtractError, ExtractResult};

/// The decompressed stream that the tar reader consumes.
pub type GzStream<R> = BufReader<MultiGzDecoder<R>>;

/// A decompressed tar stream. Use [`ArchiveReader::entries`] to iterate over the entries in the
/// archive.
pub struct ArchiveReader<R: Read> {
    archive: tar::Archive<GzStream<R>>,
}

/// Returns the `.tar.gz` as a decompressed tar stream.
///
/// The gzip header is decoded before this function returns so a stream that is not gzip fails
/// here, before any entry is produced. Concatenated gzip members are read as a single stream.
pub fn stream_tar_gz<R: Read>(reader: R) -> Result<ArchiveReader<R>, ExtractError> {
    let mut decoder = BufReader::new(MultiGzDecoder::new(reader));
    decoder.fill_buf().map_err(ExtractError::CorruptArchive)?;
    if decoder.get_ref().header().is_none() {
        return Err(ExtractError::CorruptArchive(std::io::Error::new(
            ErrorKind::InvalidData,
            "missing gzip header",
        )));
    }

    Ok(ArchiveReader {
        archive: tar::Archive::new(decoder),
    })
}

impl<R: Read> ArchiveReader<R> {
    /// Returns a lazy iterator over the entries of the archive, in archive order.
    ///
    /// The iterator stops at the end of the archive. After an error no further entries are
    /// produced.
    pub fn entries(&mut self) -> Result<Entries<'_, R>, ExtractError> {
        let inner = self
            .archive
            .entries()
            .map_err(ExtractError::CorruptArchive)?;
        Ok(Entries { inner })
    }

    /// Consumes this instance and returns the original reader.
    pub fn into_inner(self) -> R {
        self.archive.into_inner().into_inner().into_inner()
    }
}

impl<R: Read> std::fmt::Debug for ArchiveReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveReader").finish_non_exhaustive()
    }
}

/// Iterator over the entries of an [`ArchiveReader`].
pub struct Entries<'a, R: 'a + Read> {
    inner: tar::Entries<'a, GzStream<R>>,
}

impl<'a, R: 'a + Read> Iterator for Entries<'a, R> {
    type Item = Result<ArchiveEntry<'a, GzStream<R>>, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inner.next()?;
        Some(
            entry
                .map_err(ExtractError::CorruptArchive)
                .and_then(ArchiveEntry::new),
        )
    }
}

/// Extracts the contents of a `.tar.gz` archive into `destination`.
///
/// Entries are written one at a time in archive order. On failure, entries that were already
/// written stay on disk.
pub fn extract_tar_gz(
    reader: impl Read,
    destination: &Path,
) -> Result<ExtractResult, ExtractError> {
    let mut archive = stream_tar_gz(reader)?;

    let mut result = ExtractResult::default();
    for entry in archive.entries()? {
        let mut entry = entry?;
        match materialize(&mut entry, destination)? {
            Materialized::Directory => result.directories += 1,
            Materialized::File { size } => {
                result.files += 1;
                result.total_size += size;
            }
        }
    }

    Ok(result)
}
