//! Defines [`ArchiveEntry`], a single item read from a tar stream.

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::ExtractError;

/// Only the permission bits of a tar mode are applied to the filesystem.
const PERMISSION_BITS: u32 = 0o7777;

/// The kind of an [`ArchiveEntry`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// A directory.
    Directory,

    /// A regular file with content.
    RegularFile,

    /// Any other tar entry type (symlinks, hardlinks, devices, fifos, ...). Holds the raw type
    /// flag from the header.
    Unsupported(u8),
}

impl From<tar::EntryType> for EntryKind {
    fn from(value: tar::EntryType) -> Self {
        match value {
            tar::EntryType::Directory => EntryKind::Directory,
            // `Regular` covers both the `'0'` flag and the legacy NUL flag.
            tar::EntryType::Regular => EntryKind::RegularFile,
            other => EntryKind::Unsupported(other.as_byte()),
        }
    }
}

/// A single entry of a tar archive. The content of regular files can be read through the
/// [`Read`] implementation of this type.
///
/// Entries borrow the archive they were read from, so only one entry can be alive at a time.
pub struct ArchiveEntry<'a, R: 'a + Read> {
    inner: tar::Entry<'a, R>,
    path: PathBuf,
    mode: u32,
    size: u64,
    kind: EntryKind,
}

impl<'a, R: 'a + Read> ArchiveEntry<'a, R> {
    /// Reads the metadata of a raw tar entry.
    pub(crate) fn new(inner: tar::Entry<'a, R>) -> Result<Self, ExtractError> {
        let path = inner
            .path()
            .map_err(ExtractError::CorruptArchive)?
            .into_owned();
        let mode = inner.header().mode().map_err(ExtractError::CorruptArchive)? & PERMISSION_BITS;
        // Takes a pax `size` record into account.
        let size = inner.size();

        // Old archivers mark directories with the legacy NUL type flag and a trailing slash.
        let kind = match EntryKind::from(inner.header().entry_type()) {
            EntryKind::RegularFile
                if inner.header().as_old().linkflag[0] == b'\0'
                    && inner.path_bytes().ends_with(b"/") =>
            {
                EntryKind::Directory
            }
            kind => kind,
        };

        Ok(Self {
            inner,
            path,
            mode,
            size,
            kind,
        })
    }

    /// The path of the entry relative to the root of the archive.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The permission bits of the entry.
    pub fn mode(&self) -> u32 {
        self.mode
    }

    /// The kind of the entry.
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// The size of the content in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }
}

impl<'a, R: 'a + Read> Read for ArchiveEntry<'a, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<'a, R: 'a + Read> std::fmt::Debug for ArchiveEntry<'a, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveEntry")
            .field("path", &self.path)
            .field("mode", &format_args!("{:o}", self.mode))
            .field("kind", &self.kind)
            .field("size", &self.size)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::EntryKind;
    use rstest::rstest;

    #[rstest]
    #[case(tar::EntryType::Directory, EntryKind::Directory)]
    #[case(tar::EntryType::Regular, EntryKind::RegularFile)]
    #[case(tar::EntryType::new(b'\0'), EntryKind::RegularFile)]
    #[case(tar::EntryType::Symlink, EntryKind::Unsupported(b'2'))]
    #[case(tar::EntryType::Link, EntryKind::Unsupported(b'1'))]
    #[case(tar::EntryType::Fifo, EntryKind::Unsupported(b'6'))]
    fn test_entry_kind(#[case] entry_type: tar::EntryType, #[case] expected: EntryKind) {
        assert_eq!(EntryKind::from(entry_type), expected);
    }
}
