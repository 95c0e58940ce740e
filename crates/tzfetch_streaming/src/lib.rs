#![deny(missing_docs)]

//! This crate provides the ability to unpack a gzip-compressed tar archive, streamed from a reader,
//! a file on disk or a remote url, into a directory.

use std::path::PathBuf;

pub mod entry;
pub mod fs;
pub mod materialize;
pub mod read;

#[cfg(feature = "reqwest")]
pub mod reqwest;

/// An error that can occur when extracting an archive.
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    /// The archive could not be retrieved from its remote location.
    #[cfg(feature = "reqwest")]
    #[error(transparent)]
    Fetch(#[from] crate::reqwest::FetchError),

    /// The local archive could not be opened.
    #[error("could not open the archive")]
    CouldNotOpenArchive(#[source] std::io::Error),

    /// The stream is not valid gzip or the tar structure inside it is broken.
    #[error("corrupt archive")]
    CorruptArchive(#[source] std::io::Error),

    /// The archive contains an entry that is neither a directory nor a regular file.
    #[error("cannot handle tar entry '{}' with type {kind}", .path.display())]
    UnsupportedEntryKind {
        /// The path of the entry as stored in the archive.
        path: PathBuf,
        /// The raw tar type flag of the entry.
        kind: u8,
    },

    /// Writing an entry to the filesystem failed.
    #[error("failed to materialize '{}'", .path.display())]
    Materialize {
        /// The target path on disk.
        path: PathBuf,
        /// The underlying io error.
        #[source]
        source: std::io::Error,
    },
}

/// Result struct returned by extraction functions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractResult {
    /// The number of directory entries that were materialized.
    pub directories: usize,

    /// The number of regular files that were written.
    pub files: usize,

    /// The total number of content bytes written to regular files.
    pub total_size: u64,
}
