//! Functions to extract a `.tar.gz` archive from a file on disk.

use std::path::Path;

use crate::{ExtractError, ExtractResult};

/// Extracts the contents of the `.tar.gz` archive at the specified path to a directory.
///
/// ```rust,no_run
/// # use std::path::Path;
/// use tzfetch_streaming::fs::extract_tar_gz;
/// let _ = extract_tar_gz(
///     Path::new("downloads/tzdata-2024a.tar.gz"),
///     Path::new("/tmp/tzdata"))
///     .unwrap();
/// ```
pub fn extract_tar_gz(archive: &Path, destination: &Path) -> Result<ExtractResult, ExtractError> {
    let file = fs_err::File::open(archive).map_err(ExtractError::CouldNotOpenArchive)?;
    crate::read::extract_tar_gz(file, destination)
}
