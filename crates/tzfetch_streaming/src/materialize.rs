//! Turns [`ArchiveEntry`]s into directories and files on disk.

use std::fs::{DirBuilder, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Component, Path, PathBuf};

use crate::entry::{ArchiveEntry, EntryKind};
use crate::ExtractError;

/// Size of the buffer used to copy file contents (128KB).
const COPY_BUF_SIZE: usize = 128 * 1024;

/// Describes what [`materialize`] created on disk.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Materialized {
    /// A directory was created, or already existed.
    Directory,

    /// A regular file was written.
    File {
        /// The number of content bytes written.
        size: u64,
    },
}

/// Returns the location on disk of an entry with the given archive path.
///
/// Root and prefix components are dropped so the result always starts with `base`. Parent
/// directory components (`..`) are kept as-is, which means that a crafted archive can write
/// outside of `base`.
pub fn target_path(base: &Path, entry_path: &Path) -> PathBuf {
    let mut target = base.to_path_buf();
    for component in entry_path.components() {
        match component {
            Component::Normal(part) => target.push(part),
            Component::ParentDir => target.push(Component::ParentDir.as_os_str()),
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
        }
    }
    target
}

/// Creates the directory or file described by `entry` below `base`.
///
/// Directories are created together with all their missing ancestors, an existing directory is
/// not an error. Regular files are created or truncated and receive the full content of the
/// entry. On unix the permission bits of the entry are applied.
pub fn materialize<R: Read>(
    entry: &mut ArchiveEntry<'_, R>,
    base: &Path,
) -> Result<Materialized, ExtractError> {
    let path = target_path(base, entry.path());
    if entry
        .path()
        .components()
        .any(|component| component == Component::ParentDir)
    {
        tracing::warn!(
            "archive entry '{}' refers to a parent directory, writing to {}",
            entry.path().display(),
            path.display()
        );
    }

    match entry.kind() {
        EntryKind::Directory => {
            tracing::debug!("making directory: {}", path.display());
            create_directory(&path, entry.mode())?;
            Ok(Materialized::Directory)
        }
        EntryKind::RegularFile => {
            tracing::debug!("unpacking file: {}", path.display());
            let size = write_file(entry, &path)?;
            Ok(Materialized::File { size })
        }
        EntryKind::Unsupported(kind) => Err(ExtractError::UnsupportedEntryKind {
            path: entry.path().to_path_buf(),
            kind,
        }),
    }
}

fn create_directory(path: &Path, mode: u32) -> Result<(), ExtractError> {
    let map_err = |source: std::io::Error| ExtractError::Materialize {
        path: path.to_path_buf(),
        source,
    };

    // Existing directories keep their permissions.
    if path.is_dir() {
        return Ok(());
    }

    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    builder.create(path).map_err(map_err)?;

    // The mode passed to the builder is subject to the umask.
    set_permissions(path, mode).map_err(map_err)
}

fn write_file<R: Read>(entry: &mut ArchiveEntry<'_, R>, path: &Path) -> Result<u64, ExtractError> {
    let map_err = |source: std::io::Error| ExtractError::Materialize {
        path: path.to_path_buf(),
        source,
    };

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(entry.mode());
    }
    let mut file = match options.open(path) {
        // A read-only file from an earlier extraction is replaced.
        Err(err) if err.kind() == ErrorKind::PermissionDenied && path.is_file() => {
            std::fs::remove_file(path).map_err(map_err)?;
            options.open(path).map_err(map_err)?
        }
        result => result.map_err(map_err)?,
    };
    set_permissions(path, entry.mode()).map_err(map_err)?;

    let written = copy_contents(&mut *entry, &mut file, path)?;
    if written != entry.size() {
        return Err(ExtractError::CorruptArchive(std::io::Error::new(
            ErrorKind::UnexpectedEof,
            format!(
                "archive ended after {written} of {} bytes of '{}'",
                entry.size(),
                entry.path().display()
            ),
        )));
    }

    Ok(written)
}

/// Copies `reader` into `writer`. Unlike [`std::io::copy`] this keeps errors of the two sides
/// apart: a failing read means the archive is broken, a failing write is a filesystem problem.
fn copy_contents(
    reader: &mut impl Read,
    writer: &mut impl Write,
    path: &Path,
) -> Result<u64, ExtractError> {
    let mut buf = vec![0u8; COPY_BUF_SIZE];
    let mut written = 0u64;
    loop {
        let bytes_read = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(bytes_read) => bytes_read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(ExtractError::CorruptArchive(err)),
        };
        writer
            .write_all(&buf[..bytes_read])
            .map_err(|source| ExtractError::Materialize {
                path: path.to_path_buf(),
                source,
            })?;
        written += bytes_read as u64;
    }
    writer.flush().map_err(|source| ExtractError::Materialize {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(written)
}

#[cfg(unix)]
fn set_permissions(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_permissions(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}
