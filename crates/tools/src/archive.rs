use std::io::Write;

use flate2::{write::GzEncoder, Compression};
use tar::{EntryType, Header};

/// Size of the two zero blocks that mark the end of a tar archive.
const END_OF_ARCHIVE_LEN: usize = 1024;

/// Builds a gzip-compressed tar archive in memory.
///
/// Entries are written in the order in which they are added. GNU headers are used so paths of
/// any length are supported.
pub struct TarGzBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarGzBuilder {
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a directory entry.
    pub fn directory(self, path: &str, mode: u32) -> Self {
        self.entry(EntryType::Directory, path, mode, &[])
    }

    /// Adds a regular file entry with the given content.
    pub fn file(self, path: &str, mode: u32, content: &[u8]) -> Self {
        self.entry(EntryType::Regular, path, mode, content)
    }

    /// Adds a symbolic link entry.
    pub fn symlink(mut self, path: &str, target: &str) -> Self {
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Symlink);
        header.set_mode(0o777);
        header.set_size(0);
        self.builder
            .append_link(&mut header, path, target)
            .expect("failed to append symlink");
        self
    }

    /// Adds an entry of an arbitrary type without content.
    pub fn entry_of_type(self, entry_type: EntryType, path: &str, mode: u32) -> Self {
        self.entry(entry_type, path, mode, &[])
    }

    /// Adds a regular file whose path and size are only stored in a pax extended header. The
    /// ustar header that follows carries a placeholder name and a size of zero.
    pub fn pax_file(mut self, path: &str, mode: u32, content: &[u8]) -> Self {
        let mut records = pax_record("path", path.as_bytes());
        records.extend(pax_record("size", content.len().to_string().as_bytes()));

        let mut pax_header = Header::new_ustar();
        pax_header.set_entry_type(EntryType::XHeader);
        pax_header
            .set_path("PaxHeaders/entry")
            .expect("invalid pax header path");
        pax_header.set_mode(0o644);
        pax_header.set_size(records.len() as u64);
        pax_header.set_cksum();
        self.builder
            .append(&pax_header, records.as_slice())
            .expect("failed to append pax header");

        let mut header = Header::new_ustar();
        header.set_entry_type(EntryType::Regular);
        header.set_path("placeholder").expect("invalid path");
        header.set_mode(mode);
        header.set_size(0);
        header.set_cksum();
        self.builder
            .append(&header, content)
            .expect("failed to append entry");
        self
    }

    /// Adds an entry with the legacy NUL type flag that pre-POSIX archivers used for regular
    /// files.
    pub fn legacy_entry(mut self, path: &str, mode: u32, content: &[u8]) -> Self {
        let mut header = Header::new_gnu();
        header.set_mode(mode);
        header.set_size(content.len() as u64);
        header.as_old_mut().linkflag[0] = b'\0';
        self.builder
            .append_data(&mut header, path, content)
            .expect("failed to append entry");
        self
    }

    fn entry(mut self, entry_type: EntryType, path: &str, mode: u32, content: &[u8]) -> Self {
        let mut header = Header::new_gnu();
        header.set_entry_type(entry_type);
        header.set_mode(mode);
        header.set_size(content.len() as u64);
        self.builder
            .append_data(&mut header, path, content)
            .expect("failed to append entry");
        self
    }

    /// Finishes the tar stream and compresses it.
    pub fn finish(self) -> Vec<u8> {
        gzip(&self.builder.into_inner().expect("failed to finish archive"))
    }

    /// Like [`TarGzBuilder::finish`] but without the end-of-archive marker, so another archive
    /// can be appended to the result.
    pub fn finish_without_trailer(self) -> Vec<u8> {
        let mut tar = self.builder.into_inner().expect("failed to finish archive");
        tar.truncate(tar.len() - END_OF_ARCHIVE_LEN);
        gzip(&tar)
    }
}

/// Encodes a single `"<length> <key>=<value>\n"` pax record, the length includes itself.
fn pax_record(key: &str, value: &[u8]) -> Vec<u8> {
    let rest = key.len() + value.len() + 3;
    let mut length = rest + 1;
    while length != rest + length.to_string().len() {
        length = rest + length.to_string().len();
    }

    let mut record = format!("{length} {key}=").into_bytes();
    record.extend_from_slice(value);
    record.push(b'\n');
    record
}

/// Compresses `data` as a single gzip member.
fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("failed to compress");
    encoder.finish().expect("failed to compress")
}
