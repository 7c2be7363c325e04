use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;

use ::zip::ZipArchive;
use ::zip::result::ZipError;

use super::{Archive, EntrySession};
use crate::error::ArchiveError;

type SharedReader = Cursor<Arc<[u8]>>;

/// Encrypted ZIP archive whose first entry is the search target
///
/// The archive bytes are loaded once and shared; each session clones the
/// parsed central directory (reference counted) and gets its own cursor.
#[derive(Clone)]
pub struct ZipEntryArchive {
    archive: ZipArchive<SharedReader>,
    entry_index: usize,
    entry_name: String,
    checksum: u32,
    compressed_size: u64,
    size: u64,
}

impl ZipEntryArchive {
    /// Read and parse an archive from disk
    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes)
    }

    /// Parse an in-memory archive, tracking its first entry
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Result<Self, ArchiveError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes.into()))?;
        if archive.is_empty() {
            return Err(ArchiveError::Empty);
        }

        let entry_index = 0;
        let (entry_name, encrypted, checksum, compressed_size, size) = {
            let entry = archive.by_index_raw(entry_index)?;
            (
                entry.name().to_string(),
                entry.encrypted(),
                entry.crc32(),
                entry.compressed_size(),
                entry.size(),
            )
        };
        if !encrypted {
            return Err(ArchiveError::NotEncrypted { name: entry_name });
        }

        tracing::debug!(
            entry = %entry_name,
            checksum = format_args!("{checksum:#010x}"),
            compressed_size,
            size,
            "Tracking archive entry"
        );

        Ok(Self {
            archive,
            entry_index,
            entry_name,
            checksum,
            compressed_size,
            size,
        })
    }

    pub fn entry_name(&self) -> &str {
        &self.entry_name
    }

    /// Uncompressed size of the tracked entry
    pub fn entry_size(&self) -> u64 {
        self.size
    }

    pub fn compressed_size(&self) -> u64 {
        self.compressed_size
    }
}

impl Archive for ZipEntryArchive {
    type Session<'a> = ZipEntrySession;

    fn session(&self) -> ZipEntrySession {
        ZipEntrySession {
            archive: self.archive.clone(),
            entry_index: self.entry_index,
            checksum: self.checksum,
        }
    }
}

/// Worker-owned handle onto a [`ZipEntryArchive`]
pub struct ZipEntrySession {
    archive: ZipArchive<SharedReader>,
    entry_index: usize,
    checksum: u32,
}

impl EntrySession for ZipEntrySession {
    fn open_entry(&mut self, key: &str) -> Result<Box<dyn Read + '_>, ArchiveError> {
        let entry = self
            .archive
            .by_index_decrypt(self.entry_index, key.as_bytes())?;
        Ok(Box::new(entry))
    }

    fn stored_checksum(&self) -> u32 {
        self.checksum
    }
}

impl From<ZipError> for ArchiveError {
    fn from(err: ZipError) -> Self {
        match err {
            ZipError::InvalidPassword => ArchiveError::WrongKey,
            ZipError::Io(io) => ArchiveError::Io(io),
            other => ArchiveError::Format(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use ::zip::unstable::write::FileOptionsExt;
    use ::zip::write::{SimpleFileOptions, ZipWriter};

    fn build_zip(password: Option<&'static str>, payload: &[u8]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let mut options = SimpleFileOptions::default();
        if let Some(password) = password {
            options = options.with_deprecated_encryption(password.as_bytes());
        }
        writer.start_file("password.txt", options).unwrap();
        writer.write_all(payload).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_open_tracks_first_entry() {
        let payload = b"the storage key is under the mat";
        let archive = ZipEntryArchive::from_bytes(build_zip(Some("ab12"), payload)).unwrap();

        assert_eq!(archive.entry_name(), "password.txt");
        assert_eq!(archive.entry_size(), payload.len() as u64);
        assert_eq!(archive.session().stored_checksum(), crc32fast::hash(payload));
    }

    #[test]
    fn test_correct_key_decrypts_payload() {
        let payload = b"emergency storage";
        let archive = ZipEntryArchive::from_bytes(build_zip(Some("k3y"), payload)).unwrap();
        let mut session = archive.session();

        let mut content = Vec::new();
        session
            .open_entry("k3y")
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        assert_eq!(content, payload);
    }

    #[test]
    fn test_unencrypted_archive_is_rejected() {
        let result = ZipEntryArchive::from_bytes(build_zip(None, b"plain"));
        assert!(matches!(result, Err(ArchiveError::NotEncrypted { .. })));
    }

    #[test]
    fn test_garbage_is_format_error() {
        let result = ZipEntryArchive::from_bytes(vec![0u8; 64]);
        assert!(matches!(result, Err(ArchiveError::Format(_))));
    }
}
