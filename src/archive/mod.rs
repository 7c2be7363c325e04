//! Archive collaborator seam
//!
//! The search core never parses or decrypts container formats. It asks an
//! [`Archive`] for a per-worker [`EntrySession`] and calls two primitives on
//! it: open the tracked entry with a key, and report the stored checksum.
//! Full payload reads go through [`std::io::Read`].

pub mod zip_entry;

use std::io::Read;

use crate::error::ArchiveError;

pub use zip_entry::ZipEntryArchive;

/// A read-only protected archive shared by every worker of a search
pub trait Archive: Sync {
    type Session<'a>: EntrySession
    where
        Self: 'a;

    /// Per-worker handle; sessions never share mutable state with each other
    fn session(&self) -> Self::Session<'_>;
}

/// One worker's view of the single tracked entry
pub trait EntrySession {
    /// Open the tracked entry with `key`, yielding the decrypted stream
    fn open_entry(&mut self, key: &str) -> Result<Box<dyn Read + '_>, ArchiveError>;

    /// CRC-32 recorded for the tracked entry
    fn stored_checksum(&self) -> u32;
}
