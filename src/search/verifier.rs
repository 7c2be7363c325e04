//! Two-stage candidate verification
//!
//! Stage 1 opens the entry with the candidate key and reads a single byte.
//! Almost every wrong key fails here, either on the encryption header check
//! or on the first block of the compressed stream. Stage 2 only runs for the
//! survivors: it reads the whole payload and compares its CRC-32 with the
//! checksum stored in the archive.

use std::io::Read;

use crate::archive::EntrySession;
use crate::error::ArchiveError;

/// Result of verifying one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Miss,
    Match(String),
    /// Passed stage 1 but the payload checksum did not match
    FalsePositive(String),
}

/// Verify `candidate` against the entry behind `session`
///
/// Archive errors never escape: they are logged and reported as [`Verdict::Miss`].
pub fn verify<S>(session: &mut S, candidate: &str) -> Verdict
where
    S: EntrySession + ?Sized,
{
    let expected = session.stored_checksum();

    // Stage 1: open and pull one byte
    let mut reader = match session.open_entry(candidate) {
        Ok(reader) => reader,
        Err(ArchiveError::WrongKey) => return Verdict::Miss,
        Err(err) => {
            tracing::trace!(candidate, error = %err, "Stage 1 rejected candidate");
            return Verdict::Miss;
        }
    };

    let mut first = [0u8; 1];
    let head = match reader.read(&mut first) {
        Ok(n) => n,
        Err(err) => {
            tracing::trace!(candidate, error = %err, "Stage 1 read failed");
            return Verdict::Miss;
        }
    };

    // Stage 2: full payload and checksum
    let mut content = first[..head].to_vec();
    if let Err(err) = reader.read_to_end(&mut content) {
        tracing::debug!(candidate, error = %err, "Stage 2 read failed after stage 1 passed");
        return Verdict::Miss;
    }

    let actual = crc32fast::hash(&content);
    if actual == expected {
        Verdict::Match(candidate.to_string())
    } else {
        tracing::warn!(
            candidate,
            expected = format_args!("{expected:#010x}"),
            actual = format_args!("{actual:#010x}"),
            "Checksum mismatch after stage 1 passed"
        );
        Verdict::FalsePositive(candidate.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::Archive;
    use crate::search::testing::FakeArchive;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_wrong_key_never_reads_payload() {
        let archive = FakeArchive::new().with_key("bba");
        let mut session = archive.session();

        assert_eq!(verify(&mut session, "aaa"), Verdict::Miss);
        assert_eq!(verify(&mut session, "abb"), Verdict::Miss);

        assert_eq!(archive.opens.load(Ordering::SeqCst), 2);
        assert_eq!(archive.payload_bytes_read.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_correct_key_reads_full_payload() {
        let archive = FakeArchive::new().with_key("bba");
        let mut session = archive.session();

        assert_eq!(verify(&mut session, "bba"), Verdict::Match("bba".to_string()));
        assert_eq!(
            archive.payload_bytes_read.load(Ordering::SeqCst),
            archive.payload_len() as u64
        );
    }

    #[test]
    fn test_false_positive_is_not_a_match() {
        let archive = FakeArchive::new().with_key("bba").with_false_positive("aab");
        let mut session = archive.session();

        let verdict = verify(&mut session, "aab");
        assert_eq!(verdict, Verdict::FalsePositive("aab".to_string()));
        assert!(!matches!(verdict, Verdict::Match(_)));
    }

    #[test]
    fn test_archive_errors_are_misses() {
        let archive = FakeArchive::new()
            .with_key("bba")
            .with_broken_open("abb")
            .with_broken_read("bab");
        let mut session = archive.session();

        assert_eq!(verify(&mut session, "abb"), Verdict::Miss);
        assert_eq!(verify(&mut session, "bab"), Verdict::Miss);
        assert_eq!(verify(&mut session, "bba"), Verdict::Match("bba".to_string()));
    }
}
