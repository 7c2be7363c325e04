//! Call-counting fake archive and recording observer for search tests

use std::collections::HashMap;
use std::io::{self, Read};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, ThreadId};
use std::time::Duration;

use crate::archive::{Archive, EntrySession};
use crate::error::ArchiveError;
use crate::parallel::CancelToken;

use super::observer::{ProgressSample, RoundPlan, RoundReport, SearchObserver};

const PAYLOAD: &[u8] = b"Emergency storage key: tango-lima-7";
const GARBAGE: &[u8] = b"\x8f\x02\xd1garbage that decrypted by accident";

/// In-memory archive where stage 1 accepts a configurable set of keys
#[derive(Default)]
pub struct FakeArchive {
    keys: Vec<String>,
    false_positives: Vec<String>,
    broken_open: Vec<String>,
    broken_read: Vec<String>,
    delay: Option<Duration>,
    watched: Option<CancelToken>,
    pub opens: AtomicU64,
    pub payload_bytes_read: AtomicU64,
    /// Opens that started after the watched token was cancelled, per thread
    pub opens_after_cancel: Mutex<HashMap<ThreadId, u64>>,
}

impl FakeArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key that decrypts to the real payload
    pub fn with_key(mut self, key: &str) -> Self {
        self.keys.push(key.to_string());
        self
    }

    /// Key that passes stage 1 but yields the wrong content
    pub fn with_false_positive(mut self, key: &str) -> Self {
        self.false_positives.push(key.to_string());
        self
    }

    /// Key whose open fails with a format error
    pub fn with_broken_open(mut self, key: &str) -> Self {
        self.broken_open.push(key.to_string());
        self
    }

    /// Key that opens but whose payload read fails after the first byte
    pub fn with_broken_read(mut self, key: &str) -> Self {
        self.broken_read.push(key.to_string());
        self
    }

    /// Sleep inside every open, to widen race windows
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Count opens that start after `token` is cancelled
    pub fn watching(mut self, token: &CancelToken) -> Self {
        self.watched = Some(token.clone());
        self
    }

    /// Largest number of post-cancel opens made by any one thread
    pub fn max_opens_after_cancel(&self) -> u64 {
        self.opens_after_cancel
            .lock()
            .unwrap()
            .values()
            .copied()
            .max()
            .unwrap_or(0)
    }

    pub fn payload_len(&self) -> usize {
        PAYLOAD.len()
    }
}

impl Archive for FakeArchive {
    type Session<'a> = FakeSession<'a>;

    fn session(&self) -> FakeSession<'_> {
        FakeSession { archive: self }
    }
}

pub struct FakeSession<'a> {
    archive: &'a FakeArchive,
}

impl EntrySession for FakeSession<'_> {
    fn open_entry(&mut self, key: &str) -> Result<Box<dyn Read + '_>, ArchiveError> {
        let archive = self.archive;
        archive.opens.fetch_add(1, Ordering::SeqCst);
        if archive.watched.as_ref().is_some_and(CancelToken::is_cancelled) {
            *archive
                .opens_after_cancel
                .lock()
                .unwrap()
                .entry(thread::current().id())
                .or_default() += 1;
        }
        if let Some(delay) = archive.delay {
            std::thread::sleep(delay);
        }

        let has = |keys: &[String]| keys.iter().any(|k| k == key);
        let data = if has(&archive.keys) {
            PAYLOAD
        } else if has(&archive.false_positives) {
            GARBAGE
        } else if has(&archive.broken_open) {
            return Err(ArchiveError::Format("invalid local header".to_string()));
        } else if has(&archive.broken_read) {
            return Ok(Box::new(CountingReader {
                data: PAYLOAD,
                counter: &archive.payload_bytes_read,
                fail_after: Some(1),
            }));
        } else {
            return Err(ArchiveError::WrongKey);
        };

        Ok(Box::new(CountingReader {
            data,
            counter: &archive.payload_bytes_read,
            fail_after: None,
        }))
    }

    fn stored_checksum(&self) -> u32 {
        crc32fast::hash(PAYLOAD)
    }
}

struct CountingReader<'a> {
    data: &'a [u8],
    counter: &'a AtomicU64,
    fail_after: Option<usize>,
}

impl Read for CountingReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(limit) = self.fail_after {
            if limit == 0 {
                return Err(io::Error::new(io::ErrorKind::InvalidData, "corrupt deflate stream"));
            }
            let n = buf.len().min(limit).min(self.data.len());
            self.fail_after = Some(limit - n);
            return self.copy(buf, n);
        }
        let n = buf.len().min(self.data.len());
        self.copy(buf, n)
    }
}

impl CountingReader<'_> {
    fn copy(&mut self, buf: &mut [u8], n: usize) -> io::Result<usize> {
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        self.counter.fetch_add(n as u64, Ordering::SeqCst);
        Ok(n)
    }
}

/// Observer that records what it was told
#[derive(Default)]
pub struct RecordingObserver {
    pub progress: Mutex<Vec<(usize, u64, String)>>,
    pub rounds_started: Mutex<Vec<String>>,
    pub rounds_finished: Mutex<Vec<(String, u64)>>,
    pub false_positives: Mutex<Vec<String>>,
}

impl SearchObserver for RecordingObserver {
    fn round_started(&self, plan: &RoundPlan<'_>) {
        self.rounds_started.lock().unwrap().push(plan.prefix.to_string());
    }

    fn progress(&self, sample: &ProgressSample<'_>) {
        self.progress.lock().unwrap().push((
            sample.worker_id,
            sample.examined,
            sample.last_candidate.to_string(),
        ));
    }

    fn false_positive(&self, _worker_id: usize, candidate: &str) {
        self.false_positives.lock().unwrap().push(candidate.to_string());
    }

    fn round_finished(&self, report: &RoundReport<'_>) {
        self.rounds_finished
            .lock()
            .unwrap()
            .push((report.prefix.to_string(), report.outcome.examined));
    }
}
