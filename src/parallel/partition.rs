//! Deterministic slicing of a round's sub-keyspace into worker chunks

/// Half-open range `[start, end)` of candidate indices owned by one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub start: u64,
    pub end: u64,
}

impl Chunk {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split `size` candidates into at most `worker_count` contiguous chunks
///
/// The first `size % workers` chunks receive one extra candidate, so chunk
/// lengths differ by at most one. When there are fewer candidates than
/// workers, one single-candidate chunk is produced per candidate. Empty
/// chunks are never produced, so `size == 0` or `worker_count == 0` yields
/// an empty plan.
pub fn partition(size: u64, worker_count: usize) -> Vec<Chunk> {
    if size == 0 || worker_count == 0 {
        return Vec::new();
    }

    let workers = (worker_count as u64).min(size);
    let base = size / workers;
    let remainder = size % workers;

    let mut chunks = Vec::with_capacity(workers as usize);
    let mut start = 0;
    for worker_idx in 0..workers {
        let len = base + u64::from(worker_idx < remainder);
        chunks.push(Chunk::new(start, start + len));
        start += len;
    }

    debug_assert_eq!(start, size);
    chunks
}
