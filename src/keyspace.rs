//! Fixed-length keyspace over an ordered alphabet
//!
//! Candidates are addressed by their index in the lexicographic order of the
//! product space (`alphabet^length`), where the alphabet order defines the
//! symbol order. Nothing here materializes candidates in bulk: a
//! [`CandidateCursor`] walks a range like an odometer, reusing one buffer.

use crate::error::SetupError;

/// Characters a-z followed by 0-9, the default search alphabet
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

/// Ordered alphabet plus fixed candidate length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyspace {
    alphabet: Vec<char>,
    length: usize,
    size: u64,
}

impl Keyspace {
    /// Validate and build a keyspace
    pub fn new(alphabet: &[char], length: usize) -> Result<Self, SetupError> {
        if alphabet.is_empty() {
            return Err(SetupError::EmptyAlphabet);
        }
        if length == 0 {
            return Err(SetupError::ZeroLength);
        }
        for (i, symbol) in alphabet.iter().enumerate() {
            if alphabet[..i].contains(symbol) {
                return Err(SetupError::DuplicateSymbol(*symbol));
            }
        }

        let size = checked_power(alphabet.len(), length).ok_or(SetupError::KeyspaceTooLarge {
            symbols: alphabet.len(),
            length,
        })?;

        Ok(Self {
            alphabet: alphabet.to_vec(),
            length,
            size,
        })
    }

    /// Build a keyspace from the symbols of a string, in order
    pub fn from_str_alphabet(alphabet: &str, length: usize) -> Result<Self, SetupError> {
        let symbols: Vec<char> = alphabet.chars().collect();
        Self::new(&symbols, length)
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Total number of candidates, `|alphabet|^length`
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Number of rounds when the first `prefix_length` symbols are fixed per round
    pub fn round_count(&self, prefix_length: usize) -> Result<u64, SetupError> {
        self.check_prefix(prefix_length)?;
        // Cannot overflow: bounded by size()
        Ok(checked_power(self.alphabet.len(), prefix_length).unwrap_or(u64::MAX))
    }

    /// Sub-keyspace size of one round, `|alphabet|^(length - prefix_length)`
    pub fn round_size(&self, prefix_length: usize) -> Result<u64, SetupError> {
        self.check_prefix(prefix_length)?;
        Ok(checked_power(self.alphabet.len(), self.length - prefix_length).unwrap_or(u64::MAX))
    }

    /// Symbols for the given lexicographic index over `width` positions
    ///
    /// Returns `None` when `index` is outside `alphabet^width`.
    pub fn symbols_at(&self, index: u64, width: usize) -> Option<String> {
        let digits = self.digits_at(index, width)?;
        Some(digits.into_iter().map(|d| self.alphabet[d]).collect())
    }

    /// Cursor over `[start, end)` of the sub-keyspace that follows `prefix`
    ///
    /// `end` is clamped to the sub-keyspace size. The prefix is emitted
    /// verbatim in front of every candidate.
    pub fn cursor(&self, prefix: &str, start: u64, end: u64) -> CandidateCursor<'_> {
        let width = self.length.saturating_sub(prefix.chars().count());
        let limit = checked_power(self.alphabet.len(), width).unwrap_or(u64::MAX);
        let end = end.min(limit);
        let digits = self
            .digits_at(start.min(end), width)
            .unwrap_or_else(|| vec![0; width]);

        CandidateCursor {
            alphabet: &self.alphabet,
            digits,
            buffer: String::with_capacity(prefix.len() + width * 4),
            prefix: prefix.to_string(),
            remaining: end.saturating_sub(start),
            started: false,
        }
    }

    fn digits_at(&self, mut index: u64, width: usize) -> Option<Vec<usize>> {
        let radix = self.alphabet.len() as u64;
        let bound = checked_power(self.alphabet.len(), width)?;
        if index >= bound {
            return None;
        }

        let mut digits = vec![0usize; width];
        for slot in digits.iter_mut().rev() {
            *slot = (index % radix) as usize;
            index /= radix;
        }
        Some(digits)
    }

    fn check_prefix(&self, prefix_length: usize) -> Result<(), SetupError> {
        if prefix_length == 0 || prefix_length > self.length {
            return Err(SetupError::PrefixLength {
                prefix_length,
                length: self.length,
            });
        }
        Ok(())
    }
}

/// `base^exp`, or `None` on `u64` overflow
fn checked_power(base: usize, exp: usize) -> Option<u64> {
    let exp = u32::try_from(exp).ok()?;
    (base as u64).checked_pow(exp)
}

/// Lazy, allocation-free walk over a contiguous range of candidates
pub struct CandidateCursor<'a> {
    alphabet: &'a [char],
    prefix: String,
    digits: Vec<usize>,
    buffer: String,
    remaining: u64,
    started: bool,
}

impl CandidateCursor<'_> {
    /// Advance to the next candidate in lexicographic order
    pub fn next_candidate(&mut self) -> Option<&str> {
        if self.remaining == 0 {
            return None;
        }
        if self.started {
            self.increment();
        }
        self.started = true;
        self.remaining -= 1;

        self.buffer.truncate(0);
        self.buffer.push_str(&self.prefix);
        for &digit in &self.digits {
            self.buffer.push(self.alphabet[digit]);
        }
        Some(&self.buffer)
    }

    fn increment(&mut self) {
        let radix = self.alphabet.len();
        for digit in self.digits.iter_mut().rev() {
            *digit += 1;
            if *digit < radix {
                return;
            }
            *digit = 0;
        }
    }
}
