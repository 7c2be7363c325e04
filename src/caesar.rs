//! Caesar-shift brute force decoder
//!
//! A sequential pass with no shared state: every one of the 26 shifts is
//! produced, and either a dictionary hit or a human picks the winner.

use lazy_static::lazy_static;
use regex::Regex;

/// Number of distinct shifts over a-z
pub const SHIFTS: usize = 26;

lazy_static! {
    static ref NON_LOWERCASE: Regex = Regex::new(r"[^a-z]").expect("static pattern is valid");
}

/// Decode `text` with every shift
///
/// The text is lower-cased and split on whitespace; characters outside
/// `a-z` are dropped from each word. Element `k - 1` holds every letter
/// moved forward by `k`, so the last element is the cleaned-up input.
pub fn decode_all_shifts(text: &str) -> [String; SHIFTS] {
    let lowered = text.to_lowercase();
    let words: Vec<String> = lowered
        .split_whitespace()
        .map(|word| NON_LOWERCASE.replace_all(word, "").into_owned())
        .collect();

    std::array::from_fn(|i| {
        let shift = (i + 1) as u8;
        words
            .iter()
            .map(|word| shift_word(word, shift))
            .collect::<Vec<_>>()
            .join(" ")
    })
}

fn shift_word(word: &str, shift: u8) -> String {
    word.bytes()
        .map(|b| ((b - b'a' + shift) % SHIFTS as u8 + b'a') as char)
        .collect()
}

/// First shift (1-based) whose decoding contains a dictionary word
pub fn find_by_dictionary<S: AsRef<str>>(decoded: &[String], dictionary: &[S]) -> Option<usize> {
    let dictionary: Vec<String> = dictionary
        .iter()
        .map(|w| w.as_ref().trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();
    if dictionary.is_empty() {
        return None;
    }

    decoded
        .iter()
        .position(|text| text.split(' ').any(|word| dictionary.iter().any(|d| d == word)))
        .map(|index| index + 1)
}

/// Decoding for a 1-based shift, `None` outside `1..=26`
pub fn select_shift(decoded: &[String; SHIFTS], shift: usize) -> Option<&str> {
    shift
        .checked_sub(1)
        .and_then(|index| decoded.get(index))
        .map(String::as_str)
}
