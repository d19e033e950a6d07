use crate::aggregate::{rank, RankedEntry};
use crate::error::WordCountError;
use crate::freq_table::SegmentFrequencyTable;
use crate::text::Segment;

/// Trimmed from both ends of every token.
pub const STRIP_CHARS: &[char] = &[
    '.', ',', ';', ':', '!', '?', '"', '\'', '(', ')', '[', ']', '{', '}', '—', '-',
];

/// Size of the per-segment ranking in [`SegmentStats`].
pub const LOCAL_TOP: usize = 5;

/// Trim punctuation off an already lowercased token; `None` if nothing is left.
pub fn normalize(token: &str) -> Option<&str> {
    let word = token.trim_matches(STRIP_CHARS);
    if word.is_empty() {
        None
    } else {
        Some(word)
    }
}

/// Lowercase `text` and return its words, left to right.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .filter_map(normalize)
        .map(str::to_owned)
        .collect()
}

pub fn count_words(text: &str) -> SegmentFrequencyTable {
    let lowered = text.to_lowercase();
    let mut frequency = SegmentFrequencyTable::new();
    frequency.extend(lowered.split_whitespace().filter_map(normalize));
    frequency
}

/// Output of one worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentReport {
    pub index: usize,
    /// In characters.
    pub length: usize,
    pub table: SegmentFrequencyTable,
}

/// Progress summary of a finished segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SegmentStats {
    pub index: usize,
    pub length: usize,
    pub total_words: u64,
    pub unique_words: usize,
    pub top: Vec<RankedEntry>,
}

impl SegmentReport {
    pub fn stats(&self) -> SegmentStats {
        SegmentStats {
            index: self.index,
            length: self.length,
            total_words: self.table.total(),
            unique_words: self.table.len(),
            top: rank(&self.table, LOCAL_TOP).unwrap_or_default(),
        }
    }
}

pub fn count_segment(segment: &Segment) -> Result<SegmentReport, WordCountError> {
    let text = segment
        .as_str()
        .map_err(|e| WordCountError::worker_failure(segment.index(), e.to_string()))?;

    Ok(SegmentReport {
        index: segment.index(),
        length: text.chars().count(),
        table: count_words(text),
    })
}
