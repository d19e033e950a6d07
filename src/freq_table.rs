use std::collections::HashMap;

/// Word frequencies which remember the order of first insertion.
///
/// Ranking breaks ties by that order, so iteration never depends on the
/// hash map's layout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FreqTable {
    positions: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

pub type SegmentFrequencyTable = FreqTable;
pub type GlobalFrequencyTable = FreqTable;

impl FreqTable {
    pub fn new() -> Self {
        FreqTable::default()
    }

    /// Add one occurrence of `word`.
    pub fn count(&mut self, word: &str) {
        self.add(word, 1);
    }

    /// Add `count` occurrences of `word`, appending it if it is new.
    pub fn add(&mut self, word: &str, count: u64) {
        if count == 0 {
            return;
        }
        match self.positions.get(word) {
            Some(&position) => self.entries[position].1 += count,
            None => {
                self.positions.insert(word.to_owned(), self.entries.len());
                self.entries.push((word.to_owned(), count));
            }
        }
    }

    /// Fold every entry of `other` into this table, in `other`'s order.
    pub fn merge(&mut self, other: &FreqTable) {
        for (word, count) in other.iter() {
            self.add(word, count);
        }
    }

    pub fn get(&self, word: &str) -> Option<u64> {
        self.positions.get(word).map(|&position| self.entries[position].1)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries
            .iter()
            .map(|(word, count)| (word.as_str(), *count))
    }

    pub fn to_hash_map(&self) -> HashMap<String, u64> {
        self.entries.iter().cloned().collect()
    }
}

impl<'a> Extend<&'a str> for FreqTable {
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, words: I) {
        for word in words {
            self.count(word);
        }
    }
}
