use crate::error::WordCountError;
use crate::freq_table::{GlobalFrequencyTable, SegmentFrequencyTable};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedEntry {
    pub word: String,
    pub count: u64,
    pub rank: usize,
}

/// One slot per segment; each slot is written exactly once.
#[derive(Debug)]
pub struct ResultStore<T> {
    slots: Vec<Option<T>>,
}

impl<T> ResultStore<T> {
    pub fn new(segment_count: usize) -> Self {
        ResultStore {
            slots: (0..segment_count).map(|_| None).collect(),
        }
    }

    pub fn record(&mut self, index: usize, result: T) -> Result<(), WordCountError> {
        let segment_count = self.slots.len();
        match self.slots.get_mut(index) {
            None => Err(WordCountError::invalid_argument(format!(
                "segment {} out of range for {} segments",
                index, segment_count
            ))),
            Some(Some(_)) => Err(WordCountError::invalid_argument(format!(
                "segment {} reported twice",
                index
            ))),
            Some(slot) => {
                *slot = Some(result);
                Ok(())
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// All results in segment order, or the first segment that never reported.
    pub fn into_results(self) -> Result<Vec<T>, WordCountError> {
        self.slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| WordCountError::worker_failure(index, "no result recorded"))
            })
            .collect()
    }
}

/// Merge per-segment tables, given in any order, into the global table.
///
/// Every index in `0..segment_count` must be present exactly once. Tables are
/// merged in ascending segment order, so both the counts and the first-seen
/// order of the result only depend on the segments, not on arrival order.
pub fn aggregate<I>(results: I, segment_count: usize) -> Result<GlobalFrequencyTable, WordCountError>
where
    I: IntoIterator<Item = (usize, SegmentFrequencyTable)>,
{
    let mut store = ResultStore::new(segment_count);
    for (index, table) in results {
        store.record(index, table)?;
    }

    let mut frequency = GlobalFrequencyTable::new();
    for table in store.into_results()? {
        frequency.merge(&table);
    }
    Ok(frequency)
}

/// The `k` most frequent words, ties in first-seen order.
pub fn rank(table: &GlobalFrequencyTable, k: usize) -> Result<Vec<RankedEntry>, WordCountError> {
    if k < 1 {
        return Err(WordCountError::invalid_argument(format!(
            "top-k must be at least 1, got {}",
            k
        )));
    }

    let mut frequency_vec: Vec<(&str, u64)> = table.iter().collect();
    // stable: equal counts keep insertion order
    frequency_vec.sort_by(|&(_, a), &(_, b)| b.cmp(&a));

    Ok(frequency_vec
        .into_iter()
        .take(k)
        .enumerate()
        .map(|(i, (word, count))| RankedEntry {
            word: word.to_owned(),
            count,
            rank: i + 1,
        })
        .collect())
}
