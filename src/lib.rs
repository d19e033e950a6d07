//! Concurrent word-frequency counting.
//!
//! The input is split into whitespace-aligned segments, each segment is
//! counted by its own worker, and the per-segment tables are merged into one
//! global table in segment order before the most frequent words are ranked.

pub mod aggregate;
pub mod error;
pub mod freq_table;
pub mod logging;
pub mod parallel_count;
pub mod partition;
pub mod segment_counter;
pub mod text;
pub mod util;
mod log_histogram;
pub use crate::log_histogram::LogHistogram;

pub use crate::aggregate::{aggregate, rank, RankedEntry, ResultStore};
pub use crate::error::WordCountError;
pub use crate::freq_table::{FreqTable, GlobalFrequencyTable, SegmentFrequencyTable};
pub use crate::parallel_count::{count_parallel, count_segments_with, WordCount, DEFAULT_TOP_K};
pub use crate::partition::partition;
pub use crate::segment_counter::{count_segment, count_words, SegmentReport, SegmentStats};
pub use crate::text::{Segment, Text};
