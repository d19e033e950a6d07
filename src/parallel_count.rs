use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use log::{debug, error, info};
use tokio::task::{self, JoinError};

use crate::aggregate::{aggregate, rank, RankedEntry, ResultStore};
use crate::error::WordCountError;
use crate::freq_table::GlobalFrequencyTable;
use crate::log_histogram::LogHistogram;
use crate::partition::partition;
use crate::segment_counter::{count_segment, SegmentReport, SegmentStats};
use crate::text::{Segment, Text};

pub const DEFAULT_TOP_K: usize = 20;

/// Result of a complete run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordCount {
    pub table: GlobalFrequencyTable,
    pub ranking: Vec<RankedEntry>,
    /// Ordered by segment index.
    pub segments: Vec<SegmentStats>,
}

impl WordCount {
    pub fn total_words(&self) -> u64 {
        self.table.total()
    }

    pub fn unique_words(&self) -> usize {
        self.table.len()
    }
}

fn join_failure(index: usize, err: JoinError) -> WordCountError {
    let reason = if err.is_panic() {
        "worker panicked"
    } else {
        "worker was cancelled"
    };
    WordCountError::worker_failure(index, reason)
}

/// Run `worker` on every segment concurrently and collect all reports.
///
/// Each segment gets its own blocking task. `on_progress` sees every report
/// as it completes. The first failing or panicking worker fails the whole
/// call and no reports are returned. On success the reports are ordered by
/// segment index.
pub async fn count_segments_with<W, P>(
    segments: Vec<Segment>,
    worker: W,
    mut on_progress: P,
) -> Result<Vec<SegmentReport>, WordCountError>
where
    W: Fn(&Segment) -> Result<SegmentReport, WordCountError> + Send + Sync + 'static,
    P: FnMut(&SegmentStats),
{
    let segment_count = segments.len();
    let worker = Arc::new(worker);

    let mut pending: FuturesUnordered<_> = segments
        .into_iter()
        .map(|segment| {
            let index = segment.index();
            let worker = Arc::clone(&worker);
            task::spawn_blocking(move || {
                let time = Instant::now();
                let result = (*worker)(&segment);
                (result, time.elapsed())
            })
            .map(move |joined| (index, joined))
        })
        .collect();

    let mut store = ResultStore::new(segment_count);
    let mut timings = LogHistogram::new();
    while let Some((index, joined)) = pending.next().await {
        let outcome: Result<(SegmentReport, Duration), WordCountError> = joined
            .map_err(|e| join_failure(index, e))
            .and_then(|(result, elapsed)| result.map(|report| (report, elapsed)));

        let (report, elapsed) = match outcome {
            Ok(done) => done,
            Err(e) => {
                error!("aborting run: {}", e);
                return Err(e);
            }
        };
        if report.index != index {
            let e = WordCountError::worker_failure(
                index,
                format!("reported result for segment {}", report.index),
            );
            error!("aborting run: {}", e);
            return Err(e);
        }

        timings.add_sample(elapsed);
        let stats = report.stats();
        debug!(
            "segment {} done in {:?}: {} chars, {} words, {} unique",
            index, elapsed, stats.length, stats.total_words, stats.unique_words
        );
        on_progress(&stats);
        store.record(index, report)?;
    }

    info!("[count_segment] {}", timings);
    store.into_results()
}

/// Partition `text` into `segment_count` segments, count them concurrently,
/// merge the results and rank the `top_k` most frequent words.
///
/// Both arguments are checked before any work is started.
pub async fn count_parallel<P>(
    text: &Text,
    segment_count: usize,
    top_k: usize,
    on_progress: P,
) -> Result<WordCount, WordCountError>
where
    P: FnMut(&SegmentStats),
{
    if top_k < 1 {
        return Err(WordCountError::invalid_argument(format!(
            "top-k must be at least 1, got {}",
            top_k
        )));
    }
    let segments = partition(text, segment_count)?;
    if segments.is_empty() {
        info!("empty input, no workers started");
        return Ok(WordCount::default());
    }

    let reports = count_segments_with(segments, count_segment, on_progress).await?;
    let stats: Vec<SegmentStats> = reports.iter().map(SegmentReport::stats).collect();
    let segment_count = reports.len();
    let table = aggregate(
        reports.into_iter().map(|report| (report.index, report.table)),
        segment_count,
    )?;
    let ranking = rank(&table, top_k)?;

    info!(
        "{} segments, {} words, {} unique",
        segment_count,
        table.total(),
        table.len()
    );

    Ok(WordCount {
        table,
        ranking,
        segments: stats,
    })
}
