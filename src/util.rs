use argparse::{ArgumentParser, IncrBy, Print, Store, StoreOption, StoreTrue};
use std::fmt::Write;
use std::pin::Pin;
use std::{io, str};

use bytes::{Bytes, BytesMut};
use futures::{SinkExt, StreamExt};
use log::LevelFilter;
use tokio::fs::{File, OpenOptions};
use tokio::io::{stdin, stdout, AsyncRead, AsyncWrite};
use tokio_util::codec::{BytesCodec, FramedRead, FramedWrite};

use crate::aggregate::RankedEntry;
use crate::error::WordCountError;
use crate::freq_table::GlobalFrequencyTable;
use crate::parallel_count::{WordCount, DEFAULT_TOP_K};
use crate::segment_counter::SegmentStats;
use crate::text::Text;

use libc::{getrusage, rusage, RUSAGE_SELF};

/// User and system CPU time of this process in microseconds.
pub fn get_cputime_usecs() -> (u64, u64) {
    let mut usage: rusage = unsafe { std::mem::zeroed() };

    let ret = unsafe { getrusage(RUSAGE_SELF, &mut usage as *mut rusage) };
    if ret != 0 {
        return (0, 0);
    }

    let u_secs = usage.ru_utime.tv_sec as u64;
    let u_usecs = usage.ru_utime.tv_usec as u64;
    let s_secs = usage.ru_stime.tv_sec as u64;
    let s_usecs = usage.ru_stime.tv_usec as u64;

    let u_time = (u_secs * 1_000_000) + u_usecs;
    let s_time = (s_secs * 1_000_000) + s_usecs;

    (u_time, s_time)
}

pub struct Config {
    pub output: Option<String>,
    pub input: Option<String>,
    pub threads: usize,
    pub top: usize,
    pub progress: bool,
    pub print_all: bool,
    pub echo: bool,
    pub log_stream: String,
    pub verbosity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            output: None,
            input: None,
            threads: 1,
            top: DEFAULT_TOP_K,
            progress: false,
            print_all: false,
            echo: false,
            log_stream: "-".to_owned(),
            verbosity: 0,
        }
    }
}

impl Config {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Reject numbers the counter would refuse, before any input is read.
    pub fn validate(&self) -> Result<(), WordCountError> {
        if self.threads < 1 {
            return Err(WordCountError::invalid_argument(format!(
                "thread count must be at least 1, got {}",
                self.threads
            )));
        }
        if self.top < 1 {
            return Err(WordCountError::invalid_argument(format!(
                "top must be at least 1, got {}",
                self.top
            )));
        }
        Ok(())
    }
}

pub fn parse_args(description: &str) -> Config {
    let mut conf = Config::default();

    {
        // this block limits scope of borrows by ap.refer() method
        let mut ap = ArgumentParser::new();

        ap.set_description(description);
        ap.add_option(
            &["-V", "--version"],
            Print(env!("CARGO_PKG_VERSION").to_string()),
            "Show version",
        );

        ap.refer(&mut conf.input)
            .add_argument("input", StoreOption, "input file - default: stdin");

        ap.refer(&mut conf.output).add_argument(
            "output",
            StoreOption,
            "output file - default: stdout",
        );

        ap.refer(&mut conf.threads).add_option(
            &["-t", "--threads"],
            Store,
            "segment count, one worker per segment - default: 1",
        );

        ap.refer(&mut conf.top).add_option(
            &["-k", "--top"],
            Store,
            "number of ranked words to print - default: 20",
        );

        ap.refer(&mut conf.progress).add_option(
            &["-p", "--progress"],
            StoreTrue,
            "print per-segment stats as workers finish",
        );

        ap.refer(&mut conf.print_all).add_option(
            &["-a", "--all"],
            StoreTrue,
            "also print every word in first-seen order",
        );

        ap.refer(&mut conf.echo).add_option(
            &["-e", "--echo"],
            StoreTrue,
            "print the input text before the results",
        );

        ap.refer(&mut conf.log_stream).add_option(
            &["-l", "--log"],
            Store,
            "log file, '-' for stderr - default: -",
        );

        ap.refer(&mut conf.verbosity).add_option(
            &["-v", "--verbose"],
            IncrBy(1usize),
            "more logging, repeat for debug output",
        );

        ap.parse_args_or_exit();
    }

    conf
}

pub fn utf8(buf: &[u8]) -> Result<&str, io::Error> {
    str::from_utf8(buf)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "Unable to decode input as UTF8"))
}

pub type Input = Pin<Box<dyn AsyncRead + Send>>;
pub type Output = FramedWrite<Pin<Box<dyn AsyncWrite + Send>>, BytesCodec>;

async fn open_input(input: &Option<String>) -> io::Result<Input> {
    Ok(match input {
        None => Box::pin(stdin()),
        Some(filename) => {
            let file = File::open(filename).await.map_err(|e| {
                io::Error::new(e.kind(), format!("can't open input file {}: {}", filename, e))
            })?;
            Box::pin(file)
        }
    })
}

/// Read the whole input, stdin if no file is given.
pub async fn read_input(input: &Option<String>) -> io::Result<Bytes> {
    let mut frames = FramedRead::new(open_input(input).await?, BytesCodec::new());
    let mut buffer = BytesMut::new();
    while let Some(chunk) = frames.next().await {
        buffer.extend_from_slice(&chunk?);
    }
    Ok(buffer.freeze())
}

pub async fn open_output(output: &Option<String>) -> io::Result<Output> {
    let writer: Pin<Box<dyn AsyncWrite + Send>> = match output {
        None => Box::pin(stdout()),
        Some(filename) => {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(filename)
                .await
                .map_err(|e| {
                    io::Error::new(e.kind(), format!("can't open output file {}: {}", filename, e))
                })?;
            Box::pin(file)
        }
    };
    Ok(FramedWrite::new(writer, BytesCodec::new()))
}

/// Write the ranking and summary, optionally preceded by the input and
/// followed by the full table, then flush and close `output`.
pub async fn write_result(
    mut output: Output,
    echo: Option<&Text>,
    result: &WordCount,
    print_all: bool,
) -> io::Result<()> {
    if let Some(text) = echo {
        output.send(Bytes::from_static(b"File content:\n")).await?;
        output.send(Bytes::copy_from_slice(text.as_bytes())).await?;
        output.send(Bytes::from_static(b"\n\n")).await?;
    }
    output.send(format_ranking(&result.ranking)).await?;
    output
        .send(Bytes::from(format!(
            "\n{} words, {} unique\n",
            result.total_words(),
            result.unique_words()
        )))
        .await?;
    if print_all {
        output.send(Bytes::from_static(b"\nWord frequencies:\n")).await?;
        output.send(format_table(&result.table)).await?;
    }
    // BytesCodec encodes both Bytes and BytesMut
    SinkExt::<Bytes>::close(&mut output).await
}

pub fn format_ranking(ranking: &[RankedEntry]) -> Bytes {
    let width = ranking
        .iter()
        .map(|entry| entry.word.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);
    let mut buffer = BytesMut::with_capacity((ranking.len() + 1) * (width + 16));
    let _ = writeln!(buffer, "{:>4}  {:<width$}  {}", "rank", "word", "frequency", width = width);
    for entry in ranking {
        let _ = writeln!(
            buffer,
            "{:>4}  {:<width$}  {}",
            entry.rank,
            entry.word,
            entry.count,
            width = width
        );
    }
    buffer.freeze()
}

/// Every word with its count, in first-seen order.
pub fn format_table(table: &GlobalFrequencyTable) -> Bytes {
    let mut buffer = BytesMut::with_capacity(table.len() * 16);
    for (word, count) in table.iter() {
        let _ = writeln!(buffer, "{} {}", word, count);
    }
    buffer.freeze()
}

pub fn format_segment_stats(stats: &SegmentStats) -> String {
    let top: Vec<String> = stats
        .top
        .iter()
        .map(|entry| format!("{}:{}", entry.word, entry.count))
        .collect();
    format!(
        "segment {}: {} chars, {} words, {} unique, top: {}",
        stats.index,
        stats.length,
        stats.total_words,
        stats.unique_words,
        top.join(" ")
    )
}
