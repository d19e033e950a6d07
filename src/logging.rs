use std::error::Error;
use std::fmt;
use std::fs::OpenOptions;
use std::io;
use std::io::prelude::*;
use std::path::PathBuf;
use std::process::exit;

use log::{LevelFilter, SetLoggerError};
use simplelog::{ColorChoice, ConfigBuilder, SharedLogger, TerminalMode, ThreadLogMode};

#[derive(Debug)]
pub enum LoggingError {
    Io(io::Error),
    Init(SetLoggerError),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            LoggingError::Io(ref err) => write!(f, "IO error: {}", err),
            LoggingError::Init(ref err) => write!(f, "set_logger error: {}", err),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            LoggingError::Io(ref err) => Some(err),
            LoggingError::Init(ref err) => Some(err),
        }
    }
}

impl From<SetLoggerError> for LoggingError {
    fn from(err: SetLoggerError) -> LoggingError {
        LoggingError::Init(err)
    }
}

impl From<io::Error> for LoggingError {
    fn from(err: io::Error) -> LoggingError {
        LoggingError::Io(err)
    }
}

/// Where log records go, as given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Truncated on startup.
    File(PathBuf),
}

impl LogTarget {
    pub fn parse(log_stream: &str) -> Self {
        match log_stream {
            "" | "-" => LogTarget::Stderr,
            path => LogTarget::File(PathBuf::from(path)),
        }
    }

    fn logger(&self, log_level: LevelFilter) -> Result<Box<dyn SharedLogger>, LoggingError> {
        let log_conf = worker_log_config(log_level);
        let logger: Box<dyn SharedLogger> = match self {
            LogTarget::Stderr => simplelog::TermLogger::new(
                log_level,
                log_conf,
                TerminalMode::Stderr,
                ColorChoice::Auto,
            ),
            LogTarget::File(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(path)?;
                simplelog::WriteLogger::new(log_level, log_conf, file)
            }
        };
        Ok(logger)
    }
}

impl fmt::Display for LogTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LogTarget::Stderr => write!(f, "stderr"),
            LogTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Worker records come from the blocking pool, so tag them with the thread
/// name once debug output is on.
fn worker_log_config(log_level: LevelFilter) -> simplelog::Config {
    let thread_level = if log_level >= LevelFilter::Debug {
        LevelFilter::Error
    } else {
        LevelFilter::Off
    };
    ConfigBuilder::new()
        .set_thread_level(thread_level)
        .set_thread_mode(ThreadLogMode::Names)
        .set_target_level(LevelFilter::Off)
        .build()
}

pub fn set_logger(target: &LogTarget, log_level: LevelFilter) -> Result<(), LoggingError> {
    let logger = target.logger(log_level)?;
    simplelog::CombinedLogger::init(vec![logger])?;
    Ok(())
}

pub fn set_logger_or_exit(log_stream: &str, log_level: LevelFilter) {
    let target = LogTarget::parse(log_stream);
    if let Err(err) = set_logger(&target, log_level) {
        let stderr = io::stderr();
        let _ = writeln!(stderr.lock(), "can't start logging to {}: {}", target, err);
        exit(1);
    }
}
