use thiserror::Error;

/// Errors raised while decoding the records stream.
///
/// Every variant is fatal for the run: the design favors fail-fast on
/// malformed input over silent data loss (SPEC_FULL.md §7).
#[derive(Debug, Error)]
pub enum RecsError {
    #[error("I/O error reading records stream: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a name=value line: {0:?}")]
    MalformedLine(String),

    #[error("unexpected EOF inside a record")]
    UnexpectedEof,

    #[error("invalid 'Timing' field: {0:?}")]
    BadTiming(String),

    #[error("invalid 'Counters' field: {0:?}")]
    BadCounters(String),
}

pub type Result<T> = std::result::Result<T, RecsError>;
