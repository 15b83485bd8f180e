use chrono::DateTime;
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeWindowError {
    #[error("time text `{0}` does not match `HH:MM - HH:MM[AP]M` exactly once")]
    FormatMismatch(String),
    #[error("time text `{0}` has an hour above 12 or a minute above 59")]
    OutOfRange(String),
    #[error("time window ends at {end} before it starts at {start}")]
    Inverted { start: DateTime<Tz>, end: DateTime<Tz> },
}

/// Why a single event block was left out of a day's results.
///
/// A skip never aborts the page; the remaining blocks are still extracted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("event block is missing its {0}")]
    MissingRequiredField(&'static str),
    #[error(transparent)]
    TimeWindow(#[from] TimeWindowError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionParseError {
    #[error("session page contains no detail fields")]
    NoFields,
    #[error("session page has {labels} field labels but {values} values")]
    MismatchedFields { labels: usize, values: usize },
}
