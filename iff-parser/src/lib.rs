mod description;
mod error;
mod parser;
mod structs;
mod time;

#[cfg(feature = "ics")]
pub mod ics;

pub use description::format_description;
pub use error::{SessionParseError, SkipReason, TimeWindowError};
pub use parser::{extract_blocks, parse_day, parse_session_fields};
pub use structs::{EventRecord, Site, TimeWindow};
pub use time::resolve_time_window;
