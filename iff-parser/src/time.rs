use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{TimeWindow, TimeWindowError};

static TIME_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d\d):(\d\d) - (\d\d):(\d\d)([AP])M").unwrap());

/// Resolves schedule text like `" 09:00 - 11:00AM (2.0h) "` into a window on
/// the day starting at `midnight`.
///
/// The AM/PM marker belongs to the end time only. For a PM end the start is
/// moved into the afternoon as well, unless that would put it at or after
/// the end, in which case the window spans midday.
pub fn resolve_time_window(
    text: &str,
    midnight: DateTime<Tz>,
) -> Result<TimeWindow, TimeWindowError> {
    let mismatch = || TimeWindowError::FormatMismatch(text.trim().to_string());

    let mut matches = TIME_RANGE.captures_iter(text);
    let captures = matches.next().ok_or_else(mismatch)?;
    if matches.next().is_some() {
        return Err(mismatch());
    }

    let number = |idx: usize| captures[idx].parse::<i64>().map_err(|_| mismatch());

    let mut start_hour = number(1)?;
    let start_minute = number(2)?;
    let mut end_hour = number(3)?;
    let end_minute = number(4)?;

    if [start_hour, end_hour].iter().any(|hour| *hour > 12)
        || [start_minute, end_minute].iter().any(|minute| *minute > 59)
    {
        return Err(TimeWindowError::OutOfRange(text.trim().to_string()));
    }

    if &captures[5] == "P" {
        end_hour = afternoon_hour(end_hour);

        if afternoon_hour(start_hour) < end_hour {
            start_hour = afternoon_hour(start_hour);
        }
    }

    let start = midnight + Duration::hours(start_hour) + Duration::minutes(start_minute);
    let end = midnight + Duration::hours(end_hour) + Duration::minutes(end_minute);

    if end < start {
        return Err(TimeWindowError::Inverted { start, end });
    }

    Ok(TimeWindow { start, end })
}

/// 12 PM -> 12, 1 PM -> 13, ...
fn afternoon_hour(hour: i64) -> i64 {
    hour % 12 + 12
}
