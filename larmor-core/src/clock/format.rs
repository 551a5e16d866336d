//! Time display formatting

use core::fmt::Write;

use heapless::String;
use larmor_hal::TimeRecord;

/// Longest formatted time (`YYYY-MM-DDTHH:MM:SS`)
pub const MAX_TIME_TEXT: usize = 19;

/// Years at or below this mean the clock was never set
pub const UNSET_YEAR_LIMIT: u16 = 2000;

/// Formatted time text
pub type TimeText = String<MAX_TIME_TEXT>;

/// Render `HH:MM:SS`, or `YYYY-MM-DDTHH:MM:SS` with `include_date`
///
/// Every field is zero-padded to two digits (four for the year).
pub fn format_time(time: &TimeRecord, include_date: bool) -> TimeText {
    let mut text = TimeText::new();
    // Field widths are fixed for in-range records; out-of-range values just
    // truncate
    if include_date {
        let _ = write!(
            text,
            "{:04}-{:02}-{:02}T",
            time.year, time.month, time.day
        );
    }
    let _ = write!(
        text,
        "{:02}:{:02}:{:02}",
        time.hour, time.minute, time.second
    );
    text
}

/// Check whether the record's year says the clock was never set
pub fn is_unset(time: &TimeRecord) -> bool {
    time.year <= UNSET_YEAR_LIMIT
}

/// Replace an unset year with `fallback_year`
pub fn seed_year(time: TimeRecord, fallback_year: u16) -> TimeRecord {
    if is_unset(&time) {
        TimeRecord {
            year: fallback_year,
            ..time
        }
    } else {
        time
    }
}
