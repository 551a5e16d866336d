//! Real-time clock access and time formatting

pub mod format;
pub mod source;

pub use format::{format_time, is_unset, seed_year, TimeText, MAX_TIME_TEXT};
pub use source::TimeSource;
