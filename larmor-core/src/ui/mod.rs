//! Front panel
//!
//! Screen rendering and touch handling. Nothing here blocks; the dispatcher
//! owns the loop.

pub mod screen;
pub mod touch;

pub use screen::{
    parameter_text, parameter_title, sample_line, tune_line, LogObserver, Screen,
    CLOCK_MISSING_TEXT, SAMPLE_TIMEOUT_TEXT, TUNE_TIMEOUT_TEXT,
};
pub use touch::{EditorButtons, MenuButtons, TouchInput};
