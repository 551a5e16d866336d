//! Instrument acquisition
//!
//! The tune/sample sequence, its results, and the observer hook the UI uses
//! to show progress while the run blocks.

pub mod engine;
pub mod sample;

pub use engine::{AcquisitionEngine, AcquisitionError};
pub use sample::{AcquisitionObserver, AcquisitionReport, Phase, Sample};
