//! Configuration
//!
//! Runtime parameters with their bounds, plus the timing constants used by
//! the acquisition engine and the front panel.

pub mod timing;
pub mod types;

pub use timing::*;
pub use types::*;
