//! Timing constants
//!
//! These are empirical values tuned against real instruments. Older
//! instrument firmware takes noticeably longer to answer a sample command,
//! so the sample timeout must stay above its worst-case latency. The
//! firmware can override every value at build time.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Year substituted when the clock reports 2000 or earlier
pub const FALLBACK_YEAR: u16 = 2021;

/// Serial timing for one acquisition run (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AcquisitionTiming {
    /// Timeout applied when the port is reconfigured
    pub base_timeout_ms: u32,
    /// Timeout for the tune reply
    pub tune_timeout_ms: u32,
    /// Hold after tuning so the instrument finishes its tune cycle
    pub tune_settle_ms: u32,
    /// Timeout for each sample reply
    pub sample_timeout_ms: u32,
    /// Pause after each sample, sets the sampling interval
    pub inter_sample_ms: u32,
    /// Hold after the last sample before returning to the menu
    pub cooldown_ms: u32,
    /// Poll period while waiting for the port to become ready
    pub ready_poll_ms: u32,
}

impl AcquisitionTiming {
    pub const fn new() -> Self {
        Self {
            base_timeout_ms: 1000,
            tune_timeout_ms: 1000,
            tune_settle_ms: 4000,
            sample_timeout_ms: 6000,
            inter_sample_ms: 3500,
            cooldown_ms: 2000,
            ready_poll_ms: 1,
        }
    }
}

impl Default for AcquisitionTiming {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-panel timing (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UiTiming {
    /// Menu poll period
    pub idle_tick_ms: u32,
    /// Editor poll period
    pub editor_tick_ms: u32,
    /// Delay between clock detection attempts at boot
    pub clock_retry_ms: u32,
    /// Year used when the clock has never been set
    pub fallback_year: u16,
}

impl UiTiming {
    pub const fn new() -> Self {
        Self {
            idle_tick_ms: 250,
            editor_tick_ms: 50,
            clock_retry_ms: 2000,
            fallback_year: FALLBACK_YEAR,
        }
    }
}

impl Default for UiTiming {
    fn default() -> Self {
        Self::new()
    }
}
