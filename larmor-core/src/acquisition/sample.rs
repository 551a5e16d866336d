//! Acquisition results

use larmor_hal::TimeRecord;
use larmor_protocol::Reply;

/// Engine phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Port being configured
    Idle,
    /// Tune command in flight or settling
    Tuning,
    /// Sample `i` of the run (1-based)
    Sampling(u8),
    /// Final hold after the last sample
    Cooldown,
    /// Run complete
    Done,
}

/// One instrument reading
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// 1-based position in the run
    pub index: u8,
    /// Classified reply, terminator stripped
    pub response: Reply,
    /// Clock reading taken right after the reply
    pub timestamp: TimeRecord,
}

impl Sample {
    /// Whether the instrument failed to answer in time
    pub fn timed_out(&self) -> bool {
        self.response.is_timeout()
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AcquisitionReport {
    /// Reply to the tune command
    pub tune: Reply,
    /// Samples taken
    pub samples: u8,
    /// Samples that timed out
    pub timeouts: u8,
    /// Timestamp of the first sample
    pub started: Option<TimeRecord>,
    /// Timestamp of the last sample
    pub finished: Option<TimeRecord>,
}

impl AcquisitionReport {
    pub(crate) fn new(tune: Reply) -> Self {
        Self {
            tune,
            samples: 0,
            timeouts: 0,
            started: None,
            finished: None,
        }
    }

    pub(crate) fn record(&mut self, sample: &Sample) {
        self.samples = self.samples.saturating_add(1);
        if sample.timed_out() {
            self.timeouts = self.timeouts.saturating_add(1);
        }
        if self.started.is_none() {
            self.started = Some(sample.timestamp);
        }
        self.finished = Some(sample.timestamp);
    }

    /// Samples that produced a reading
    pub fn readings(&self) -> u8 {
        self.samples - self.timeouts
    }
}

/// Receives progress from a running acquisition
///
/// All methods default to doing nothing.
pub trait AcquisitionObserver {
    /// Phase changed
    fn on_phase(&mut self, _phase: Phase) {}

    /// Tune reply classified
    fn on_tune(&mut self, _reply: &Reply) {}

    /// Sample captured
    fn on_sample(&mut self, _sample: &Sample) {}
}

/// Observer that ignores everything
impl AcquisitionObserver for () {}
