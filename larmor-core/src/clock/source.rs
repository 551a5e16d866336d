//! Time source adapter
//!
//! Wraps the real-time clock so the rest of the controller never sees a
//! clock error. Reads that fail keep the last good record. If the clock was
//! never detected, reads return the zero record and writes do nothing.

use embedded_hal::delay::DelayNs;
use larmor_hal::{RealTimeClock, TimeRecord};

/// Real-time clock with last-good caching
pub struct TimeSource<R> {
    rtc: R,
    last: TimeRecord,
    online: bool,
}

impl<R: RealTimeClock> TimeSource<R> {
    /// Wrap a clock that has not been probed yet
    pub fn new(rtc: R) -> Self {
        Self {
            rtc,
            last: TimeRecord::ZERO,
            online: false,
        }
    }

    /// Whether the clock answered the last probe
    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Last record read from or written to the clock
    pub fn last(&self) -> TimeRecord {
        self.last
    }

    /// Mutably borrow the underlying clock
    pub fn inner_mut(&mut self) -> &mut R {
        &mut self.rtc
    }

    /// Check whether the clock responds
    pub fn probe(&mut self) -> bool {
        match self.rtc.read() {
            Ok(time) => {
                self.last = time;
                self.online = true;
            }
            Err(_) => self.online = false,
        }
        self.online
    }

    /// Block until the clock responds
    ///
    /// Retries forever, calling `on_retry` with the attempt count and then
    /// waiting `retry_ms` after each failed probe.
    pub fn wait_for_clock<D, F>(&mut self, delay: &mut D, retry_ms: u32, mut on_retry: F) -> TimeRecord
    where
        D: DelayNs,
        F: FnMut(u32),
    {
        let mut attempts: u32 = 0;
        while !self.probe() {
            attempts = attempts.saturating_add(1);
            warn!("clock: not responding (attempt {})", attempts);
            on_retry(attempts);
            delay.delay_ms(retry_ms);
        }
        info!("clock: online after {} retries", attempts);
        self.last
    }

    /// Current time
    ///
    /// Returns the last good record if the read fails.
    pub fn get_time(&mut self) -> TimeRecord {
        if !self.online {
            return self.last;
        }

        match self.rtc.read() {
            Ok(time) => self.last = time,
            Err(_) => warn!("clock: read failed, keeping last time"),
        }
        self.last
    }

    /// Commit a complete record to the clock
    pub fn set_time(&mut self, time: TimeRecord) -> Result<(), R::Error> {
        if !self.online {
            warn!("clock: offline, set ignored");
            return Ok(());
        }

        self.rtc.write(&time)?;
        self.last = time;
        info!(
            "clock: set {}-{}-{} {}:{}:{}",
            time.year,
            time.month,
            time.day,
            time.hour,
            time.minute,
            time.second
        );
        Ok(())
    }
}
