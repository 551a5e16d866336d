//! Acquisition engine
//!
//! Runs one tune + sample sequence against the instrument:
//!
//! ```text
//! Idle ──► Tuning ──► Sampling(1) ──► ... ──► Sampling(n) ──► Cooldown ──► Done
//! ```
//!
//! The instrument can emit late or unsolicited bytes, so inbound data is
//! discarded at every command boundary. A reply that does not arrive in
//! time is recorded as a timeout and the sequence carries on.

use embedded_hal::delay::DelayNs;
use larmor_hal::{RealTimeClock, SerialPort, UartConfig};
use larmor_protocol::{Command, CommandError, Reply, LINE_TERMINATOR, MAX_RESPONSE_LEN};

use super::sample::{AcquisitionObserver, AcquisitionReport, Phase, Sample};
use crate::clock::TimeSource;
use crate::config::{AcquisitionTiming, RuntimeConfig};

/// Read buffer size; longer replies are truncated by `Reply`
const READ_BUFFER_LEN: usize = MAX_RESPONSE_LEN + 16;

/// Acquisition errors
///
/// Timeouts are not errors. These end the run early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquisitionError<E> {
    /// Port rejected the configuration or a write
    Serial(E),
    /// Command did not fit the encode buffer
    Encode(CommandError),
}

impl<E> From<CommandError> for AcquisitionError<E> {
    fn from(err: CommandError) -> Self {
        AcquisitionError::Encode(err)
    }
}

/// Tune and sample sequencer
pub struct AcquisitionEngine {
    timing: AcquisitionTiming,
    phase: Phase,
}

impl AcquisitionEngine {
    pub fn new(timing: AcquisitionTiming) -> Self {
        Self {
            timing,
            phase: Phase::Idle,
        }
    }

    pub fn timing(&self) -> &AcquisitionTiming {
        &self.timing
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter<O: AcquisitionObserver>(&mut self, phase: Phase, observer: &mut O) {
        debug!("acquisition: {} -> {}", self.phase, phase);
        self.phase = phase;
        observer.on_phase(phase);
    }

    /// Run a complete sequence with the given parameters
    ///
    /// Blocks for the whole run. Parameters are read once at the start.
    pub fn run<P, R, D, O>(
        &mut self,
        port: &mut P,
        clock: &mut TimeSource<R>,
        delay: &mut D,
        config: &RuntimeConfig,
        observer: &mut O,
    ) -> Result<AcquisitionReport, AcquisitionError<P::Error>>
    where
        P: SerialPort,
        R: RealTimeClock,
        D: DelayNs,
        O: AcquisitionObserver,
    {
        let config = *config;
        self.enter(Phase::Idle, observer);
        info!(
            "acquisition: start baud={} tune={} repeats={}",
            config.baud_rate(),
            config.tune,
            config.repeats
        );

        port.configure(UartConfig {
            baudrate: config.baud_rate(),
            timeout_ms: self.timing.base_timeout_ms,
        })
        .map_err(AcquisitionError::Serial)?;
        while !port.is_ready() {
            delay.delay_ms(self.timing.ready_poll_ms);
        }

        // Tune
        self.enter(Phase::Tuning, observer);
        port.set_timeout(self.timing.tune_timeout_ms);
        discard(port)?;
        send(port, Command::Tune(config.tune))?;
        let mut buf = [0u8; READ_BUFFER_LEN];
        let len = read_reply(port, &mut buf);
        let tune = Reply::tune(&buf[..len]);
        if tune.is_timeout() {
            warn!("acquisition: tune timed out");
        }
        observer.on_tune(&tune);
        discard(port)?;
        delay.delay_ms(self.timing.tune_settle_ms);

        // Sample
        let mut report = AcquisitionReport::new(tune);
        port.set_timeout(self.timing.sample_timeout_ms);
        for index in 1..=config.repeats {
            self.enter(Phase::Sampling(index), observer);
            discard(port)?;
            send(port, Command::Sample)?;

            let len = read_reply(port, &mut buf);
            let timestamp = clock.get_time();
            let sample = Sample {
                index,
                response: Reply::sample(&buf[..len]),
                timestamp,
            };
            if sample.timed_out() {
                warn!("acquisition: sample {} timed out", index);
            } else {
                debug!("acquisition: sample {} received", index);
            }

            observer.on_sample(&sample);
            report.record(&sample);

            delay.delay_ms(self.timing.inter_sample_ms);
            discard(port)?;
        }

        self.enter(Phase::Cooldown, observer);
        delay.delay_ms(self.timing.cooldown_ms);
        self.enter(Phase::Done, observer);

        info!(
            "acquisition: done, {} samples, {} timeouts",
            report.samples,
            report.timeouts
        );
        Ok(report)
    }
}

fn discard<P: SerialPort>(port: &mut P) -> Result<(), AcquisitionError<P::Error>> {
    let dropped = port.discard_input().map_err(AcquisitionError::Serial)?;
    if dropped > 0 {
        debug!("acquisition: discarded {} stale bytes", dropped);
    }
    Ok(())
}

fn send<P: SerialPort>(port: &mut P, command: Command) -> Result<(), AcquisitionError<P::Error>> {
    let mut buf = [0u8; larmor_protocol::MAX_COMMAND_LEN];
    let len = command.encode(&mut buf)?;
    port.write_blocking(&buf[..len])
        .map_err(AcquisitionError::Serial)?;
    port.flush().map_err(AcquisitionError::Serial)
}

/// Read one reply line
///
/// A line error counts as no reply, the same as a timeout.
fn read_reply<P: SerialPort>(port: &mut P, buf: &mut [u8]) -> usize {
    match port.read_until(LINE_TERMINATOR, buf) {
        Ok(len) => len,
        Err(_) => {
            warn!("acquisition: read error, treating as timeout");
            0
        }
    }
}
