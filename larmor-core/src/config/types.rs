//! Runtime parameter definitions
//!
//! The three operator-adjustable parameters, their bounds, and their
//! compile-time defaults.

use larmor_hal::ParameterKey;
use larmor_protocol::{baud_rate, BAUD_INDEX_MAX};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tune value bounds (microtesla)
pub const TUNE_MIN: u8 = 20;
pub const TUNE_MAX: u8 = 90;
pub const DEFAULT_TUNE: u8 = 50;

/// Observations per run
pub const REPEATS_MIN: u8 = 1;
pub const REPEATS_MAX: u8 = 100;
pub const DEFAULT_REPEATS: u8 = 10;

/// Index into the baud table
pub const BAUD_INDEX_MIN: u8 = 0;
pub const DEFAULT_BAUD_INDEX: u8 = 3;

/// Inclusive integer bounds with cyclic wrap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bounds {
    pub lo: i32,
    pub hi: i32,
}

impl Bounds {
    pub const fn new(lo: i32, hi: i32) -> Self {
        Self { lo, hi }
    }

    /// Check whether a value lies within the bounds
    pub fn contains(&self, value: i32) -> bool {
        value >= self.lo && value <= self.hi
    }

    /// Bring a value back into range
    ///
    /// Anything above `hi` becomes `lo` and anything below `lo` becomes
    /// `hi`. Editors only ever step by one, so a single wrap is enough.
    pub fn wrap(&self, value: i32) -> i32 {
        if value > self.hi {
            self.lo
        } else if value < self.lo {
            self.hi
        } else {
            value
        }
    }
}

/// Bounds for a persisted parameter
pub fn parameter_bounds(key: ParameterKey) -> Bounds {
    match key {
        ParameterKey::Tune => Bounds::new(TUNE_MIN as i32, TUNE_MAX as i32),
        ParameterKey::Repeats => Bounds::new(REPEATS_MIN as i32, REPEATS_MAX as i32),
        ParameterKey::BaudIndex => Bounds::new(BAUD_INDEX_MIN as i32, BAUD_INDEX_MAX as i32),
    }
}

/// Parameter rejected because it is outside its bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRange {
    pub key: ParameterKey,
    pub value: i32,
}

/// Acquisition parameters owned by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuntimeConfig {
    /// Tune value sent with the tune command
    pub tune: u8,
    /// Number of samples per run
    pub repeats: u8,
    /// Selected entry in the baud table
    pub baud_index: u8,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tune: DEFAULT_TUNE,
            repeats: DEFAULT_REPEATS,
            baud_index: DEFAULT_BAUD_INDEX,
        }
    }
}

impl RuntimeConfig {
    /// Read one parameter
    pub fn get(&self, key: ParameterKey) -> u8 {
        match key {
            ParameterKey::Tune => self.tune,
            ParameterKey::Repeats => self.repeats,
            ParameterKey::BaudIndex => self.baud_index,
        }
    }

    /// Set one parameter after checking its bounds
    ///
    /// The config is left unchanged on error.
    pub fn set(&mut self, key: ParameterKey, value: i32) -> Result<u8, OutOfRange> {
        if !parameter_bounds(key).contains(value) {
            return Err(OutOfRange { key, value });
        }

        let value = value as u8;
        match key {
            ParameterKey::Tune => self.tune = value,
            ParameterKey::Repeats => self.repeats = value,
            ParameterKey::BaudIndex => self.baud_index = value,
        }
        Ok(value)
    }

    /// Check every parameter against its bounds
    pub fn validate(&self) -> Result<(), OutOfRange> {
        for key in ParameterKey::ALL {
            let value = self.get(key) as i32;
            if !parameter_bounds(key).contains(value) {
                return Err(OutOfRange { key, value });
            }
        }
        Ok(())
    }

    /// Baud rate for the selected index
    pub fn baud_rate(&self) -> u32 {
        baud_rate(self.baud_index).unwrap_or(9600)
    }
}
