//! Real-time clock abstractions
//!
//! Provides the calendar time record and the trait for a battery-backed
//! clock peripheral.

/// Calendar time as kept by the clock peripheral
///
/// The peripheral keeps seven fields (second, minute, hour, day, month,
/// weekday, year). Fields are declared most-significant first so the derived
/// ordering is chronological. The weekday is carried but not used by the
/// controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeRecord {
    /// Year (full, e.g. 2024)
    pub year: u16,
    /// Month (1-12)
    pub month: u8,
    /// Day of month (1-31)
    pub day: u8,
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
    /// Second (0-59)
    pub second: u8,
    /// Day of week (1-7), unused
    pub weekday: u8,
}

impl TimeRecord {
    /// The all-zero record returned when no clock has ever answered
    pub const ZERO: Self = Self {
        year: 0,
        month: 0,
        day: 0,
        hour: 0,
        minute: 0,
        second: 0,
        weekday: 0,
    };

    /// Create a record from calendar fields, weekday left unset
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            weekday: 0,
        }
    }

    /// Seconds since midnight
    pub fn seconds_of_day(&self) -> u32 {
        self.hour as u32 * 3600 + self.minute as u32 * 60 + self.second as u32
    }
}

/// Errors from clock operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtcError {
    /// The peripheral did not acknowledge
    NotPresent,
    /// The peripheral is present but its oscillator is stopped
    Halted,
    /// Bus error while talking to the peripheral
    Bus,
}

/// Battery-backed real-time clock
pub trait RealTimeClock {
    /// Error type for clock operations
    type Error;

    /// Read the current time
    fn read(&mut self) -> Result<TimeRecord, Self::Error>;

    /// Set the current time
    fn write(&mut self, time: &TimeRecord) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_record() {
        assert_eq!(TimeRecord::ZERO, TimeRecord::default());
    }

    #[test]
    fn test_seconds_of_day() {
        let t = TimeRecord::new(2024, 6, 1, 13, 5, 9);
        assert_eq!(t.seconds_of_day(), 13 * 3600 + 5 * 60 + 9);
    }

    #[test]
    fn test_ordering_follows_calendar() {
        let earlier = TimeRecord::new(2024, 6, 1, 13, 5, 9);
        let later = TimeRecord::new(2024, 6, 1, 13, 5, 10);
        assert!(earlier < later);

        let next_year = TimeRecord::new(2025, 1, 1, 0, 0, 0);
        assert!(later < next_year);
    }
}
