//! DS1307 battery-backed real-time clock (I2C)
//!
//! # Register Map
//!
//! Seven BCD timekeeping registers starting at 0x00, followed by the
//! control register and 56 bytes of battery-backed RAM:
//!
//! | Reg  | Contents                                   |
//! |------|--------------------------------------------|
//! | 0x00 | CH (bit 7) + seconds 00-59                 |
//! | 0x01 | minutes 00-59                              |
//! | 0x02 | 12/24 (bit 6) + hours (AM/PM in bit 5)     |
//! | 0x03 | weekday 1-7                                |
//! | 0x04 | date 01-31                                 |
//! | 0x05 | month 01-12                                |
//! | 0x06 | year 00-99                                 |
//! | 0x07 | control (SQW output)                       |
//!
//! Setting CH stops the oscillator. A fresh part powers up with CH set and
//! all registers reading zero, which the controller sees as year 2000.
//!
//! The register pointer auto-increments, so the whole time block is read
//! with one write-read and written with one burst.

use embedded_hal::i2c::I2c;
use larmor_hal::{RealTimeClock, RtcError, TimeRecord};

/// 7-bit bus address (fixed)
pub const ADDRESS: u8 = 0x68;

/// DS1307 register addresses
pub mod reg {
    pub const SECONDS: u8 = 0x00;
    pub const MINUTES: u8 = 0x01;
    pub const HOURS: u8 = 0x02;
    pub const WEEKDAY: u8 = 0x03;
    pub const DATE: u8 = 0x04;
    pub const MONTH: u8 = 0x05;
    pub const YEAR: u8 = 0x06;
    pub const CONTROL: u8 = 0x07;
}

/// Clock halt bit in the seconds register
const CLOCK_HALT: u8 = 0x80;
/// 12-hour mode bit in the hours register
const MODE_12H: u8 = 0x40;
/// PM flag in 12-hour mode
const PM: u8 = 0x20;

/// The year register holds years since this one
const CENTURY: u16 = 2000;

/// DS1307 errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ds1307Error<E> {
    /// Bus transaction failed (includes no acknowledge)
    I2c(E),
    /// Time cannot be stored in the BCD registers
    InvalidTime,
}

impl<E> From<Ds1307Error<E>> for RtcError {
    fn from(err: Ds1307Error<E>) -> Self {
        match err {
            Ds1307Error::I2c(_) => RtcError::NotPresent,
            Ds1307Error::InvalidTime => RtcError::Bus,
        }
    }
}

/// Decode a packed BCD byte
pub fn bcd_to_bin(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

/// Encode 0-99 as packed BCD
pub fn bin_to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// DS1307 driver
pub struct Ds1307<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> Ds1307<I2C> {
    /// Create a driver on the given bus
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Check that the part acknowledges its address
    pub fn is_present(&mut self) -> bool {
        let mut buf = [0u8; 1];
        self.i2c.write_read(ADDRESS, &[reg::SECONDS], &mut buf).is_ok()
    }

    /// Whether the oscillator is running
    pub fn is_running(&mut self) -> Result<bool, Ds1307Error<I2C::Error>> {
        let seconds = self.read_register(reg::SECONDS)?;
        Ok(seconds & CLOCK_HALT == 0)
    }

    /// Clear the halt bit, keeping the stored seconds
    pub fn start(&mut self) -> Result<(), Ds1307Error<I2C::Error>> {
        let seconds = self.read_register(reg::SECONDS)?;
        if seconds & CLOCK_HALT != 0 {
            self.write_register(reg::SECONDS, seconds & !CLOCK_HALT)?;
        }
        Ok(())
    }

    /// Disable the square-wave output
    pub fn disable_square_wave(&mut self) -> Result<(), Ds1307Error<I2C::Error>> {
        self.write_register(reg::CONTROL, 0x00)
    }

    /// Read the time block
    ///
    /// A halted clock still reads back whatever its registers hold.
    pub fn read_time(&mut self) -> Result<TimeRecord, Ds1307Error<I2C::Error>> {
        let mut regs = [0u8; 7];
        self.i2c
            .write_read(ADDRESS, &[reg::SECONDS], &mut regs)
            .map_err(Ds1307Error::I2c)?;
        Ok(decode(&regs))
    }

    /// Write the time block and start the oscillator
    pub fn write_time(&mut self, time: &TimeRecord) -> Result<(), Ds1307Error<I2C::Error>> {
        let regs = encode(time).ok_or(Ds1307Error::InvalidTime)?;
        let mut frame = [0u8; 8];
        frame[0] = reg::SECONDS;
        frame[1..].copy_from_slice(&regs);
        self.i2c.write(ADDRESS, &frame).map_err(Ds1307Error::I2c)
    }

    fn read_register(&mut self, register: u8) -> Result<u8, Ds1307Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(ADDRESS, &[register], &mut buf)
            .map_err(Ds1307Error::I2c)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Ds1307Error<I2C::Error>> {
        self.i2c
            .write(ADDRESS, &[register, value])
            .map_err(Ds1307Error::I2c)
    }
}

impl<I2C: I2c> RealTimeClock for Ds1307<I2C> {
    type Error = Ds1307Error<I2C::Error>;

    fn read(&mut self) -> Result<TimeRecord, Self::Error> {
        self.read_time()
    }

    fn write(&mut self, time: &TimeRecord) -> Result<(), Self::Error> {
        self.write_time(time)
    }
}

/// Decode the seven timekeeping registers
fn decode(regs: &[u8; 7]) -> TimeRecord {
    let hours = regs[2];
    let hour = if hours & MODE_12H != 0 {
        let h = bcd_to_bin(hours & 0x1F) % 12;
        if hours & PM != 0 {
            h + 12
        } else {
            h
        }
    } else {
        bcd_to_bin(hours & 0x3F)
    };

    TimeRecord {
        year: CENTURY + bcd_to_bin(regs[6]) as u16,
        month: bcd_to_bin(regs[5] & 0x1F),
        day: bcd_to_bin(regs[4] & 0x3F),
        hour,
        minute: bcd_to_bin(regs[1] & 0x7F),
        second: bcd_to_bin(regs[0] & 0x7F),
        weekday: regs[3] & 0x07,
    }
}

/// Encode a record in 24-hour mode with the oscillator running
///
/// Returns `None` for fields the registers cannot hold.
fn encode(time: &TimeRecord) -> Option<[u8; 7]> {
    let year = time.year.checked_sub(CENTURY).filter(|y| *y < 100)?;
    if time.second > 59
        || time.minute > 59
        || time.hour > 23
        || !(1..=31).contains(&time.day)
        || !(1..=12).contains(&time.month)
    {
        return None;
    }

    Some([
        bin_to_bcd(time.second),
        bin_to_bcd(time.minute),
        bin_to_bcd(time.hour),
        time.weekday.clamp(1, 7),
        bin_to_bcd(time.day),
        bin_to_bcd(time.month),
        bin_to_bcd(year as u8),
    ])
}
