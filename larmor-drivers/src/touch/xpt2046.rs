//! XPT2046 resistive touch controller (SPI)
//!
//! The XPT2046 switches the four plate electrodes itself and digitises the
//! selected channel. Each conversion is one 3-byte transfer: a control byte
//! out, then a 12-bit result clocked back MSB first across the next two
//! bytes (bits 14..3).
//!
//! # Control Byte
//!
//! ```text
//! S | A2 A1 A0 | MODE | SER/DFR | PD1 PD0
//! ```
//!
//! Conversions use 12-bit differential mode with the ADC kept on between
//! reads. The final command powers down with PD = 00, which re-enables the
//! PENIRQ output.

use embedded_hal::spi::SpiDevice;

use super::resistive::Plates;

/// Control bytes (12-bit, differential)
pub mod ctrl {
    /// Start bit
    pub const START: u8 = 0x80;
    /// X position (A = 101)
    pub const X: u8 = START | 0x50;
    /// Y position (A = 001)
    pub const Y: u8 = START | 0x10;
    /// Z1 pressure (A = 011)
    pub const Z1: u8 = START | 0x30;
    /// Z2 pressure (A = 100)
    pub const Z2: u8 = START | 0x40;
    /// PD = 01: ADC on, reference off, PENIRQ disabled
    pub const ADC_ON: u8 = 0x01;
}

/// XPT2046 over an SPI device
pub struct Xpt2046<SPI> {
    spi: SPI,
}

impl<SPI: SpiDevice> Xpt2046<SPI> {
    /// Create a driver
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Release the SPI device
    pub fn release(self) -> SPI {
        self.spi
    }

    /// Run one conversion and return the 12-bit result
    pub fn convert(&mut self, control: u8) -> Result<u16, SPI::Error> {
        let mut rx = [0u8; 3];
        self.spi.transfer(&mut rx, &[control, 0, 0])?;
        Ok((u16::from_be_bytes([rx[1], rx[2]]) >> 3) & 0x0FFF)
    }

    /// One channel scaled to 10 bits
    fn read10(&mut self, channel: u8) -> Result<u16, SPI::Error> {
        Ok(self.convert(channel | ctrl::ADC_ON)? >> 2)
    }
}

impl<SPI: SpiDevice> Plates for Xpt2046<SPI> {
    type Error = SPI::Error;

    fn read_x(&mut self) -> Result<u16, Self::Error> {
        self.read10(ctrl::X)
    }

    fn read_y(&mut self) -> Result<u16, Self::Error> {
        self.read10(ctrl::Y)
    }

    fn read_z(&mut self) -> Result<(u16, u16), Self::Error> {
        let z1 = self.read10(ctrl::Z1)?;
        let z2 = self.read10(ctrl::Z2)?;
        Ok((z1, z2))
    }

    fn restore(&mut self) -> Result<(), Self::Error> {
        self.convert(ctrl::X).map(|_| ())
    }
}
