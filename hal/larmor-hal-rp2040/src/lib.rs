//! RP2040-specific HAL for the magnetometer front panel
//!
//! This crate provides RP2040 implementations of the `larmor-hal` traits:
//!
//! - Instrument serial port over a buffered UART, with read deadlines
//!   measured on the embassy-time clock
//! - Parameter byte store in a wear-levelled flash partition
//!
//! Both expose blocking operations. The controller runs a single blocking
//! loop, so async peripheral calls are driven to completion in place.

#![no_std]

pub mod flash;
pub mod uart;

pub use flash::FlashByteStore;
pub use uart::InstrumentUart;
