//! Peripheral driver implementations
//!
//! This crate provides concrete implementations of the capability traits
//! defined in larmor-hal and larmor-display for the front-panel parts:
//!
//! - Real-time clock (DS1307 over I2C)
//! - TFT display controller (ILI9341 over SPI, as an embedded-graphics target)
//! - 4-wire resistive touch panel (XPT2046 controller over SPI)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod display;
pub mod rtc;
pub mod touch;
