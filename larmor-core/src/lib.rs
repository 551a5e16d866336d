//! Board-agnostic controller logic for the magnetometer front panel
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Tagged parameter store over a raw byte store
//! - Time source adapter and time formatting
//! - Bounded cyclic editors, including the six-field clock editor
//! - Tune/sample acquisition engine with flush discipline
//! - Mode machine and the top-level dispatcher
//! - Screen rendering and touch handling
//! - Runtime parameter and timing definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod fmt;

pub mod acquisition;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod editor;
pub mod persist;
pub mod state;
pub mod ui;

#[cfg(test)]
mod testing;

pub use dispatch::{Controller, Hardware, Settings};
