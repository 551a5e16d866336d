//! Larmor Hardware Abstraction Layer
//!
//! This crate defines the capability traits the magnetometer controller
//! consumes. Chip-specific HALs (RP2040) and device drivers (DS1307) implement
//! them, and the core logic is written only against these traits so it can be
//! exercised on the host with test doubles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (larmor-core / firmware)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  larmor-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  larmor-hal-  │       │    larmor-    │
//! │    rp2040     │       │    drivers    │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::SerialPort`] - Instrument serial link
//! - [`storage::ByteStore`] - Raw byte-addressable persistent store
//! - [`rtc::RealTimeClock`] - Battery-backed clock peripheral

#![no_std]
#![deny(unsafe_code)]

pub mod rtc;
pub mod storage;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use rtc::{RealTimeClock, RtcError, TimeRecord};
pub use storage::{ByteStore, ParameterKey, StorageError};
pub use uart::{SerialError, SerialPort, UartConfig};
