//! Magnetometer Serial Protocol
//!
//! This crate defines the ASCII request/response protocol spoken by the
//! proton precession magnetometer on its serial port.
//!
//! # Protocol Overview
//!
//! The controller issues exactly two commands:
//! ```text
//! ┌─────────┬──────────────────────┬──────────────────────────────┐
//! │ Command │ Bytes                │ Reply                        │
//! ├─────────┼──────────────────────┼──────────────────────────────┤
//! │ Tune    │ 'T' <decimal µT> '\n'│ one status line              │
//! │ Sample  │ 'F'                  │ one reading line             │
//! └─────────┴──────────────────────┴──────────────────────────────┘
//! ```
//!
//! Framing is fixed 8N1 at one of five rates (see [`baud`]). There is no
//! checksum or retransmission: a reply shorter than two bytes is treated as a
//! timeout and the caller moves on.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod baud;
pub mod command;
pub mod response;

pub use baud::{baud_index, baud_rate, BAUD_INDEX_MAX, BAUD_RATES};
pub use command::{Command, CommandError, LINE_TERMINATOR, MAX_COMMAND_LEN};
pub use response::{Reply, MAX_RESPONSE_LEN, MIN_RESPONSE_LEN};
