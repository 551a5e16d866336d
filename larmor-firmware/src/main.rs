//! Larmor - Proton Precession Magnetometer Front Panel
//!
//! Firmware for the RP2040 touch-screen controller that drives a serial
//! field magnetometer: operator parameters persisted in flash, a battery
//! backed clock for timestamps, and tune/sample acquisition runs started
//! from the touch menu.
//!
//! Named after the Larmor frequency, the precession rate of proton spins
//! that the instrument counts to measure field strength.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use larmor_core::Controller;
use {defmt_rtt as _, panic_probe as _};

mod board;
mod config;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Larmor firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let hardware = board::init(p);
    let settings = config::settings();
    info!(
        "Timing: tune {}ms, sample {}ms, interval {}ms",
        settings.acquisition.tune_timeout_ms,
        settings.acquisition.sample_timeout_ms,
        settings.acquisition.inter_sample_ms
    );

    // The controller owns every peripheral and never returns
    let mut controller = Controller::new(hardware, settings);
    controller.run()
}
