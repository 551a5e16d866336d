//! Build-time instrument configuration
//!
//! Constants are generated by build.rs from instrument.toml.

use larmor_core::config::{AcquisitionTiming, UiTiming};
use larmor_core::Settings;
use larmor_display::TouchCalibration;

include!(concat!(env!("OUT_DIR"), "/instrument_config.rs"));

/// Controller settings for this build
pub fn settings() -> Settings {
    Settings {
        acquisition: ACQUISITION_TIMING,
        ui: UI_TIMING,
        calibration: TOUCH_CALIBRATION,
    }
}
