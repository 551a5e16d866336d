//! Build script for larmor-firmware
//!
//! - Sets up linker search paths and link arguments for memory.x
//! - Validates instrument.toml and generates the timing/calibration constants

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use larmor_core::config::{AcquisitionTiming, UiTiming};
use serde::Deserialize;

fn main() {
    setup_linker();
    let config = load_config();
    validate(&config);
    generate(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Touch calibration section (mirrors `larmor_display::TouchCalibration`)
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TouchSection {
    raw_x_min: u16,
    raw_x_max: u16,
    raw_y_min: u16,
    raw_y_max: u16,
    min_pressure: u16,
    max_pressure: u16,
    invert_x: bool,
    invert_y: bool,
}

impl Default for TouchSection {
    fn default() -> Self {
        Self {
            raw_x_min: 150,
            raw_x_max: 920,
            raw_y_min: 120,
            raw_y_max: 940,
            min_pressure: 10,
            max_pressure: 1000,
            invert_x: false,
            invert_y: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct InstrumentConfig {
    acquisition: AcquisitionTiming,
    ui: UiTiming,
    touch: TouchSection,
}

/// Read and parse instrument.toml
fn load_config() -> InstrumentConfig {
    // Re-run if instrument.toml changes
    println!("cargo:rerun-if-changed=instrument.toml");

    let config_path = Path::new("instrument.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: instrument.toml not found!                               ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires an instrument.toml file in the            ║\n\
            ║  larmor-firmware directory. An empty file selects defaults.      ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read instrument.toml                           ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid instrument.toml                                  ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check every value against what the controller can work with
fn validate(config: &InstrumentConfig) {
    let mut errors = Vec::new();
    let acq = &config.acquisition;
    let ui = &config.ui;
    let touch = &config.touch;

    for (name, value) in [
        ("acquisition.base_timeout_ms", acq.base_timeout_ms),
        ("acquisition.tune_timeout_ms", acq.tune_timeout_ms),
        ("acquisition.sample_timeout_ms", acq.sample_timeout_ms),
        ("acquisition.ready_poll_ms", acq.ready_poll_ms),
        ("ui.idle_tick_ms", ui.idle_tick_ms),
        ("ui.editor_tick_ms", ui.editor_tick_ms),
        ("ui.clock_retry_ms", ui.clock_retry_ms),
    ] {
        if value == 0 {
            errors.push(format!("{} must be greater than 0", name));
        }
    }

    if !(2001..=2099).contains(&ui.fallback_year) {
        errors.push("ui.fallback_year must be 2001-2099".to_string());
    }

    if touch.raw_x_min >= touch.raw_x_max {
        errors.push("touch.raw_x_min must be below touch.raw_x_max".to_string());
    }
    if touch.raw_y_min >= touch.raw_y_max {
        errors.push("touch.raw_y_min must be below touch.raw_y_max".to_string());
    }
    if touch.min_pressure >= touch.max_pressure {
        errors.push("touch.min_pressure must be below touch.max_pressure".to_string());
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid instrument configuration                         ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=instrument.toml validated successfully");
}

/// Write instrument_config.rs into OUT_DIR
fn generate(config: &InstrumentConfig) {
    let acq = &config.acquisition;
    let ui = &config.ui;
    let touch = &config.touch;

    let source = format!(
        "// Generated by build.rs from instrument.toml\n\
         \n\
         pub const ACQUISITION_TIMING: AcquisitionTiming = AcquisitionTiming {{\n    \
             base_timeout_ms: {},\n    \
             tune_timeout_ms: {},\n    \
             tune_settle_ms: {},\n    \
             sample_timeout_ms: {},\n    \
             inter_sample_ms: {},\n    \
             cooldown_ms: {},\n    \
             ready_poll_ms: {},\n\
         }};\n\
         \n\
         pub const UI_TIMING: UiTiming = UiTiming {{\n    \
             idle_tick_ms: {},\n    \
             editor_tick_ms: {},\n    \
             clock_retry_ms: {},\n    \
             fallback_year: {},\n\
         }};\n\
         \n\
         pub const TOUCH_CALIBRATION: TouchCalibration = TouchCalibration {{\n    \
             raw_x_min: {},\n    \
             raw_x_max: {},\n    \
             raw_y_min: {},\n    \
             raw_y_max: {},\n    \
             min_pressure: {},\n    \
             max_pressure: {},\n    \
             invert_x: {},\n    \
             invert_y: {},\n\
         }};\n",
        acq.base_timeout_ms,
        acq.tune_timeout_ms,
        acq.tune_settle_ms,
        acq.sample_timeout_ms,
        acq.inter_sample_ms,
        acq.cooldown_ms,
        acq.ready_poll_ms,
        ui.idle_tick_ms,
        ui.editor_tick_ms,
        ui.clock_retry_ms,
        ui.fallback_year,
        touch.raw_x_min,
        touch.raw_x_max,
        touch.raw_y_min,
        touch.raw_y_max,
        touch.min_pressure,
        touch.max_pressure,
        touch.invert_x,
        touch.invert_y,
    );

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("instrument_config.rs"), source).unwrap();
}
