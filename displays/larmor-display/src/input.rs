//! Touch input
//!
//! A resistive panel reports raw ADC coordinates and a pressure figure.
//! `TouchCalibration` turns a raw sample into a screen point (or nothing, if
//! the pressure is outside the valid band), and `Button` turns successive
//! points into press/release edges for one control.

use crate::backend::{Point, Rect};

/// Raw reading from the touch sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchSample {
    /// Raw X reading
    pub x: u16,
    /// Raw Y reading
    pub y: u16,
    /// Pressure figure (0 = no touch)
    pub pressure: u16,
}

/// Touch sampler
///
/// Resistive panels usually share pins with the display bus. An
/// implementation must leave those pins in the mode the display expects
/// before `sample` returns.
pub trait TouchPanel {
    /// Error type for sampling
    type Error;

    /// Take one raw sample
    fn sample(&mut self) -> Result<TouchSample, Self::Error>;
}

/// Raw-to-screen mapping for a resistive panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchCalibration {
    /// Raw X at the left screen edge
    pub raw_x_min: u16,
    /// Raw X at the right screen edge
    pub raw_x_max: u16,
    /// Raw Y at the top screen edge
    pub raw_y_min: u16,
    /// Raw Y at the bottom screen edge
    pub raw_y_max: u16,
    /// Lowest pressure accepted as a touch
    pub min_pressure: u16,
    /// Highest pressure accepted as a touch
    pub max_pressure: u16,
    /// Raw X runs right-to-left
    pub invert_x: bool,
    /// Raw Y runs bottom-to-top
    pub invert_y: bool,
}

impl Default for TouchCalibration {
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

impl TouchCalibration {
    /// Check whether the sample's pressure is inside the valid band
    pub fn is_pressed(&self, sample: &TouchSample) -> bool {
        sample.pressure >= self.min_pressure && sample.pressure <= self.max_pressure
    }

    /// Map a raw sample to screen coordinates
    ///
    /// Returns `None` when the pressure is outside the valid band. Readings
    /// outside the calibrated extents are clamped to the screen edge.
    pub fn map(&self, sample: &TouchSample, width: u16, height: u16) -> Option<Point> {
        if !self.is_pressed(sample) {
            return None;
        }

        let x = scale(sample.x, self.raw_x_min, self.raw_x_max, width, self.invert_x);
        let y = scale(sample.y, self.raw_y_min, self.raw_y_max, height, self.invert_y);
        Some(Point::new(x, y))
    }
}

/// Linearly map `raw` from [min, max] onto [0, span)
fn scale(raw: u16, min: u16, max: u16, span: u16, invert: bool) -> u16 {
    if span == 0 || max <= min {
        return 0;
    }

    let clamped = raw.clamp(min, max);
    let offset = (clamped - min) as u32;
    let range = (max - min) as u32;
    let last = span as u32 - 1;
    let mapped = offset * last / range;

    let mapped = if invert { last - mapped } else { mapped };
    mapped as u16
}

/// Edge classification for one control between two ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    /// Not touched before or now
    None,
    /// Touch entered the control this tick
    Press,
    /// Touch stayed on the control
    Hold,
    /// Touch left the control or lifted this tick
    Release,
}

impl Gesture {
    /// Check if this is a press edge
    pub fn is_press(&self) -> bool {
        matches!(self, Gesture::Press)
    }
}

/// Touch control with edge detection
///
/// Acts once per touch-down: holding a finger on the control yields one
/// `Press` followed by `Hold`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Button {
    region: Rect,
    pressed: bool,
}

impl Button {
    /// Create a released button over `region`
    pub const fn new(region: Rect) -> Self {
        Self {
            region,
            pressed: false,
        }
    }

    /// Control bounds
    pub fn region(&self) -> Rect {
        self.region
    }

    /// Whether the control was touched on the last update
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Feed this tick's touch point and get the resulting edge
    pub fn update(&mut self, touch: Option<Point>) -> Gesture {
        let now = touch.map_or(false, |p| self.region.contains(p));
        let was = self.pressed;
        self.pressed = now;

        match (was, now) {
            (false, true) => Gesture::Press,
            (true, true) => Gesture::Hold,
            (true, false) => Gesture::Release,
            (false, false) => Gesture::None,
        }
    }
}
