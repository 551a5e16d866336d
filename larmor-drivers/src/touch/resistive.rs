//! 4-wire resistive touch panel
//!
//! # Measurement
//!
//! Position is read by driving one plate across (one end high, the other
//! low) and sensing the voltage picked up by the other plate. Pressure is
//! read by driving XP low and YM high and sensing Z1 (on XM) and Z2 (on YP);
//! the touch resistance is then
//!
//! ```text
//! Rtouch = Rx_plate * (X / 1024) * (Z2 / Z1 - 1)
//! ```
//!
//! A firmer press gives a lower resistance. With no plate resistance known
//! the figure degrades to `1023 - (Z2 - Z1)`.
//!
//! All readings are 10-bit. Each axis is sampled twice and the sample is
//! discarded (pressure 0) if the two disagree by more than the tolerance,
//! which filters out readings taken while the finger is landing or lifting.

use larmor_display::{TouchPanel, TouchSample};

/// Full scale of a 10-bit reading
const FULL_SCALE: u32 = 1024;

/// Electrode access for a 4-wire panel
///
/// On most shields the plate electrodes double as display bus lines, so
/// every read reconfigures pins. [`ResistiveTouch`] always calls
/// [`Plates::restore`] before returning, even after a failed read.
pub trait Plates {
    /// Error type for pin or ADC access
    type Error;

    /// Raw X position (10-bit)
    fn read_x(&mut self) -> Result<u16, Self::Error>;

    /// Raw Y position (10-bit)
    fn read_y(&mut self) -> Result<u16, Self::Error>;

    /// Raw (Z1, Z2) pressure pair (10-bit)
    fn read_z(&mut self) -> Result<(u16, u16), Self::Error>;

    /// Return shared pins to the mode the display expects
    fn restore(&mut self) -> Result<(), Self::Error>;
}

/// Panel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResistiveConfig {
    /// Resistance across the X plate in ohms (0 if unknown)
    pub x_plate_ohms: u16,
    /// Largest spread between the two samples of an axis
    pub tolerance: u16,
}

impl Default for ResistiveConfig {
    fn default() -> Self {
        Self {
            x_plate_ohms: 300,
            tolerance: 4,
        }
    }
}

/// Touch resistance figure from raw readings
pub fn pressure(x: u16, z1: u16, z2: u16, x_plate_ohms: u16) -> u16 {
    if x_plate_ohms == 0 {
        let z = 1023 - (z2 as i32 - z1 as i32);
        return z.clamp(0, u16::MAX as i32) as u16;
    }
    if z1 == 0 || z2 <= z1 {
        return 0;
    }

    let rtouch = (z2 - z1) as u32 * x as u32 * x_plate_ohms as u32 / (z1 as u32 * FULL_SCALE);
    rtouch.min(u16::MAX as u32) as u16
}

/// Resistive panel sampler
pub struct ResistiveTouch<P> {
    plates: P,
    config: ResistiveConfig,
}

impl<P: Plates> ResistiveTouch<P> {
    /// Create a sampler over the given electrodes
    pub fn new(plates: P, config: ResistiveConfig) -> Self {
        Self { plates, config }
    }

    /// Access the electrodes
    pub fn plates_mut(&mut self) -> &mut P {
        &mut self.plates
    }

    /// Release the electrodes
    pub fn release(self) -> P {
        self.plates
    }

    fn measure(&mut self) -> Result<TouchSample, P::Error> {
        let x = self.read_axis(<P as Plates>::read_x)?;
        let y = self.read_axis(<P as Plates>::read_y)?;
        let (z1, z2) = self.plates.read_z()?;

        let (Some(x), Some(y)) = (x, y) else {
            return Ok(TouchSample { x: 0, y: 0, pressure: 0 });
        };

        Ok(TouchSample {
            x,
            y,
            pressure: pressure(x, z1, z2, self.config.x_plate_ohms),
        })
    }

    /// Two reads of one axis, averaged, or `None` if they disagree
    fn read_axis(
        &mut self,
        read: fn(&mut P) -> Result<u16, P::Error>,
    ) -> Result<Option<u16>, P::Error> {
        let a = read(&mut self.plates)?;
        let b = read(&mut self.plates)?;
        if a.abs_diff(b) > self.config.tolerance {
            return Ok(None);
        }
        Ok(Some(((a as u32 + b as u32) / 2) as u16))
    }
}

impl<P: Plates> TouchPanel for ResistiveTouch<P> {
    type Error = P::Error;

    fn sample(&mut self) -> Result<TouchSample, Self::Error> {
        let sample = self.measure();
        let restored = self.plates.restore();
        let sample = sample?;
        restored?;
        Ok(sample)
    }
}
