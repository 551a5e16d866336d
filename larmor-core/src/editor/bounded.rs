//! Bounded cyclic integer

use crate::config::Bounds;

/// Signed working value that wraps at its bounds
///
/// Values are held as `i32` so stepping below an unsigned field's zero point
/// is representable before wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoundedValue {
    value: i32,
    bounds: Bounds,
}

impl BoundedValue {
    /// Create a value, clamping an out-of-range start into the bounds
    pub fn new(value: i32, bounds: Bounds) -> Self {
        Self {
            value: value.clamp(bounds.lo, bounds.hi),
            bounds,
        }
    }

    pub fn get(&self) -> i32 {
        self.value
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Step up by one, wrapping `hi` to `lo`
    pub fn increment(&mut self) {
        self.value = self.bounds.wrap(self.value + 1);
    }

    /// Step down by one, wrapping `lo` to `hi`
    pub fn decrement(&mut self) {
        self.value = self.bounds.wrap(self.value - 1);
    }
}
