//! Persistent byte store abstractions
//!
//! Provides the trait for a small byte-addressable non-volatile store
//! (EEPROM, or flash emulating one) and the fixed slot layout used for the
//! operator parameters.

/// Size of the parameter area in bytes
pub const PARAMETER_AREA_LEN: usize = 6;

/// Operator parameters with a persisted slot
///
/// Each key owns an adjacent (tag, value) byte pair. The pairs are laid out
/// in declaration order starting at offset 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ParameterKey {
    /// Instrument tune value (microtesla)
    Tune = 0,
    /// Number of observations per run
    Repeats = 1,
    /// Index into the baud rate table
    BaudIndex = 2,
}

impl ParameterKey {
    /// All keys in slot order
    pub const ALL: [ParameterKey; 3] = [
        ParameterKey::Tune,
        ParameterKey::Repeats,
        ParameterKey::BaudIndex,
    ];

    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a key from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ParameterKey::Tune),
            1 => Some(ParameterKey::Repeats),
            2 => Some(ParameterKey::BaudIndex),
            _ => None,
        }
    }

    /// Offset of this key's validity tag byte
    pub fn tag_offset(self) -> usize {
        self.as_u8() as usize * 2
    }

    /// Offset of this key's value byte
    pub fn value_offset(self) -> usize {
        self.tag_offset() + 1
    }
}

/// Errors from byte store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Offset outside the store
    OutOfRange,
    /// Underlying storage operation failed
    Storage,
    /// Storage is full and could not be compacted
    Full,
}

/// Raw byte-addressable persistent store
///
/// Mirrors the primitives of a classic EEPROM: read one byte, and update one
/// byte (write only if it differs, to spare erase cycles).
pub trait ByteStore {
    /// Error type for store operations
    type Error;

    /// Read the byte at `offset`
    fn read(&mut self, offset: usize) -> Result<u8, Self::Error>;

    /// Write `value` at `offset` if it differs from the stored byte
    fn update(&mut self, offset: usize, value: u8) -> Result<(), Self::Error>;

    /// Store capacity in bytes
    fn capacity(&self) -> usize;
}
