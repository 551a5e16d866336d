//! Command encoding
//!
//! Commands are short ASCII strings. Tune carries its value as decimal text
//! and is line-terminated; Sample is a single byte.

use heapless::Vec;

/// Command letter for Tune
pub const CMD_TUNE: u8 = b'T';

/// Command letter for Sample
pub const CMD_SAMPLE: u8 = b'F';

/// Line terminator used by the instrument in both directions
pub const LINE_TERMINATOR: u8 = b'\n';

/// Longest encoded command ('T' + three digits + terminator)
pub const MAX_COMMAND_LEN: usize = 5;

/// Errors that can occur during command encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Buffer too small for the encoded command
    BufferTooSmall,
}

/// Commands sent to the magnetometer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Tune the polarisation circuit to the expected field (microtesla)
    Tune(u8),
    /// Request one field reading
    Sample,
}

impl Command {
    /// Encode this command into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, CommandError> {
        match self {
            Command::Sample => {
                if buffer.is_empty() {
                    return Err(CommandError::BufferTooSmall);
                }
                buffer[0] = CMD_SAMPLE;
                Ok(1)
            }
            Command::Tune(value) => {
                let mut digits = [0u8; 3];
                let digit_count = write_decimal(*value, &mut digits);
                let len = 1 + digit_count + 1;
                if buffer.len() < len {
                    return Err(CommandError::BufferTooSmall);
                }

                buffer[0] = CMD_TUNE;
                buffer[1..1 + digit_count].copy_from_slice(&digits[..digit_count]);
                buffer[1 + digit_count] = LINE_TERMINATOR;
                Ok(len)
            }
        }
    }

    /// Encode this command into a heapless Vec
    pub fn encode_to_vec(&self) -> Vec<u8, MAX_COMMAND_LEN> {
        let mut buffer = [0u8; MAX_COMMAND_LEN];
        // MAX_COMMAND_LEN covers the longest command
        let len = self.encode(&mut buffer).unwrap_or(0);
        let mut vec = Vec::new();
        let _ = vec.extend_from_slice(&buffer[..len]);
        vec
    }
}

/// Write `value` as ASCII decimal without leading zeros
///
/// Returns the number of digits written.
fn write_decimal(value: u8, out: &mut [u8; 3]) -> usize {
    if value >= 100 {
        out[0] = b'0' + value / 100;
        out[1] = b'0' + (value / 10) % 10;
        out[2] = b'0' + value % 10;
        3
    } else if value >= 10 {
        out[0] = b'0' + value / 10;
        out[1] = b'0' + value % 10;
        2
    } else {
        out[0] = b'0' + value;
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_command() {
        let encoded = Command::Sample.encode_to_vec();
        assert_eq!(encoded.as_slice(), b"F");
    }

    #[test]
    fn test_tune_command() {
        let encoded = Command::Tune(48).encode_to_vec();
        assert_eq!(encoded.as_slice(), b"T48\n");
    }

    #[test]
    fn test_tune_command_edges() {
        assert_eq!(Command::Tune(0).encode_to_vec().as_slice(), b"T0\n");
        assert_eq!(Command::Tune(9).encode_to_vec().as_slice(), b"T9\n");
        assert_eq!(Command::Tune(90).encode_to_vec().as_slice(), b"T90\n");
        assert_eq!(Command::Tune(255).encode_to_vec().as_slice(), b"T255\n");
    }

    #[test]
    fn test_buffer_too_small() {
        let mut buffer = [0u8; 3];
        assert_eq!(
            Command::Tune(48).encode(&mut buffer),
            Err(CommandError::BufferTooSmall)
        );

        let mut empty: [u8; 0] = [];
        assert_eq!(
            Command::Sample.encode(&mut empty),
            Err(CommandError::BufferTooSmall)
        );
    }
}
