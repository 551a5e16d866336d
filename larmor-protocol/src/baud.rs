//! Supported line rates
//!
//! The instrument firmware accepts a fixed set of rates. Operators pick one
//! by index; the index is what gets persisted.

/// Supported baud rates, in selection order
pub const BAUD_RATES: [u32; 5] = [300, 1200, 4800, 9600, 19200];

/// Highest valid baud index
pub const BAUD_INDEX_MAX: u8 = (BAUD_RATES.len() - 1) as u8;

/// Look up the rate for a baud index
pub fn baud_rate(index: u8) -> Option<u32> {
    BAUD_RATES.get(index as usize).copied()
}

/// Find the index of a rate, if supported
pub fn baud_index(rate: u32) -> Option<u8> {
    BAUD_RATES.iter().position(|&r| r == rate).map(|i| i as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_lookup() {
        assert_eq!(baud_rate(0), Some(300));
        assert_eq!(baud_rate(3), Some(9600));
        assert_eq!(baud_rate(BAUD_INDEX_MAX), Some(19200));
        assert_eq!(baud_rate(BAUD_INDEX_MAX + 1), None);
    }

    #[test]
    fn test_index_lookup() {
        for (i, &rate) in BAUD_RATES.iter().enumerate() {
            assert_eq!(baud_index(rate), Some(i as u8));
        }
        assert_eq!(baud_index(115200), None);
    }

    #[test]
    fn test_rates_ascending() {
        assert!(BAUD_RATES.windows(2).all(|w| w[0] < w[1]));
    }
}
