//! Reply classification
//!
//! The instrument answers each command with one line. Replies are not
//! checksummed, so the only judgement made here is whether anything useful
//! arrived before the read timed out:
//! - fewer than [`MIN_RESPONSE_LEN`] bytes: timed out
//! - otherwise: the line text (Tune verbatim, Sample with its terminator
//!   stripped)

use heapless::String;

use crate::command::LINE_TERMINATOR;

/// Replies shorter than this are treated as a timeout
pub const MIN_RESPONSE_LEN: usize = 2;

/// Longest reply kept; longer replies are truncated
pub const MAX_RESPONSE_LEN: usize = 48;

/// Placeholder for bytes that are not printable ASCII
const REPLACEMENT: char = '?';

/// Classified instrument reply
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    /// Nothing useful arrived within the response window
    TimedOut,
    /// Reply text
    Text(String<MAX_RESPONSE_LEN>),
}

impl Reply {
    /// Classify a reply to a Tune command
    ///
    /// The text is kept verbatim, terminator included.
    pub fn tune(raw: &[u8]) -> Self {
        if raw.len() < MIN_RESPONSE_LEN {
            return Reply::TimedOut;
        }
        Reply::Text(to_text(raw))
    }

    /// Classify a reply to a Sample command
    ///
    /// The trailing line terminator (and a carriage return before it) is
    /// stripped.
    pub fn sample(raw: &[u8]) -> Self {
        if raw.len() < MIN_RESPONSE_LEN {
            return Reply::TimedOut;
        }
        Reply::Text(to_text(strip_terminator(raw)))
    }

    /// Check if this reply is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Reply::TimedOut)
    }

    /// Get the reply text, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            Reply::TimedOut => None,
            Reply::Text(text) => Some(text.as_str()),
        }
    }
}

/// Remove one trailing line terminator, and a carriage return before it
fn strip_terminator(raw: &[u8]) -> &[u8] {
    let mut end = raw.len();
    if end > 0 && raw[end - 1] == LINE_TERMINATOR {
        end -= 1;
        if end > 0 && raw[end - 1] == b'\r' {
            end -= 1;
        }
    }
    &raw[..end]
}

/// Convert raw bytes to text, truncating and masking non-ASCII bytes
fn to_text(raw: &[u8]) -> String<MAX_RESPONSE_LEN> {
    let mut text = String::new();
    for &byte in raw.iter().take(MAX_RESPONSE_LEN) {
        let c = if byte.is_ascii() { byte as char } else { REPLACEMENT };
        // Capacity matches the take() bound
        let _ = text.push(c);
    }
    text
}
