//! UART serial communication abstractions
//!
//! Provides the trait for the instrument serial link. The link is a plain
//! request/response channel: the controller writes a short ASCII command and
//! reads back one line, bounded by a timeout.

/// Default response timeout applied when a port is (re)configured
pub const DEFAULT_TIMEOUT_MS: u32 = 1000;

/// UART configuration
///
/// Framing is fixed at 8 data bits, no parity, 1 stop bit. Only the rate and
/// the response timeout are adjustable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Response timeout in milliseconds
    pub timeout_ms: u32,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 9600,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl UartConfig {
    /// Config at the given rate with the default response timeout
    pub const fn with_baudrate(baudrate: u32) -> Self {
        Self {
            baudrate,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Errors from serial link operations
///
/// A read that times out is not an error: it returns however many bytes
/// arrived before the deadline, possibly zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError {
    /// Framing error on the line
    Framing,
    /// Receive buffer overrun
    Overrun,
    /// Requested configuration is not supported by the peripheral
    Unsupported,
    /// Other peripheral error
    Other,
}

/// Instrument serial port
///
/// Blocking operations only. The controller is single-threaded and every
/// wait on the link is a deliberate blocking wait.
pub trait SerialPort {
    /// Error type for serial operations
    type Error;

    /// Reconfigure the port to a new rate and response timeout
    fn configure(&mut self, config: UartConfig) -> Result<(), Self::Error>;

    /// Check whether the port is ready for traffic after configuration
    fn is_ready(&self) -> bool;

    /// Change the response timeout used by subsequent reads
    fn set_timeout(&mut self, timeout_ms: u32);

    /// Write data to the port
    ///
    /// Blocks until all data has been queued or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Wait until queued outbound data has left the transmitter
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Drop any inbound bytes already received
    ///
    /// Returns the number of bytes discarded.
    fn discard_input(&mut self) -> Result<usize, Self::Error>;

    /// Read bytes until `terminator`, a full buffer, or the response timeout
    ///
    /// The terminator, if received, is stored in `buf` and counted in the
    /// returned length.
    fn read_until(&mut self, terminator: u8, buf: &mut [u8]) -> Result<usize, Self::Error>;
}
