//! Instrument serial port on an RP2040 UART
//!
//! Wraps an interrupt-driven `BufferedUart`. Reads poll the receive ring
//! until the terminator arrives or the response deadline passes, so a
//! silent instrument costs exactly one timeout and never an error.

use embassy_rp::uart::{self, BufferedUart};
use embassy_time::{Duration, Instant};
use embedded_io::{Read, ReadReady, Write};
use larmor_hal::{SerialError, SerialPort, UartConfig};

/// Bytes drained per read while discarding stale input
const DISCARD_CHUNK: usize = 32;

fn map_error(err: uart::Error) -> SerialError {
    match err {
        uart::Error::Overrun => SerialError::Overrun,
        uart::Error::Framing => SerialError::Framing,
        _ => SerialError::Other,
    }
}

/// Buffered UART implementing [`SerialPort`]
pub struct InstrumentUart {
    uart: BufferedUart,
    timeout: Duration,
    ready: bool,
}

impl InstrumentUart {
    /// Wrap a UART already opened at `config.baudrate`
    pub fn new(uart: BufferedUart, config: UartConfig) -> Self {
        Self {
            uart,
            timeout: Duration::from_millis(config.timeout_ms as u64),
            ready: true,
        }
    }

    /// Current response timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn read_byte(&mut self, deadline: Instant) -> Result<Option<u8>, SerialError> {
        loop {
            if self.uart.read_ready().map_err(map_error)? {
                let mut byte = [0u8; 1];
                if self.uart.read(&mut byte).map_err(map_error)? == 1 {
                    return Ok(Some(byte[0]));
                }
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
        }
    }
}

impl SerialPort for InstrumentUart {
    type Error = SerialError;

    fn configure(&mut self, config: UartConfig) -> Result<(), Self::Error> {
        if config.baudrate == 0 {
            return Err(SerialError::Unsupported);
        }
        self.ready = false;
        self.uart.set_baudrate(config.baudrate);
        self.timeout = Duration::from_millis(config.timeout_ms as u64);
        self.ready = true;
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn set_timeout(&mut self, timeout_ms: u32) {
        self.timeout = Duration::from_millis(timeout_ms as u64);
    }

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.uart.write_all(data).map_err(map_error)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Write::flush(&mut self.uart).map_err(map_error)
    }

    fn discard_input(&mut self) -> Result<usize, Self::Error> {
        let mut scratch = [0u8; DISCARD_CHUNK];
        let mut discarded = 0;
        while self.uart.read_ready().map_err(map_error)? {
            discarded += self.uart.read(&mut scratch).map_err(map_error)?;
        }
        Ok(discarded)
    }

    fn read_until(&mut self, terminator: u8, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let deadline = Instant::now() + self.timeout;
        let mut len = 0;
        while len < buf.len() {
            let Some(byte) = self.read_byte(deadline)? else {
                break;
            };
            buf[len] = byte;
            len += 1;
            if byte == terminator {
                break;
            }
        }
        Ok(len)
    }
}
