//! Test doubles for the capability traits

use core::cell::Cell;
use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use heapless::{String, Vec};
use larmor_display::{Color, DisplayError, GraphicsDisplay, Point, Rect, TextStyle, TouchCalibration, TouchPanel, TouchSample};
use larmor_hal::{ByteStore, RealTimeClock, RtcError, SerialError, SerialPort, StorageError, TimeRecord, UartConfig};

/// RAM byte store with a write log
pub struct MemoryStore {
    bytes: [u8; 16],
    writes: Vec<(usize, u8), 32>,
    fail_reads: bool,
}

impl MemoryStore {
    pub fn filled(value: u8) -> Self {
        Self {
            bytes: [value; 16],
            writes: Vec::new(),
            fail_reads: false,
        }
    }

    pub fn set(&mut self, offset: usize, value: u8) {
        self.bytes[offset] = value;
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn writes(&self) -> &[(usize, u8)] {
        &self.writes
    }

    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }
}

impl ByteStore for MemoryStore {
    type Error = StorageError;

    fn read(&mut self, offset: usize) -> Result<u8, Self::Error> {
        if self.fail_reads {
            return Err(StorageError::Storage);
        }
        self.bytes.get(offset).copied().ok_or(StorageError::OutOfRange)
    }

    fn update(&mut self, offset: usize, value: u8) -> Result<(), Self::Error> {
        let slot = self.bytes.get_mut(offset).ok_or(StorageError::OutOfRange)?;
        *slot = value;
        let _ = self.writes.push((offset, value));
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.bytes.len()
    }
}

/// Add seconds to a record, wrapping within the day
pub fn add_seconds(time: TimeRecord, seconds: u32) -> TimeRecord {
    let total = (time.seconds_of_day() + seconds) % 86_400;
    TimeRecord {
        hour: (total / 3600) as u8,
        minute: (total / 60 % 60) as u8,
        second: (total % 60) as u8,
        ..time
    }
}

/// Clock that advances one second per read
pub struct FakeClock {
    now: TimeRecord,
    present: bool,
    fail_next: u32,
    written: Option<TimeRecord>,
}

impl FakeClock {
    pub fn new(now: TimeRecord) -> Self {
        Self {
            now,
            present: true,
            fail_next: 0,
            written: None,
        }
    }

    pub fn set_present(&mut self, present: bool) {
        self.present = present;
    }

    /// Fail the next `count` reads
    pub fn fail_next(&mut self, count: u32) {
        self.fail_next = count;
    }

    pub fn written(&self) -> Option<TimeRecord> {
        self.written
    }
}

impl RealTimeClock for FakeClock {
    type Error = RtcError;

    fn read(&mut self) -> Result<TimeRecord, Self::Error> {
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(RtcError::NotPresent);
        }
        if !self.present {
            return Err(RtcError::NotPresent);
        }
        let time = self.now;
        self.now = add_seconds(self.now, 1);
        Ok(time)
    }

    fn write(&mut self, time: &TimeRecord) -> Result<(), Self::Error> {
        if !self.present {
            return Err(RtcError::NotPresent);
        }
        self.now = *time;
        self.written = Some(*time);
        Ok(())
    }
}

/// Delay that only adds up the requested time
#[derive(Default)]
pub struct FakeDelay {
    total_ns: u64,
}

impl FakeDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }

    fn delay_us(&mut self, us: u32) {
        self.total_ns += us as u64 * 1_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ns += ms as u64 * 1_000_000;
    }
}

/// Serial port operations as seen by the instrument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortEvent {
    Configure(u32, u32),
    SetTimeout(u32),
    Discard,
    Write(Vec<u8, 8>),
    Flush,
    Read,
}

/// Serial port that answers each write with the next scripted reply
///
/// Once the script runs out every command gets no reply.
pub struct ScriptedPort {
    replies: Vec<Vec<u8, 64>, 16>,
    next_reply: usize,
    inbound: Vec<u8, 256>,
    events: Vec<PortEvent, 256>,
    not_ready: Cell<u32>,
    ready_polls: Cell<u32>,
    read_limit: Option<u32>,
    reads: u32,
    fail_configure: bool,
}

impl ScriptedPort {
    pub fn new() -> Self {
        Self {
            replies: Vec::new(),
            next_reply: 0,
            inbound: Vec::new(),
            events: Vec::new(),
            not_ready: Cell::new(0),
            ready_polls: Cell::new(0),
            read_limit: None,
            reads: 0,
            fail_configure: false,
        }
    }

    /// Queue the reply to the next unanswered command
    pub fn reply(&mut self, bytes: &[u8]) {
        let mut reply = Vec::new();
        let _ = reply.extend_from_slice(bytes);
        let _ = self.replies.push(reply);
    }

    /// Bytes already sitting in the receive buffer
    pub fn inject_stale(&mut self, bytes: &[u8]) {
        let _ = self.inbound.extend_from_slice(bytes);
    }

    pub fn not_ready_for(&mut self, polls: u32) {
        self.not_ready.set(polls);
    }

    pub fn ready_polls(&self) -> u32 {
        self.ready_polls.get()
    }

    /// Let `count` reads succeed, then fail every read
    pub fn fail_reads_after(&mut self, count: u32) {
        self.read_limit = Some(count);
    }

    pub fn fail_configure(&mut self) {
        self.fail_configure = true;
    }

    pub fn events(&self) -> &[PortEvent] {
        &self.events
    }

    fn log(&mut self, event: PortEvent) {
        let _ = self.events.push(event);
    }
}

impl SerialPort for ScriptedPort {
    type Error = SerialError;

    fn configure(&mut self, config: UartConfig) -> Result<(), Self::Error> {
        if self.fail_configure {
            return Err(SerialError::Unsupported);
        }
        self.log(PortEvent::Configure(config.baudrate, config.timeout_ms));
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready_polls.set(self.ready_polls.get() + 1);
        let remaining = self.not_ready.get();
        if remaining > 0 {
            self.not_ready.set(remaining - 1);
            return false;
        }
        true
    }

    fn set_timeout(&mut self, timeout_ms: u32) {
        self.log(PortEvent::SetTimeout(timeout_ms));
    }

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        let mut bytes = Vec::new();
        let _ = bytes.extend_from_slice(data);
        self.log(PortEvent::Write(bytes));

        if let Some(reply) = self.replies.get(self.next_reply) {
            let reply = reply.clone();
            let _ = self.inbound.extend_from_slice(&reply);
            self.next_reply += 1;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.log(PortEvent::Flush);
        Ok(())
    }

    fn discard_input(&mut self) -> Result<usize, Self::Error> {
        let count = self.inbound.len();
        self.inbound.clear();
        self.log(PortEvent::Discard);
        Ok(count)
    }

    fn read_until(&mut self, terminator: u8, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.log(PortEvent::Read);
        if let Some(limit) = self.read_limit {
            if self.reads >= limit {
                return Err(SerialError::Framing);
            }
        }
        self.reads += 1;

        let mut len = 0;
        while len < buf.len() && len < self.inbound.len() {
            buf[len] = self.inbound[len];
            len += 1;
            if buf[len - 1] == terminator {
                break;
            }
        }

        let rest: Vec<u8, 256> = self.inbound.iter().skip(len).copied().collect();
        self.inbound = rest;
        Ok(len)
    }
}

/// Touch panel replaying scripted samples, then reporting no touch
pub struct ScriptedTouch {
    samples: Vec<TouchSample, 128>,
    next: usize,
}

impl ScriptedTouch {
    pub fn new() -> Self {
        Self {
            samples: Vec::new(),
            next: 0,
        }
    }

    pub fn push_raw(&mut self, x: u16, y: u16, pressure: u16) {
        let _ = self.samples.push(TouchSample { x, y, pressure });
    }

    /// Touch at a screen point (with [`identity_calibration`])
    pub fn push_point(&mut self, point: Point) {
        self.push_raw(point.x, point.y, 100);
    }

    pub fn push_release(&mut self) {
        self.push_raw(0, 0, 0);
    }

    /// Press and release a control
    pub fn tap(&mut self, rect: Rect) {
        self.push_point(rect.inset(rect.width / 2, rect.height / 2));
        self.push_release();
    }

    pub fn remaining(&self) -> usize {
        self.samples.len() - self.next
    }
}

impl TouchPanel for ScriptedTouch {
    type Error = Infallible;

    fn sample(&mut self) -> Result<TouchSample, Self::Error> {
        let sample = self.samples.get(self.next).copied().unwrap_or_default();
        if self.next < self.samples.len() {
            self.next += 1;
        }
        Ok(sample)
    }
}

/// Calibration under which raw readings equal screen coordinates
pub fn identity_calibration(width: u16, height: u16) -> TouchCalibration {
    TouchCalibration {
        raw_x_min: 0,
        raw_x_max: width - 1,
        raw_y_min: 0,
        raw_y_max: height - 1,
        ..TouchCalibration::default()
    }
}

/// Display that records drawn text
pub struct RecordingDisplay {
    width: u16,
    height: u16,
    texts: Vec<(String<64>, Color), 256>,
    clears: u32,
}

impl RecordingDisplay {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            texts: Vec::new(),
            clears: 0,
        }
    }

    pub fn texts(&self) -> &[(String<64>, Color)] {
        &self.texts
    }

    /// Whether `text` was drawn in a visible colour
    pub fn drew(&self, text: &str) -> bool {
        self.texts
            .iter()
            .any(|(t, color)| t.as_str() == text && *color != Color::BLACK)
    }

    pub fn clears(&self) -> u32 {
        self.clears
    }
}

impl GraphicsDisplay for RecordingDisplay {
    fn fill_screen(&mut self, _color: Color) -> Result<(), DisplayError> {
        self.clears += 1;
        Ok(())
    }

    fn fill_rect(&mut self, _rect: Rect, _color: Color) -> Result<(), DisplayError> {
        Ok(())
    }

    fn draw_rect(&mut self, _rect: Rect, _color: Color) -> Result<(), DisplayError> {
        Ok(())
    }

    fn draw_line(&mut self, _from: Point, _to: Point, _color: Color) -> Result<(), DisplayError> {
        Ok(())
    }

    fn draw_text(&mut self, _origin: Point, text: &str, style: TextStyle) -> Result<(), DisplayError> {
        let mut recorded = String::new();
        for c in text.chars() {
            if recorded.push(c).is_err() {
                break;
            }
        }
        if self.texts.is_full() {
            self.texts.remove(0);
        }
        let _ = self.texts.push((recorded, style.color));
        Ok(())
    }

    fn pixel_dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }
}
