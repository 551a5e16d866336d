//! ILI9341 240x320 TFT controller (4-wire SPI)
//!
//! # Interface
//!
//! Chip select is owned by the `SpiDevice`. The D/C line selects between
//! command bytes (low) and parameter/pixel bytes (high). Pixels are sent as
//! big-endian RGB565 after a column/page window and a memory-write command,
//! so a solid fill is one window setup followed by a stream of one colour.
//!
//! The controller is write-only here; nothing is read back over MISO.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{
    Dimensions, DrawTarget, IntoStorage, OriginDimensions, Pixel, Point, Size,
};
use embedded_graphics::primitives::Rectangle;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

/// ILI9341 command set (the subset this driver sends)
pub mod cmd {
    pub const SOFTWARE_RESET: u8 = 0x01;
    pub const SLEEP_OUT: u8 = 0x11;
    pub const GAMMA_SET: u8 = 0x26;
    pub const DISPLAY_OFF: u8 = 0x28;
    pub const DISPLAY_ON: u8 = 0x29;
    pub const COLUMN_ADDRESS_SET: u8 = 0x2A;
    pub const PAGE_ADDRESS_SET: u8 = 0x2B;
    pub const MEMORY_WRITE: u8 = 0x2C;
    pub const MEMORY_ACCESS_CONTROL: u8 = 0x36;
    pub const PIXEL_FORMAT_SET: u8 = 0x3A;
    pub const FRAME_CONTROL_NORMAL: u8 = 0xB1;
    pub const DISPLAY_FUNCTION_CONTROL: u8 = 0xB6;
    pub const POWER_CONTROL_1: u8 = 0xC0;
    pub const POWER_CONTROL_2: u8 = 0xC1;
    pub const VCOM_CONTROL_1: u8 = 0xC5;
    pub const VCOM_CONTROL_2: u8 = 0xC7;
    pub const POWER_CONTROL_A: u8 = 0xCB;
    pub const POWER_CONTROL_B: u8 = 0xCF;
    pub const POSITIVE_GAMMA_CORRECTION: u8 = 0xE0;
    pub const NEGATIVE_GAMMA_CORRECTION: u8 = 0xE1;
    pub const DRIVER_TIMING_A: u8 = 0xE8;
    pub const DRIVER_TIMING_B: u8 = 0xEA;
    pub const POWER_ON_SEQUENCE: u8 = 0xED;
    pub const ENABLE_3G: u8 = 0xF2;
    pub const PUMP_RATIO: u8 = 0xF7;
}

/// Memory access control bits
mod madctl {
    pub const MY: u8 = 0x80;
    pub const MX: u8 = 0x40;
    pub const MV: u8 = 0x20;
    pub const BGR: u8 = 0x08;
}

/// Native panel size in portrait
const PANEL_WIDTH: u16 = 240;
const PANEL_HEIGHT: u16 = 320;

/// Bytes buffered per SPI write when streaming pixels
const CHUNK: usize = 64;

/// Power/gamma setup sent after sleep-out, as (command, parameters)
const INIT_SEQUENCE: &[(u8, &[u8])] = &[
    (cmd::POWER_CONTROL_A, &[0x39, 0x2C, 0x00, 0x34, 0x02]),
    (cmd::POWER_CONTROL_B, &[0x00, 0xC1, 0x30]),
    (cmd::DRIVER_TIMING_A, &[0x85, 0x00, 0x78]),
    (cmd::DRIVER_TIMING_B, &[0x00, 0x00]),
    (cmd::POWER_ON_SEQUENCE, &[0x64, 0x03, 0x12, 0x81]),
    (cmd::PUMP_RATIO, &[0x20]),
    (cmd::POWER_CONTROL_1, &[0x23]),
    (cmd::POWER_CONTROL_2, &[0x10]),
    (cmd::VCOM_CONTROL_1, &[0x3E, 0x28]),
    (cmd::VCOM_CONTROL_2, &[0x86]),
    (cmd::PIXEL_FORMAT_SET, &[0x55]),
    (cmd::FRAME_CONTROL_NORMAL, &[0x00, 0x18]),
    (cmd::DISPLAY_FUNCTION_CONTROL, &[0x08, 0x82, 0x27]),
    (cmd::ENABLE_3G, &[0x00]),
    (cmd::GAMMA_SET, &[0x01]),
    (
        cmd::POSITIVE_GAMMA_CORRECTION,
        &[
            0x0F, 0x31, 0x2B, 0x0C, 0x0E, 0x08, 0x4E, 0xF1, 0x37, 0x07, 0x10, 0x03, 0x0E, 0x09,
            0x00,
        ],
    ),
    (
        cmd::NEGATIVE_GAMMA_CORRECTION,
        &[
            0x00, 0x0E, 0x14, 0x03, 0x11, 0x07, 0x31, 0xC1, 0x48, 0x08, 0x0F, 0x0C, 0x31, 0x36,
            0x0F,
        ],
    ),
];

/// Panel orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    /// 240 wide, connector at the bottom
    Portrait,
    /// 320 wide, rotated 90 degrees
    #[default]
    Landscape,
    /// Portrait, upside down
    PortraitFlipped,
    /// Landscape, upside down
    LandscapeFlipped,
}

impl Orientation {
    /// MADCTL value for this orientation (BGR panel)
    pub const fn madctl(self) -> u8 {
        match self {
            Self::Portrait => madctl::MX | madctl::BGR,
            Self::Landscape => madctl::MV | madctl::BGR,
            Self::PortraitFlipped => madctl::MY | madctl::BGR,
            Self::LandscapeFlipped => madctl::MX | madctl::MY | madctl::MV | madctl::BGR,
        }
    }

    /// Visible (width, height) in pixels
    pub const fn dimensions(self) -> (u16, u16) {
        match self {
            Self::Portrait | Self::PortraitFlipped => (PANEL_WIDTH, PANEL_HEIGHT),
            Self::Landscape | Self::LandscapeFlipped => (PANEL_HEIGHT, PANEL_WIDTH),
        }
    }
}

/// ILI9341 errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ili9341Error<S, P> {
    /// SPI transfer failed
    Spi(S),
    /// D/C or reset pin failed
    Pin(P),
}

/// ILI9341 driver
pub struct Ili9341<SPI, DC, RST> {
    spi: SPI,
    dc: DC,
    rst: RST,
    orientation: Orientation,
}

type DriverResult<T, SPI, DC> = Result<
    T,
    Ili9341Error<<SPI as embedded_hal::spi::ErrorType>::Error, <DC as embedded_hal::digital::ErrorType>::Error>,
>;

impl<SPI, DC, RST> Ili9341<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin<Error = DC::Error>,
{
    /// Create a driver; call [`Self::init`] before drawing
    pub fn new(spi: SPI, dc: DC, rst: RST, orientation: Orientation) -> Self {
        Self {
            spi,
            dc,
            rst,
            orientation,
        }
    }

    /// Release the bus and pins
    pub fn release(self) -> (SPI, DC, RST) {
        (self.spi, self.dc, self.rst)
    }

    /// Current orientation
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Reset the controller and bring the panel up blank
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> DriverResult<(), SPI, DC> {
        self.rst.set_high().map_err(Ili9341Error::Pin)?;
        delay.delay_ms(5);
        self.rst.set_low().map_err(Ili9341Error::Pin)?;
        delay.delay_ms(20);
        self.rst.set_high().map_err(Ili9341Error::Pin)?;
        delay.delay_ms(150);

        self.command(cmd::SOFTWARE_RESET, &[])?;
        delay.delay_ms(120);
        self.command(cmd::SLEEP_OUT, &[])?;
        delay.delay_ms(120);

        for (command, params) in INIT_SEQUENCE {
            self.command(*command, params)?;
        }
        self.set_orientation(self.orientation)?;

        self.fill_window(0, 0, self.width() - 1, self.height() - 1, 0)?;
        self.command(cmd::DISPLAY_ON, &[])?;
        delay.delay_ms(20);
        Ok(())
    }

    /// Change orientation (existing frame memory is not redrawn)
    pub fn set_orientation(&mut self, orientation: Orientation) -> DriverResult<(), SPI, DC> {
        self.orientation = orientation;
        self.command(cmd::MEMORY_ACCESS_CONTROL, &[orientation.madctl()])
    }

    /// Turn the panel on or off without touching frame memory
    pub fn set_display_on(&mut self, on: bool) -> DriverResult<(), SPI, DC> {
        self.command(if on { cmd::DISPLAY_ON } else { cmd::DISPLAY_OFF }, &[])
    }

    /// Visible width in pixels
    pub fn width(&self) -> u16 {
        self.orientation.dimensions().0
    }

    /// Visible height in pixels
    pub fn height(&self) -> u16 {
        self.orientation.dimensions().1
    }

    /// Fill an inclusive window with one raw RGB565 colour
    pub fn fill_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16, color: u16) -> DriverResult<(), SPI, DC> {
        self.set_window(x0, y0, x1, y1)?;
        let count = (x1 - x0 + 1) as u32 * (y1 - y0 + 1) as u32;
        self.write_repeated(color, count)
    }

    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> DriverResult<(), SPI, DC> {
        let [x0h, x0l] = x0.to_be_bytes();
        let [x1h, x1l] = x1.to_be_bytes();
        let [y0h, y0l] = y0.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();
        self.command(cmd::COLUMN_ADDRESS_SET, &[x0h, x0l, x1h, x1l])?;
        self.command(cmd::PAGE_ADDRESS_SET, &[y0h, y0l, y1h, y1l])?;
        self.command(cmd::MEMORY_WRITE, &[])
    }

    fn write_repeated(&mut self, color: u16, count: u32) -> DriverResult<(), SPI, DC> {
        let mut buf = [0u8; CHUNK];
        for pair in buf.chunks_exact_mut(2) {
            pair.copy_from_slice(&color.to_be_bytes());
        }

        self.dc.set_high().map_err(Ili9341Error::Pin)?;
        let mut remaining = count as usize * 2;
        while remaining > 0 {
            let n = remaining.min(CHUNK);
            self.spi.write(&buf[..n]).map_err(Ili9341Error::Spi)?;
            remaining -= n;
        }
        Ok(())
    }

    fn command(&mut self, command: u8, params: &[u8]) -> DriverResult<(), SPI, DC> {
        self.dc.set_low().map_err(Ili9341Error::Pin)?;
        self.spi.write(&[command]).map_err(Ili9341Error::Spi)?;
        if !params.is_empty() {
            self.dc.set_high().map_err(Ili9341Error::Pin)?;
            self.spi.write(params).map_err(Ili9341Error::Spi)?;
        }
        Ok(())
    }
}

impl<SPI, DC, RST> OriginDimensions for Ili9341<SPI, DC, RST> {
    fn size(&self) -> Size {
        let (w, h) = self.orientation.dimensions();
        Size::new(w as u32, h as u32)
    }
}

impl<SPI, DC, RST> DrawTarget for Ili9341<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin<Error = DC::Error>,
{
    type Color = Rgb565;
    type Error = Ili9341Error<SPI::Error, DC::Error>;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();
        for Pixel(point, color) in pixels {
            if !bounds.contains(point) {
                continue;
            }
            let (x, y) = (point.x as u16, point.y as u16);
            self.fill_window(x, y, x, y, color.into_storage())?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(Point { x: x1, y: y1 }) = area.bottom_right() else {
            return Ok(());
        };
        let Point { x: x0, y: y0 } = area.top_left;
        self.fill_window(x0 as u16, y0 as u16, x1 as u16, y1 as u16, color.into_storage())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_solid(&self.bounding_box(), color)
    }
}
