//! Board wiring
//!
//! Raspberry Pi Pico with an ILI9341/XPT2046 SPI display module and a
//! DS1307 clock breakout.
//!
//! | Function          | Peripheral | Pins                                  |
//! |-------------------|------------|---------------------------------------|
//! | Instrument serial | UART0      | TX GPIO0, RX GPIO1                    |
//! | Clock             | I2C0       | SDA GPIO4, SCL GPIO5                  |
//! | Display           | SPI0       | SCK 18, MOSI 19, MISO 16, CS 17, DC 20, RST 21 |
//! | Touch             | SPI1       | SCK 10, MOSI 11, MISO 12, CS 13       |
//! | Parameter store   | FLASH      | DMA_CH0                               |

use defmt::*;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, SPI0, SPI1, UART0};
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{self, BufferedInterruptHandler, BufferedUart};
use embassy_rp::{bind_interrupts, Peripherals};
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use static_cell::StaticCell;

use larmor_core::Hardware;
use larmor_display::EgDisplay;
use larmor_drivers::display::{Ili9341, Orientation};
use larmor_drivers::rtc::Ds1307;
use larmor_drivers::touch::{ResistiveConfig, ResistiveTouch, Xpt2046};
use larmor_hal::UartConfig;
use larmor_hal_rp2040::{FlashByteStore, InstrumentUart};

bind_interrupts!(pub struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

const DISPLAY_SPI_HZ: u32 = 32_000_000;
// XPT2046 conversions are only clean up to about 2 MHz
const TOUCH_SPI_HZ: u32 = 2_000_000;

// UART ring buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

type DisplaySpi = ExclusiveDevice<Spi<'static, SPI0, spi::Blocking>, Output<'static>, Delay>;
type TouchSpi = ExclusiveDevice<Spi<'static, SPI1, spi::Blocking>, Output<'static>, Delay>;

pub type Panel = EgDisplay<Ili9341<DisplaySpi, Output<'static>, Output<'static>>>;
pub type Touch = ResistiveTouch<Xpt2046<TouchSpi>>;
pub type Clock = Ds1307<I2c<'static, I2C0, i2c::Blocking>>;
pub type Board = Hardware<InstrumentUart, FlashByteStore<'static>, Clock, Panel, Touch, Delay>;

/// Bring up every peripheral the controller needs
pub fn init(p: Peripherals) -> Board {
    // Opened at the default rate; the controller switches to the stored
    // rate before each run
    let link = UartConfig::default();
    let mut uart_config = uart::Config::default();
    uart_config.baudrate = link.baudrate;
    let tx_buf = &mut TX_BUF.init([0; 64])[..];
    let rx_buf = &mut RX_BUF.init([0; 256])[..];
    let uart = BufferedUart::new(p.UART0, p.PIN_0, p.PIN_1, Irqs, tx_buf, rx_buf, uart_config);
    let port = InstrumentUart::new(uart, link);
    info!("Instrument UART initialized at {} baud", link.baudrate);

    let store = FlashByteStore::new(p.FLASH, p.DMA_CH0);

    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c::Config::default());
    let mut rtc = Ds1307::new(i2c);
    if rtc.is_present() {
        match rtc.start() {
            Ok(()) => info!("DS1307 oscillator running"),
            Err(_) => warn!("DS1307: failed to start oscillator"),
        }
        if rtc.disable_square_wave().is_err() {
            warn!("DS1307: failed to clear control register");
        }
    } else {
        warn!("DS1307 not responding");
    }

    let mut display_config = spi::Config::default();
    display_config.frequency = DISPLAY_SPI_HZ;
    let display_bus = Spi::new_blocking(p.SPI0, p.PIN_18, p.PIN_19, p.PIN_16, display_config);
    let display_cs = Output::new(p.PIN_17, Level::High);
    let display_spi =
        ExclusiveDevice::new(display_bus, display_cs, Delay).unwrap_or_else(|e| match e {});
    let dc = Output::new(p.PIN_20, Level::Low);
    let rst = Output::new(p.PIN_21, Level::High);
    let mut lcd = Ili9341::new(display_spi, dc, rst, Orientation::Portrait);
    match lcd.init(&mut Delay) {
        Ok(()) => info!("ILI9341 initialized"),
        Err(_) => error!("ILI9341 init failed"),
    }
    let display = EgDisplay::new(lcd);

    let mut touch_config = spi::Config::default();
    touch_config.frequency = TOUCH_SPI_HZ;
    let touch_bus = Spi::new_blocking(p.SPI1, p.PIN_10, p.PIN_11, p.PIN_12, touch_config);
    let touch_cs = Output::new(p.PIN_13, Level::High);
    let touch_spi =
        ExclusiveDevice::new(touch_bus, touch_cs, Delay).unwrap_or_else(|e| match e {});
    let touch = ResistiveTouch::new(Xpt2046::new(touch_spi), ResistiveConfig::default());

    Hardware {
        port,
        store,
        rtc,
        display,
        touch,
        delay: Delay,
    }
}
