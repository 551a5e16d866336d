//! Display backend trait
//!
//! Defines the drawing interface used by the controller UI.

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Invalid coordinates or dimensions
    InvalidCoordinates,
    /// Display not initialized
    NotInitialized,
}

/// RGB565 colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color(pub u16);

impl Color {
    pub const BLACK: Self = Self(0x0000);
    pub const WHITE: Self = Self(0xFFFF);
    pub const RED: Self = Self(0xF800);
    pub const GREEN: Self = Self(0x07E0);
    pub const BLUE: Self = Self(0x001F);
    pub const YELLOW: Self = Self(0xFFE0);
    pub const CYAN: Self = Self(0x07FF);
    pub const MAGENTA: Self = Self(0xF81F);
    pub const NAVY: Self = Self(0x000F);

    /// Build from 8-bit channels
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self((((r as u16) & 0xF8) << 8) | (((g as u16) & 0xFC) << 3) | ((b as u16) >> 3))
    }
}

/// Pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check whether a point lies inside this rectangle
    ///
    /// Left and top edges are inside, right and bottom edges are not.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && (point.x as u32) < self.x as u32 + self.width as u32
            && (point.y as u32) < self.y as u32 + self.height as u32
    }

    /// Top-left corner
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Point inset from the top-left corner
    pub fn inset(&self, dx: u16, dy: u16) -> Point {
        Point::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// Text rendering style
///
/// `size` is a scale factor over a 6x8 base cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextStyle {
    pub size: u8,
    pub color: Color,
}

impl TextStyle {
    pub const fn new(size: u8, color: Color) -> Self {
        Self { size, color }
    }

    /// Width of one character cell in pixels
    pub fn char_width(&self) -> u16 {
        6 * self.size.max(1) as u16
    }

    /// Height of one character cell in pixels
    pub fn char_height(&self) -> u16 {
        8 * self.size.max(1) as u16
    }
}

/// Pixel display used by the controller UI
pub trait GraphicsDisplay {
    /// Fill the whole panel
    fn fill_screen(&mut self, color: Color) -> Result<(), DisplayError>;

    /// Fill a rectangle
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError>;

    /// Draw a one-pixel rectangle outline
    fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError>;

    /// Draw a one-pixel line
    fn draw_line(&mut self, from: Point, to: Point, color: Color) -> Result<(), DisplayError>;

    /// Draw text with its top-left corner at `origin`
    ///
    /// Only foreground pixels are drawn. Redrawing the same text in the
    /// background colour erases it.
    fn draw_text(&mut self, origin: Point, text: &str, style: TextStyle)
        -> Result<(), DisplayError>;

    /// Get pixel dimensions (width, height)
    fn pixel_dimensions(&self) -> (u16, u16);
}
