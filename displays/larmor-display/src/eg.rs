//! `embedded-graphics` adapter
//!
//! Wraps any RGB565 draw target so it can be used as a `GraphicsDisplay`.
//! Text sizes map onto the built-in mono fonts: size 1 uses 6x10, larger
//! sizes use 10x20.

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Point as EgPoint, Size};
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::primitives::{Line, Primitive, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::Drawable;

use crate::backend::{Color, DisplayError, GraphicsDisplay, Point, Rect, TextStyle};

/// `GraphicsDisplay` over an `embedded-graphics` draw target
pub struct EgDisplay<D> {
    target: D,
}

impl<D> EgDisplay<D> {
    /// Wrap a draw target
    pub fn new(target: D) -> Self {
        Self { target }
    }

    /// Borrow the wrapped target
    pub fn inner(&self) -> &D {
        &self.target
    }

    /// Mutably borrow the wrapped target
    pub fn inner_mut(&mut self) -> &mut D {
        &mut self.target
    }

    /// Unwrap the draw target
    pub fn into_inner(self) -> D {
        self.target
    }
}

fn rgb(color: Color) -> Rgb565 {
    Rgb565::from(RawU16::new(color.0))
}

fn eg_point(point: Point) -> EgPoint {
    EgPoint::new(point.x as i32, point.y as i32)
}

fn eg_rect(rect: Rect) -> Rectangle {
    Rectangle::new(
        EgPoint::new(rect.x as i32, rect.y as i32),
        Size::new(rect.width as u32, rect.height as u32),
    )
}

fn font_for(size: u8) -> &'static MonoFont<'static> {
    match size {
        0 | 1 => &FONT_6X10,
        _ => &FONT_10X20,
    }
}

impl<D> GraphicsDisplay for EgDisplay<D>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    fn fill_screen(&mut self, color: Color) -> Result<(), DisplayError> {
        self.target
            .clear(rgb(color))
            .map_err(|_| DisplayError::Communication)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError> {
        self.target
            .fill_solid(&eg_rect(rect), rgb(color))
            .map_err(|_| DisplayError::Communication)
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError> {
        eg_rect(rect)
            .into_styled(PrimitiveStyle::with_stroke(rgb(color), 1))
            .draw(&mut self.target)
            .map_err(|_| DisplayError::Communication)
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color) -> Result<(), DisplayError> {
        Line::new(eg_point(from), eg_point(to))
            .into_styled(PrimitiveStyle::with_stroke(rgb(color), 1))
            .draw(&mut self.target)
            .map_err(|_| DisplayError::Communication)
    }

    fn draw_text(
        &mut self,
        origin: Point,
        text: &str,
        style: TextStyle,
    ) -> Result<(), DisplayError> {
        let character_style = MonoTextStyle::new(font_for(style.size), rgb(style.color));
        Text::with_baseline(text, eg_point(origin), character_style, Baseline::Top)
            .draw(&mut self.target)
            .map(|_| ())
            .map_err(|_| DisplayError::Communication)
    }

    fn pixel_dimensions(&self) -> (u16, u16) {
        let size = self.target.size();
        (size.width as u16, size.height as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;
    use embedded_graphics::pixelcolor::RgbColor;

    fn mock() -> EgDisplay<MockDisplay<Rgb565>> {
        let mut display = MockDisplay::new();
        display.set_allow_overdraw(true);
        display.set_allow_out_of_bounds_drawing(true);
        EgDisplay::new(display)
    }

    #[test]
    fn test_dimensions() {
        let display = mock();
        assert_eq!(display.pixel_dimensions(), (64, 64));
    }

    #[test]
    fn test_fill_rect_colors_pixels() {
        let mut display = mock();
        display
            .fill_rect(Rect::new(2, 3, 4, 5), Color::RED)
            .unwrap();

        let target = display.inner();
        assert_eq!(target.get_pixel(EgPoint::new(2, 3)), Some(Rgb565::RED));
        assert_eq!(target.get_pixel(EgPoint::new(5, 7)), Some(Rgb565::RED));
        assert_eq!(target.get_pixel(EgPoint::new(6, 7)), None);
    }

    #[test]
    fn test_text_draws_foreground_only() {
        let mut display = mock();
        display
            .draw_text(Point::new(0, 0), "8", TextStyle::new(1, Color::WHITE))
            .unwrap();

        let target = display.inner();
        let mut lit = 0;
        for y in 0..10 {
            for x in 0..6 {
                match target.get_pixel(EgPoint::new(x, y)) {
                    Some(c) => {
                        assert_eq!(c, Rgb565::WHITE);
                        lit += 1;
                    }
                    None => {}
                }
            }
        }
        assert!(lit > 0);
    }
}
