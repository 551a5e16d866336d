//! Screen layout
//!
//! Fixed control rectangles and text anchors for every screen, derived from
//! the panel's pixel dimensions. Touch hit-testing and drawing both read
//! from here, so a control is always hit where it is drawn.

use crate::backend::{Point, Rect};

/// Outer margin in pixels
pub const MARGIN: u16 = 8;

/// Height reserved for the title row
pub const HEADER_HEIGHT: u16 = 36;

/// Height reserved for the clock/status row at the bottom
pub const FOOTER_HEIGHT: u16 = 32;

/// Vertical gap between stacked menu buttons
pub const BUTTON_GAP: u16 = 6;

/// Height of one line in the sample log
pub const LOG_LINE_HEIGHT: u16 = 12;

/// Height of the editor's Select bar
const SELECT_HEIGHT: u16 = 48;

/// Main menu controls, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuControl {
    Run,
    Baud,
    Tune,
    Observations,
    Clock,
}

impl MenuControl {
    pub const ALL: [MenuControl; 5] = [
        MenuControl::Run,
        MenuControl::Baud,
        MenuControl::Tune,
        MenuControl::Observations,
        MenuControl::Clock,
    ];

    /// Button caption
    pub fn label(&self) -> &'static str {
        match self {
            MenuControl::Run => "Run",
            MenuControl::Baud => "Baud",
            MenuControl::Tune => "Tune",
            MenuControl::Observations => "#Obs",
            MenuControl::Clock => "Clock",
        }
    }

    fn slot(&self) -> u16 {
        match self {
            MenuControl::Run => 0,
            MenuControl::Baud => 1,
            MenuControl::Tune => 2,
            MenuControl::Observations => 3,
            MenuControl::Clock => 4,
        }
    }
}

/// Editor controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditorControl {
    Up,
    Down,
    Select,
}

impl EditorControl {
    pub const ALL: [EditorControl; 3] = [
        EditorControl::Up,
        EditorControl::Down,
        EditorControl::Select,
    ];

    /// Button caption
    pub fn label(&self) -> &'static str {
        match self {
            EditorControl::Up => "Up",
            EditorControl::Down => "Down",
            EditorControl::Select => "Select",
        }
    }
}

/// Layout for a panel of a given size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Layout {
    width: u16,
    height: u16,
}

impl Layout {
    /// Create the layout for a `width` x `height` panel
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Panel width in pixels
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Panel height in pixels
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Title anchor
    pub fn title(&self) -> Point {
        Point::new(MARGIN, MARGIN)
    }

    /// Region between header and footer
    fn body(&self) -> Rect {
        let height = self
            .height
            .saturating_sub(HEADER_HEIGHT + FOOTER_HEIGHT);
        Rect::new(0, HEADER_HEIGHT, self.width, height)
    }

    /// Main menu button bounds
    pub fn menu_button(&self, control: MenuControl) -> Rect {
        let body = self.body();
        let slot = body.height / MenuControl::ALL.len() as u16;
        let width = (self.width / 2).saturating_sub(MARGIN);
        Rect::new(
            MARGIN,
            body.y + control.slot() * slot,
            width,
            slot.saturating_sub(BUTTON_GAP),
        )
    }

    /// Anchor for the current value shown beside a menu button
    pub fn menu_value(&self, control: MenuControl) -> Point {
        let button = self.menu_button(control);
        Point::new(
            self.width / 2 + MARGIN,
            button.y + button.height.saturating_sub(16) / 2,
        )
    }

    /// Bottom row holding the live clock or run status
    pub fn footer(&self) -> Rect {
        Rect::new(
            MARGIN,
            self.height.saturating_sub(FOOTER_HEIGHT) + MARGIN / 2,
            self.width.saturating_sub(2 * MARGIN),
            FOOTER_HEIGHT - MARGIN,
        )
    }

    /// Editor button bounds
    pub fn editor_button(&self, control: EditorControl) -> Rect {
        let body = self.body();
        let width = self.width / 3;
        let x = self.width.saturating_sub(MARGIN + width);
        let height = body.height.saturating_sub(SELECT_HEIGHT + 2 * BUTTON_GAP) / 2;

        match control {
            EditorControl::Up => Rect::new(x, body.y, width, height),
            EditorControl::Down => Rect::new(x, body.y + height + BUTTON_GAP, width, height),
            EditorControl::Select => Rect::new(
                MARGIN,
                body.y + body.height.saturating_sub(SELECT_HEIGHT),
                self.width.saturating_sub(2 * MARGIN),
                SELECT_HEIGHT,
            ),
        }
    }

    /// Editor field caption anchor
    pub fn editor_label(&self) -> Point {
        Point::new(MARGIN, HEADER_HEIGHT)
    }

    /// Editor value area (erased and redrawn on change)
    pub fn editor_value(&self) -> Rect {
        let up = self.editor_button(EditorControl::Up);
        Rect::new(
            MARGIN,
            HEADER_HEIGHT + 24,
            up.x.saturating_sub(2 * MARGIN),
            32,
        )
    }

    /// Anchor for the whole-record preview while editing the clock
    pub fn editor_preview(&self) -> Point {
        let value = self.editor_value();
        Point::new(MARGIN, value.y + value.height + 2 * MARGIN)
    }

    /// Number of lines in the sample log
    pub fn log_rows(&self) -> u16 {
        self.body().height / LOG_LINE_HEIGHT
    }

    /// Anchor of a sample log line
    pub fn log_line(&self, row: u16) -> Point {
        let row = row.min(self.log_rows().saturating_sub(1));
        Point::new(MARGIN, HEADER_HEIGHT + row * LOG_LINE_HEIGHT)
    }

    /// Full-width rectangle covering one sample log line
    pub fn log_line_rect(&self, row: u16) -> Rect {
        let anchor = self.log_line(row);
        Rect::new(
            0,
            anchor.y,
            self.width,
            LOG_LINE_HEIGHT,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlaps(a: Rect, b: Rect) -> bool {
        a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
    }

    fn inside_panel(layout: &Layout, rect: Rect) -> bool {
        rect.x + rect.width <= layout.width() && rect.y + rect.height <= layout.height()
    }

    #[test]
    fn test_menu_buttons_fit_and_do_not_overlap() {
        for (w, h) in [(240, 320), (320, 240)] {
            let layout = Layout::new(w, h);
            for (i, a) in MenuControl::ALL.iter().enumerate() {
                let ra = layout.menu_button(*a);
                assert!(inside_panel(&layout, ra));
                assert!(ra.height > 0);
                for b in &MenuControl::ALL[i + 1..] {
                    assert!(!overlaps(ra, layout.menu_button(*b)));
                }
            }
        }
    }

    #[test]
    fn test_editor_buttons_fit_and_do_not_overlap() {
        for (w, h) in [(240, 320), (320, 240)] {
            let layout = Layout::new(w, h);
            for (i, a) in EditorControl::ALL.iter().enumerate() {
                let ra = layout.editor_button(*a);
                assert!(inside_panel(&layout, ra));
                for b in &EditorControl::ALL[i + 1..] {
                    assert!(!overlaps(ra, layout.editor_button(*b)));
                }
            }
        }
    }

    #[test]
    fn test_editor_value_clear_of_buttons() {
        let layout = Layout::new(240, 320);
        let value = layout.editor_value();
        for control in EditorControl::ALL {
            assert!(!overlaps(value, layout.editor_button(control)));
        }
    }

    #[test]
    fn test_footer_below_menu() {
        let layout = Layout::new(240, 320);
        let footer = layout.footer();
        assert!(inside_panel(&layout, footer));
        for control in MenuControl::ALL {
            assert!(!overlaps(footer, layout.menu_button(control)));
        }
    }

    #[test]
    fn test_log_lines_stay_in_body() {
        let layout = Layout::new(240, 320);
        let rows = layout.log_rows();
        assert!(rows > 0);
        let last = layout.log_line_rect(rows - 1);
        assert!(last.y + last.height <= layout.height() - FOOTER_HEIGHT);
        // Out-of-range rows clamp to the last line
        assert_eq!(layout.log_line(rows + 5), layout.log_line(rows - 1));
    }
}
