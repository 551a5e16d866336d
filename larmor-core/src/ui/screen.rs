//! Screen rendering
//!
//! Every screen the controller shows, drawn through `GraphicsDisplay` at the
//! positions `Layout` defines. Text is drawn foreground-only, so changing
//! text is erased either by filling its area or by overprinting the old
//! string in the background colour.

use core::fmt::Write;

use heapless::String;
use larmor_display::{
    Color, DisplayError, EditorControl, GraphicsDisplay, Layout, MenuControl, Point, Rect,
    TextStyle,
};
use larmor_hal::{ParameterKey, TimeRecord};
use larmor_protocol::{baud_rate, Reply};

use crate::acquisition::{AcquisitionObserver, Phase, Sample};
use crate::clock::{format_time, TimeText};
use crate::config::RuntimeConfig;
use crate::editor::ClockField;

pub const BACKGROUND: Color = Color::BLACK;
pub const FOREGROUND: Color = Color::WHITE;
pub const BUTTON_FILL: Color = Color::NAVY;
pub const VALUE_COLOR: Color = Color::YELLOW;
pub const ALERT_COLOR: Color = Color::RED;

/// Shown when the tune reply does not arrive
pub const TUNE_TIMEOUT_TEXT: &str = "timed out";

/// Shown when a sample reply does not arrive
pub const SAMPLE_TIMEOUT_TEXT: &str = "field time-out";

/// Boot diagnostic
pub const CLOCK_MISSING_TEXT: &str = "RTC not found";

const TITLE: &str = "Larmor";
const LARGE: u8 = 2;
const SMALL: u8 = 1;

/// Longest line of rendered text
pub const MAX_LINE: usize = 64;

/// One rendered line
pub type Line = String<MAX_LINE>;

/// Screen title for a parameter editor
pub fn parameter_title(key: ParameterKey) -> &'static str {
    match key {
        ParameterKey::Tune => "Tune (uT)",
        ParameterKey::Repeats => "Observations",
        ParameterKey::BaudIndex => "Baud rate",
    }
}

/// Display text for a parameter value
///
/// The baud index is shown as the rate it selects.
pub fn parameter_text(key: ParameterKey, value: i32) -> Line {
    let mut text = Line::new();
    match key {
        ParameterKey::BaudIndex => match baud_rate(value as u8) {
            Some(rate) => {
                let _ = write!(text, "{}", rate);
            }
            None => {
                let _ = text.push_str("?");
            }
        },
        _ => {
            let _ = write!(text, "{}", value);
        }
    }
    text
}

/// Log line for a sample
pub fn sample_line(sample: &Sample) -> Line {
    let mut line = Line::new();
    let reading = sample.response.text().unwrap_or(SAMPLE_TIMEOUT_TEXT);
    let _ = write!(
        line,
        "#{} {} {}",
        sample.index,
        reading,
        format_time(&sample.timestamp, false)
    );
    line
}

/// Log line for the tune reply
pub fn tune_line(reply: &Reply) -> Line {
    let mut line = Line::new();
    let text = reply
        .text()
        .map(|t| t.trim_end_matches(['\r', '\n']))
        .unwrap_or(TUNE_TIMEOUT_TEXT);
    let _ = write!(line, "Tune: {}", text);
    line
}

/// Controller screens over a graphics display
pub struct Screen<G> {
    display: G,
    layout: Layout,
    clock_text: Option<TimeText>,
    log_row: u16,
}

impl<G: GraphicsDisplay> Screen<G> {
    pub fn new(display: G) -> Self {
        let (width, height) = display.pixel_dimensions();
        Self {
            display,
            layout: Layout::new(width, height),
            clock_text: None,
            log_row: 0,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn display(&self) -> &G {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut G {
        &mut self.display
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.clock_text = None;
        self.log_row = 0;
        self.display.fill_screen(BACKGROUND)
    }

    fn text(&mut self, at: Point, text: &str, size: u8, color: Color) -> Result<(), DisplayError> {
        self.display.draw_text(at, text, TextStyle::new(size, color))
    }

    fn title(&mut self, text: &str) -> Result<(), DisplayError> {
        let at = self.layout.title();
        self.text(at, text, LARGE, FOREGROUND)
    }

    fn button(&mut self, rect: Rect, label: &str) -> Result<(), DisplayError> {
        self.display.fill_rect(rect, BUTTON_FILL)?;
        self.display.draw_rect(rect, FOREGROUND)?;
        let style = TextStyle::new(LARGE, FOREGROUND);
        let at = rect.inset(6, rect.height.saturating_sub(style.char_height()) / 2);
        self.display.draw_text(at, label, style)
    }

    /// Footer status text, replacing whatever was there
    pub fn status(&mut self, text: &str) -> Result<(), DisplayError> {
        let footer = self.layout.footer();
        self.clock_text = None;
        self.display.fill_rect(footer, BACKGROUND)?;
        self.text(footer.inset(0, 4), text, SMALL, FOREGROUND)
    }

    /// Boot diagnostic while the clock is missing
    pub fn clock_missing(&mut self, attempt: u32) -> Result<(), DisplayError> {
        if attempt <= 1 {
            self.clear()?;
            let at = self.layout.title();
            self.text(at, CLOCK_MISSING_TEXT, LARGE, ALERT_COLOR)?;
        }

        let mut line = Line::new();
        let _ = write!(line, "retry {}", attempt);
        self.status(&line)
    }

    /// Main menu with current parameter values
    pub fn main_menu(&mut self, config: &RuntimeConfig) -> Result<(), DisplayError> {
        self.clear()?;
        self.title(TITLE)?;

        for control in MenuControl::ALL {
            let rect = self.layout.menu_button(control);
            self.button(rect, control.label())?;

            let key = match control {
                MenuControl::Baud => ParameterKey::BaudIndex,
                MenuControl::Tune => ParameterKey::Tune,
                MenuControl::Observations => ParameterKey::Repeats,
                MenuControl::Run | MenuControl::Clock => continue,
            };
            let value = parameter_text(key, config.get(key) as i32);
            let at = self.layout.menu_value(control);
            self.text(at, &value, LARGE, VALUE_COLOR)?;
        }
        Ok(())
    }

    /// Redraw the live clock in the footer
    ///
    /// The previous time is erased by overprinting it in the background
    /// colour. Nothing is drawn if the text has not changed.
    pub fn live_clock(&mut self, time: &TimeRecord) -> Result<(), DisplayError> {
        let text = format_time(time, true);
        if self.clock_text.as_ref() == Some(&text) {
            return Ok(());
        }

        let at = self.layout.footer().inset(0, 4);
        if let Some(previous) = self.clock_text.take() {
            self.text(at, &previous, SMALL, BACKGROUND)?;
        }
        self.text(at, &text, SMALL, FOREGROUND)?;
        self.clock_text = Some(text);
        Ok(())
    }

    /// Editor screen with Up, Down and Select controls
    pub fn editor(&mut self, title: &str) -> Result<(), DisplayError> {
        self.clear()?;
        self.title(title)?;
        for control in EditorControl::ALL {
            let rect = self.layout.editor_button(control);
            self.button(rect, control.label())?;
        }
        Ok(())
    }

    /// Switch the editor caption without redrawing the controls
    pub fn editor_caption(&mut self, caption: &str) -> Result<(), DisplayError> {
        let at = self.layout.editor_label();
        let rect = Rect::new(at.x, at.y, self.layout.editor_value().width, 16);
        self.display.fill_rect(rect, BACKGROUND)?;
        self.text(at, caption, LARGE, FOREGROUND)
    }

    /// Replace the value under edit
    pub fn editor_value(&mut self, text: &str) -> Result<(), DisplayError> {
        let rect = self.layout.editor_value();
        self.display.fill_rect(rect, BACKGROUND)?;
        self.text(rect.inset(0, 8), text, LARGE, VALUE_COLOR)
    }

    /// Whole-record preview under the clock editor's value
    pub fn editor_preview(&mut self, time: &TimeRecord) -> Result<(), DisplayError> {
        let at = self.layout.editor_preview();
        let width = self.layout.editor_value().width;
        self.display.fill_rect(Rect::new(at.x, at.y, width, 10), BACKGROUND)?;
        let text = format_time(time, true);
        self.text(at, &text, SMALL, FOREGROUND)
    }

    /// Clock editor field
    pub fn clock_field(&mut self, field: ClockField) -> Result<(), DisplayError> {
        self.editor_caption(field.label())
    }

    /// Sample log for a new run
    pub fn sample_log(&mut self, config: &RuntimeConfig) -> Result<(), DisplayError> {
        self.clear()?;
        let mut title = Line::new();
        let _ = write!(title, "Run {} @ {}", config.repeats, config.baud_rate());
        self.title(&title)
    }

    /// Append a line to the sample log
    ///
    /// When the log is full it wraps to the top, erasing each line before it
    /// is reused.
    pub fn log_line(&mut self, text: &str, color: Color) -> Result<(), DisplayError> {
        let rows = self.layout.log_rows().max(1);
        let row = self.log_row % rows;
        self.display.fill_rect(self.layout.log_line_rect(row), BACKGROUND)?;
        let at = self.layout.log_line(row);
        self.text(at, text, SMALL, color)?;
        self.log_row = (row + 1) % rows;
        Ok(())
    }
}

/// Draws acquisition progress as it happens
pub struct LogObserver<'a, G> {
    screen: &'a mut Screen<G>,
    repeats: u8,
}

impl<'a, G: GraphicsDisplay> LogObserver<'a, G> {
    pub fn new(screen: &'a mut Screen<G>, repeats: u8) -> Self {
        Self { screen, repeats }
    }
}

fn report(result: Result<(), DisplayError>) {
    if let Err(e) = result {
        warn!("display: draw failed: {}", e);
    }
}

impl<G: GraphicsDisplay> AcquisitionObserver for LogObserver<'_, G> {
    fn on_phase(&mut self, phase: Phase) {
        let mut line = Line::new();
        match phase {
            Phase::Idle => return,
            Phase::Tuning => {
                let _ = line.push_str("Tuning...");
            }
            Phase::Sampling(i) => {
                let _ = write!(line, "Sample {}/{}", i, self.repeats);
            }
            Phase::Cooldown => {
                let _ = line.push_str("Finishing...");
            }
            Phase::Done => {
                let _ = line.push_str("Done");
            }
        }
        report(self.screen.status(&line));
    }

    fn on_tune(&mut self, reply: &Reply) {
        let color = if reply.is_timeout() { ALERT_COLOR } else { FOREGROUND };
        report(self.screen.log_line(&tune_line(reply), color));
    }

    fn on_sample(&mut self, sample: &Sample) {
        let color = if sample.timed_out() { ALERT_COLOR } else { FOREGROUND };
        report(self.screen.log_line(&sample_line(sample), color));
    }
}
