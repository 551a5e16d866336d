//! Top-level dispatcher
//!
//! One cooperative loop owns every peripheral and the runtime config. At the
//! main menu it polls the touch panel once per idle tick and refreshes the
//! live clock. A press edge on a menu control runs the matching component
//! to completion before the loop continues; there is no way to abort a
//! component part-way.

use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use larmor_display::{DisplayError, GraphicsDisplay, MenuControl, TouchCalibration, TouchPanel};
use larmor_hal::{ByteStore, ParameterKey, RealTimeClock, SerialPort};

use crate::acquisition::{AcquisitionEngine, AcquisitionReport};
use crate::clock::{seed_year, TimeSource};
use crate::config::{parameter_bounds, AcquisitionTiming, RuntimeConfig, UiTiming};
use crate::editor::{ClockEditStep, ClockEditor, Editor};
use crate::persist::ParameterStore;
use crate::state::{Event, Mode};
use crate::ui::screen::Line;
use crate::ui::{
    parameter_text, parameter_title, EditorButtons, LogObserver, MenuButtons, Screen, TouchInput,
};

/// Peripherals handed to the controller
pub struct Hardware<P, S, R, G, T, D> {
    /// Instrument serial link
    pub port: P,
    /// Raw parameter store
    pub store: S,
    /// Real-time clock
    pub rtc: R,
    /// Graphics panel
    pub display: G,
    /// Touch sampler
    pub touch: T,
    /// Blocking delay source
    pub delay: D,
}

/// Controller settings fixed at build time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    pub acquisition: AcquisitionTiming,
    pub ui: UiTiming,
    pub calibration: TouchCalibration,
}

/// Front-panel controller
pub struct Controller<P, S, R, G, T, D> {
    port: P,
    store: ParameterStore<S>,
    clock: TimeSource<R>,
    screen: Screen<G>,
    touch: TouchInput<T>,
    delay: D,
    engine: AcquisitionEngine,
    menu: MenuButtons,
    timing: UiTiming,
    config: RuntimeConfig,
    mode: Mode,
}

fn report(result: Result<(), DisplayError>) {
    if let Err(e) = result {
        warn!("display: draw failed: {}", e);
    }
}

impl<P, S, R, G, T, D> Controller<P, S, R, G, T, D>
where
    P: SerialPort,
    S: ByteStore,
    R: RealTimeClock,
    G: GraphicsDisplay,
    T: TouchPanel,
    D: DelayNs,
{
    pub fn new(hw: Hardware<P, S, R, G, T, D>, settings: Settings) -> Self {
        let screen = Screen::new(hw.display);
        let layout = *screen.layout();
        Self {
            port: hw.port,
            store: ParameterStore::new(hw.store),
            clock: TimeSource::new(hw.rtc),
            touch: TouchInput::new(hw.touch, settings.calibration, &layout),
            delay: hw.delay,
            engine: AcquisitionEngine::new(settings.acquisition),
            menu: MenuButtons::new(&layout),
            timing: settings.ui,
            config: RuntimeConfig::default(),
            mode: Mode::Boot,
            screen,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn screen(&self) -> &Screen<G> {
        &self.screen
    }

    pub fn clock_mut(&mut self) -> &mut TimeSource<R> {
        &mut self.clock
    }

    pub fn store(&self) -> &ParameterStore<S> {
        &self.store
    }

    fn apply(&mut self, event: Event) {
        let next = self.mode.transition(event);
        if next != self.mode {
            info!("mode: {} -> {}", self.mode, next);
        }
        self.mode = next;
    }

    /// Wait for the clock, load parameters and show the main menu
    ///
    /// Blocks until the real-time clock responds, showing a retry counter.
    pub fn boot(&mut self) {
        let retry_ms = self.timing.clock_retry_ms;
        let screen = &mut self.screen;
        self.clock.wait_for_clock(&mut self.delay, retry_ms, |attempt| {
            report(screen.clock_missing(attempt));
        });

        self.config = self.store.read_all();
        self.apply(Event::ClockFound);
        self.show_menu();
    }

    fn show_menu(&mut self) {
        report(self.screen.main_menu(&self.config));
        self.show_clock();
        let touch = self.touch.point();
        self.menu.prime(touch);
    }

    /// Live clock, with an unset year shown as the fallback year
    fn show_clock(&mut self) {
        let time = seed_year(self.clock.get_time(), self.timing.fallback_year);
        report(self.screen.live_clock(&time));
    }

    /// One idle tick at the main menu
    ///
    /// Returns the control that was pressed, after its component has run.
    pub fn tick(&mut self) -> Option<MenuControl> {
        if !self.mode.is_idle() {
            return None;
        }

        let touch = self.touch.point();
        let Some(control) = self.menu.update(touch) else {
            self.show_clock();
            return None;
        };

        debug!("menu: {} pressed", control);
        self.apply(Event::from_menu(control));
        match self.mode {
            Mode::Acquiring => {
                if let Some(summary) = self.acquire() {
                    info!(
                        "acquisition: {} samples, {} timed out",
                        summary.samples, summary.timeouts
                    );
                }
                self.apply(Event::RunFinished);
            }
            Mode::Editing(key) => {
                self.edit_parameter(key);
                self.apply(Event::EditConfirmed);
            }
            Mode::ClockEditing => {
                self.edit_clock();
                self.apply(Event::ClockCommitted);
            }
            Mode::Boot | Mode::MainMenu => {}
        }

        self.show_menu();
        Some(control)
    }

    /// Boot, then dispatch forever
    pub fn run(&mut self) -> ! {
        self.boot();
        loop {
            self.tick();
            self.delay.delay_ms(self.timing.idle_tick_ms);
        }
    }

    fn open_editor(&mut self, title: &str) -> EditorButtons {
        report(self.screen.editor(title));
        let mut buttons = EditorButtons::new(self.screen.layout());
        let touch = self.touch.point();
        buttons.prime(touch);
        buttons
    }

    /// Edit one persisted parameter until Select
    ///
    /// The confirmed value is checked against its bounds, applied to the
    /// runtime config, and only then written to the store.
    pub fn edit_parameter(&mut self, key: ParameterKey) {
        let mut buttons = self.open_editor(parameter_title(key));
        let mut editor = Editor::new(self.config.get(key) as i32, parameter_bounds(key));

        let value = loop {
            let action = buttons.update(self.touch.point());
            editor.tick(action);
            if let Some(value) = editor.take_redraw() {
                report(self.screen.editor_value(&parameter_text(key, value)));
            }
            if let Some(value) = editor.committed() {
                break value;
            }
            self.delay.delay_ms(self.timing.editor_tick_ms);
        };

        match self.config.set(key, value) {
            Ok(value) => {
                if self.store.write_one(key, value).is_err() {
                    error!("store: failed to save {}", key);
                }
            }
            Err(_) => error!("editor: {} = {} rejected", key, value),
        }
    }

    /// Edit the six clock fields and commit the result
    pub fn edit_clock(&mut self) {
        let mut buttons = self.open_editor("Set clock");
        let start = self.clock.get_time();
        let mut editor = ClockEditor::new(start, self.timing.fallback_year);
        report(self.screen.clock_field(editor.field()));

        let record = loop {
            let action = buttons.update(self.touch.point());
            match editor.tick(action) {
                ClockEditStep::Complete(record) => break record,
                ClockEditStep::NextField(field) => report(self.screen.clock_field(field)),
                ClockEditStep::Editing => {}
            }

            if let Some(value) = editor.editor_mut().take_redraw() {
                let mut text = Line::new();
                let _ = write!(text, "{}", value);
                report(self.screen.editor_value(&text));
                report(self.screen.editor_preview(&editor.preview()));
            }
            self.delay.delay_ms(self.timing.editor_tick_ms);
        };

        if self.clock.set_time(record).is_err() {
            error!("clock: failed to set time");
        }
    }

    /// Run one acquisition with the current parameters
    pub fn acquire(&mut self) -> Option<AcquisitionReport> {
        report(self.screen.sample_log(&self.config));
        let mut observer = LogObserver::new(&mut self.screen, self.config.repeats);

        match self.engine.run(
            &mut self.port,
            &mut self.clock,
            &mut self.delay,
            &self.config,
            &mut observer,
        ) {
            Ok(report) => Some(report),
            Err(_) => {
                error!("acquisition: aborted by serial error");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::TAG_ABSENT;
    use crate::testing::{
        identity_calibration, FakeClock, FakeDelay, MemoryStore, PortEvent, RecordingDisplay,
        ScriptedPort, ScriptedTouch,
    };
    use larmor_display::{EditorControl, Layout};
    use larmor_hal::TimeRecord;

    type TestController =
        Controller<ScriptedPort, MemoryStore, FakeClock, RecordingDisplay, ScriptedTouch, FakeDelay>;

    const START: TimeRecord = TimeRecord::new(2023, 6, 1, 12, 0, 0);

    fn layout() -> Layout {
        Layout::new(240, 320)
    }

    fn controller(touch: ScriptedTouch, clock: FakeClock) -> TestController {
        Controller::new(
            Hardware {
                port: ScriptedPort::new(),
                store: MemoryStore::filled(TAG_ABSENT),
                rtc: clock,
                display: RecordingDisplay::new(240, 320),
                touch,
                delay: FakeDelay::new(),
            },
            Settings {
                calibration: identity_calibration(240, 320),
                ..Default::default()
            },
        )
    }

    /// Touch samples consumed by boot: one to prime the menu
    fn booted(mut touch: ScriptedTouch, clock: FakeClock) -> TestController {
        let mut script = ScriptedTouch::new();
        script.push_release();
        // Append the caller's script after the priming sample
        while touch.remaining() > 0 {
            let sample = touch.sample().unwrap_or_else(|e| match e {});
            script.push_raw(sample.x, sample.y, sample.pressure);
        }
        let mut controller = controller(script, clock);
        controller.boot();
        controller
    }

    #[test]
    fn test_boot_reaches_menu_with_defaults() {
        let controller = booted(ScriptedTouch::new(), FakeClock::new(START));
        assert_eq!(controller.mode(), Mode::MainMenu);
        assert_eq!(*controller.config(), RuntimeConfig::default());
        assert!(controller.screen().display().drew("9600"));
    }

    #[test]
    fn test_boot_waits_for_clock() {
        let mut clock = FakeClock::new(START);
        clock.fail_next(2);
        let controller = booted(ScriptedTouch::new(), clock);

        assert_eq!(controller.mode(), Mode::MainMenu);
        assert!(controller.screen().display().drew("retry 2"));
    }

    #[test]
    fn test_idle_tick_updates_clock() {
        let mut controller = booted(ScriptedTouch::new(), FakeClock::new(START));
        assert_eq!(controller.tick(), None);
        assert!(controller.screen().display().drew("2023-06-01T12:00:02"));
    }

    #[test]
    fn test_unset_clock_shows_fallback_year() {
        let mut controller = booted(
            ScriptedTouch::new(),
            FakeClock::new(TimeRecord::new(2000, 1, 1, 0, 0, 0)),
        );
        controller.tick();

        let texts = controller.screen().display().texts();
        assert!(texts.iter().any(|(t, _)| t.starts_with("2021-01-01T00:00:")));
        assert!(!texts.iter().any(|(t, _)| t.starts_with("2000-")));
    }

    #[test]
    fn test_edit_tune_persists() {
        let l = layout();
        let mut touch = ScriptedTouch::new();
        touch.tap(l.menu_button(MenuControl::Tune));
        // Editor primes with the release sample
        touch.tap(l.editor_button(EditorControl::Up));
        touch.tap(l.editor_button(EditorControl::Up));
        touch.tap(l.editor_button(EditorControl::Select));

        let mut controller = booted(touch, FakeClock::new(START));
        assert_eq!(controller.tick(), Some(MenuControl::Tune));

        assert_eq!(controller.mode(), Mode::MainMenu);
        assert_eq!(controller.config().tune, 52);
        let bytes = controller.store().inner().bytes();
        assert_eq!(&bytes[..2], &[crate::persist::TAG_VALID, 52]);
    }

    #[test]
    fn test_edit_baud_wraps_and_shows_rate() {
        let l = layout();
        let mut touch = ScriptedTouch::new();
        touch.tap(l.menu_button(MenuControl::Baud));
        touch.tap(l.editor_button(EditorControl::Up));
        touch.tap(l.editor_button(EditorControl::Up));
        touch.tap(l.editor_button(EditorControl::Select));

        let mut controller = booted(touch, FakeClock::new(START));
        controller.tick();

        // 3 -> 4 -> 0
        assert_eq!(controller.config().baud_index, 0);
        assert!(controller.screen().display().drew("19200"));
        assert!(controller.screen().display().drew("300"));
    }

    #[test]
    fn test_edit_clock_commits() {
        let l = layout();
        let mut touch = ScriptedTouch::new();
        touch.tap(l.menu_button(MenuControl::Clock));
        // Year +1, then confirm the remaining fields unchanged
        touch.tap(l.editor_button(EditorControl::Up));
        for _ in 0..6 {
            touch.tap(l.editor_button(EditorControl::Select));
        }

        let mut controller = booted(touch, FakeClock::new(START));
        controller.tick();

        let written = controller.clock_mut().inner_mut().written().unwrap();
        assert_eq!(written.year, 2024);
        assert_eq!(written.month, 6);
        assert_eq!(controller.mode(), Mode::MainMenu);
    }

    #[test]
    fn test_run_from_menu() {
        let l = layout();
        let mut touch = ScriptedTouch::new();
        touch.tap(l.menu_button(MenuControl::Run));

        let mut controller = booted(touch, FakeClock::new(START));
        controller.port.reply(b"OK\n");
        controller.port.reply(b"48001.0\n");
        controller.config.repeats = 1;

        assert_eq!(controller.tick(), Some(MenuControl::Run));
        assert_eq!(controller.mode(), Mode::MainMenu);
        assert!(controller.port.events().contains(&PortEvent::Configure(9600, 1000)));
        assert!(controller
            .screen()
            .display()
            .texts()
            .iter()
            .any(|(t, _)| t.starts_with("#1 48001.0 ")));
    }

    #[test]
    fn test_acquire_reports_counts() {
        let mut controller = booted(ScriptedTouch::new(), FakeClock::new(START));
        controller.port.reply(b"OK\n");
        controller.port.reply(b"48001.0\n");
        controller.config.repeats = 2;

        let summary = controller.acquire().unwrap();
        assert_eq!(summary.samples, 2);
        assert_eq!(summary.timeouts, 1);
    }
}
