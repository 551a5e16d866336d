//! Events that trigger mode transitions

use larmor_display::MenuControl;

/// Events that can trigger mode transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Lifecycle events
    /// Real-time clock answered at boot
    ClockFound,

    // Menu press edges
    RunPressed,
    BaudPressed,
    TunePressed,
    ObservationsPressed,
    ClockPressed,

    // Component completion
    /// Parameter editor confirmed its value
    EditConfirmed,
    /// Acquisition sequence completed
    RunFinished,
    /// Clock editor committed its record
    ClockCommitted,
}

impl Event {
    /// Event raised by a press on a menu control
    pub fn from_menu(control: MenuControl) -> Self {
        match control {
            MenuControl::Run => Event::RunPressed,
            MenuControl::Baud => Event::BaudPressed,
            MenuControl::Tune => Event::TunePressed,
            MenuControl::Observations => Event::ObservationsPressed,
            MenuControl::Clock => Event::ClockPressed,
        }
    }
}
