//! Controller mode machine
//!
//! The front panel is always in exactly one mode. Editors and acquisition
//! runs block the dispatcher until they finish, so every mode other than
//! `MainMenu` leads straight back to it.

use larmor_hal::ParameterKey;

use super::events::Event;

/// Controller modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Waiting for the real-time clock to respond
    Boot,
    /// Menu visible, live clock ticking
    MainMenu,
    /// Editing one persisted parameter
    Editing(ParameterKey),
    /// Tune and sample sequence running
    Acquiring,
    /// Stepping through the six clock fields
    ClockEditing,
}

impl Mode {
    /// Check if this mode accepts menu presses
    pub fn is_idle(&self) -> bool {
        matches!(self, Mode::MainMenu)
    }

    /// Process an event and return the next mode
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use Mode::*;

        match (self, event) {
            // Boot transitions
            (Boot, ClockFound) => MainMenu,

            // Main menu transitions
            (MainMenu, RunPressed) => Acquiring,
            (MainMenu, BaudPressed) => Editing(ParameterKey::BaudIndex),
            (MainMenu, TunePressed) => Editing(ParameterKey::Tune),
            (MainMenu, ObservationsPressed) => Editing(ParameterKey::Repeats),
            (MainMenu, ClockPressed) => ClockEditing,

            // Blocking components return to the menu
            (Editing(_), EditConfirmed) => MainMenu,
            (Acquiring, RunFinished) => MainMenu,
            (ClockEditing, ClockCommitted) => MainMenu,

            // Default: stay in current mode
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boot_to_menu() {
        assert_eq!(Mode::Boot.transition(Event::ClockFound), Mode::MainMenu);
    }

    #[test]
    fn test_boot_ignores_presses() {
        for event in [Event::RunPressed, Event::ClockPressed, Event::BaudPressed] {
            assert_eq!(Mode::Boot.transition(event), Mode::Boot);
        }
    }

    #[test]
    fn test_menu_routes() {
        let menu = Mode::MainMenu;
        assert_eq!(menu.transition(Event::RunPressed), Mode::Acquiring);
        assert_eq!(
            menu.transition(Event::BaudPressed),
            Mode::Editing(ParameterKey::BaudIndex)
        );
        assert_eq!(
            menu.transition(Event::TunePressed),
            Mode::Editing(ParameterKey::Tune)
        );
        assert_eq!(
            menu.transition(Event::ObservationsPressed),
            Mode::Editing(ParameterKey::Repeats)
        );
        assert_eq!(menu.transition(Event::ClockPressed), Mode::ClockEditing);
    }

    #[test]
    fn test_components_return_to_menu() {
        assert_eq!(
            Mode::Editing(ParameterKey::Tune).transition(Event::EditConfirmed),
            Mode::MainMenu
        );
        assert_eq!(Mode::Acquiring.transition(Event::RunFinished), Mode::MainMenu);
        assert_eq!(
            Mode::ClockEditing.transition(Event::ClockCommitted),
            Mode::MainMenu
        );
    }

    #[test]
    fn test_no_abort_mid_run() {
        // Menu presses cannot interrupt a blocking component
        assert_eq!(Mode::Acquiring.transition(Event::RunPressed), Mode::Acquiring);
        assert_eq!(
            Mode::ClockEditing.transition(Event::BaudPressed),
            Mode::ClockEditing
        );
    }
}
