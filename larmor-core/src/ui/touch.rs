//! Touch polling and control edge detection

use larmor_display::{Button, EditorControl, Layout, MenuControl, Point, TouchCalibration, TouchPanel};

use crate::editor::EditorAction;

/// Calibrated touch source
pub struct TouchInput<T> {
    panel: T,
    calibration: TouchCalibration,
    width: u16,
    height: u16,
}

impl<T: TouchPanel> TouchInput<T> {
    pub fn new(panel: T, calibration: TouchCalibration, layout: &Layout) -> Self {
        Self {
            panel,
            calibration,
            width: layout.width(),
            height: layout.height(),
        }
    }

    /// Sample the panel and map to a screen point
    ///
    /// A failed sample reads as no touch.
    pub fn point(&mut self) -> Option<Point> {
        match self.panel.sample() {
            Ok(sample) => self.calibration.map(&sample, self.width, self.height),
            Err(_) => {
                warn!("touch: sample failed");
                None
            }
        }
    }

    pub fn panel_mut(&mut self) -> &mut T {
        &mut self.panel
    }
}

/// The five main menu controls
pub struct MenuButtons {
    buttons: [Button; 5],
}

impl MenuButtons {
    pub fn new(layout: &Layout) -> Self {
        Self {
            buttons: MenuControl::ALL.map(|control| Button::new(layout.menu_button(control))),
        }
    }

    /// Take the current touch state without reporting presses
    ///
    /// Used when the screen changes under a finger that is still down.
    pub fn prime(&mut self, touch: Option<Point>) {
        for button in self.buttons.iter_mut() {
            button.update(touch);
        }
    }

    /// Feed one touch sample and return the control that saw a press edge
    pub fn update(&mut self, touch: Option<Point>) -> Option<MenuControl> {
        let mut pressed = None;
        for (control, button) in MenuControl::ALL.iter().zip(self.buttons.iter_mut()) {
            if button.update(touch).is_press() {
                pressed = Some(*control);
            }
        }
        pressed
    }
}

/// Up, Down and Select controls of the editor screen
pub struct EditorButtons {
    up: Button,
    down: Button,
    select: Button,
}

impl EditorButtons {
    pub fn new(layout: &Layout) -> Self {
        Self {
            up: Button::new(layout.editor_button(EditorControl::Up)),
            down: Button::new(layout.editor_button(EditorControl::Down)),
            select: Button::new(layout.editor_button(EditorControl::Select)),
        }
    }

    /// Take the current touch state without reporting presses
    pub fn prime(&mut self, touch: Option<Point>) {
        self.update(touch);
    }

    /// Feed one touch sample and return the editor action, if any
    pub fn update(&mut self, touch: Option<Point>) -> Option<EditorAction> {
        let up = self.up.update(touch);
        let down = self.down.update(touch);
        let select = self.select.update(touch);
        EditorAction::from_gestures(up, down, select)
    }
}
