//! Parameter editor state machine
//!
//! One editor instance edits one bounded integer. Each tick the caller
//! feeds at most one action derived from the Up, Down and Select press
//! edges. Up and Down step the value with cyclic wrap; Select hands the
//! value back and ends the editor. Nothing carries over between sessions:
//! the caller builds a fresh editor each time.

use larmor_display::Gesture;

use super::bounded::BoundedValue;
use crate::config::Bounds;

/// Editor actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditorAction {
    Increment,
    Decrement,
    Confirm,
}

impl EditorAction {
    /// Pick the action for this tick from the control gestures
    ///
    /// Only press edges count. Controls never overlap, so at most one of
    /// them can see a press in a single tick.
    pub fn from_gestures(up: Gesture, down: Gesture, select: Gesture) -> Option<Self> {
        if select.is_press() {
            Some(EditorAction::Confirm)
        } else if up.is_press() {
            Some(EditorAction::Increment)
        } else if down.is_press() {
            Some(EditorAction::Decrement)
        } else {
            None
        }
    }
}

/// Editor states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditorState {
    /// Accepting Up/Down/Select
    Editing,
    /// Value confirmed
    Terminal,
}

impl EditorState {
    /// Process an action and return the next state
    pub fn transition(self, action: EditorAction) -> Self {
        match (self, action) {
            (EditorState::Editing, EditorAction::Confirm) => EditorState::Terminal,
            (state, _) => state,
        }
    }
}

/// Bounded value editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Editor {
    value: BoundedValue,
    state: EditorState,
    drawn: Option<i32>,
}

impl Editor {
    /// Start editing `initial` within `bounds`
    pub fn new(initial: i32, bounds: Bounds) -> Self {
        Self {
            value: BoundedValue::new(initial, bounds),
            state: EditorState::Editing,
            drawn: None,
        }
    }

    pub fn value(&self) -> i32 {
        self.value.get()
    }

    pub fn bounds(&self) -> Bounds {
        self.value.bounds()
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state == EditorState::Terminal
    }

    /// Apply one action
    ///
    /// Actions after Select are ignored.
    pub fn apply(&mut self, action: EditorAction) -> EditorState {
        if self.state == EditorState::Editing {
            match action {
                EditorAction::Increment => self.value.increment(),
                EditorAction::Decrement => self.value.decrement(),
                EditorAction::Confirm => {}
            }
            self.state = self.state.transition(action);
        }
        self.state
    }

    /// Run one tick with an optional action
    pub fn tick(&mut self, action: Option<EditorAction>) -> EditorState {
        match action {
            Some(action) => self.apply(action),
            None => self.state,
        }
    }

    /// Confirmed value, once Select has been pressed
    pub fn committed(&self) -> Option<i32> {
        match self.state {
            EditorState::Terminal => Some(self.value.get()),
            EditorState::Editing => None,
        }
    }

    /// Value to draw, if it changed since the last call
    ///
    /// Returns the value on the first call and afterwards only when it has
    /// moved.
    pub fn take_redraw(&mut self) -> Option<i32> {
        let value = self.value.get();
        if self.drawn == Some(value) {
            return None;
        }
        self.drawn = Some(value);
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parameter_bounds;
    use larmor_hal::ParameterKey;
    use proptest::prelude::*;

    fn run(editor: &mut Editor, actions: &[EditorAction]) {
        for action in actions {
            editor.apply(*action);
        }
    }

    #[test]
    fn test_baud_index_wraps() {
        let bounds = parameter_bounds(ParameterKey::BaudIndex);

        let mut editor = Editor::new(4, bounds);
        editor.apply(EditorAction::Increment);
        assert_eq!(editor.value(), 0);

        let mut editor = Editor::new(0, bounds);
        editor.apply(EditorAction::Decrement);
        assert_eq!(editor.value(), 4);
    }

    #[test]
    fn test_tune_wraps() {
        let bounds = parameter_bounds(ParameterKey::Tune);

        let mut editor = Editor::new(90, bounds);
        editor.apply(EditorAction::Increment);
        assert_eq!(editor.value(), 20);

        let mut editor = Editor::new(20, bounds);
        editor.apply(EditorAction::Decrement);
        assert_eq!(editor.value(), 90);
    }

    #[test]
    fn test_repeats_wraps() {
        let bounds = parameter_bounds(ParameterKey::Repeats);

        let mut editor = Editor::new(100, bounds);
        editor.apply(EditorAction::Increment);
        assert_eq!(editor.value(), 1);

        let mut editor = Editor::new(1, bounds);
        editor.apply(EditorAction::Decrement);
        assert_eq!(editor.value(), 100);
    }

    #[test]
    fn test_confirm_commits_and_freezes() {
        let mut editor = Editor::new(50, parameter_bounds(ParameterKey::Tune));
        run(
            &mut editor,
            &[EditorAction::Increment, EditorAction::Increment, EditorAction::Confirm],
        );
        assert_eq!(editor.committed(), Some(52));

        editor.apply(EditorAction::Increment);
        assert_eq!(editor.committed(), Some(52));
    }

    #[test]
    fn test_no_commit_while_editing() {
        let mut editor = Editor::new(50, parameter_bounds(ParameterKey::Tune));
        editor.apply(EditorAction::Decrement);
        assert_eq!(editor.committed(), None);
        assert_eq!(editor.state(), EditorState::Editing);
    }

    #[test]
    fn test_redraw_only_on_change() {
        let mut editor = Editor::new(10, parameter_bounds(ParameterKey::Repeats));
        assert_eq!(editor.take_redraw(), Some(10));
        assert_eq!(editor.take_redraw(), None);

        editor.tick(None);
        assert_eq!(editor.take_redraw(), None);

        editor.tick(Some(EditorAction::Increment));
        assert_eq!(editor.take_redraw(), Some(11));

        // Up then Down lands on the drawn value
        editor.tick(Some(EditorAction::Increment));
        editor.tick(Some(EditorAction::Decrement));
        assert_eq!(editor.take_redraw(), None);
    }

    #[test]
    fn test_action_from_gestures() {
        use Gesture::*;
        assert_eq!(EditorAction::from_gestures(Press, None, None), Some(EditorAction::Increment));
        assert_eq!(EditorAction::from_gestures(None, Press, None), Some(EditorAction::Decrement));
        assert_eq!(EditorAction::from_gestures(None, None, Press), Some(EditorAction::Confirm));
        // Holding or releasing does nothing
        assert_eq!(EditorAction::from_gestures(Hold, Release, Hold), Option::None);
    }

    fn any_action() -> impl Strategy<Value = EditorAction> {
        prop_oneof![Just(EditorAction::Increment), Just(EditorAction::Decrement)]
    }

    proptest! {
        #[test]
        fn test_value_stays_in_bounds(
            lo in -50i32..50,
            span in 0i32..120,
            start in -200i32..200,
            actions in proptest::collection::vec(any_action(), 0..300),
        ) {
            let bounds = Bounds::new(lo, lo + span);
            let mut editor = Editor::new(start, bounds);
            prop_assert!(bounds.contains(editor.value()));

            for action in actions {
                editor.tick(Some(action));
                prop_assert!(bounds.contains(editor.value()));
            }
        }

        #[test]
        fn test_net_steps_modulo_range(
            ups in 0usize..200,
            downs in 0usize..200,
        ) {
            let bounds = parameter_bounds(ParameterKey::Tune);
            let mut editor = Editor::new(50, bounds);
            for _ in 0..ups {
                editor.apply(EditorAction::Increment);
            }
            for _ in 0..downs {
                editor.apply(EditorAction::Decrement);
            }

            let range = bounds.hi - bounds.lo + 1;
            let expected = (50 - bounds.lo + ups as i32 - downs as i32).rem_euclid(range) + bounds.lo;
            prop_assert_eq!(editor.value(), expected);
        }
    }
}
