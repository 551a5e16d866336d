//! Bounded parameter editors
//!
//! A single parametric state machine edits every operator setting: the
//! three persisted parameters directly, and the clock through a chain of
//! six instances.

pub mod bounded;
pub mod clock;
pub mod machine;

pub use bounded::BoundedValue;
pub use clock::{ClockEditStep, ClockEditor, ClockField};
pub use machine::{Editor, EditorAction, EditorState};
