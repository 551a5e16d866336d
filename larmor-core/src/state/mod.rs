//! Controller mode machine
//!
//! Explicit, finite and deterministic. The dispatcher feeds it events and
//! runs whichever blocking component the new mode names.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::Mode;
