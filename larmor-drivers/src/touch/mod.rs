//! Touch panel samplers

pub mod resistive;
pub mod xpt2046;

pub use resistive::{pressure, Plates, ResistiveConfig, ResistiveTouch};
pub use xpt2046::Xpt2046;
