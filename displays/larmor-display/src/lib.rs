//! Display and touch abstractions for Larmor
//!
//! This crate provides:
//! - `GraphicsDisplay` trait for pixel displays (TFT panels)
//! - `TouchPanel` trait for resistive touch samplers
//! - `TouchCalibration` for raw-to-pixel mapping with a pressure band
//! - `Button` edge detection producing `Gesture`s from touch containment
//! - `Layout` with the fixed control rectangles of every screen
//! - `EgDisplay`, an adapter from any `embedded-graphics` draw target
//!
//! # Architecture
//!
//! Panel drivers only need to implement `embedded_graphics::DrawTarget`.
//! The controller draws through `GraphicsDisplay` and never sees the driver,
//! which keeps all screen logic testable against a recording fake.

#![no_std]

pub mod backend;
pub mod eg;
pub mod input;
pub mod layout;

// Re-export key types
pub use backend::{Color, DisplayError, GraphicsDisplay, Point, Rect, TextStyle};
pub use eg::EgDisplay;
pub use input::{Button, Gesture, TouchCalibration, TouchPanel, TouchSample};
pub use layout::{EditorControl, Layout, MenuControl};
