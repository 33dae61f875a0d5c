//! Orb engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the viewer:
//! window loop, surface management, frame timing and the full-screen
//! shader renderer.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
