//! Color representation used for surface clears.

pub mod color;

pub use color::Color;
