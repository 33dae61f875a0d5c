//! Full-screen procedural planet animation on top of `orb-engine`.

pub mod app;
pub mod config;
pub mod planet;

pub use app::PlanetApp;
pub use config::ViewerConfig;
