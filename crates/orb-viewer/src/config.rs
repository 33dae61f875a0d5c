//! Viewer configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. built-in defaults
//! 2. `config/default.toml`
//! 3. `config/user.toml` (gitignored, user overrides)
//! 4. Environment variables (`ORB_SECTION__KEY`)

use figment::{Figment, providers::{Env, Format, Serialized, Toml}};
use serde::{Deserialize, Serialize};
use std::path::Path;

use orb_engine::device::GpuInit;
use orb_engine::logging::LoggingConfig;
use orb_engine::window::RuntimeConfig;
use winit::dpi::LogicalSize;

/// Environment variable prefix, e.g. `ORB_WINDOW__FULLSCREEN=true`.
pub const ENV_PREFIX: &str = "ORB_";

/// Main viewer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl ViewerConfig {
    /// Load configuration from the `config` directory and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::from(Serialized::defaults(ViewerConfig::default()));

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // ORB_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: ViewerConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the runtime cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if !self.render.time_scale.is_finite() {
            return Err(ConfigError::invalid("render.time_scale must be finite"));
        }
        Ok(())
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: self.window.title.clone(),
            initial_size: LogicalSize::new(self.window.width as f64, self.window.height as f64),
            fullscreen: self.window.fullscreen,
        }
    }

    pub fn gpu_init(&self) -> GpuInit {
        GpuInit {
            prefer_srgb: self.render.prefer_srgb,
            present_mode: if self.render.vsync {
                wgpu::PresentMode::Fifo
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            ..GpuInit::default()
        }
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.logging.filter.clone(),
            ..LoggingConfig::default()
        }
    }
}

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial width in logical pixels
    pub width: u32,
    /// Initial height in logical pixels
    pub height: u32,
    /// Start as a borderless fullscreen window
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "orb".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Wait for vertical blank when presenting
    pub vsync: bool,
    /// Use an sRGB surface (brightens shader output compared to a WebGL canvas)
    pub prefer_srgb: bool,
    /// Multiplier applied to elapsed time before it reaches the shader
    pub time_scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            vsync: true,
            prefer_srgb: false,
            time_scale: 1.0,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingSection {
    /// `env_logger` filter, e.g. "debug" or "orb_engine=trace". Falls back to `RUST_LOG`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        ConfigError { message: message.into() }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ViewerConfig::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 720);
        assert!(config.render.vsync);
        assert!(!config.render.prefer_srgb);
        assert_eq!(config.render.time_scale, 1.0);
        assert!(config.logging.filter.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = ViewerConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("title"));
        assert!(toml.contains("time_scale"));
        let back: ViewerConfig = toml::from_str(&toml).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_vsync_selects_present_mode() {
        let mut config = ViewerConfig::default();
        assert_eq!(config.gpu_init().present_mode, wgpu::PresentMode::Fifo);
        config.render.vsync = false;
        assert_eq!(config.gpu_init().present_mode, wgpu::PresentMode::AutoNoVsync);
    }

    #[test]
    fn test_runtime_config_mirrors_window() {
        let mut config = ViewerConfig::default();
        config.window.fullscreen = true;
        config.window.title = "planet".into();
        let rc = config.runtime_config();
        assert!(rc.fullscreen);
        assert_eq!(rc.title, "planet");
        assert_eq!(rc.initial_size, LogicalSize::new(1280.0, 720.0));
    }

    #[test]
    fn test_zero_size_rejected() {
        let mut config = ViewerConfig::default();
        config.window.width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("default.toml", "[render]\ntime_scale = 0.5\n")?;
            let config = ViewerConfig::load_from(".").map_err(|e| e.to_string())?;
            assert_eq!(config.render.time_scale, 0.5);
            assert!(config.render.vsync);
            assert_eq!(config.window.title, "orb");
            Ok(())
        });
    }
}
