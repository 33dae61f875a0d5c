//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use orb_viewer::config::ViewerConfig;
use serial_test::serial;

#[test]
#[serial]
fn test_env_override() {
    unsafe { std::env::set_var("ORB_WINDOW__TITLE", "Test From Env") };
    let config = ViewerConfig::load().unwrap();
    unsafe { std::env::remove_var("ORB_WINDOW__TITLE") };
    assert_eq!(config.window.title, "Test From Env");
}

#[test]
#[serial]
fn test_env_override_nested_numbers() {
    unsafe {
        std::env::set_var("ORB_RENDER__TIME_SCALE", "2.5");
        std::env::set_var("ORB_WINDOW__FULLSCREEN", "true");
    }
    let config = ViewerConfig::load().unwrap();
    unsafe {
        std::env::remove_var("ORB_RENDER__TIME_SCALE");
        std::env::remove_var("ORB_WINDOW__FULLSCREEN");
    }
    assert_eq!(config.render.time_scale, 2.5);
    assert!(config.window.fullscreen);
}

#[test]
#[serial]
fn test_shipped_defaults_load() {
    // Tests run from the crate root, where config/default.toml lives.
    let config = ViewerConfig::load().unwrap();
    assert!(config.window.width > 0);
    assert!(config.window.height > 0);
    assert!(config.render.time_scale.is_finite());
}

#[test]
#[serial]
fn test_invalid_env_value_is_error() {
    unsafe { std::env::set_var("ORB_WINDOW__WIDTH", "wide") };
    let result = ViewerConfig::load();
    unsafe { std::env::remove_var("ORB_WINDOW__WIDTH") };
    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}
