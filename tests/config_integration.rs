//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use std::fs;
use std::path::PathBuf;

use roomview::config::{AppConfig, ScenePreset};
use serial_test::serial;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("roomview-config-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("RV_WINDOW__TITLE", "Test From Env");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.window.title, "Test From Env");
    std::env::remove_var("RV_WINDOW__TITLE");
}

#[test]
#[serial]
fn test_default_file_matches_defaults() {
    std::env::remove_var("RV_WINDOW__TITLE");
    let config = AppConfig::load_from(concat!(env!("CARGO_MANIFEST_DIR"), "/config")).unwrap();
    let defaults = AppConfig::default();
    assert_eq!(config.physics.gravity, defaults.physics.gravity);
    assert_eq!(config.camera.position, defaults.camera.position);
    assert_eq!(config.tunables, defaults.tunables);
    assert_eq!(config.scene.preset, ScenePreset::LivingRoom);
}

#[test]
#[serial]
fn test_user_file_overrides_default() {
    let dir = scratch_dir("user");
    fs::write(dir.join("default.toml"), "[window]\ntitle = \"from default\"\nwidth = 640\n").unwrap();
    fs::write(dir.join("user.toml"), "[window]\ntitle = \"from user\"\n\n[scene]\npreset = \"primitives\"\n").unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    assert_eq!(config.window.title, "from user");
    assert_eq!(config.window.width, 640);
    assert_eq!(config.scene.preset, ScenePreset::Primitives);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
#[serial]
fn test_tunables_clamped_on_load() {
    let dir = scratch_dir("tunables");
    fs::write(dir.join("default.toml"), "[tunables]\nspot_light_position = [999.0, -999.0, 12.0]\n").unwrap();
    std::env::set_var("RV_TUNABLES__FILE_TV_POSITION", "[400.0, 0.0, 0.0]");

    let config = AppConfig::load_from(&dir).unwrap();
    std::env::remove_var("RV_TUNABLES__FILE_TV_POSITION");

    assert_eq!(config.tunables.spot_light_position, [300.0, -300.0, 12.0]);
    assert_eq!(config.tunables.file_tv_position, [300.0, 0.0, 0.0]);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
#[serial]
fn test_missing_directory_uses_defaults() {
    let config = AppConfig::load_from("/nonexistent/roomview/config").unwrap();
    assert_eq!(config.window.width, 1280);
}
