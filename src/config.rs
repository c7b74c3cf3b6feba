use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::pathfinding::CostModel;

pub const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub unit: UnitConfig,
    #[serde(default)]
    pub pathfinding: PathfindingConfig,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_cell_width")]
    pub cell_width: f32,
    #[serde(default = "default_cell_height")]
    pub cell_height: f32,
    #[serde(default = "default_layout_path")]
    pub layout_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnitConfig {
    /// Number of orthogonal steps the unit may take per move
    #[serde(default = "default_move_range")]
    pub move_range: u32,
    /// World units per second
    #[serde(default = "default_movement_speed")]
    pub movement_speed: f32,
    #[serde(default = "default_arrival_epsilon")]
    pub arrival_epsilon: f32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathfindingConfig {
    #[serde(default)]
    pub cost_model: CostModel,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_bg_r")]
    pub background_r: u8,
    #[serde(default = "default_bg_g")]
    pub background_g: u8,
    #[serde(default = "default_bg_b")]
    pub background_b: u8,
    /// Screen pixels per world unit
    #[serde(default = "default_pixels_per_unit")]
    pub pixels_per_unit: f32,
    /// Alpha change per second while a tile fades in or out
    #[serde(default = "default_fade_speed")]
    pub fade_speed: f32,
    /// Scale change per second of the cursor pulse
    #[serde(default = "default_pulse_speed")]
    pub pulse_speed: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_enable_action_log")]
    pub enable_action_log: bool,
    #[serde(default = "default_action_log_path")]
    pub action_log_path: String,
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "default_filter")]
    pub filter: String,
}

// Default values
fn default_cell_width() -> f32 { 1.0 }
fn default_cell_height() -> f32 { 1.0 }
fn default_layout_path() -> String { "layouts/default.txt".to_string() }
fn default_move_range() -> u32 { 2 }
fn default_movement_speed() -> f32 { 10.0 }
fn default_arrival_epsilon() -> f32 { 0.001 }
fn default_window_title() -> String { "tilewalk".to_string() }
fn default_bg_r() -> u8 { 30 }
fn default_bg_g() -> u8 { 30 }
fn default_bg_b() -> u8 { 30 }
fn default_pixels_per_unit() -> f32 { 48.0 }
fn default_fade_speed() -> f32 { 2.0 }
fn default_pulse_speed() -> f32 { 0.25 }
fn default_enable_action_log() -> bool { false }
fn default_action_log_path() -> String { "action_log.json".to_string() }
fn default_filter() -> String { "info".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_width: default_cell_width(),
            cell_height: default_cell_height(),
            layout_path: default_layout_path(),
        }
    }
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            move_range: default_move_range(),
            movement_speed: default_movement_speed(),
            arrival_epsilon: default_arrival_epsilon(),
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            background_r: default_bg_r(),
            background_g: default_bg_g(),
            background_b: default_bg_b(),
            pixels_per_unit: default_pixels_per_unit(),
            fade_speed: default_fade_speed(),
            pulse_speed: default_pulse_speed(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_action_log: default_enable_action_log(),
            action_log_path: default_action_log_path(),
            filter: default_filter(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            unit: UnitConfig::default(),
            pathfinding: PathfindingConfig::default(),
            visual: VisualConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from config.toml, or use defaults if it doesn't exist
    pub fn load() -> Self {
        Self::load_from(CONFIG_PATH)
    }

    /// Load configuration from `path`. Missing or malformed files fall back
    /// to the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let result = Self::read_from(path);
        Self::report(path, &result);
        result.unwrap_or_default()
    }

    /// Read and parse `path` without logging or falling back
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&contents)?)
    }

    /// Log the outcome of `read_from`
    pub fn report(path: &Path, result: &Result<Self, ConfigError>) {
        match result {
            Ok(_) => info!(path = %path.display(), "loaded configuration"),
            Err(ConfigError::Io(_)) => info!(path = %path.display(), "no configuration found, using defaults"),
            Err(e) => warn!(path = %path.display(), error = %e, "using default configuration"),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.unit.move_range, 2);
        assert_eq!(config.unit.movement_speed, 10.0);
        assert_eq!(config.pathfinding.cost_model, CostModel::StraightLine);
        assert_eq!(config.grid.layout_path, "layouts/default.txt");
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml_str(
            r#"
            [unit]
            move_range = 4

            [pathfinding]
            cost_model = "accumulated"
            "#,
        )
        .unwrap();
        assert_eq!(config.unit.move_range, 4);
        assert_eq!(config.unit.arrival_epsilon, 0.001);
        assert_eq!(config.pathfinding.cost_model, CostModel::Accumulated);
        assert_eq!(config.visual.fade_speed, 2.0);
    }

    #[test]
    fn test_rejects_unknown_cost_model() {
        assert!(Config::from_toml_str("[pathfinding]\ncost_model = \"diagonal\"").is_err());
    }

    #[test]
    fn test_read_from_reports_errors() {
        assert!(matches!(Config::read_from("does/not/exist.toml"), Err(ConfigError::Io(_))));

        let path = std::env::temp_dir().join("tilewalk_bad_config.toml");
        fs::write(&path, "[unit]\nmove_range = \"far\"").unwrap();
        let result = Config::read_from(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = Config::load_from("does/not/exist.toml");
        assert_eq!(config.logging.action_log_path, "action_log.json");
    }
}
