use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use crate::motion::EasingType;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    pub frame: FrameConfig,
    #[serde(default)]
    pub momentum: MomentumConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log files)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Floor applied to opacity-like outputs of pre-rasterized behaviours
    #[serde(default = "default_prerasterize_floor")]
    pub prerasterize_floor: f64,
    /// Number of evenly spaced intersection thresholds, 0.0 and 1.0 included
    #[serde(default = "default_intersection_thresholds")]
    pub intersection_thresholds: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            prerasterize_floor: default_prerasterize_floor(),
            intersection_thresholds: default_intersection_thresholds(),
        }
    }
}

impl DriverConfig {
    /// Threshold buckets for the intersection tracker
    pub fn thresholds(&self) -> Vec<f64> {
        let count = self.intersection_thresholds.max(2);
        let steps = (count - 1) as f64;
        (0..count).map(|i| i as f64 / steps).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Target frame rate for the frame loop
    #[serde(default = "default_fps")]
    pub fps: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { fps: default_fps() }
    }
}

impl FrameConfig {
    /// Interval between frames
    pub fn tick_duration(&self) -> Duration {
        if self.fps == 0 {
            Duration::from_millis(16) // ~60fps fallback
        } else {
            Duration::from_micros(1_000_000 / self.fps as u64)
        }
    }
}

/// Momentum and snap tuning for carousel navigation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MomentumConfig {
    /// Velocity added per wheel delta unit
    #[serde(default = "default_wheel_multiplier")]
    pub wheel_multiplier: f64,
    /// Velocity added per touch pixel
    #[serde(default = "default_touch_multiplier")]
    pub touch_multiplier: f64,
    /// Per-frame velocity multiplier
    #[serde(default = "default_friction")]
    pub friction: f64,
    /// Velocity magnitude below which motion stops
    #[serde(default = "default_velocity_threshold")]
    pub velocity_threshold: f64,
    /// Upper bound on velocity magnitude (sections per frame)
    #[serde(default = "default_max_velocity")]
    pub max_velocity: f64,
    /// Delay between velocity reaching zero and the snap decision
    #[serde(default = "default_snap_delay")]
    pub snap_delay_ms: u64,
    /// Fractional band at each end of a section that snaps outward
    #[serde(default = "default_snap_threshold")]
    pub snap_threshold: f64,
    /// Snap animation duration
    #[serde(default = "default_snap_duration")]
    pub snap_duration_ms: u64,
    /// Snap animation curve
    #[serde(default)]
    pub snap_easing: EasingType,
    /// Fraction of the remaining distance covered per frame by the visible position
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,
    /// Wrap around after the last section
    #[serde(default)]
    pub infinite: bool,
    /// Snap band at the edges of tall sections, in viewports
    #[serde(default = "default_edge_zone")]
    pub edge_zone: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            wheel_multiplier: default_wheel_multiplier(),
            touch_multiplier: default_touch_multiplier(),
            friction: default_friction(),
            velocity_threshold: default_velocity_threshold(),
            max_velocity: default_max_velocity(),
            snap_delay_ms: default_snap_delay(),
            snap_threshold: default_snap_threshold(),
            snap_duration_ms: default_snap_duration(),
            snap_easing: EasingType::default(),
            smoothing: default_smoothing(),
            infinite: false,
            edge_zone: default_edge_zone(),
        }
    }
}

impl MomentumConfig {
    pub fn snap_delay(&self) -> Duration {
        Duration::from_millis(self.snap_delay_ms)
    }

    pub fn snap_duration(&self) -> Duration {
        Duration::from_millis(self.snap_duration_ms)
    }
}

/// Layout of the terminal preview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Sections on the simulated page
    #[serde(default = "default_page_sections")]
    pub page_sections: usize,
    /// Behaviour applied to each page section, cycled
    #[serde(default = "default_page_behaviours")]
    pub page_behaviours: Vec<String>,
    /// Height ratio of each carousel section (count = carousel length)
    #[serde(default = "default_carousel_heights")]
    pub carousel_heights: Vec<f64>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            page_sections: default_page_sections(),
            page_behaviours: default_page_behaviours(),
            carousel_heights: default_carousel_heights(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scrollsync")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_prerasterize_floor() -> f64 {
    crate::driver::PRERASTER_OPACITY_FLOOR
}

fn default_intersection_thresholds() -> usize {
    11 // 0.0, 0.1, ..., 1.0
}

fn default_fps() -> u32 {
    60
}

fn default_wheel_multiplier() -> f64 {
    0.0015
}

fn default_touch_multiplier() -> f64 {
    0.004
}

fn default_friction() -> f64 {
    0.92
}

fn default_velocity_threshold() -> f64 {
    0.0005
}

fn default_max_velocity() -> f64 {
    0.5
}

fn default_snap_delay() -> u64 {
    400
}

fn default_snap_threshold() -> f64 {
    0.25
}

fn default_snap_duration() -> u64 {
    600
}

fn default_smoothing() -> f64 {
    0.15
}

fn default_edge_zone() -> f64 {
    0.15
}

fn default_page_sections() -> usize {
    8
}

fn default_page_behaviours() -> Vec<String> {
    vec![
        "fade-in".to_string(),
        "parallax".to_string(),
        "reveal-up".to_string(),
        "scale-in".to_string(),
    ]
}

fn default_carousel_heights() -> Vec<f64> {
    vec![1.0, 1.0, 2.0, 1.0, 1.0]
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl EngineConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml_string()?)?;

        Ok(())
    }

    /// Render configuration as TOML
    pub fn to_toml_string(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/scrollsync/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("scrollsync")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Get the log file path used by the terminal preview
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("scrollsync.log")
    }

    fn validate(&self) -> crate::Result<()> {
        let m = &self.momentum;
        if !(0.0..1.0).contains(&m.friction) {
            return Err(crate::Error::Config(format!(
                "momentum.friction must be in [0, 1), got {}",
                m.friction
            )));
        }
        if !(0.0..=0.5).contains(&m.snap_threshold) {
            return Err(crate::Error::Config(format!(
                "momentum.snap_threshold must be in [0, 0.5], got {}",
                m.snap_threshold
            )));
        }
        if !(m.smoothing > 0.0 && m.smoothing <= 1.0) {
            return Err(crate::Error::Config(format!(
                "momentum.smoothing must be in (0, 1], got {}",
                m.smoothing
            )));
        }
        if self.preview.carousel_heights.iter().any(|h| *h <= 0.0) {
            return Err(crate::Error::Config(
                "preview.carousel_heights must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.frame.fps, 60);
        assert_eq!(config.momentum.snap_delay_ms, 400);
        assert_eq!(config.momentum.snap_easing, EasingType::Cubic);
        assert!(!config.momentum.infinite);
        assert_eq!(config.driver.intersection_thresholds, 11);
    }

    #[test]
    fn test_thresholds_are_evenly_spaced() {
        let thresholds = DriverConfig::default().thresholds();
        assert_eq!(thresholds.len(), 11);
        assert_eq!(thresholds[0], 0.0);
        assert!((thresholds[5] - 0.5).abs() < 1e-9);
        assert_eq!(thresholds[10], 1.0);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [momentum]
            infinite = true
            snap_easing = "ease-in-out-cubic"

            [frame]
            fps = 120
            "#,
        )
        .unwrap();
        assert!(config.momentum.infinite);
        assert_eq!(config.momentum.snap_easing, EasingType::EaseInOutCubic);
        assert_eq!(config.momentum.friction, 0.92);
        assert_eq!(config.frame.fps, 120);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_invalid_friction_rejected() {
        let result = EngineConfig::from_toml_str("[momentum]\nfriction = 1.5\n");
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = EngineConfig::load_from(Path::new("/nonexistent/scrollsync/config.toml"));
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = EngineConfig::from_toml_str("[momentum\n");
        assert!(matches!(result, Err(crate::Error::TomlParse(_))));
    }

    #[test]
    fn test_tick_duration_fallback() {
        let frame = FrameConfig { fps: 0 };
        assert_eq!(frame.tick_duration(), Duration::from_millis(16));
        let frame = FrameConfig { fps: 50 };
        assert_eq!(frame.tick_duration(), Duration::from_millis(20));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let text = EngineConfig::default().to_toml_string().unwrap();
        let parsed = EngineConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed.preview.carousel_heights, vec![1.0, 1.0, 2.0, 1.0, 1.0]);
    }
}
