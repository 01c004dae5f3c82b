//! TOML Configuration File Support
//!
//! Centralized configuration loading, supporting a TOML configuration file
//! at `~/.config/folio/folio.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest
//! first):
//! 1. Environment variables (`FOLIO_*`)
//! 2. TOML configuration file
//! 3. Default values
//!
//! A missing config file is not an error (defaults are used); a malformed
//! one is.
//!
//! # Example Configuration
//!
//! ```toml
//! dev_mode = false
//! log_capacity = 100
//! theme = "dark"
//! sound_enabled = true
//!
//! [timing]
//! fade_out_ms = 300
//! swap_ms = 350
//! fade_in_ms = 400
//! settle_ms = 650
//!
//! [audio]
//! device = "desktop"
//!
//! [[projects]]
//! slug = "aurora-synth"
//! title = "Aurora Synth"
//! year = 2023
//! summary = "A browser-based polyphonic synthesizer."
//! stack = ["typescript", "webaudio"]
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::DeviceClass;
use crate::catalog::Project;
use crate::logsink::DEFAULT_LOG_CAPACITY;
use crate::store::Theme;

// =============================================================================
// Stage Naming Constants
// =============================================================================

/// Class names toggled on stage targets by transitions.
pub mod classes {
    /// The target is the currently visible/selected one.
    pub const ACTIVE: &str = "active";
    /// The target is fading in.
    pub const ENTERING: &str = "entering";
    /// The target is fading out.
    pub const LEAVING: &str = "leaving";
    /// The target is not rendered at all.
    pub const HIDDEN: &str = "hidden";
    /// Light palette is in effect (applied to the root region).
    pub const THEME_LIGHT: &str = "theme-light";
}

/// Names of the fixed stage regions.
pub mod regions {
    /// Whole-surface region; carries the theme class.
    pub const ROOT: &str = "root";
    /// Landing view region.
    pub const HOME: &str = "home";
    /// Portfolio grid region.
    pub const GRID: &str = "grid";
    /// Project detail region.
    pub const DETAIL: &str = "detail";
}

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// Transition Timing
// =============================================================================

/// Fixed delay constants for the transition schedules. These are
/// configuration, not computed values; every transition of a given kind
/// always takes the same total duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionTiming {
    /// Delay before the outgoing target finishes fading out.
    pub fade_out_ms: u64,
    /// Delay at which the crossfade layers swap.
    pub swap_ms: u64,
    /// Delay at which the incoming target is fully faded in.
    pub fade_in_ms: u64,
    /// Delay at which transient classes are cleaned up.
    pub settle_ms: u64,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            fade_out_ms: 300,
            swap_ms: 350,
            fade_in_ms: 400,
            settle_ms: 650,
        }
    }
}

impl TransitionTiming {
    /// All delays collapsed to zero (reduced motion).
    #[must_use]
    pub fn instant() -> Self {
        Self {
            fade_out_ms: 0,
            swap_ms: 0,
            fade_in_ms: 0,
            settle_ms: 0,
        }
    }

    /// Fade-out delay.
    #[must_use]
    pub fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out_ms)
    }

    /// Layer-swap delay.
    #[must_use]
    pub fn swap(&self) -> Duration {
        Duration::from_millis(self.swap_ms)
    }

    /// Fade-in delay.
    #[must_use]
    pub fn fade_in(&self) -> Duration {
        Duration::from_millis(self.fade_in_ms)
    }

    /// Cleanup delay; the total duration of a full transition.
    #[must_use]
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Timing section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingToml {
    /// Fade-out delay in milliseconds
    pub fade_out_ms: Option<u64>,

    /// Layer-swap delay in milliseconds
    pub swap_ms: Option<u64>,

    /// Fade-in delay in milliseconds
    pub fade_in_ms: Option<u64>,

    /// Cleanup delay in milliseconds
    pub settle_ms: Option<u64>,
}

/// Audio section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioToml {
    /// Device class for asset selection ("desktop" or "mobile")
    pub device: Option<String>,

    /// Whether audio cues start enabled
    pub enabled: Option<bool>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioToml {
    /// Development mode flag
    pub dev_mode: Option<bool>,

    /// Log history capacity
    pub log_capacity: Option<usize>,

    /// Startup theme ("dark" or "light")
    pub theme: Option<String>,

    /// Whether audio cues start enabled (top-level shorthand)
    pub sound_enabled: Option<bool>,

    /// Timing configuration section
    pub timing: TimingToml,

    /// Audio configuration section
    pub audio: AudioToml,

    /// Catalog entries replacing the built-in sample content
    pub projects: Option<Vec<Project>>,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Centralized application configuration.
///
/// Use [`load_config`] to load with proper priority handling.
#[derive(Clone, Debug)]
pub struct FolioConfig {
    /// Development mode: mirrors debug/info log entries to the console
    /// and enables the dev overlay.
    pub dev_mode: bool,

    /// Log history capacity.
    pub log_capacity: usize,

    /// Transition delay constants.
    pub timing: TransitionTiming,

    /// Device class for audio asset selection.
    pub device: DeviceClass,

    /// Startup theme.
    pub theme: Theme,

    /// Whether audio cues start enabled.
    pub sound_enabled: bool,

    /// Catalog entries from the config file, if any.
    pub projects: Option<Vec<Project>>,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            dev_mode: cfg!(debug_assertions),
            log_capacity: DEFAULT_LOG_CAPACITY,
            timing: TransitionTiming::default(),
            device: DeviceClass::Desktop,
            theme: Theme::Dark,
            sound_enabled: true,
            projects: None,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl FolioConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Effective timing for a transition: collapsed to zero when reduced
    /// motion is requested.
    #[must_use]
    pub fn effective_timing(&self, reduced_motion: bool) -> TransitionTiming {
        if reduced_motion {
            TransitionTiming::instant()
        } else {
            self.timing
        }
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/folio/folio.toml` or `~/.config/folio/folio.toml`
/// if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("folio").join("folio.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<FolioConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<FolioConfig, ConfigError> {
    let mut config = FolioConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: FolioToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config);

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut FolioConfig, toml: &FolioToml) -> Result<(), ConfigError> {
    if let Some(dev_mode) = toml.dev_mode {
        config.dev_mode = dev_mode;
    }
    if let Some(capacity) = toml.log_capacity {
        if capacity == 0 {
            return Err(ConfigError::ValidationError(
                "log_capacity must be at least 1".to_string(),
            ));
        }
        config.log_capacity = capacity;
    }
    if let Some(ref theme) = toml.theme {
        config.theme = Theme::parse(theme).ok_or_else(|| {
            ConfigError::ValidationError(format!("unknown theme: {theme}"))
        })?;
    }
    if let Some(enabled) = toml.sound_enabled.or(toml.audio.enabled) {
        config.sound_enabled = enabled;
    }

    if let Some(ms) = toml.timing.fade_out_ms {
        config.timing.fade_out_ms = ms;
    }
    if let Some(ms) = toml.timing.swap_ms {
        config.timing.swap_ms = ms;
    }
    if let Some(ms) = toml.timing.fade_in_ms {
        config.timing.fade_in_ms = ms;
    }
    if let Some(ms) = toml.timing.settle_ms {
        config.timing.settle_ms = ms;
    }

    if let Some(ref device) = toml.audio.device {
        config.device = match device.as_str() {
            "desktop" => DeviceClass::Desktop,
            "mobile" => DeviceClass::Mobile,
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "unknown device class: {other}"
                )))
            }
        };
    }

    if let Some(ref projects) = toml.projects {
        config.projects = Some(projects.clone());
    }

    Ok(())
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut FolioConfig) {
    if let Ok(dev) = std::env::var("FOLIO_DEV") {
        config.dev_mode = dev != "0" && dev.to_lowercase() != "false";
        config.source = ConfigSource::Env;
    }
    if let Ok(capacity) = std::env::var("FOLIO_LOG_CAPACITY") {
        if let Ok(n) = capacity.parse::<usize>() {
            if n > 0 {
                config.log_capacity = n;
                config.source = ConfigSource::Env;
            }
        }
    }
    if let Ok(theme) = std::env::var("FOLIO_THEME") {
        if let Some(theme) = Theme::parse(&theme) {
            config.theme = theme;
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(sound) = std::env::var("FOLIO_SOUND") {
        config.sound_enabled = sound != "0" && sound.to_lowercase() != "false";
        config.source = ConfigSource::Env;
    }
    if let Ok(device) = std::env::var("FOLIO_DEVICE") {
        match device.as_str() {
            "desktop" => {
                config.device = DeviceClass::Desktop;
                config.source = ConfigSource::Env;
            }
            "mobile" => {
                config.device = DeviceClass::Mobile;
                config.source = ConfigSource::Env;
            }
            _ => {}
        }
    } else if let Ok(user_agent) = std::env::var("FOLIO_USER_AGENT") {
        // Web terminals forward the browser's user agent; classify it when
        // no explicit device class is set.
        config.device = DeviceClass::from_user_agent(&user_agent);
        config.source = ConfigSource::Env;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::io::Write;

    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    use super::*;

    /// Serializes tests that read or mutate the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Clean up all environment variables used by config loading.
    /// Call this at the start of tests that need clean environment state.
    fn clear_config_env_vars() {
        std::env::remove_var("FOLIO_DEV");
        std::env::remove_var("FOLIO_LOG_CAPACITY");
        std::env::remove_var("FOLIO_THEME");
        std::env::remove_var("FOLIO_SOUND");
        std::env::remove_var("FOLIO_DEVICE");
        std::env::remove_var("FOLIO_USER_AGENT");
    }

    #[test]
    fn test_default_config() {
        let config = FolioConfig::default();

        assert_eq!(config.log_capacity, DEFAULT_LOG_CAPACITY);
        assert_eq!(config.theme, Theme::Dark);
        assert!(config.sound_enabled);
        assert_eq!(config.device, DeviceClass::Desktop);
        assert_eq!(config.timing, TransitionTiming::default());
        assert!(config.projects.is_none());
    }

    #[test]
    fn test_default_config_path() {
        if let Some(p) = default_config_path() {
            assert!(p.to_string_lossy().contains("folio"));
            assert!(p.to_string_lossy().contains("folio.toml"));
        }
    }

    #[test]
    fn test_parse_valid_toml() {
        let toml_content = r#"
dev_mode = true
log_capacity = 25
theme = "light"

[timing]
fade_out_ms = 10
settle_ms = 40

[audio]
device = "mobile"
enabled = false

[[projects]]
slug = "one"
title = "One"
year = 2020
summary = "A project."
stack = ["rust"]
"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let _env = ENV_LOCK.lock();
        clear_config_env_vars();
        let config = load_config_from_path(Some(file.path().to_path_buf())).unwrap();

        assert!(config.dev_mode);
        assert_eq!(config.log_capacity, 25);
        assert_eq!(config.theme, Theme::Light);
        assert!(!config.sound_enabled);
        assert_eq!(config.device, DeviceClass::Mobile);
        assert_eq!(config.timing.fade_out_ms, 10);
        assert_eq!(config.timing.swap_ms, TransitionTiming::default().swap_ms);
        assert_eq!(config.timing.settle_ms, 40);
        assert_eq!(config.projects.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_missing_file_graceful() {
        let _env = ENV_LOCK.lock();
        clear_config_env_vars();

        let path = PathBuf::from("/nonexistent/path/folio.toml");
        let config = load_config_from_path(Some(path)).unwrap();

        assert_eq!(config.log_capacity, DEFAULT_LOG_CAPACITY);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_malformed_toml_error() {
        let toml_content = r#"
[timing
fade_out_ms = "not a number"
"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let result = load_config_from_path(Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_invalid_theme_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"theme = \"sepia\"\n").unwrap();

        let result = load_config_from_path(Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_zero_log_capacity_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"log_capacity = 0\n").unwrap();

        let result = load_config_from_path(Some(file.path().to_path_buf()));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_user_agent_env_classifies_device() {
        let _env = ENV_LOCK.lock();
        clear_config_env_vars();
        std::env::set_var("FOLIO_USER_AGENT", "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0)");

        let config = load_config_from_path(None).unwrap();

        assert_eq!(config.device, DeviceClass::Mobile);
        assert_eq!(config.source(), ConfigSource::Env);
        std::env::remove_var("FOLIO_USER_AGENT");
    }

    #[test]
    fn test_effective_timing_collapses_under_reduced_motion() {
        let config = FolioConfig::default();
        let timing = config.effective_timing(true);

        assert_eq!(timing, TransitionTiming::instant());
        assert_eq!(timing.settle(), Duration::ZERO);
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(format!("{}", ConfigSource::Env), "environment");
        assert_eq!(format!("{}", ConfigSource::File), "config file");
        assert_eq!(format!("{}", ConfigSource::Default), "default");
    }
}
