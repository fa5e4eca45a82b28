use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::subsystems::manipulation::feedback::{BindingTable, HapticPulse, SELECT_ACTION};
use crate::subsystems::manipulation::manipulator::{PivotMode, PivotRotation};

/// Manipulation tool settings, stored as TOML in the user's app data/configs directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManipulationSettings {
    /// Initial pivot placement
    pub pivot_mode: PivotMode,
    /// Initial pivot orientation
    pub pivot_rotation: PivotRotation,
    /// Whether the manipulator may be shown at all
    pub manipulator_visible: bool,
    /// Follow rates for the manipulator and snapped direct grabs
    pub lazy_follow: LazyFollowSettings,
    /// Controller tooltip settings
    pub feedback: FeedbackSettings,
    /// Haptic pulses for manipulator drags
    pub haptics: HapticSettings,
    /// Logical action name -> controller controls
    pub bindings: BindingTable,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Exponential follow rates, per second
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LazyFollowSettings {
    pub translate: f32,
    pub rotate: f32,
    pub direct_translate: f32,
    pub direct_rotate: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackSettings {
    pub priority: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HapticSettings {
    pub drag_pulse: HapticPulse,
    pub rotate_pulse: HapticPulse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when RUST_LOG is unset
    pub level: String,
    /// Structured JSON lines instead of human readable output
    pub json: bool,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SettingsError {
    #[error("lazy follow rate `{name}` must be finite and positive, got {value}")]
    InvalidFollowRate { name: &'static str, value: f32 },

    #[error("haptic pulse `{name}` has invalid {field} {value}")]
    InvalidPulse {
        name: &'static str,
        field: &'static str,
        value: f32,
    },

    #[error("no controls bound to required action `{0}`")]
    MissingBinding(&'static str),
}

impl Default for ManipulationSettings {
    fn default() -> Self {
        Self {
            pivot_mode: PivotMode::Pivot,
            pivot_rotation: PivotRotation::Local,
            manipulator_visible: true,
            lazy_follow: LazyFollowSettings::default(),
            feedback: FeedbackSettings::default(),
            haptics: HapticSettings::default(),
            bindings: BindingTable::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for LazyFollowSettings {
    fn default() -> Self {
        Self {
            translate: 8.0,
            rotate: 12.0,
            direct_translate: 20.0,
            direct_rotate: 30.0,
        }
    }
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self { priority: 1 }
    }
}

impl Default for HapticSettings {
    fn default() -> Self {
        Self {
            drag_pulse: HapticPulse {
                duration: 0.02,
                intensity: 0.2,
            },
            rotate_pulse: HapticPulse {
                duration: 0.02,
                intensity: 0.35,
            },
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ManipulationSettings {
    /// Reject values that would make the follow animation or feedback misbehave
    pub fn validate(&self) -> Result<(), SettingsError> {
        let rates = [
            ("translate", self.lazy_follow.translate),
            ("rotate", self.lazy_follow.rotate),
            ("direct_translate", self.lazy_follow.direct_translate),
            ("direct_rotate", self.lazy_follow.direct_rotate),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::InvalidFollowRate { name, value });
            }
        }

        for (name, pulse) in [
            ("drag_pulse", self.haptics.drag_pulse),
            ("rotate_pulse", self.haptics.rotate_pulse),
        ] {
            if !pulse.duration.is_finite() || pulse.duration < 0.0 {
                return Err(SettingsError::InvalidPulse {
                    name,
                    field: "duration",
                    value: pulse.duration,
                });
            }
            if !(0.0..=1.0).contains(&pulse.intensity) {
                return Err(SettingsError::InvalidPulse {
                    name,
                    field: "intensity",
                    value: pulse.intensity,
                });
            }
        }

        if self.bindings.controls(SELECT_ACTION).map_or(true, <[_]>::is_empty) {
            return Err(SettingsError::MissingBinding(SELECT_ACTION));
        }

        Ok(())
    }

    /// Load and validate settings from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manipulation settings from {}", path.display()))?;
        let settings: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse manipulation settings in {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings, falling back to defaults when missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Using default manipulation settings: {e:#}");
                Self::default()
            }
        }
    }

    /// Save settings to the given path, creating parent directories if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }
        let toml = toml::to_string_pretty(self).context("Failed to serialize manipulation settings")?;
        fs::write(path, toml).with_context(|| format!("Failed to write settings to {}", path.display()))?;
        Ok(())
    }

    /// Get the default config file path in the user's app data directory.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "Pulsar", "Pulsar_Engine")
            .map(|proj| proj.data_dir().join("configs/manipulation.toml"))
    }
}
