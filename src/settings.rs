//! # Settings Module
//!
//! User-facing analysis and highlighting options.
//!
//! ## Purpose
//! A notation view asks two things of the engine: which annotation lines to
//! draw under a chord, and which highlight modes to apply to its notes.
//! [`Settings`] holds both and can be read from YAML. Missing fields take
//! the defaults below.
//!
//! ## Defaults
//! - Analysis on, showing scale degrees, Roman numerals and intervals
//! - Highlighting on, with root highlighting only
//!
//! ## Example
//! ```rust
//! use harmony::{HighlightMode, Settings};
//!
//! let settings = Settings::from_yaml_str("highlight:\n  mode:\n    tritone: true\n")?;
//! assert!(settings.analysis.mode.roman_numerals);
//! assert_eq!(
//!     settings.highlight.active_modes(),
//!     vec![HighlightMode::Root, HighlightMode::Tritone]
//! );
//! # Ok::<(), harmony::HarmonyError>(())
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HarmonyError, Result};
use crate::highlight::{HighlightMode, DEFAULT_PRIORITY};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub analysis: AnalysisSettings,
    pub highlight: HighlightSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub enabled: bool,
    pub mode: AnalysisMode,
}

/// Which annotation lines to show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisMode {
    pub note_names: bool,
    pub scientific_pitch: bool,
    pub scale_degrees: bool,
    pub solfege: bool,
    pub roman_numerals: bool,
    pub intervals: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightSettings {
    pub enabled: bool,
    pub mode: HighlightModeSettings,
    /// Ranking of the modes, highest first
    pub priority: Vec<HighlightMode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightModeSettings {
    pub root: bool,
    pub tritone: bool,
    pub doubling: bool,
    pub octaves: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            enabled: true,
            mode: AnalysisMode::default(),
        }
    }
}

impl Default for AnalysisMode {
    fn default() -> Self {
        AnalysisMode {
            note_names: false,
            scientific_pitch: false,
            scale_degrees: true,
            solfege: false,
            roman_numerals: true,
            intervals: true,
        }
    }
}

impl Default for HighlightSettings {
    fn default() -> Self {
        HighlightSettings {
            enabled: true,
            mode: HighlightModeSettings::default(),
            priority: DEFAULT_PRIORITY.to_vec(),
        }
    }
}

impl Default for HighlightModeSettings {
    fn default() -> Self {
        HighlightModeSettings {
            root: true,
            tritone: false,
            doubling: false,
            octaves: false,
        }
    }
}

impl HighlightModeSettings {
    fn is_on(&self, mode: HighlightMode) -> bool {
        match mode {
            HighlightMode::Root => self.root,
            HighlightMode::Tritone => self.tritone,
            HighlightMode::Doubling => self.doubling,
            HighlightMode::Octaves => self.octaves,
        }
    }
}

impl HighlightSettings {
    /// Enabled modes, highest priority first.
    ///
    /// Modes missing from `priority` rank below the listed ones in
    /// [`DEFAULT_PRIORITY`] order. Empty when highlighting is off.
    pub fn active_modes(&self) -> Vec<HighlightMode> {
        if !self.enabled {
            return Vec::new();
        }
        let mut modes: Vec<HighlightMode> = Vec::new();
        for mode in self.priority.iter().chain(DEFAULT_PRIORITY.iter()) {
            if self.mode.is_on(*mode) && !modes.contains(mode) {
                modes.push(*mode);
            }
        }
        modes
    }
}

impl Settings {
    /// Parse settings from YAML; absent fields keep their defaults
    pub fn from_yaml_str(text: &str) -> Result<Settings> {
        serde_yaml::from_str(text).map_err(|source| HarmonyError::Yaml {
            table: "settings".to_string(),
            source,
        })
    }

    /// Read settings from a YAML file
    ///
    /// # Errors
    /// [`HarmonyError::Io`] if the file cannot be read,
    /// [`HarmonyError::Yaml`] if it is not valid settings YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Settings> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| HarmonyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| HarmonyError::Yaml {
            table: path.display().to_string(),
            source,
        })
    }
}
