// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Settings controlling how a frame graph validates and reports.

use crate::error::{FrameGraphError, Result};
use serde::{Deserialize, Serialize};

/// Whether authoring checks run while scopes are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationMode {
    /// Skip overlap and usage checks.
    Disabled,
    /// Check every declaration and panic on authoring errors.
    Enabled,
}

impl Default for ValidationMode {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            ValidationMode::Enabled
        } else {
            ValidationMode::Disabled
        }
    }
}

/// A collection of settings that affect how frames are built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameGraphSettings {
    /// Authoring checks on attachment declarations.
    pub validation: ValidationMode,
    /// Log a warning for attachments no scope used.
    pub warn_unused_attachments: bool,
    /// Log the unresolved edges when a cycle is found.
    pub log_cycle_diagnostics: bool,
    /// Upper bound on scopes per frame.
    pub max_scopes_per_frame: u32,
}

impl Default for FrameGraphSettings {
    fn default() -> Self {
        Self {
            validation: ValidationMode::default(),
            warn_unused_attachments: true,
            log_cycle_diagnostics: true,
            max_scopes_per_frame: 4096,
        }
    }
}

impl FrameGraphSettings {
    /// Parses settings from RON; missing fields keep their defaults.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| {
            log::error!("Failed to parse frame graph settings: {e}");
            FrameGraphError::Settings(e.to_string())
        })
    }

    /// Serializes the settings to pretty RON.
    pub fn to_ron_string(&self) -> Result<String> {
        let pretty_config = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        ron::ser::to_string_pretty(self, pretty_config)
            .map_err(|e| FrameGraphError::Settings(e.to_string()))
    }

    /// Returns `true` if declarations are validated.
    pub fn validation_enabled(&self) -> bool {
        self.validation == ValidationMode::Enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = FrameGraphSettings::default();
        assert!(settings.warn_unused_attachments);
        assert!(settings.log_cycle_diagnostics);
        assert_eq!(settings.max_scopes_per_frame, 4096);
        assert_eq!(settings.validation_enabled(), cfg!(debug_assertions));
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let settings =
            FrameGraphSettings::from_ron_str("(validation: Enabled, max_scopes_per_frame: 64)")
                .expect("valid RON");
        assert!(settings.validation_enabled());
        assert_eq!(settings.max_scopes_per_frame, 64);
        assert!(settings.warn_unused_attachments);
    }

    #[test]
    fn ron_round_trip() {
        let settings = FrameGraphSettings {
            validation: ValidationMode::Disabled,
            warn_unused_attachments: false,
            log_cycle_diagnostics: true,
            max_scopes_per_frame: 128,
        };
        let text = settings.to_ron_string().expect("serializable");
        assert_eq!(FrameGraphSettings::from_ron_str(&text).unwrap(), settings);
    }

    #[test]
    fn malformed_ron_is_a_settings_error() {
        let err = FrameGraphSettings::from_ron_str("(validation: Sometimes)").unwrap_err();
        assert!(matches!(err, FrameGraphError::Settings(_)));
    }
}
