//! Player settings and preferences
//!
//! Stored as JSON next to the host. The simulation never reads these
//! directly. `sensitivity` and [`Settings::scale`] are for an embedding host
//! that turns raw pointer deltas into `Move` inputs; the headless binary
//! only reads `debug`, since autopilot and replay deltas are already scaled.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LockError;
use crate::finite_or_zero;

/// Allowed movement sensitivity range
pub const SENSITIVITY_RANGE: (f64, f64) = (0.1, 5.0);

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Multiplier applied to pointer/touch movement
    pub sensitivity: f64,
    /// Verbose simulation logging
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sensitivity: 1.0,
            debug: false,
        }
    }
}

impl Settings {
    /// Scale a raw pointer delta, mapping non-finite values to zero
    pub fn scale(&self, dx: f64, dy: f64) -> (f64, f64) {
        (
            finite_or_zero(self.sensitivity * dx),
            finite_or_zero(self.sensitivity * dy),
        )
    }

    /// Reject values the input boundary cannot use
    pub fn validate(&self) -> Result<(), LockError> {
        let (min, max) = SENSITIVITY_RANGE;
        if !(min..=max).contains(&self.sensitivity) {
            return Err(LockError::InvalidSettings(format!(
                "sensitivity {} outside {min}..={max}",
                self.sensitivity
            )));
        }
        Ok(())
    }

    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, LockError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, LockError> {
        match fs::read_to_string(path) {
            Ok(json) => {
                let settings = Self::from_json(&json)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(LockError::io(path, err)),
        }
    }

    /// Save settings to `path`
    pub fn save(&self, path: &Path) -> Result<(), LockError> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|err| LockError::io(path, err))?;
        log::info!("Settings saved");
        Ok(())
    }
}
