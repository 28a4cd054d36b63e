//! Planner settings.
//!
//! Persisted as JSON. A missing or empty file yields defaults; a
//! malformed file is logged and also yields defaults. Missing keys fall
//! back to per-field defaults.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scheduler::RangeSelector;

const DEFAULT_MACHINES: [&str; 9] = [
    "HAAS VF-3",
    "DMU-50-1",
    "DMU-50-2",
    "DMU-70",
    "DMU-75",
    "DMG-M1-1",
    "DMG-M1-2",
    "DMG-M1-3",
    "DMC-835",
];

fn default_machines() -> Vec<String> {
    DEFAULT_MACHINES.iter().map(|m| m.to_string()).collect()
}

fn default_separator() -> char {
    ';'
}

/// User-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Machine names in Gantt display order (top to bottom).
    #[serde(default = "default_machines")]
    pub machines: Vec<String>,
    /// Field delimiter for catalog and task files.
    #[serde(default = "default_separator")]
    pub csv_separator: char,
    /// Range shown when the planner opens.
    #[serde(default)]
    pub default_range: RangeSelector,
    /// Catalog file loaded silently on startup.
    #[serde(default)]
    pub last_opened_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            machines: default_machines(),
            csv_separator: default_separator(),
            default_range: RangeSelector::default(),
            last_opened_file: None,
        }
    }
}

impl Settings {
    /// Loads settings, falling back to defaults when the file is
    /// missing, empty, or unreadable as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Settings file {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            info!("Settings file {} is empty, using defaults", path.display());
            return Ok(Self::default());
        }
        match serde_json::from_str(&text) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!("Settings file {} is malformed ({e}), using defaults", path.display());
                Ok(Self::default())
            }
        }
    }

    /// Writes settings as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// The separator as a single byte, as the CSV codec requires.
    pub fn delimiter(&self) -> Result<u8> {
        u8::try_from(self.csv_separator)
            .ok()
            .filter(|b| b.is_ascii())
            .ok_or_else(|| {
                Error::invalid_input(format!(
                    "CSV separator '{}' must be a single ASCII character",
                    self.csv_separator
                ))
            })
    }

    /// Appends a machine to the display order.
    ///
    /// # Errors
    /// `InvalidInput` if the name is empty or already present.
    pub fn add_machine(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_input("machine name must not be empty"));
        }
        if self.machines.iter().any(|m| m == name) {
            return Err(Error::invalid_input(format!(
                "machine '{name}' is already configured"
            )));
        }
        self.machines.push(name.to_string());
        Ok(())
    }

    /// Removes a machine. Returns whether it was present.
    pub fn remove_machine(&mut self, name: &str) -> bool {
        let before = self.machines.len();
        self.machines.retain(|m| m != name);
        self.machines.len() != before
    }

    /// Gantt row of a machine.
    pub fn machine_index(&self, name: &str) -> Option<usize> {
        self.machines.iter().position(|m| m == name)
    }
}
