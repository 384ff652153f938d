//! Validation profiles
//!
//! Tunable thresholds and pass toggles for the validation engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Failed to read profile {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid profile YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid profile: {0}")]
    Invalid(String),
}

/// Validation profile defining thresholds and enabled passes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationProfile {
    /// Profile name (e.g., "standard@1.0")
    pub name: String,

    // === Value ranges ===

    /// Lowest expected task duration
    pub min_duration: i64,

    /// Highest expected task duration
    pub max_duration: i64,

    // === Advisory passes ===

    /// Warn when a task needs a skill no worker has
    pub check_skill_coverage: bool,

    /// Warn when assigned work exceeds a worker's MaxLoadPerPhase
    pub check_worker_capacity: bool,
}

impl ValidationProfile {
    /// The standard profile
    pub fn standard() -> Self {
        Self {
            name: "standard@1.0".to_string(),
            min_duration: 1,
            max_duration: 24,
            check_skill_coverage: true,
            check_worker_capacity: true,
        }
    }

    /// Structural checks only; advisory passes are off
    pub fn structural() -> Self {
        Self {
            name: "structural@1.0".to_string(),
            check_skill_coverage: false,
            check_worker_capacity: false,
            ..Self::standard()
        }
    }

    /// Load profile from YAML. Missing keys take the standard values.
    pub fn from_yaml(yaml: &str) -> Result<Self, ProfileError> {
        let profile: Self = serde_yaml::from_str(yaml)?;
        profile.check()?;
        Ok(profile)
    }

    /// Load profile from a YAML file
    pub fn from_file(path: &str) -> Result<Self, ProfileError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    /// Get profile by name
    pub fn for_name(name: &str) -> Self {
        match name {
            "structural" => Self::structural(),
            _ => Self::standard(),
        }
    }

    fn check(&self) -> Result<(), ProfileError> {
        if self.min_duration > self.max_duration {
            return Err(ProfileError::Invalid(format!(
                "min_duration {} is above max_duration {}",
                self.min_duration, self.max_duration
            )));
        }
        Ok(())
    }
}

impl Default for ValidationProfile {
    fn default() -> Self {
        Self::standard()
    }
}
