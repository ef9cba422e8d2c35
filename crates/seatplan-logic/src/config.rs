//! Classroom configuration.
//!
//! A classroom is described by its layout, its roster and the attempt budget
//! for the random fill. This module holds the serde data model and its
//! validation, independent of where the JSON comes from.
//!
//! ```
//! use seatplan_logic::config::{validate_config, ClassroomConfig};
//!
//! let config = ClassroomConfig::reference();
//! assert!(validate_config(&config).is_empty());
//! assert_eq!(config.layout.capacity(), 28);
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assign::DEFAULT_MAX_ATTEMPTS;
use crate::layout::{Layout, Side};
use crate::roster::Roster;

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

/// Everything needed to open a seating session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassroomConfig {
    /// Heading shown above the chart.
    #[serde(default)]
    pub title: String,
    pub layout: Layout,
    pub roster: Vec<String>,
    /// Random fill attempt budget.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl ClassroomConfig {
    /// The reference classroom: 28 seats, 22 people, 100 attempts.
    pub fn reference() -> Self {
        Self {
            title: "Class 3 Seating".to_string(),
            layout: Layout::reference(),
            roster: Roster::reference().names().to_vec(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for ClassroomConfig {
    fn default() -> Self {
        Self::reference()
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A side has no rows at all.
    #[error("{0} side has no rows")]
    NoRows(Side),
    /// Every row flag is false.
    #[error("layout has no seats")]
    NoSeats,
    #[error("roster is empty")]
    EmptyRoster,
    /// Roster entry at this index is blank.
    #[error("roster entry {0} is blank")]
    BlankName(usize),
    #[error("roster lists '{0}' more than once")]
    DuplicateName(String),
    #[error("roster of {roster} people does not fit {capacity} seats")]
    RosterTooLarge { roster: usize, capacity: usize },
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
}

/// Validate a classroom configuration, returning all errors found.
pub fn validate_config(config: &ClassroomConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    for side in Side::ALL {
        if config.layout.rows(side).is_empty() {
            errors.push(ConfigError::NoRows(side));
        }
    }

    let capacity = config.layout.capacity();
    if capacity == 0 {
        errors.push(ConfigError::NoSeats);
    }

    if config.roster.is_empty() {
        errors.push(ConfigError::EmptyRoster);
    }

    let mut seen = HashSet::new();
    for (i, name) in config.roster.iter().enumerate() {
        let name = name.trim();
        if name.is_empty() {
            errors.push(ConfigError::BlankName(i));
        } else if !seen.insert(name) {
            errors.push(ConfigError::DuplicateName(name.to_string()));
        }
    }

    if config.roster.len() > capacity {
        errors.push(ConfigError::RosterTooLarge {
            roster: config.roster.len(),
            capacity,
        });
    }

    if config.max_attempts == 0 {
        errors.push(ConfigError::ZeroAttempts);
    }

    errors
}
