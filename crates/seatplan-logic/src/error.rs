//! Engine error type.

use thiserror::Error;

/// Errors raised by fallible seating operations.
///
/// Ignored toggles and the random fill's best-effort fallback are not errors;
/// see [`crate::seats::ToggleOutcome`] and [`crate::assign::RandomFill`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeatingError {
    /// Fewer open seats than people. The seat state is left untouched.
    #[error("only {available} seats available for {required} people; open some closed seats")]
    InsufficientCapacity { available: usize, required: usize },

    #[error("roster contains an empty name")]
    EmptyName,

    #[error("roster contains duplicate name: {0}")]
    DuplicateName(String),

    #[error("roster of {roster} people does not fit {capacity} seats")]
    RosterExceedsCapacity { roster: usize, capacity: usize },

    #[error("unknown assignment mode '{0}' (expected 'front' or 'random')")]
    UnknownMode(String),
}

impl SeatingError {
    /// Stable kebab-case code for adapters that key messages off the error.
    pub fn code(&self) -> &'static str {
        match self {
            SeatingError::InsufficientCapacity { .. } => "insufficient-capacity",
            SeatingError::EmptyName => "empty-name",
            SeatingError::DuplicateName(_) => "duplicate-name",
            SeatingError::RosterExceedsCapacity { .. } => "roster-exceeds-capacity",
            SeatingError::UnknownMode(_) => "unknown-mode",
        }
    }
}

pub type Result<T> = std::result::Result<T, SeatingError>;
