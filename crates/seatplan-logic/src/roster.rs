//! The fixed list of people to seat.

use std::collections::HashSet;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeatingError};

/// Names of the reference class, alphabetical.
pub const REFERENCE_NAMES: [&str; 22] = [
    "Aiden", "Bora", "Chloe", "Daniel", "Dohyun", "Eunji", "Gabriel", "Hana", "Harin", "Isaac",
    "Jisoo", "Jiwon", "Junho", "Kaito", "Leah", "Minseo", "Nadia", "Owen", "Seoyeon", "Taemin",
    "Yuna", "Zoe",
];

/// Ordered set of unique, non-blank names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Build a roster, trimming whitespace and rejecting blanks and repeats.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for name in names {
            let name = name.into().trim().to_string();
            if name.is_empty() {
                return Err(SeatingError::EmptyName);
            }
            if !seen.insert(name.clone()) {
                return Err(SeatingError::DuplicateName(name));
            }
            out.push(name);
        }
        Ok(Self { names: out })
    }

    pub fn reference() -> Self {
        Self {
            names: REFERENCE_NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

impl Deref for Roster {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.names
    }
}

impl TryFrom<Vec<String>> for Roster {
    type Error = SeatingError;

    fn try_from(names: Vec<String>) -> Result<Self> {
        Roster::new(names)
    }
}

impl From<Roster> for Vec<String> {
    fn from(roster: Roster) -> Self {
        roster.names
    }
}
