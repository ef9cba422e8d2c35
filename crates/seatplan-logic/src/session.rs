//! A single seating session: one layout, one roster, one current state.
//!
//! This is the boundary a presentation layer talks to. Every operation
//! computes a new [`SeatState`] from the current one and swaps it in whole;
//! a failed operation leaves the current state untouched.

use rand::Rng;
use serde::Serialize;

use crate::assign::{self, AssignMode, Assignment, DEFAULT_MAX_ATTEMPTS};
use crate::config::ClassroomConfig;
use crate::constraints::{self, ConstraintReport};
use crate::error::{Result, SeatingError};
use crate::layout::{Layout, SeatSlot, Side};
use crate::roster::Roster;
use crate::seats::{SeatState, StatusCounts, ToggleOutcome};

/// Counters shown alongside the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub capacity: usize,
    pub closed: usize,
    pub available: usize,
    pub occupied: usize,
    pub roster_size: usize,
    pub max_closable: usize,
}

#[derive(Debug, Clone)]
pub struct SeatingSession {
    layout: Layout,
    roster: Roster,
    state: SeatState,
    max_attempts: u32,
}

impl SeatingSession {
    /// Open a session with every seat empty.
    pub fn new(layout: Layout, roster: Roster) -> Result<Self> {
        let capacity = layout.capacity();
        if roster.len() > capacity {
            return Err(SeatingError::RosterExceedsCapacity {
                roster: roster.len(),
                capacity,
            });
        }
        let state = SeatState::initialize(&layout);
        Ok(Self {
            layout,
            roster,
            state,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        })
    }

    pub fn from_config(config: &ClassroomConfig) -> Result<Self> {
        let roster = Roster::new(config.roster.iter().cloned())?;
        Ok(Self::new(config.layout.clone(), roster)?.with_max_attempts(config.max_attempts))
    }

    pub fn reference() -> Self {
        Self {
            layout: Layout::reference(),
            roster: Roster::reference(),
            state: SeatState::initialize(&Layout::reference()),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn state(&self) -> &SeatState {
        &self.state
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Close an empty seat or reopen a closed one. Occupied seats, seats
    /// past the closable limit and nonexistent slots are ignored.
    pub fn toggle_close(&mut self, side: Side, row: usize, col: usize) -> ToggleOutcome {
        let (state, outcome) = self
            .state
            .toggle_close(SeatSlot::new(side, row, col), self.roster.len());
        self.state = state;
        outcome
    }

    /// Back to all-empty, dropping closed marks and occupants.
    pub fn reset(&mut self) {
        self.state = SeatState::reset(&self.layout);
    }

    /// Seat the roster with `mode`. On error the current state is kept.
    pub fn assign(&mut self, mode: AssignMode, rng: &mut impl Rng) -> Result<Assignment> {
        let assignment = assign::assign(
            &self.layout,
            &self.state,
            &self.roster,
            mode,
            self.max_attempts,
            rng,
        )?;
        self.state = assignment.state.clone();
        Ok(assignment)
    }

    pub fn closed_count(&self) -> usize {
        self.state.closed_count()
    }

    pub fn available_count(&self) -> usize {
        self.state.available_count()
    }

    pub fn max_closable(&self) -> usize {
        self.state.max_closable(self.roster.len())
    }

    pub fn counts(&self) -> StatusCounts {
        self.state.count_by_status()
    }

    pub fn constraint_report(&self) -> ConstraintReport {
        constraints::evaluate(&self.layout, &self.state)
    }

    pub fn summary(&self) -> SessionSummary {
        let counts = self.counts();
        SessionSummary {
            capacity: self.state.capacity(),
            closed: counts.closed,
            available: self.available_count(),
            occupied: counts.occupied,
            roster_size: self.roster.len(),
            max_closable: self.max_closable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seats::{IgnoreReason, Occupancy};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_reference_summary() {
        let session = SeatingSession::reference();
        let summary = session.summary();
        assert_eq!(summary.capacity, 28);
        assert_eq!(summary.available, 28);
        assert_eq!(summary.roster_size, 22);
        assert_eq!(summary.max_closable, 6);
        assert_eq!(summary.closed, 0);
    }

    #[test]
    fn test_rejects_oversized_roster() {
        let layout = Layout::new(vec![vec![true, true]], vec![vec![true]]);
        let roster = Roster::new(["A", "B", "C", "D"]).unwrap();
        let err = SeatingSession::new(layout, roster).unwrap_err();
        assert_eq!(
            err,
            SeatingError::RosterExceedsCapacity {
                roster: 4,
                capacity: 3
            }
        );
    }

    #[test]
    fn test_from_config_reports_bad_roster() {
        let mut config = ClassroomConfig::reference();
        config.roster.push(config.roster[0].clone());
        assert!(matches!(
            SeatingSession::from_config(&config),
            Err(SeatingError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_toggle_then_assign_keeps_closed() {
        let mut session = SeatingSession::reference();
        assert_eq!(session.toggle_close(Side::Left, 0, 0), ToggleOutcome::Closed);
        assert_eq!(
            session.toggle_close(Side::Right, 4, 0),
            ToggleOutcome::Ignored(IgnoreReason::UnknownSlot)
        );

        let mut rng = StdRng::seed_from_u64(5);
        let result = session.assign(AssignMode::Front, &mut rng).unwrap();
        assert_eq!(result.state, *session.state());
        assert_eq!(
            session.state().occupancy(SeatSlot::new(Side::Left, 0, 0)),
            Some(&Occupancy::Closed)
        );
        assert_eq!(session.counts().occupied, 22);

        // Occupied seats cannot be closed directly.
        assert_eq!(
            session.toggle_close(Side::Left, 0, 1),
            ToggleOutcome::Ignored(IgnoreReason::Occupied)
        );
    }

    #[test]
    fn test_close_limit_then_reset() {
        let layout = Layout::reference();
        let roster = Roster::new((0..26).map(|i| format!("P{i}"))).unwrap();
        let mut session = SeatingSession::new(layout, roster).unwrap();
        assert_eq!(session.max_closable(), 2);
        session.toggle_close(Side::Left, 0, 0);
        session.toggle_close(Side::Left, 0, 1);
        assert_eq!(
            session.toggle_close(Side::Left, 0, 2),
            ToggleOutcome::Ignored(IgnoreReason::LimitReached)
        );
        assert_eq!(session.available_count(), 26);

        let mut rng = StdRng::seed_from_u64(5);
        let result = session.assign(AssignMode::Random, &mut rng).unwrap();
        assert_eq!(result.state.count_by_status().occupied, 26);

        session.reset();
        assert_eq!(*session.state(), SeatState::initialize(session.layout()));
        session.reset();
        assert_eq!(session.summary().closed, 0);
    }
}
