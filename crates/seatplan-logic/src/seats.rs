//! Seat occupancy state.
//!
//! `SeatState` holds one `Seat` per existing layout slot, in the layout's
//! expansion order. Every operation here takes a state by reference and
//! returns a new one; nothing mutates a state another caller can see.

use serde::{Deserialize, Serialize};

use crate::layout::{Layout, SeatSlot, Side};

/// What currently sits in a seat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupancy {
    Empty,
    Closed,
    Occupied(String),
}

impl Occupancy {
    pub fn is_empty(&self) -> bool {
        matches!(self, Occupancy::Empty)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Occupancy::Closed)
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self, Occupancy::Occupied(_))
    }

    pub fn occupant(&self) -> Option<&str> {
        match self {
            Occupancy::Occupied(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub slot: SeatSlot,
    pub occupancy: Occupancy,
}

/// Why a toggle left the state unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Someone is seated there; only a reset frees it.
    Occupied,
    /// Closing one more would leave too few seats for the roster.
    LimitReached,
    /// No seat exists at that slot.
    UnknownSlot,
}

/// Result of [`SeatState::toggle_close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Opened,
    Closed,
    Ignored(IgnoreReason),
}

/// Seat counts by occupancy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub empty: usize,
    pub closed: usize,
    pub occupied: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.empty + self.closed + self.occupied
    }
}

/// Full occupancy of the classroom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatState {
    seats: Vec<Seat>,
}

impl SeatState {
    /// One empty seat per existing slot in `layout`.
    pub fn initialize(layout: &Layout) -> Self {
        Self {
            seats: layout
                .slots()
                .map(|slot| Seat {
                    slot,
                    occupancy: Occupancy::Empty,
                })
                .collect(),
        }
    }

    /// Fresh all-empty state; discards every closed and occupied mark.
    pub fn reset(layout: &Layout) -> Self {
        Self::initialize(layout)
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Number of seats, which equals the layout's capacity.
    pub fn capacity(&self) -> usize {
        self.seats.len()
    }

    pub fn get(&self, slot: SeatSlot) -> Option<&Seat> {
        self.seats.iter().find(|s| s.slot == slot)
    }

    pub fn occupancy(&self, slot: SeatSlot) -> Option<&Occupancy> {
        self.get(slot).map(|s| &s.occupancy)
    }

    /// Seats in one (side, row), column ascending.
    pub fn row_seats(&self, side: Side, row: usize) -> impl Iterator<Item = &Seat> + '_ {
        self.seats
            .iter()
            .filter(move |s| s.slot.side == side && s.slot.row == row)
    }

    /// Where a person sits, if anywhere.
    pub fn seat_of(&self, name: &str) -> Option<SeatSlot> {
        self.seats
            .iter()
            .find(|s| s.occupancy.occupant() == Some(name))
            .map(|s| s.slot)
    }

    /// Occupant names in seat order.
    pub fn occupants(&self) -> impl Iterator<Item = &str> + '_ {
        self.seats.iter().filter_map(|s| s.occupancy.occupant())
    }

    pub fn count_by_status(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for seat in &self.seats {
            match seat.occupancy {
                Occupancy::Empty => counts.empty += 1,
                Occupancy::Closed => counts.closed += 1,
                Occupancy::Occupied(_) => counts.occupied += 1,
            }
        }
        counts
    }

    pub fn closed_count(&self) -> usize {
        self.seats.iter().filter(|s| s.occupancy.is_closed()).count()
    }

    /// Seats that could take a person: capacity minus closed.
    pub fn available_count(&self) -> usize {
        self.capacity() - self.closed_count()
    }

    /// How many seats may be closed while still fitting `roster_size` people.
    pub fn max_closable(&self, roster_size: usize) -> usize {
        self.capacity().saturating_sub(roster_size)
    }

    /// Flip a seat between empty and closed.
    ///
    /// Closed seats always reopen. Empty seats close only while the closed
    /// count is below [`max_closable`](Self::max_closable). Occupied seats
    /// and slots with no seat are left alone.
    pub fn toggle_close(&self, slot: SeatSlot, roster_size: usize) -> (SeatState, ToggleOutcome) {
        let Some(index) = self.seats.iter().position(|s| s.slot == slot) else {
            log::debug!("Toggle on {} ignored: no seat there", slot);
            return (self.clone(), ToggleOutcome::Ignored(IgnoreReason::UnknownSlot));
        };

        let (next, outcome) = match self.seats[index].occupancy {
            Occupancy::Closed => (Occupancy::Empty, ToggleOutcome::Opened),
            Occupancy::Empty if self.closed_count() < self.max_closable(roster_size) => {
                (Occupancy::Closed, ToggleOutcome::Closed)
            }
            Occupancy::Empty => {
                log::debug!(
                    "Toggle on {} ignored: {} of {} closable seats already closed",
                    slot,
                    self.closed_count(),
                    self.max_closable(roster_size)
                );
                return (self.clone(), ToggleOutcome::Ignored(IgnoreReason::LimitReached));
            }
            Occupancy::Occupied(_) => {
                log::debug!("Toggle on {} ignored: seat is occupied", slot);
                return (self.clone(), ToggleOutcome::Ignored(IgnoreReason::Occupied));
            }
        };

        let mut seats = self.seats.clone();
        seats[index].occupancy = next;
        (Self { seats }, outcome)
    }

    /// Same closed marks, every occupant removed.
    pub fn cleared(&self) -> SeatState {
        Self {
            seats: self
                .seats
                .iter()
                .map(|s| Seat {
                    slot: s.slot,
                    occupancy: match s.occupancy {
                        Occupancy::Closed => Occupancy::Closed,
                        Occupancy::Empty | Occupancy::Occupied(_) => Occupancy::Empty,
                    },
                })
                .collect(),
        }
    }

    /// Copy of this state with the given slots occupied. Slots not present
    /// in the state are skipped.
    pub(crate) fn with_occupants<I>(&self, placements: I) -> SeatState
    where
        I: IntoIterator<Item = (SeatSlot, String)>,
    {
        let mut seats = self.seats.clone();
        for (slot, name) in placements {
            if let Some(seat) = seats.iter_mut().find(|s| s.slot == slot) {
                seat.occupancy = Occupancy::Occupied(name);
            }
        }
        Self { seats }
    }
}
