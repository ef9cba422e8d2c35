//! Placement constraints over a candidate seat state.
//!
//! Two rules decide whether an arrangement is acceptable:
//!
//! - **No lonely occupant**: a row with room for more than one person must
//!   not hold exactly one.
//! - **Row connectivity**: on each side, if people sit in two or more rows,
//!   at least one pair of those rows must be adjacent. This is deliberately
//!   weaker than requiring one contiguous block of rows.
//!
//! Row capacities come from the layout, so rows are judged by how many seats
//! physically exist there, not by how many are open.

use serde::{Deserialize, Serialize};

use crate::layout::{Layout, Side};
use crate::seats::SeatState;

/// Occupied-seat counts per (side, row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowOccupancy {
    pub left: Vec<usize>,
    pub right: Vec<usize>,
}

impl RowOccupancy {
    pub fn side(&self, side: Side) -> &[usize] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Occupied count for one row; 0 for rows outside the layout.
    pub fn get(&self, side: Side, row: usize) -> usize {
        self.side(side).get(row).copied().unwrap_or(0)
    }

    /// Indices of rows with at least one occupant, ascending.
    pub fn occupied_rows(&self, side: Side) -> Vec<usize> {
        self.side(side)
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(row, _)| row)
            .collect()
    }
}

/// Count occupied seats in every row of both sides.
pub fn row_occupancy(layout: &Layout, state: &SeatState) -> RowOccupancy {
    let rows = layout.row_count();
    let mut occ = RowOccupancy {
        left: vec![0; rows],
        right: vec![0; rows],
    };
    for seat in state.seats() {
        if !seat.occupancy.is_occupied() || seat.slot.row >= rows {
            continue;
        }
        match seat.slot.side {
            Side::Left => occ.left[seat.slot.row] += 1,
            Side::Right => occ.right[seat.slot.row] += 1,
        }
    }
    occ
}

/// Rows (side, row) that seat exactly one person despite having room for more.
pub fn lonely_rows(layout: &Layout, state: &SeatState) -> Vec<(Side, usize)> {
    let occ = row_occupancy(layout, state);
    let mut lonely = Vec::new();
    for side in Side::ALL {
        for row in 0..layout.row_count() {
            if occ.get(side, row) == 1 && layout.row_capacity(side, row) > 1 {
                lonely.push((side, row));
            }
        }
    }
    lonely
}

pub fn has_lonely_occupant(layout: &Layout, state: &SeatState) -> bool {
    !lonely_rows(layout, state).is_empty()
}

/// Connectivity of one side's occupied rows.
///
/// Zero or one occupied rows is trivially connected. Otherwise any single
/// pair of consecutive occupied rows is enough.
pub fn side_connected(occupied_rows: &[usize]) -> bool {
    if occupied_rows.len() <= 1 {
        return true;
    }
    occupied_rows.windows(2).any(|w| w[1] - w[0] == 1)
}

/// Sides whose occupied rows fail [`side_connected`].
pub fn disconnected_sides(layout: &Layout, state: &SeatState) -> Vec<Side> {
    let occ = row_occupancy(layout, state);
    Side::ALL
        .into_iter()
        .filter(|&side| !side_connected(&occ.occupied_rows(side)))
        .collect()
}

pub fn has_good_connectivity(layout: &Layout, state: &SeatState) -> bool {
    disconnected_sides(layout, state).is_empty()
}

/// A state is valid when no row has a lonely occupant and both sides are
/// connected.
pub fn is_valid(layout: &Layout, state: &SeatState) -> bool {
    !has_lonely_occupant(layout, state) && has_good_connectivity(layout, state)
}

/// Full breakdown of constraint violations for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintReport {
    pub lonely_rows: Vec<(Side, usize)>,
    pub disconnected_sides: Vec<Side>,
}

impl ConstraintReport {
    pub fn is_valid(&self) -> bool {
        self.lonely_rows.is_empty() && self.disconnected_sides.is_empty()
    }
}

pub fn evaluate(layout: &Layout, state: &SeatState) -> ConstraintReport {
    ConstraintReport {
        lonely_rows: lonely_rows(layout, state),
        disconnected_sides: disconnected_sides(layout, state),
    }
}
