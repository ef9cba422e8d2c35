//! Classroom seat grid geometry.
//!
//! A classroom has two sides separated by an aisle. Each side is an ordered
//! list of rows (front to back), and each row is an ordered list of flags
//! saying whether a seat physically exists at that column. The layout never
//! changes after construction; everything else in the crate reads capacity
//! from here rather than assuming a fixed shape.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two seating blocks on either side of the aisle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Both sides in placement order (left before right).
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    /// Parse `"left"` / `"right"` (also `l` / `r`), case-insensitive.
    pub fn parse(s: &str) -> Option<Side> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Some(Side::Left),
            "right" | "r" => Some(Side::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed identity of a potential seat position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeatSlot {
    pub side: Side,
    pub row: usize,
    pub col: usize,
}

impl SeatSlot {
    pub fn new(side: Side, row: usize, col: usize) -> Self {
        Self { side, row, col }
    }
}

impl fmt::Display for SeatSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.side, self.row, self.col)
    }
}

/// Seat-existence grid for both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub left: Vec<Vec<bool>>,
    pub right: Vec<Vec<bool>>,
}

impl Layout {
    pub fn new(left: Vec<Vec<bool>>, right: Vec<Vec<bool>>) -> Self {
        Self { left, right }
    }

    /// The reference classroom: five rows of three per side, with the back
    /// row missing its aisle-far seat (left col 2, right col 0). 28 seats.
    pub fn reference() -> Self {
        Self {
            left: vec![
                vec![true, true, true],
                vec![true, true, true],
                vec![true, true, true],
                vec![true, true, true],
                vec![true, true, false],
            ],
            right: vec![
                vec![true, true, true],
                vec![true, true, true],
                vec![true, true, true],
                vec![true, true, true],
                vec![false, true, true],
            ],
        }
    }

    pub fn rows(&self, side: Side) -> &[Vec<bool>] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Number of rows to walk front to back (the deeper of the two sides).
    pub fn row_count(&self) -> usize {
        self.left.len().max(self.right.len())
    }

    /// Existing seats in one row. Rows past the end of a side have none.
    pub fn row_capacity(&self, side: Side, row: usize) -> usize {
        self.rows(side)
            .get(row)
            .map_or(0, |cols| cols.iter().filter(|&&exists| exists).count())
    }

    /// Existing seats on one side.
    pub fn side_capacity(&self, side: Side) -> usize {
        (0..self.rows(side).len())
            .map(|row| self.row_capacity(side, row))
            .sum()
    }

    /// Total existing seats across both sides.
    pub fn capacity(&self) -> usize {
        Side::ALL.iter().map(|&side| self.side_capacity(side)).sum()
    }

    pub fn contains(&self, slot: SeatSlot) -> bool {
        self.rows(slot.side)
            .get(slot.row)
            .and_then(|cols| cols.get(slot.col))
            .copied()
            .unwrap_or(false)
    }

    /// Existing slots in expansion order: left side first, then right;
    /// row-major within a side.
    pub fn slots(&self) -> impl Iterator<Item = SeatSlot> + '_ {
        Side::ALL.into_iter().flat_map(move |side| self.side_slots(side))
    }

    /// Existing slots on one side, row-major.
    pub fn side_slots(&self, side: Side) -> impl Iterator<Item = SeatSlot> + '_ {
        self.rows(side)
            .iter()
            .enumerate()
            .flat_map(move |(row, cols)| {
                cols.iter()
                    .enumerate()
                    .filter(|(_, exists)| **exists)
                    .map(move |(col, _)| SeatSlot::new(side, row, col))
            })
    }

    /// Existing slots in one row, column ascending.
    pub fn row_slots(&self, side: Side, row: usize) -> impl Iterator<Item = SeatSlot> + '_ {
        self.rows(side)
            .get(row)
            .into_iter()
            .flat_map(move |cols| {
                cols.iter()
                    .enumerate()
                    .filter(|(_, exists)| **exists)
                    .map(move |(col, _)| SeatSlot::new(side, row, col))
            })
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_capacity() {
        let layout = Layout::reference();
        assert_eq!(layout.capacity(), 28);
        assert_eq!(layout.side_capacity(Side::Left), 14);
        assert_eq!(layout.side_capacity(Side::Right), 14);
        assert_eq!(layout.row_count(), 5);
    }

    #[test]
    fn test_row_capacity() {
        let layout = Layout::reference();
        for row in 0..4 {
            assert_eq!(layout.row_capacity(Side::Left, row), 3);
            assert_eq!(layout.row_capacity(Side::Right, row), 3);
        }
        assert_eq!(layout.row_capacity(Side::Left, 4), 2);
        assert_eq!(layout.row_capacity(Side::Right, 4), 2);
        assert_eq!(layout.row_capacity(Side::Left, 9), 0);
    }

    #[test]
    fn test_missing_seats_not_contained() {
        let layout = Layout::reference();
        assert!(!layout.contains(SeatSlot::new(Side::Left, 4, 2)));
        assert!(!layout.contains(SeatSlot::new(Side::Right, 4, 0)));
        assert!(layout.contains(SeatSlot::new(Side::Right, 4, 1)));
        assert!(!layout.contains(SeatSlot::new(Side::Left, 5, 0)));
        assert!(!layout.contains(SeatSlot::new(Side::Left, 0, 3)));
    }

    #[test]
    fn test_slots_expansion_order() {
        let layout = Layout::reference();
        let slots: Vec<_> = layout.slots().collect();
        assert_eq!(slots.len(), 28);
        assert_eq!(slots[0], SeatSlot::new(Side::Left, 0, 0));
        assert_eq!(slots[13], SeatSlot::new(Side::Left, 4, 1));
        assert_eq!(slots[14], SeatSlot::new(Side::Right, 0, 0));
        assert_eq!(slots[27], SeatSlot::new(Side::Right, 4, 2));
    }

    #[test]
    fn test_row_slots_skip_missing() {
        let layout = Layout::reference();
        let back_right: Vec<_> = layout.row_slots(Side::Right, 4).map(|s| s.col).collect();
        assert_eq!(back_right, vec![1, 2]);
        assert_eq!(layout.row_slots(Side::Left, 7).count(), 0);
    }

    #[test]
    fn test_uneven_sides() {
        let layout = Layout::new(vec![vec![true]; 3], vec![vec![true, true]]);
        assert_eq!(layout.row_count(), 3);
        assert_eq!(layout.capacity(), 5);
        assert_eq!(layout.row_capacity(Side::Right, 2), 0);
    }

    #[test]
    fn test_side_parse() {
        assert_eq!(Side::parse("Left"), Some(Side::Left));
        assert_eq!(Side::parse("r"), Some(Side::Right));
        assert_eq!(Side::parse("middle"), None);
        assert_eq!(Side::Right.to_string(), "right");
    }
}
