//! Seat assignment strategies.
//!
//! Both strategies start from the current state with every occupant cleared
//! and closed seats left in place, then seat the whole roster:
//!
//! - **Front fill** walks rows front to back, left side then right side,
//!   columns ascending, handing out names in the order given. Deterministic;
//!   ignores the placement constraints.
//! - **Random fill** shuffles the roster, spreads people across (side, row)
//!   buckets at random, packs each bucket into adjacent columns, and retries
//!   until the result passes [`constraints::is_valid`] or the attempt budget
//!   runs out. On exhaustion the last attempt is returned as-is.
//!
//! ```
//! use rand::SeedableRng;
//! use seatplan_logic::assign::{assign, AssignMode, DEFAULT_MAX_ATTEMPTS};
//! use seatplan_logic::layout::Layout;
//! use seatplan_logic::roster::Roster;
//! use seatplan_logic::seats::SeatState;
//!
//! let layout = Layout::reference();
//! let roster = Roster::reference();
//! let state = SeatState::initialize(&layout);
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let result = assign(&layout, &state, &roster, AssignMode::Front, DEFAULT_MAX_ATTEMPTS, &mut rng)
//!     .unwrap();
//! assert_eq!(result.state.count_by_status().occupied, 22);
//! ```

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constraints;
use crate::error::{Result, SeatingError};
use crate::layout::{Layout, SeatSlot, Side};
use crate::roster::Roster;
use crate::seats::{Occupancy, SeatState};

/// Attempt budget for the random fill when the caller has no preference.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Placement strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignMode {
    #[default]
    Front,
    Random,
}

impl AssignMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignMode::Front => "front",
            AssignMode::Random => "random",
        }
    }
}

impl fmt::Display for AssignMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignMode {
    type Err = SeatingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(AssignMode::Front),
            "random" => Ok(AssignMode::Random),
            other => Err(SeatingError::UnknownMode(other.to_string())),
        }
    }
}

/// Seat `roster` in order: rows front to back, left then right, columns
/// ascending, skipping closed seats. Stops when the roster runs out.
pub fn fill_from_front_by_row(layout: &Layout, state: &SeatState, roster: &[String]) -> SeatState {
    let base = state.cleared();
    let mut names = roster.iter();
    let mut placements = Vec::with_capacity(roster.len());

    'rows: for row in 0..layout.row_count() {
        for side in Side::ALL {
            for slot in layout.row_slots(side, row) {
                if base.occupancy(slot).map_or(true, Occupancy::is_closed) {
                    continue;
                }
                match names.next() {
                    Some(name) => placements.push((slot, name.clone())),
                    None => break 'rows,
                }
            }
        }
    }

    base.with_occupants(placements)
}

/// Result of [`assign_seats_randomly`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomFill {
    pub state: SeatState,
    /// Attempts consumed, including the returned one.
    pub attempts: u32,
    /// Whether `state` passes the placement constraints. `false` means the
    /// budget ran out and `state` is the last attempt.
    pub satisfied: bool,
}

/// Open seats of one (side, row), column ascending.
#[derive(Debug, Clone)]
struct Bucket {
    open: Vec<SeatSlot>,
}

/// Group the empty seats of `base` by (side, row). Buckets with no open
/// seat are dropped.
fn open_buckets(layout: &Layout, base: &SeatState) -> Vec<Bucket> {
    let mut buckets = Vec::new();
    for row in 0..layout.row_count() {
        for side in Side::ALL {
            let open: Vec<SeatSlot> = base
                .row_seats(side, row)
                .filter(|s| s.occupancy.is_empty())
                .map(|s| s.slot)
                .collect();
            if !open.is_empty() {
                buckets.push(Bucket { open });
            }
        }
    }
    buckets
}

/// Place a bucket's people into its row. A lone person takes the middle open
/// seat; two or more fill open seats from the first column onward.
fn arrange_in_row(bucket: &Bucket, people: Vec<String>) -> Vec<(SeatSlot, String)> {
    match people.len() {
        0 => Vec::new(),
        1 => {
            let middle = bucket.open[bucket.open.len() / 2];
            people.into_iter().map(|name| (middle, name)).collect()
        }
        _ => bucket.open.iter().copied().zip(people).collect(),
    }
}

/// One shuffled distribution of the roster over the buckets.
fn random_attempt(
    base: &SeatState,
    buckets: &[Bucket],
    roster: &[String],
    rng: &mut impl Rng,
) -> SeatState {
    let mut shuffled = roster.to_vec();
    shuffled.shuffle(rng);

    let mut distribution: Vec<Vec<String>> = vec![Vec::new(); buckets.len()];
    for name in shuffled {
        let eligible: Vec<usize> = (0..buckets.len())
            .filter(|&i| distribution[i].len() < buckets[i].open.len())
            .collect();
        if eligible.is_empty() {
            // Out of seats; only reachable when the caller skipped the capacity check.
            break;
        }
        let pick = eligible[rng.gen_range(0..eligible.len())];
        distribution[pick].push(name);
    }

    let placements = buckets
        .iter()
        .zip(distribution)
        .flat_map(|(bucket, people)| arrange_in_row(bucket, people));
    base.with_occupants(placements)
}

/// Randomly seat `roster`, retrying until the arrangement is valid.
///
/// Runs at most `max_attempts` attempts (a budget of 0 still runs one). The
/// first valid attempt wins; otherwise the last attempt is returned with
/// `satisfied == false`.
pub fn assign_seats_randomly(
    layout: &Layout,
    state: &SeatState,
    roster: &[String],
    max_attempts: u32,
    rng: &mut impl Rng,
) -> RandomFill {
    let max_attempts = max_attempts.max(1);
    let base = state.cleared();
    let buckets = open_buckets(layout, &base);
    log::debug!(
        "Random fill: {} people over {} row buckets ({} open seats)",
        roster.len(),
        buckets.len(),
        buckets.iter().map(|b| b.open.len()).sum::<usize>()
    );

    let mut last = base.clone();
    for attempt in 1..=max_attempts {
        let candidate = random_attempt(&base, &buckets, roster, rng);
        if constraints::is_valid(layout, &candidate) {
            log::debug!("Random fill satisfied constraints on attempt {}", attempt);
            return RandomFill {
                state: candidate,
                attempts: attempt,
                satisfied: true,
            };
        }
        last = candidate;
    }

    let report = constraints::evaluate(layout, &last);
    log::warn!(
        "Random fill gave up after {} attempts; returning last arrangement ({} lonely rows, {} disconnected sides)",
        max_attempts,
        report.lonely_rows.len(),
        report.disconnected_sides.len()
    );
    RandomFill {
        state: last,
        attempts: max_attempts,
        satisfied: false,
    }
}

/// Outcome of a successful [`assign`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub state: SeatState,
    pub mode: AssignMode,
    pub attempts: u32,
    /// Whether the arrangement passes the placement constraints. Front fill
    /// never aims for this; it is reported for information only.
    pub satisfied: bool,
}

/// Seat the whole roster with the chosen strategy.
///
/// Fails with [`SeatingError::InsufficientCapacity`] when fewer seats are
/// open than there are people; `state` is not consumed and stays valid.
/// Front fill shuffles the roster once before filling.
pub fn assign(
    layout: &Layout,
    state: &SeatState,
    roster: &Roster,
    mode: AssignMode,
    max_attempts: u32,
    rng: &mut impl Rng,
) -> Result<Assignment> {
    let available = state.available_count();
    if available < roster.len() {
        log::warn!(
            "Refusing to assign: {} seats available for {} people",
            available,
            roster.len()
        );
        return Err(SeatingError::InsufficientCapacity {
            available,
            required: roster.len(),
        });
    }

    log::info!(
        "Assigning {} people to {} available seats ({} mode)",
        roster.len(),
        available,
        mode
    );

    let assignment = match mode {
        AssignMode::Front => {
            let mut order = roster.names().to_vec();
            order.shuffle(rng);
            let state = fill_from_front_by_row(layout, state, &order);
            let satisfied = constraints::is_valid(layout, &state);
            Assignment {
                state,
                mode,
                attempts: 1,
                satisfied,
            }
        }
        AssignMode::Random => {
            let fill = assign_seats_randomly(layout, state, roster, max_attempts, rng);
            Assignment {
                state: fill.state,
                mode,
                attempts: fill.attempts,
                satisfied: fill.satisfied,
            }
        }
    };
    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("P{i:02}")).collect()
    }

    #[test]
    fn test_mode_parse_and_display() {
        assert_eq!("front".parse::<AssignMode>().unwrap(), AssignMode::Front);
        assert_eq!(" Random ".parse::<AssignMode>().unwrap(), AssignMode::Random);
        assert_eq!(
            "sideways".parse::<AssignMode>(),
            Err(SeatingError::UnknownMode("sideways".into()))
        );
        assert_eq!(AssignMode::Random.to_string(), "random");
        assert_eq!(AssignMode::default(), AssignMode::Front);
    }

    #[test]
    fn test_front_fill_order() {
        let layout = Layout::reference();
        let state = SeatState::initialize(&layout);
        let roster = names(8);
        let filled = fill_from_front_by_row(&layout, &state, &roster);

        let expected = [
            (Side::Left, 0, 0),
            (Side::Left, 0, 1),
            (Side::Left, 0, 2),
            (Side::Right, 0, 0),
            (Side::Right, 0, 1),
            (Side::Right, 0, 2),
            (Side::Left, 1, 0),
            (Side::Left, 1, 1),
        ];
        for (name, &(side, row, col)) in roster.iter().zip(expected.iter()) {
            assert_eq!(filled.seat_of(name), Some(SeatSlot::new(side, row, col)));
        }
        assert_eq!(filled.count_by_status().occupied, 8);
    }

    #[test]
    fn test_front_fill_skips_closed() {
        let layout = Layout::reference();
        let closed = SeatSlot::new(Side::Left, 0, 1);
        let state = SeatState::initialize(&layout).toggle_close(closed, 22).0;
        let filled = fill_from_front_by_row(&layout, &state, &names(3));

        assert_eq!(filled.occupancy(closed), Some(&Occupancy::Closed));
        assert_eq!(filled.seat_of("P00"), Some(SeatSlot::new(Side::Left, 0, 0)));
        assert_eq!(filled.seat_of("P01"), Some(SeatSlot::new(Side::Left, 0, 2)));
        assert_eq!(filled.seat_of("P02"), Some(SeatSlot::new(Side::Right, 0, 0)));
    }

    #[test]
    fn test_front_fill_replaces_previous_occupants() {
        let layout = Layout::reference();
        let state = SeatState::initialize(&layout);
        let first = fill_from_front_by_row(&layout, &state, &names(10));
        let second = fill_from_front_by_row(&layout, &first, &names(2));
        assert_eq!(second.count_by_status().occupied, 2);
    }

    #[test]
    fn test_arrange_single_takes_middle() {
        let bucket = Bucket {
            open: vec![
                SeatSlot::new(Side::Left, 0, 0),
                SeatSlot::new(Side::Left, 0, 1),
                SeatSlot::new(Side::Left, 0, 2),
            ],
        };
        let placed = arrange_in_row(&bucket, vec!["Ada".into()]);
        assert_eq!(placed, vec![(SeatSlot::new(Side::Left, 0, 1), "Ada".to_string())]);
    }

    #[test]
    fn test_arrange_single_in_two_seat_row() {
        let bucket = Bucket {
            open: vec![SeatSlot::new(Side::Right, 4, 1), SeatSlot::new(Side::Right, 4, 2)],
        };
        let placed = arrange_in_row(&bucket, vec!["Ada".into()]);
        assert_eq!(placed[0].0, SeatSlot::new(Side::Right, 4, 2));
    }

    #[test]
    fn test_arrange_group_packs_from_first() {
        let bucket = Bucket {
            open: vec![SeatSlot::new(Side::Left, 2, 0), SeatSlot::new(Side::Left, 2, 2)],
        };
        let placed = arrange_in_row(&bucket, vec!["Ada".into(), "Grace".into()]);
        assert_eq!(placed[0].0.col, 0);
        assert_eq!(placed[1].0.col, 2);
    }

    #[test]
    fn test_open_buckets_skip_closed() {
        let layout = Layout::reference();
        let mut state = SeatState::initialize(&layout);
        for col in 0..3 {
            state = state.toggle_close(SeatSlot::new(Side::Left, 0, col), 22).0;
        }
        let buckets = open_buckets(&layout, &state);
        assert_eq!(buckets.len(), 9);
        assert!(!buckets
            .iter()
            .flat_map(|b| &b.open)
            .any(|s| s.side == Side::Left && s.row == 0));
        assert_eq!(buckets.iter().map(|b| b.open.len()).sum::<usize>(), 25);
    }

    #[test]
    fn test_random_fill_places_everyone() {
        let layout = Layout::reference();
        let state = SeatState::initialize(&layout);
        let roster = names(22);
        let mut rng = StdRng::seed_from_u64(42);
        let fill = assign_seats_randomly(&layout, &state, &roster, 100, &mut rng);

        assert!(fill.attempts >= 1 && fill.attempts <= 100);
        for name in &roster {
            assert!(fill.state.seat_of(name).is_some(), "{name} not seated");
        }
        assert_eq!(fill.state.count_by_status().occupied, 22);
        assert_eq!(fill.satisfied, constraints::is_valid(&layout, &fill.state));
    }

    #[test]
    fn test_random_fill_zero_budget_runs_once() {
        let layout = Layout::reference();
        let state = SeatState::initialize(&layout);
        let mut rng = StdRng::seed_from_u64(1);
        let fill = assign_seats_randomly(&layout, &state, &names(22), 0, &mut rng);
        assert_eq!(fill.attempts, 1);
        assert_eq!(fill.state.count_by_status().occupied, 22);
    }

    #[test]
    fn test_random_fill_unsatisfiable_falls_back() {
        // A lone person in a two-seat row is always a lonely occupant.
        let layout = Layout::new(vec![vec![true, true]], vec![]);
        let state = SeatState::initialize(&layout);
        let mut rng = StdRng::seed_from_u64(3);
        let fill = assign_seats_randomly(&layout, &state, &names(1), 5, &mut rng);
        assert!(!fill.satisfied);
        assert_eq!(fill.attempts, 5);
        assert_eq!(fill.state.seat_of("P00"), Some(SeatSlot::new(Side::Left, 0, 1)));
    }

    #[test]
    fn test_random_fill_is_seed_deterministic() {
        let layout = Layout::reference();
        let state = SeatState::initialize(&layout);
        let roster = names(22);
        let a = assign_seats_randomly(&layout, &state, &roster, 100, &mut StdRng::seed_from_u64(9));
        let b = assign_seats_randomly(&layout, &state, &roster, 100, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_assign_rejects_insufficient_capacity() {
        let layout = Layout::reference();
        let roster = Roster::new(names(27)).unwrap();
        let state = SeatState::initialize(&layout)
            .toggle_close(SeatSlot::new(Side::Left, 0, 0), 0)
            .0
            .toggle_close(SeatSlot::new(Side::Left, 0, 1), 0)
            .0;
        assert_eq!(state.available_count(), 26);

        let mut rng = StdRng::seed_from_u64(0);
        let err = assign(&layout, &state, &roster, AssignMode::Random, 100, &mut rng).unwrap_err();
        assert_eq!(
            err,
            SeatingError::InsufficientCapacity {
                available: 26,
                required: 27
            }
        );
    }

    #[test]
    fn test_assign_front_seats_shuffled_roster() {
        let layout = Layout::reference();
        let roster = Roster::reference();
        let state = SeatState::initialize(&layout);
        let mut rng = StdRng::seed_from_u64(11);
        let result = assign(&layout, &state, &roster, AssignMode::Front, 100, &mut rng).unwrap();

        assert_eq!(result.mode, AssignMode::Front);
        assert_eq!(result.attempts, 1);
        let mut seated: Vec<&str> = result.state.occupants().collect();
        seated.sort();
        let mut expected: Vec<&str> = roster.iter().map(String::as_str).collect();
        expected.sort();
        assert_eq!(seated, expected);
    }
}
