//! SeatPlan Headless Seating Harness
//!
//! Validates the seat assignment engine against a classroom config and
//! prints a text seat chart. Runs entirely in-process: no UI, no storage.
//!
//! Usage:
//!   cargo run -p seatplan-simtest
//!   cargo run -p seatplan-simtest -- --verbose --mode random --seed 7
//!   cargo run -p seatplan-simtest -- --close left:0:0 --close right:2:1 --json

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seatplan_logic::assign::{self, AssignMode};
use seatplan_logic::config::{validate_config, ClassroomConfig};
use seatplan_logic::constraints;
use seatplan_logic::layout::{Layout, SeatSlot, Side};
use seatplan_logic::roster::Roster;
use seatplan_logic::seats::{IgnoreReason, Occupancy, SeatState, ToggleOutcome};
use seatplan_logic::session::SeatingSession;

// ── Classroom config (same JSON a front end would ship) ─────────────────
const CLASSROOM_JSON: &str = include_str!("../../../data/classroom.json");

#[derive(Debug, Parser)]
#[command(
    name = "seatplan-simtest",
    about = "Validate the seating engine and print a seat chart"
)]
struct Args {
    /// Print every check, not only failures
    #[arg(long)]
    verbose: bool,

    /// Classroom JSON to load instead of the bundled one
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Strategy for the printed chart: front or random
    #[arg(long, default_value = "front")]
    mode: AssignMode,

    /// Seed for reproducible shuffles
    #[arg(long)]
    seed: Option<u64>,

    /// Close a seat before assigning (repeatable)
    #[arg(long = "close", value_name = "SIDE:ROW:COL", value_parser = parse_slot)]
    close: Vec<SeatSlot>,

    /// Print the final seat state as JSON
    #[arg(long)]
    json: bool,

    /// Random fills per statistical check
    #[arg(long, default_value_t = 200)]
    trials: u32,
}

fn parse_slot(s: &str) -> Result<SeatSlot, String> {
    let parts: Vec<&str> = s.split(':').collect();
    let [side, row, col] = parts.as_slice() else {
        return Err(format!("expected SIDE:ROW:COL, got '{s}'"));
    };
    let side = Side::parse(side).ok_or_else(|| format!("unknown side '{side}'"))?;
    let row: usize = row
        .parse()
        .map_err(|_| format!("row '{row}' is not a number"))?;
    let col: usize = col
        .parse()
        .map_err(|_| format!("column '{col}' is not a number"))?;
    Ok(SeatSlot::new(side, row, col))
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(args.config.as_ref())?;
    log::info!(
        "Loaded '{}': {} seats, {} people",
        display_title(&config),
        config.layout.capacity(),
        config.roster.len()
    );
    let errors = validate_config(&config);
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("config error: {e}");
        }
        bail!("{} config errors", errors.len());
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    println!("=== SeatPlan Seating Harness ===");
    println!("{} | seed {}\n", display_title(&config), seed);

    let mut results = Vec::new();

    // 1. Layout geometry
    results.extend(validate_layout(&config, args.verbose));

    // 2. Close/reopen toggles
    results.extend(validate_toggles(&config));

    // 3. Front fill
    results.extend(validate_front_fill(&config, &mut rng));

    // 4. Random fill
    results.extend(validate_random_fill(&config, args.trials, &mut rng, args.verbose));

    // 5. Constraint predicates on fixed arrangements
    results.extend(validate_constraints());

    // 6. Reference classroom scenarios
    results.extend(validate_reference_scenarios(&mut rng));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed,
        results.len(),
        failed
    );

    // ── Chart ──
    let mut session = SeatingSession::from_config(&config)?;
    for &slot in &args.close {
        match session.toggle_close(slot.side, slot.row, slot.col) {
            ToggleOutcome::Closed => {}
            ToggleOutcome::Opened => println!("note: {slot} reopened"),
            ToggleOutcome::Ignored(reason) => println!("note: close {slot} ignored ({reason:?})"),
        }
    }

    println!();
    match session.assign(args.mode, &mut rng) {
        Ok(assignment) => {
            print!("{}", render_chart(session.layout(), session.state()));
            let s = session.summary();
            println!(
                "\nclosed: {} | available: {} | people: {} | closable up to {}",
                s.closed, s.available, s.roster_size, s.max_closable
            );
            if args.mode == AssignMode::Random && !assignment.satisfied {
                let report = session.constraint_report();
                println!(
                    "warning: no valid arrangement in {} attempts (lonely rows {:?}, disconnected {:?})",
                    assignment.attempts, report.lonely_rows, report.disconnected_sides
                );
            }
        }
        Err(e) => println!("cannot assign: {e}"),
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(session.state())?);
    }

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ClassroomConfig> {
    let json = match path {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("reading classroom config {}", p.display()))?,
        None => CLASSROOM_JSON.to_string(),
    };
    ClassroomConfig::from_json(&json).context("parsing classroom config")
}

fn display_title(config: &ClassroomConfig) -> &str {
    if config.title.is_empty() {
        "Untitled classroom"
    } else {
        &config.title
    }
}

// ── Chart rendering ─────────────────────────────────────────────────────

const CELL: usize = 9;

fn cell(layout: &Layout, state: &SeatState, slot: SeatSlot) -> String {
    if !layout.contains(slot) {
        return " ".repeat(CELL);
    }
    let text = match state.occupancy(slot) {
        Some(Occupancy::Occupied(name)) => name.chars().take(CELL - 2).collect::<String>(),
        Some(Occupancy::Closed) => "X".to_string(),
        Some(Occupancy::Empty) | None => "·".to_string(),
    };
    format!("[{:^width$}]", text, width = CELL - 2)
}

/// Render both sides front to back with the board on top.
fn render_chart(layout: &Layout, state: &SeatState) -> String {
    let cols = |side: Side| layout.rows(side).iter().map(Vec::len).max().unwrap_or(0);
    let (left_cols, right_cols) = (cols(Side::Left), cols(Side::Right));
    let width = (left_cols + right_cols) * CELL + 4;

    let mut out = String::new();
    out.push_str(&format!("{:^width$}\n\n", "[ BOARD ]", width = width));
    for row in 0..layout.row_count() {
        for col in 0..left_cols {
            out.push_str(&cell(layout, state, SeatSlot::new(Side::Left, row, col)));
        }
        out.push_str("    ");
        for col in 0..right_cols {
            out.push_str(&cell(layout, state, SeatSlot::new(Side::Right, row, col)));
        }
        out.push('\n');
    }
    out
}

// ── 1. Layout ───────────────────────────────────────────────────────────

fn validate_layout(config: &ClassroomConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Layout ---");
    let mut results = Vec::new();
    let layout = &config.layout;
    let state = SeatState::initialize(layout);

    results.push(TestResult {
        name: "layout_one_seat_per_slot".into(),
        passed: state.capacity() == layout.capacity(),
        detail: format!("{} seats for capacity {}", state.capacity(), layout.capacity()),
    });

    let orphans = state
        .seats()
        .iter()
        .filter(|s| !layout.contains(s.slot))
        .count();
    results.push(TestResult {
        name: "layout_no_orphan_seats".into(),
        passed: orphans == 0,
        detail: format!("{} seats outside the layout", orphans),
    });

    let row_sum: usize = Side::ALL
        .iter()
        .flat_map(|&side| (0..layout.row_count()).map(move |row| (side, row)))
        .map(|(side, row)| layout.row_capacity(side, row))
        .sum();
    results.push(TestResult {
        name: "layout_row_capacity_sum".into(),
        passed: row_sum == layout.capacity(),
        detail: format!("row capacities sum to {}", row_sum),
    });

    results.push(TestResult {
        name: "layout_initial_all_empty".into(),
        passed: state.count_by_status().empty == layout.capacity(),
        detail: format!("{:?}", state.count_by_status()),
    });

    if verbose {
        println!("  Row capacities (left | right):");
        for row in 0..layout.row_count() {
            println!(
                "    row {}: {} | {}",
                row,
                layout.row_capacity(Side::Left, row),
                layout.row_capacity(Side::Right, row)
            );
        }
    }

    results
}

// ── 2. Toggles ──────────────────────────────────────────────────────────

fn validate_toggles(config: &ClassroomConfig) -> Vec<TestResult> {
    println!("--- Close/Reopen Toggles ---");
    let mut results = Vec::new();
    let layout = &config.layout;
    let roster_size = config.roster.len();
    let empty = SeatState::initialize(layout);
    let limit = empty.max_closable(roster_size);

    // Try to close every seat in order; only `limit` should stick
    let mut state = empty.clone();
    let mut ignored = 0;
    for slot in layout.slots() {
        let (next, outcome) = state.toggle_close(slot, roster_size);
        if outcome == ToggleOutcome::Ignored(IgnoreReason::LimitReached) {
            ignored += 1;
        }
        state = next;
    }
    results.push(TestResult {
        name: "toggle_capacity_invariant".into(),
        passed: state.closed_count() == limit && ignored == layout.capacity() - limit,
        detail: format!(
            "closed {} of max {}, {} closes refused",
            state.closed_count(),
            limit,
            ignored
        ),
    });

    // Round trip on the first seat
    if let Some(first) = layout.slots().next() {
        let (closed, _) = empty.toggle_close(first, roster_size);
        let (reopened, _) = closed.toggle_close(first, roster_size);
        results.push(TestResult {
            name: "toggle_round_trip".into(),
            passed: reopened == empty || limit == 0,
            detail: format!("close then reopen {}", first),
        });
    }

    // Nonexistent slot is a no-op
    let bogus = SeatSlot::new(Side::Left, layout.row_count() + 3, 0);
    let (after, outcome) = empty.toggle_close(bogus, roster_size);
    results.push(TestResult {
        name: "toggle_unknown_slot_noop".into(),
        passed: after == empty && outcome == ToggleOutcome::Ignored(IgnoreReason::UnknownSlot),
        detail: format!("{} → {:?}", bogus, outcome),
    });

    results
}

// ── 3. Front fill ───────────────────────────────────────────────────────

fn validate_front_fill(config: &ClassroomConfig, rng: &mut StdRng) -> Vec<TestResult> {
    println!("--- Front Fill ---");
    let mut results = Vec::new();
    let layout = &config.layout;
    let roster = match Roster::new(config.roster.iter().cloned()) {
        Ok(r) => r,
        Err(e) => {
            results.push(TestResult {
                name: "front_roster".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };
    let state = SeatState::initialize(layout);

    let a = assign::fill_from_front_by_row(layout, &state, &roster);
    let b = assign::fill_from_front_by_row(layout, &state, &roster);
    results.push(TestResult {
        name: "front_deterministic".into(),
        passed: a == b,
        detail: "same state + order → same chart".into(),
    });

    let all_seated = roster.iter().all(|n| a.seat_of(n).is_some());
    results.push(TestResult {
        name: "front_places_everyone".into(),
        passed: all_seated && a.count_by_status().occupied == roster.len(),
        detail: format!("{} of {} seated", a.count_by_status().occupied, roster.len()),
    });

    // Closing the front-left seat shifts everyone but keeps the mark
    if let Some(first) = layout.slots().next() {
        let closed = state.toggle_close(first, roster.len()).0;
        match assign::assign(layout, &closed, &roster, AssignMode::Front, 1, rng) {
            Ok(result) => results.push(TestResult {
                name: "front_keeps_closed".into(),
                passed: result.state.occupancy(first) == Some(&Occupancy::Closed)
                    && result.state.closed_count() == closed.closed_count(),
                detail: format!("{} stays closed", first),
            }),
            Err(e) => results.push(TestResult {
                name: "front_keeps_closed".into(),
                passed: closed.closed_count() == 0,
                detail: format!("assign refused: {e}"),
            }),
        }
    }

    results
}

// ── 4. Random fill ──────────────────────────────────────────────────────

fn validate_random_fill(
    config: &ClassroomConfig,
    trials: u32,
    rng: &mut StdRng,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Random Fill ---");
    let mut results = Vec::new();
    let layout = &config.layout;
    let Ok(roster) = Roster::new(config.roster.iter().cloned()) else {
        return results;
    };
    let state = SeatState::initialize(layout);

    let mut incomplete = 0;
    let mut over_budget = 0;
    let mut satisfied = 0;
    let mut mismatched = 0;
    let mut total_attempts = 0u64;
    for _ in 0..trials {
        let fill =
            assign::assign_seats_randomly(layout, &state, &roster, config.max_attempts, rng);
        if roster.iter().any(|n| fill.state.seat_of(n).is_none()) {
            incomplete += 1;
        }
        if fill.attempts > config.max_attempts.max(1) {
            over_budget += 1;
        }
        if fill.satisfied {
            satisfied += 1;
        }
        if fill.satisfied != constraints::is_valid(layout, &fill.state) {
            mismatched += 1;
        }
        total_attempts += u64::from(fill.attempts);
    }

    results.push(TestResult {
        name: "random_places_everyone".into(),
        passed: incomplete == 0,
        detail: format!("{} of {} fills left someone out", incomplete, trials),
    });
    results.push(TestResult {
        name: "random_bounded_attempts".into(),
        passed: over_budget == 0,
        detail: format!("budget {} never exceeded", config.max_attempts),
    });
    results.push(TestResult {
        name: "random_satisfied_flag".into(),
        passed: mismatched == 0,
        detail: format!("{} fills satisfied constraints", satisfied),
    });

    if verbose && trials > 0 {
        println!(
            "  {} trials: {:.1}% valid, {:.1} attempts on average",
            trials,
            100.0 * satisfied as f64 / trials as f64,
            total_attempts as f64 / trials as f64
        );
    }

    // Closed seats survive a random fill
    let closable: Vec<SeatSlot> = layout
        .slots()
        .take(state.max_closable(roster.len()).min(3))
        .collect();
    let mut closed = state.clone();
    for &slot in &closable {
        closed = closed.toggle_close(slot, roster.len()).0;
    }
    let fill = assign::assign_seats_randomly(layout, &closed, &roster, config.max_attempts, rng);
    results.push(TestResult {
        name: "random_keeps_closed".into(),
        passed: closable
            .iter()
            .all(|&s| fill.state.occupancy(s) == Some(&Occupancy::Closed)),
        detail: format!("{} closed seats preserved", closable.len()),
    });

    results
}

// ── 5. Constraints ──────────────────────────────────────────────────────

fn validate_constraints() -> Vec<TestResult> {
    println!("--- Constraints ---");
    let mut results = Vec::new();
    let layout = Layout::reference();
    let names = |n: usize| -> Vec<String> { (0..n).map(|i| format!("P{i}")).collect() };

    // Front fill of 4 leaves right row 0 with one person
    let four = assign::fill_from_front_by_row(&layout, &SeatState::initialize(&layout), &names(4));
    results.push(TestResult {
        name: "constraints_lonely_detected".into(),
        passed: constraints::lonely_rows(&layout, &four) == vec![(Side::Right, 0)],
        detail: format!("{:?}", constraints::lonely_rows(&layout, &four)),
    });

    // Closing row 1 on the left splits rows 0 and 2 apart
    let mut gap = SeatState::initialize(&layout);
    for col in 0..3 {
        gap = gap.toggle_close(SeatSlot::new(Side::Left, 1, col), 0).0;
    }
    let gapped = assign::fill_from_front_by_row(&layout, &gap, &names(11));
    results.push(TestResult {
        name: "constraints_gap_disconnected".into(),
        passed: constraints::disconnected_sides(&layout, &gapped) == vec![Side::Left],
        detail: format!("{:?}", constraints::evaluate(&layout, &gapped)),
    });

    results.push(TestResult {
        name: "constraints_weak_connectivity".into(),
        passed: constraints::side_connected(&[0, 1, 3]) && !constraints::side_connected(&[0, 2]),
        detail: "one adjacent pair suffices".into(),
    });

    results
}

// ── 6. Reference scenarios ──────────────────────────────────────────────

fn validate_reference_scenarios(rng: &mut StdRng) -> Vec<TestResult> {
    println!("--- Reference Classroom ---");
    let mut results = Vec::new();
    let layout = Layout::reference();
    let roster = Roster::reference();
    let empty = SeatState::initialize(&layout);

    // 22 people, front fill: rows 0-3 full, back row 2+2, 6 empty
    let filled = assign::fill_from_front_by_row(&layout, &empty, &roster);
    let mut expected = Vec::new();
    for row in 0..layout.row_count() {
        for side in Side::ALL {
            expected.extend(layout.row_slots(side, row));
        }
    }
    let in_order = roster
        .iter()
        .zip(&expected)
        .all(|(name, &slot)| filled.seat_of(name) == Some(slot));
    results.push(TestResult {
        name: "reference_front_fill_22".into(),
        passed: in_order && filled.count_by_status().empty == 6,
        detail: format!("{:?}", filled.count_by_status()),
    });

    // Close 6, then a 7th is refused
    let mut closed = empty.clone();
    for slot in layout.slots().take(6) {
        closed = closed.toggle_close(slot, roster.len()).0;
    }
    let seventh = SeatSlot::new(Side::Right, 3, 1);
    let (after, outcome) = closed.toggle_close(seventh, roster.len());
    results.push(TestResult {
        name: "reference_seventh_close_refused".into(),
        passed: after == closed && after.occupancy(seventh) == Some(&Occupancy::Empty),
        detail: format!("{:?}", outcome),
    });

    // Front-left row closed (3 seats), random fill finds a valid arrangement
    let mut three = empty.clone();
    for slot in layout.row_slots(Side::Left, 0) {
        three = three.toggle_close(slot, roster.len()).0;
    }
    match assign::assign(&layout, &three, &roster, AssignMode::Random, 100, rng) {
        Ok(result) => results.push(TestResult {
            name: "reference_random_three_closed".into(),
            passed: result.state.count_by_status().occupied == 22
                && result.satisfied
                && constraints::is_valid(&layout, &result.state),
            detail: format!("valid after {} attempts", result.attempts),
        }),
        Err(e) => results.push(TestResult {
            name: "reference_random_three_closed".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    results
}
