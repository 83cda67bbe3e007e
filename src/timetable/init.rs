//! Random construction of candidate grids.
//!
//! Labs are placed first, each as one contiguous block on a single day,
//! so they claim runs before theory periods fragment the week. Theory
//! periods then fill uniformly random free slots.

use super::catalog::{CourseSet, StaffId, SubjectId};
use super::grid::{ScheduleGrid, SlotPos, DAYS_PER_WEEK, PERIODS_PER_DAY};
use super::ledger::BusyMask;
use rand::Rng;
use tracing::warn;

/// Default number of placement attempts per lab.
pub const DEFAULT_LAB_RETRY_BUDGET: usize = 100;

/// What the initializer could not place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    /// Labs left unplaced after exhausting their retry budget.
    pub unplaced_labs: Vec<SubjectId>,
    /// Theory periods dropped because the grid was already full.
    pub dropped_theory_periods: usize,
}

impl InitReport {
    /// Whether every requirement was placed.
    pub fn is_complete(&self) -> bool {
        self.unplaced_labs.is_empty() && self.dropped_theory_periods == 0
    }
}

/// Builds one randomized grid.
///
/// Never fails and never loops unboundedly: a lab that cannot be placed
/// within `lab_retry_budget` attempts is skipped with a warning, and theory
/// periods that find no free slot (only possible when the catalog exceeds
/// the week) are dropped with a warning.
pub fn initialize<R: Rng>(
    catalog: &CourseSet,
    busy: &BusyMask,
    lab_retry_budget: usize,
    rng: &mut R,
) -> (ScheduleGrid, InitReport) {
    let mut grid = ScheduleGrid::new();
    let mut report = InitReport::default();

    for &lab in catalog.labs() {
        if !place_lab(&mut grid, catalog, busy, lab, lab_retry_budget, rng) {
            warn!(
                subject = %catalog.spec(lab).name,
                periods = catalog.required(lab),
                attempts = lab_retry_budget,
                "could not place lab block during initialization"
            );
            report.unplaced_labs.push(lab);
        }
    }

    for &subject in catalog.theory() {
        let required = catalog.required(subject);
        for placed in 0..required {
            let free: Vec<SlotPos> = grid.free_slots().collect();
            if free.is_empty() {
                let dropped = required - placed;
                warn!(
                    subject = %catalog.spec(subject).name,
                    dropped,
                    "no free slot left for theory periods"
                );
                report.dropped_theory_periods += dropped;
                break;
            }
            let pos = free[rng.random_range(0..free.len())];
            grid.set(pos, Some(subject));
        }
    }

    (grid, report)
}

/// Tries to place `lab` as one block. Returns whether it was placed.
fn place_lab<R: Rng>(
    grid: &mut ScheduleGrid,
    catalog: &CourseSet,
    busy: &BusyMask,
    lab: SubjectId,
    budget: usize,
    rng: &mut R,
) -> bool {
    let len = catalog.required(lab);
    if len == 0 || len > PERIODS_PER_DAY {
        return false;
    }
    let Some(staff) = catalog.staff_of(lab) else {
        return false;
    };

    for _ in 0..budget {
        let day = rng.random_range(0..DAYS_PER_WEEK);
        let start = rng.random_range(0..=PERIODS_PER_DAY - len);
        if can_place(grid, busy, staff, day, start, len) {
            grid.day_mut(day)[start..start + len].fill(Some(lab));
            return true;
        }
    }
    false
}

/// A block fits when every slot of the span is free and the staff is not
/// busy there in an already-accepted section. A free slot cannot be held by
/// another subject of the same staff, so the intra-section staff check is
/// covered by the occupancy check.
fn can_place(
    grid: &ScheduleGrid,
    busy: &BusyMask,
    staff: StaffId,
    day: usize,
    start: usize,
    len: usize,
) -> bool {
    (start..start + len).all(|period| {
        let pos = SlotPos::new(day, period);
        grid.is_free(pos) && !busy.is_busy(staff, pos)
    })
}
