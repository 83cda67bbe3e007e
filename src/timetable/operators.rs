//! Timetable crossover and mutation.
//!
//! # Crossover
//!
//! [`day_crossover`]: day-granular uniform crossover. Each of the five days
//! is copied verbatim from one parent chosen by a fair coin.
//!
//! # Mutation
//!
//! [`mutate_days`]: each day independently mutates with a fixed probability
//! by picking two periods and applying [`mutate_day`]. Lab blocks move as a
//! unit and theory periods swap. Occupancy is only ever relocated, never
//! created or destroyed.

use super::catalog::CourseSet;
use super::grid::{DaySlots, ScheduleGrid, DAYS_PER_WEEK, PERIODS_PER_DAY};
use rand::Rng;

/// Default per-day mutation probability.
pub const DEFAULT_DAY_MUTATION_RATE: f64 = 0.1;

/// Effect of one [`mutate_day`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// A lab block moved to a new start.
    Relocated,
    /// Two theory periods swapped.
    Swapped,
    /// Nothing changed.
    Unchanged,
}

/// Builds one child by copying each day from a coin-chosen parent.
pub fn day_crossover<R: Rng>(a: &ScheduleGrid, b: &ScheduleGrid, rng: &mut R) -> ScheduleGrid {
    let mut child = ScheduleGrid::new();
    for day in 0..DAYS_PER_WEEK {
        let source = if rng.random_bool(0.5) { a } else { b };
        *child.day_mut(day) = *source.day(day);
    }
    child
}

/// Mutates each day with probability `day_rate`.
pub fn mutate_days<R: Rng>(
    grid: &mut ScheduleGrid,
    catalog: &CourseSet,
    day_rate: f64,
    rng: &mut R,
) {
    let rate = day_rate.clamp(0.0, 1.0);
    for day in 0..DAYS_PER_WEEK {
        if rng.random_bool(rate) {
            let i = rng.random_range(0..PERIODS_PER_DAY);
            let j = rng.random_range(0..PERIODS_PER_DAY);
            mutate_day(grid, catalog, day, i, j);
        }
    }
}

/// Applies one deterministic mutation step to periods `i` and `j` of `day`.
///
/// 1. If `i` holds a lab, try to move its block to start at `j`.
/// 2. Otherwise (or if that failed), if `j` holds a lab, try to move its
///    block to start at `i`.
/// 3. If either slot is empty, do nothing.
/// 4. If both hold theory subjects, swap them.
///
/// A lab slot whose relocation was rejected is left alone.
///
/// # Panics
/// Panics if `day`, `i`, or `j` is out of range.
pub fn mutate_day(
    grid: &mut ScheduleGrid,
    catalog: &CourseSet,
    day: usize,
    i: usize,
    j: usize,
) -> MutationOutcome {
    let slots = grid.day_mut(day);
    let (si, sj) = (slots[i], slots[j]);

    if si.is_some_and(|s| catalog.is_lab(s)) && relocate_block(slots, i, j) {
        return MutationOutcome::Relocated;
    }
    if sj.is_some_and(|s| catalog.is_lab(s)) && relocate_block(slots, j, i) {
        return MutationOutcome::Relocated;
    }

    match (si, sj) {
        (Some(a), Some(b)) if !catalog.is_lab(a) && !catalog.is_lab(b) => {
            slots.swap(i, j);
            MutationOutcome::Swapped
        }
        _ => MutationOutcome::Unchanged,
    }
}

/// Moves the maximal same-subject run containing `from` so that it starts
/// at `to`. Rejected when the destination overruns the day or touches any
/// occupied slot, including the run's own.
fn relocate_block(slots: &mut DaySlots, from: usize, to: usize) -> bool {
    let subject = slots[from];
    if subject.is_none() {
        return false;
    }

    let mut start = from;
    while start > 0 && slots[start - 1] == subject {
        start -= 1;
    }
    let mut end = from + 1;
    while end < PERIODS_PER_DAY && slots[end] == subject {
        end += 1;
    }
    let len = end - start;

    if to + len > PERIODS_PER_DAY {
        return false;
    }
    if slots[to..to + len].iter().any(Option::is_some) {
        return false;
    }

    slots[start..end].fill(None);
    slots[to..to + len].fill(subject);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::timetable::catalog::{SubjectId, SubjectSpec};
    use crate::timetable::grid::SlotPos;

    // LAB (id 0, 3 periods), A (id 1), B (id 2)
    fn catalog() -> CourseSet {
        CourseSet::new(vec![
            SubjectSpec::lab("LAB", 3, "L"),
            SubjectSpec::theory("A", 20, "X"),
            SubjectSpec::theory("B", 17, "Y"),
        ])
        .unwrap()
    }

    const L: Option<SubjectId> = Some(SubjectId(0));
    const A: Option<SubjectId> = Some(SubjectId(1));
    const B: Option<SubjectId> = Some(SubjectId(2));
    const N: Option<SubjectId> = None;

    fn grid_with_monday(day: DaySlots) -> ScheduleGrid {
        let mut grid = ScheduleGrid::new();
        *grid.day_mut(0) = day;
        grid
    }

    #[test]
    fn test_swap_two_theory() {
        let c = catalog();
        let mut g = grid_with_monday([A, B, N, N, N, N, N, N]);
        assert_eq!(mutate_day(&mut g, &c, 0, 0, 1), MutationOutcome::Swapped);
        assert_eq!(g.day(0), &[B, A, N, N, N, N, N, N]);
    }

    #[test]
    fn test_theory_with_empty_is_noop() {
        let c = catalog();
        let mut g = grid_with_monday([A, N, N, N, N, N, N, N]);
        assert_eq!(mutate_day(&mut g, &c, 0, 0, 1), MutationOutcome::Unchanged);
        assert_eq!(g.day(0), &[A, N, N, N, N, N, N, N]);
    }

    #[test]
    fn test_relocate_lab_forward() {
        let c = catalog();
        let mut g = grid_with_monday([L, L, L, N, N, N, N, N]);
        assert_eq!(mutate_day(&mut g, &c, 0, 1, 4), MutationOutcome::Relocated);
        assert_eq!(g.day(0), &[N, N, N, N, L, L, L, N]);
    }

    #[test]
    fn test_relocate_lab_toward_i() {
        let c = catalog();
        let mut g = grid_with_monday([N, N, N, N, N, L, L, L]);
        assert_eq!(mutate_day(&mut g, &c, 0, 0, 6), MutationOutcome::Relocated);
        assert_eq!(g.day(0), &[L, L, L, N, N, N, N, N]);
    }

    #[test]
    fn test_relocate_rejected_out_of_bounds() {
        let c = catalog();
        let mut g = grid_with_monday([L, L, L, N, N, N, N, N]);
        assert_eq!(mutate_day(&mut g, &c, 0, 0, 6), MutationOutcome::Unchanged);
        assert_eq!(g.day(0), &[L, L, L, N, N, N, N, N]);
    }

    #[test]
    fn test_relocate_rejected_overlapping_itself() {
        let c = catalog();
        let mut g = grid_with_monday([L, L, L, N, N, N, N, N]);
        assert_eq!(mutate_day(&mut g, &c, 0, 0, 1), MutationOutcome::Unchanged);
        assert_eq!(g.day(0), &[L, L, L, N, N, N, N, N]);
    }

    #[test]
    fn test_relocate_rejected_occupied_then_lab_left_alone() {
        let c = catalog();
        let mut g = grid_with_monday([L, L, L, A, B, A, B, A]);
        assert_eq!(mutate_day(&mut g, &c, 0, 2, 4), MutationOutcome::Unchanged);
        assert_eq!(g.day(0), &[L, L, L, A, B, A, B, A]);
    }

    #[test]
    fn test_fragmented_lab_moves_its_run_only() {
        let c = catalog();
        let mut g = grid_with_monday([L, L, N, N, N, N, N, L]);
        assert_eq!(mutate_day(&mut g, &c, 0, 1, 3), MutationOutcome::Relocated);
        assert_eq!(g.day(0), &[N, N, N, L, L, N, N, L]);
    }

    #[test]
    fn test_crossover_days_come_from_a_parent() {
        let mut a = ScheduleGrid::new();
        let mut b = ScheduleGrid::new();
        for d in 0..DAYS_PER_WEEK {
            a.set(SlotPos::new(d, 0), A);
            b.set(SlotPos::new(d, 1), B);
        }
        let mut rng = create_rng(42);
        let mut seen_a = false;
        let mut seen_b = false;
        for _ in 0..20 {
            let child = day_crossover(&a, &b, &mut rng);
            for d in 0..DAYS_PER_WEEK {
                let from_a = child.day(d) == a.day(d);
                let from_b = child.day(d) == b.day(d);
                assert!(from_a ^ from_b);
                seen_a |= from_a;
                seen_b |= from_b;
            }
        }
        assert!(seen_a && seen_b);
    }

    #[test]
    fn test_mutate_days_rate_bounds() {
        let c = catalog();
        let original = grid_with_monday([A, B, A, B, A, B, A, B]);
        let mut g = original.clone();
        mutate_days(&mut g, &c, 0.0, &mut create_rng(1));
        assert_eq!(g, original);

        // rate 1.0 with a theory-only Monday: counts must be preserved
        let mut rng = create_rng(2);
        for _ in 0..100 {
            mutate_days(&mut g, &c, 1.0, &mut rng);
        }
        assert_eq!(g.occupancy(c.len()), original.occupancy(c.len()));
    }
}
