//! Constraint-based fitness model.
//!
//! Fitness is a pure function of `(grid, catalog)`: higher is better,
//! unbounded in both directions, and meaningful only for ranking. Five
//! independent rules contribute additively:
//!
//! | Rule | Scope | Reward | Penalty |
//! |---|---|---|---|
//! | Lab total | per lab | `+1.0` exact count | `-0.5 × |diff|`, extra `-2.0` if absent |
//! | Lab contiguity | per lab | `+1.0` per day holding the block | `-1.0` once if no day does |
//! | Theory daily cap | per day × theory subject | `+0.5` if `≤ 2` | `-0.5 × (count − 2)` |
//! | Half-day placement | per lab block start | `+0.5` inside one half | `-0.5` straddling |
//! | Staff collision | per slot | – | `-1.0` per repeat of a staff with a different subject |
//!
//! Slots holding ids unknown to the catalog contribute nothing.

use super::catalog::{CourseSet, StaffId, SubjectId};
use super::grid::{DaySlots, ScheduleGrid, HALF_DAY, PERIODS_PER_DAY};

/// Maximum periods of one theory subject per day before penalties apply.
pub const MAX_THEORY_PER_DAY: usize = 2;

const LAB_EXACT_REWARD: f64 = 1.0;
const LAB_MISMATCH_PENALTY: f64 = 0.5;
const LAB_ABSENT_PENALTY: f64 = 2.0;
const BLOCK_DAY_REWARD: f64 = 1.0;
const NO_BLOCK_PENALTY: f64 = 1.0;
const THEORY_CAP_REWARD: f64 = 0.5;
const THEORY_EXCESS_PENALTY: f64 = 0.5;
const HALF_DAY_REWARD: f64 = 0.5;
const HALF_DAY_PENALTY: f64 = 0.5;
const STAFF_COLLISION_PENALTY: f64 = 1.0;

/// Per-rule contributions to a grid's fitness.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitnessBreakdown {
    /// Lab total-period correctness.
    pub lab_totals: f64,
    /// Lab contiguity per day.
    pub lab_contiguity: f64,
    /// Theory daily cap.
    pub theory_daily_cap: f64,
    /// Half-day lab placement.
    pub half_day_placement: f64,
    /// Intra-section staff collisions (never positive).
    pub staff_collisions: f64,
}

impl FitnessBreakdown {
    /// Sum of all rules, in a fixed order.
    pub fn total(&self) -> f64 {
        self.lab_totals
            + self.lab_contiguity
            + self.theory_daily_cap
            + self.half_day_placement
            + self.staff_collisions
    }
}

/// Scores a grid. Equivalent to `breakdown(grid, catalog).total()`.
pub fn evaluate(grid: &ScheduleGrid, catalog: &CourseSet) -> f64 {
    breakdown(grid, catalog).total()
}

/// Scores a grid rule by rule.
pub fn breakdown(grid: &ScheduleGrid, catalog: &CourseSet) -> FitnessBreakdown {
    let counts = grid.occupancy(catalog.len());
    let (lab_totals, lab_contiguity) = lab_rules(grid, catalog, &counts);
    FitnessBreakdown {
        lab_totals,
        lab_contiguity,
        theory_daily_cap: theory_daily_cap(grid, catalog),
        half_day_placement: half_day_placement(grid, catalog),
        staff_collisions: staff_collisions(grid, catalog),
    }
}

/// Rules 1 and 2: lab totals and contiguity.
fn lab_rules(grid: &ScheduleGrid, catalog: &CourseSet, counts: &[usize]) -> (f64, f64) {
    let mut totals = 0.0;
    let mut contiguity = 0.0;

    for &lab in catalog.labs() {
        let required = catalog.required(lab);
        let actual = counts.get(lab.index()).copied().unwrap_or(0);

        if actual == required {
            totals += LAB_EXACT_REWARD;
        } else {
            totals -= LAB_MISMATCH_PENALTY * required.abs_diff(actual) as f64;
        }
        if required > 0 && actual == 0 {
            totals -= LAB_ABSENT_PENALTY;
        }

        let mut any_block = false;
        for day in grid.days() {
            if has_block(day, lab, required) {
                any_block = true;
                if actual == required {
                    contiguity += BLOCK_DAY_REWARD;
                }
            }
        }
        if !any_block && actual > 0 {
            contiguity -= NO_BLOCK_PENALTY;
        }
    }

    (totals, contiguity)
}

/// Whether `day` holds `len` consecutive slots of `subject`.
pub fn has_block(day: &DaySlots, subject: SubjectId, len: usize) -> bool {
    if len == 0 || len > PERIODS_PER_DAY {
        return false;
    }
    day.windows(len)
        .any(|w| w.iter().all(|&s| s == Some(subject)))
}

/// Rule 3: theory daily cap.
fn theory_daily_cap(grid: &ScheduleGrid, catalog: &CourseSet) -> f64 {
    let mut score = 0.0;
    let mut per_day = vec![0usize; catalog.len()];

    for day in grid.days() {
        per_day.iter_mut().for_each(|c| *c = 0);
        for id in day.iter().flatten() {
            if let Some(c) = per_day.get_mut(id.index()) {
                *c += 1;
            }
        }
        for &subject in catalog.theory() {
            let count = per_day[subject.index()];
            if count == 0 {
                continue;
            }
            if count <= MAX_THEORY_PER_DAY {
                score += THEORY_CAP_REWARD;
            } else {
                score -= THEORY_EXCESS_PENALTY * (count - MAX_THEORY_PER_DAY) as f64;
            }
        }
    }
    score
}

/// Rule 4: every lab block start must fit its full span in one half-day.
fn half_day_placement(grid: &ScheduleGrid, catalog: &CourseSet) -> f64 {
    let mut score = 0.0;
    for day in grid.days() {
        for (start, slot) in day.iter().enumerate() {
            let Some(subject) = *slot else { continue };
            if !catalog.is_lab(subject) {
                continue;
            }
            if start > 0 && day[start - 1] == Some(subject) {
                continue;
            }
            let end = start + catalog.required(subject);
            let in_morning = end <= HALF_DAY;
            let in_afternoon = start >= HALF_DAY && end <= PERIODS_PER_DAY;
            if in_morning || in_afternoon {
                score += HALF_DAY_REWARD;
            } else {
                score -= HALF_DAY_PENALTY;
            }
        }
    }
    score
}

/// Rule 5: a staff member reappearing on the same day with a different subject.
fn staff_collisions(grid: &ScheduleGrid, catalog: &CourseSet) -> f64 {
    let mut score = 0.0;
    let mut seen: Vec<(StaffId, SubjectId)> = Vec::with_capacity(PERIODS_PER_DAY);

    for day in grid.days() {
        seen.clear();
        for &subject in day.iter().flatten() {
            let Some(staff) = catalog.staff_of(subject) else {
                continue;
            };
            if seen.iter().any(|&(t, s)| t == staff && s != subject) {
                score -= STAFF_COLLISION_PENALTY;
            }
            if !seen.contains(&(staff, subject)) {
                seen.push((staff, subject));
            }
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::catalog::SubjectSpec;
    use crate::timetable::grid::{SlotPos, DAYS_PER_WEEK};

    const EPS: f64 = 1e-12;

    fn id(i: u16) -> SubjectId {
        SubjectId(i)
    }

    /// LAB (3, staff L), MATH (20, staff M), PHYS (17, staff P)
    fn catalog() -> CourseSet {
        CourseSet::new(vec![
            SubjectSpec::lab("LAB1", 3, "L"),
            SubjectSpec::theory("MATH", 20, "M"),
            SubjectSpec::theory("PHYS", 17, "P"),
        ])
        .unwrap()
    }

    fn place(grid: &mut ScheduleGrid, day: usize, start: usize, len: usize, s: SubjectId) {
        for p in start..start + len {
            grid.set(SlotPos::new(day, p), Some(s));
        }
    }

    #[test]
    fn test_empty_grid() {
        let b = breakdown(&ScheduleGrid::new(), &catalog());
        // lab absent: -0.5*3 - 2.0; nothing else scores
        assert!((b.lab_totals - (-3.5)).abs() < EPS);
        assert_eq!(b.lab_contiguity, 0.0);
        assert_eq!(b.theory_daily_cap, 0.0);
        assert_eq!(b.half_day_placement, 0.0);
        assert_eq!(b.staff_collisions, 0.0);
    }

    #[test]
    fn test_perfect_lab_block_in_morning() {
        let mut grid = ScheduleGrid::new();
        place(&mut grid, 2, 1, 3, id(0));
        let b = breakdown(&grid, &catalog());
        assert_eq!(b.lab_totals, 1.0);
        assert_eq!(b.lab_contiguity, 1.0);
        assert_eq!(b.half_day_placement, 0.5);
    }

    #[test]
    fn test_lab_block_straddling_midpoint() {
        let mut grid = ScheduleGrid::new();
        place(&mut grid, 0, 2, 3, id(0));
        let b = breakdown(&grid, &catalog());
        assert_eq!(b.half_day_placement, -0.5);
        assert_eq!(b.lab_contiguity, 1.0);
    }

    #[test]
    fn test_lab_block_in_afternoon() {
        let mut grid = ScheduleGrid::new();
        place(&mut grid, 4, 5, 3, id(0));
        assert_eq!(breakdown(&grid, &catalog()).half_day_placement, 0.5);
    }

    #[test]
    fn test_fragmented_lab() {
        // 2 + 1 periods on different days: count correct, no block
        let mut grid = ScheduleGrid::new();
        place(&mut grid, 0, 0, 2, id(0));
        place(&mut grid, 1, 6, 1, id(0));
        let b = breakdown(&grid, &catalog());
        assert_eq!(b.lab_totals, 1.0);
        assert_eq!(b.lab_contiguity, -1.0);
        // two block starts: [0,3) fits morning, [6,9) overflows the day
        assert_eq!(b.half_day_placement, 0.0);
    }

    #[test]
    fn test_lab_too_many_periods() {
        // two full blocks on two days: actual 6, required 3
        let mut grid = ScheduleGrid::new();
        place(&mut grid, 0, 0, 3, id(0));
        place(&mut grid, 3, 4, 3, id(0));
        let b = breakdown(&grid, &catalog());
        assert!((b.lab_totals - (-1.5)).abs() < EPS);
        // blocks found but count wrong: no reward, no "missing block" penalty
        assert_eq!(b.lab_contiguity, 0.0);
    }

    #[test]
    fn test_theory_daily_cap() {
        let mut grid = ScheduleGrid::new();
        // Monday: MATH x2, PHYS x1 -> +0.5 +0.5
        place(&mut grid, 0, 0, 2, id(1));
        place(&mut grid, 0, 2, 1, id(2));
        // Tuesday: MATH x5 -> -1.5
        place(&mut grid, 1, 0, 5, id(1));
        let b = breakdown(&grid, &catalog());
        assert!((b.theory_daily_cap - (-0.5)).abs() < EPS);
    }

    #[test]
    fn test_staff_collision_exactly_one() {
        let shared = CourseSet::new(vec![
            SubjectSpec::theory("A", 20, "X"),
            SubjectSpec::theory("B", 20, "X"),
        ])
        .unwrap();
        let distinct = CourseSet::new(vec![
            SubjectSpec::theory("A", 20, "X"),
            SubjectSpec::theory("B", 20, "Y"),
        ])
        .unwrap();

        let mut grid = ScheduleGrid::new();
        grid.set(SlotPos::new(0, 0), Some(id(0)));
        grid.set(SlotPos::new(0, 1), Some(id(1)));

        let diff = evaluate(&grid, &distinct) - evaluate(&grid, &shared);
        assert!((diff - 1.0).abs() < EPS, "diff = {diff}");
        assert_eq!(breakdown(&grid, &shared).staff_collisions, -1.0);
    }

    #[test]
    fn test_staff_same_subject_repeat_is_free() {
        let shared = CourseSet::new(vec![
            SubjectSpec::theory("A", 20, "X"),
            SubjectSpec::theory("B", 20, "X"),
        ])
        .unwrap();
        let mut grid = ScheduleGrid::new();
        place(&mut grid, 0, 0, 2, id(0));
        assert_eq!(breakdown(&grid, &shared).staff_collisions, 0.0);

        // A A B A: B collides with A, the last A collides with B
        grid.set(SlotPos::new(0, 2), Some(id(1)));
        grid.set(SlotPos::new(0, 3), Some(id(0)));
        assert_eq!(breakdown(&grid, &shared).staff_collisions, -2.0);
    }

    #[test]
    fn test_unknown_ids_ignored() {
        let mut grid = ScheduleGrid::new();
        for d in 0..DAYS_PER_WEEK {
            grid.set(SlotPos::new(d, 0), Some(id(42)));
        }
        assert_eq!(
            breakdown(&grid, &catalog()),
            breakdown(&ScheduleGrid::new(), &catalog())
        );
    }

    #[test]
    fn test_total_matches_evaluate() {
        let mut grid = ScheduleGrid::new();
        place(&mut grid, 1, 4, 3, id(0));
        place(&mut grid, 0, 0, 4, id(1));
        place(&mut grid, 2, 0, 3, id(2));
        let c = catalog();
        assert_eq!(breakdown(&grid, &c).total(), evaluate(&grid, &c));
    }

    #[test]
    fn test_has_block_bounds() {
        let day: DaySlots = [Some(id(0)); PERIODS_PER_DAY];
        assert!(has_block(&day, id(0), PERIODS_PER_DAY));
        assert!(!has_block(&day, id(0), PERIODS_PER_DAY + 1));
        assert!(!has_block(&day, id(0), 0));
        assert!(!has_block(&day, id(1), 1));
    }
}
