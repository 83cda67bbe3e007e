//! Binds the timetable domain to the generic GA engine.

use super::catalog::CourseSet;
use super::fitness::{self, FitnessBreakdown};
use super::grid::{ScheduleGrid, DAY_NAMES, PERIODS_PER_DAY};
use super::init::{initialize, DEFAULT_LAB_RETRY_BUDGET};
use super::ledger::{BusyMask, StaffUsageLedger};
use super::operators::{day_crossover, mutate_days, DEFAULT_DAY_MUTATION_RATE};
use crate::ga::GaProblem;
use rand::Rng;
use std::fmt;
use std::sync::Arc;

/// Width of a rendered cell; longer short names are truncated.
const CELL_WIDTH: usize = 6;

/// One candidate weekly schedule.
///
/// Fitness is not stored; call [`fitness`](Self::fitness) when needed.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timetable {
    /// The slot assignments.
    pub grid: ScheduleGrid,
    /// Catalog the grid's subject ids refer to.
    pub catalog: Arc<CourseSet>,
}

impl Timetable {
    /// Wraps a grid.
    pub fn new(grid: ScheduleGrid, catalog: Arc<CourseSet>) -> Self {
        Self { grid, catalog }
    }

    /// Scalar fitness of this schedule.
    pub fn fitness(&self) -> f64 {
        fitness::evaluate(&self.grid, &self.catalog)
    }

    /// Per-rule fitness.
    pub fn breakdown(&self) -> FitnessBreakdown {
        fitness::breakdown(&self.grid, &self.catalog)
    }
}

impl PartialEq for Timetable {
    fn eq(&self, other: &Self) -> bool {
        self.grid == other.grid && *self.catalog == *other.catalog
    }
}

impl fmt::Display for Timetable {
    /// Renders one row per weekday with columns `P1`..`P8`. Cells show the
    /// subject's short name (at most six characters) or `FREE`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let day_width = DAY_NAMES.iter().map(|d| d.len()).max().unwrap_or(0);

        write!(f, "{:<day_width$}", "Day")?;
        for p in 1..=PERIODS_PER_DAY {
            write!(f, " | {:<CELL_WIDTH$}", format!("P{p}"))?;
        }
        writeln!(f)?;

        for (name, day) in DAY_NAMES.iter().zip(self.grid.days()) {
            write!(f, "{name:<day_width$}")?;
            for slot in day {
                let label: String = match slot {
                    Some(id) if id.index() < self.catalog.len() => self
                        .catalog
                        .spec(*id)
                        .display_name()
                        .chars()
                        .take(CELL_WIDTH)
                        .collect(),
                    Some(_) => "?".to_string(),
                    None => "FREE".to_string(),
                };
                write!(f, " | {label:<CELL_WIDTH$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// GA problem generating one section's timetable.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_timetable::ga::{GaConfig, GaRunner};
/// use u_timetable::timetable::{CourseSet, StaffUsageLedger, SubjectSpec, TimetableProblem};
///
/// let catalog = Arc::new(
///     CourseSet::new(vec![
///         SubjectSpec::theory("MATH", 20, "Dr. A"),
///         SubjectSpec::theory("PHYS", 17, "Dr. B"),
///         SubjectSpec::lab("LAB1", 3, "Dr. L"),
///     ])
///     .unwrap(),
/// );
/// let problem = TimetableProblem::new(catalog, &StaffUsageLedger::new());
/// let config = GaConfig::fast().with_max_generations(20).with_seed(1);
/// let result = GaRunner::run(&problem, &config);
/// assert_eq!(result.fitness_history.len(), 21);
/// ```
#[derive(Debug, Clone)]
pub struct TimetableProblem {
    catalog: Arc<CourseSet>,
    busy: BusyMask,
    day_mutation_rate: f64,
    lab_retry_budget: usize,
}

impl TimetableProblem {
    /// Creates a problem whose lab placement avoids the ledger's busy slots.
    pub fn new(catalog: Arc<CourseSet>, ledger: &StaffUsageLedger) -> Self {
        let busy = ledger.busy_mask(&catalog);
        Self {
            catalog,
            busy,
            day_mutation_rate: DEFAULT_DAY_MUTATION_RATE,
            lab_retry_budget: DEFAULT_LAB_RETRY_BUDGET,
        }
    }

    /// Sets the per-day mutation probability (clamped to `[0, 1]`).
    pub fn with_day_mutation_rate(mut self, rate: f64) -> Self {
        self.day_mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the number of placement attempts per lab.
    pub fn with_lab_retry_budget(mut self, budget: usize) -> Self {
        self.lab_retry_budget = budget;
        self
    }

    /// The catalog being scheduled.
    pub fn catalog(&self) -> &Arc<CourseSet> {
        &self.catalog
    }

    /// Per-day mutation probability.
    pub fn day_mutation_rate(&self) -> f64 {
        self.day_mutation_rate
    }

    /// Placement attempts per lab.
    pub fn lab_retry_budget(&self) -> usize {
        self.lab_retry_budget
    }
}

impl GaProblem for TimetableProblem {
    type Individual = Timetable;
    type Fitness = f64;

    fn create_individual<R: Rng>(&self, rng: &mut R) -> Timetable {
        let (grid, _report) = initialize(&self.catalog, &self.busy, self.lab_retry_budget, rng);
        Timetable::new(grid, Arc::clone(&self.catalog))
    }

    fn evaluate(&self, individual: &Timetable) -> f64 {
        fitness::evaluate(&individual.grid, &self.catalog)
    }

    fn crossover<R: Rng>(&self, parent1: &Timetable, parent2: &Timetable, rng: &mut R) -> Timetable {
        let grid = day_crossover(&parent1.grid, &parent2.grid, rng);
        Timetable::new(grid, Arc::clone(&self.catalog))
    }

    fn mutate<R: Rng>(&self, individual: &mut Timetable, rng: &mut R) {
        mutate_days(&mut individual.grid, &self.catalog, self.day_mutation_rate, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{GaConfig, GaRunner};
    use crate::random::create_rng;
    use crate::timetable::catalog::SubjectSpec;
    use crate::timetable::grid::{SlotPos, HALF_DAY};

    fn reference_catalog() -> Arc<CourseSet> {
        Arc::new(
            CourseSet::new(vec![
                SubjectSpec::theory("MATHEMATICS", 20, "M"),
                SubjectSpec::theory("PHYS", 17, "P"),
                SubjectSpec::lab("LAB1", 3, "L"),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_evaluate_matches_timetable_fitness() {
        let problem = TimetableProblem::new(reference_catalog(), &StaffUsageLedger::new());
        let mut rng = create_rng(3);
        let t = problem.create_individual(&mut rng);
        assert_eq!(problem.evaluate(&t), t.fitness());
        assert!((t.breakdown().total() - t.fitness()).abs() < 1e-12);
    }

    #[test]
    fn test_builders() {
        let problem = TimetableProblem::new(reference_catalog(), &StaffUsageLedger::new())
            .with_day_mutation_rate(3.0)
            .with_lab_retry_budget(7);
        assert_eq!(problem.day_mutation_rate(), 1.0);
        assert_eq!(problem.lab_retry_budget(), 7);
    }

    #[test]
    fn test_evolved_beats_random_and_places_lab() {
        let catalog = reference_catalog();
        let problem = TimetableProblem::new(Arc::clone(&catalog), &StaffUsageLedger::new());
        let config = GaConfig::default().with_max_generations(150).with_seed(42);
        let result = GaRunner::run(&problem, &config);

        let random = problem.create_individual(&mut create_rng(999));
        assert!(result.best_fitness >= random.fitness());

        let lab = catalog.id_of("LAB1").unwrap();
        let grid = &result.best.grid;
        assert_eq!(grid.count(lab), 3);
        let block_days: Vec<usize> = (0..5)
            .filter(|&d| fitness::has_block(grid.day(d), lab, 3))
            .collect();
        assert_eq!(block_days.len(), 1);
        let day = grid.day(block_days[0]);
        let start = day.iter().position(|&s| s == Some(lab)).unwrap();
        assert!(start + 3 <= HALF_DAY || start >= HALF_DAY);
    }

    #[test]
    fn test_display_truncates_and_marks_free() {
        let catalog = reference_catalog();
        let mut grid = ScheduleGrid::new();
        grid.set(SlotPos::new(0, 0), catalog.id_of("MATHEMATICS"));
        grid.set(SlotPos::new(0, 1), catalog.id_of("PHYS"));
        let text = Timetable::new(grid, catalog).to_string();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("Day"));
        assert!(lines[0].contains("P8"));
        assert!(lines[1].starts_with("Monday"));
        assert!(lines[1].contains("MATHEM"));
        assert!(!lines[1].contains("MATHEMATICS"));
        assert!(lines[1].contains("PHYS"));
        assert_eq!(lines[5].matches("FREE").count(), PERIODS_PER_DAY);
    }
}
