//! Section and multi-cohort orchestration.
//!
//! [`generate_section`] runs the GA once for one (cohort, section).
//! [`generate_all`] sequences every cohort's Section A then Section B,
//! feeding each accepted timetable into the [`StaffUsageLedger`] before the
//! next section starts. This is the only place the ledger is written.

use super::catalog::CourseSet;
use super::ledger::StaffUsageLedger;
use super::problem::{Timetable, TimetableProblem};
use super::validation::{check_feasibility, AcademicYear};
use crate::ga::{ConfigError, GaConfig, GaResult, GaRunner};
use std::fmt;
use std::sync::Arc;
use tracing::{info, info_span, warn};

/// A class section within a cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Section {
    /// First section.
    A,
    /// Second section.
    B,
}

impl Section {
    /// Sections in generation order.
    pub const ALL: [Section; 2] = [Section::A, Section::B];

    /// Display label, e.g. `"Section A"`.
    pub fn label(self) -> &'static str {
        match self {
            Section::A => "Section A",
            Section::B => "Section B",
        }
    }

    fn ordinal(self) -> u64 {
        match self {
            Section::A => 0,
            Section::B => 1,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One cohort's input.
#[derive(Debug, Clone)]
pub struct Cohort {
    /// Cohort label, e.g. `"2nd Year"`.
    pub year: String,
    /// Academic year, if known.
    pub academic_year: Option<AcademicYear>,
    /// The cohort's subjects.
    pub catalog: Arc<CourseSet>,
}

impl Cohort {
    /// Creates a cohort without an academic year.
    pub fn new(year: impl Into<String>, catalog: Arc<CourseSet>) -> Self {
        Self {
            year: year.into(),
            academic_year: None,
            catalog,
        }
    }

    /// Sets the academic year.
    pub fn with_academic_year(mut self, academic_year: AcademicYear) -> Self {
        self.academic_year = Some(academic_year);
        self
    }
}

/// An accepted section timetable.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionSchedule {
    /// Cohort label.
    pub year: String,
    /// Academic year of the cohort.
    pub academic_year: Option<AcademicYear>,
    /// Which section.
    pub section: Section,
    /// Best timetable found.
    pub timetable: Timetable,
    /// Its fitness.
    pub fitness: f64,
    /// Generations run.
    pub generations: usize,
    /// Best fitness per generation, initial population first.
    pub fitness_history: Vec<f64>,
}

/// Generates one section's timetable.
///
/// Reads `ledger` to keep labs off slots where their staff already teaches
/// another section. Does not write to it.
pub fn generate_section(
    catalog: Arc<CourseSet>,
    ledger: &StaffUsageLedger,
    config: &GaConfig,
) -> Result<GaResult<Timetable, f64>, ConfigError> {
    let problem = TimetableProblem::new(catalog, ledger);
    GaRunner::try_run(&problem, config)
}

/// Generates Section A then Section B for every cohort, in order.
///
/// After each section is accepted its staff commitments and busy slots are
/// recorded in `ledger`, so later sections see them. With a seeded config
/// each section gets its own seed derived from the base seed and its
/// position, making the whole run reproducible.
pub fn generate_all(
    cohorts: &[Cohort],
    ledger: &mut StaffUsageLedger,
    config: &GaConfig,
) -> Result<Vec<SectionSchedule>, ConfigError> {
    config.validate()?;

    let mut schedules = Vec::with_capacity(cohorts.len() * Section::ALL.len());
    for (index, cohort) in cohorts.iter().enumerate() {
        let report = check_feasibility(&cohort.catalog);
        for issue in &report.issues {
            warn!(year = %cohort.year, %issue, "cohort cannot reach a perfect score");
        }

        for section in Section::ALL {
            let span = info_span!("section", year = %cohort.year, section = section.label());
            let _guard = span.enter();

            let section_config = match config.seed {
                Some(seed) => config.clone().with_seed(section_seed(seed, index, section)),
                None => config.clone(),
            };
            let result = generate_section(Arc::clone(&cohort.catalog), ledger, &section_config)?;

            ledger.record_section(&cohort.year, &cohort.catalog, &result.best.grid);
            info!(
                fitness = result.best_fitness,
                generations = result.generations,
                "section accepted"
            );

            schedules.push(SectionSchedule {
                year: cohort.year.clone(),
                academic_year: cohort.academic_year,
                section,
                timetable: result.best,
                fitness: result.best_fitness,
                generations: result.generations,
                fitness_history: result.fitness_history,
            });
        }
    }
    Ok(schedules)
}

/// Mixes the base seed with a section's position (SplitMix64 finalizer).
fn section_seed(base: u64, cohort_index: usize, section: Section) -> u64 {
    let position = (cohort_index as u64) * Section::ALL.len() as u64 + section.ordinal();
    let mut z = base.wrapping_add(position.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
