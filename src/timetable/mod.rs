//! Weekly class timetabling on a 5 × 8 slot grid.
//!
//! Builds on the generic [`ga`](crate::ga) engine. A cohort's subjects form
//! a [`CourseSet`]; [`TimetableProblem`] turns it into a [`GaProblem`]
//! whose individuals are [`Timetable`]s; [`generate_all`] schedules every
//! cohort's sections in order through a shared [`StaffUsageLedger`].
//!
//! # Key Types
//!
//! - [`ScheduleGrid`]: fixed-shape week of optional subject ids
//! - [`CourseSet`]: index-backed subject table
//! - [`FitnessBreakdown`]: per-rule score
//! - [`StaffUsageLedger`]: cross-section staff commitments and busy slots
//!
//! # Soft constraints
//!
//! Labs form one contiguous block inside a half-day, theory subjects appear
//! at most twice a day, and no staff member teaches two different subjects
//! in the same section on the same day. See [`fitness`] for the exact
//! scoring.
//!
//! [`GaProblem`]: crate::ga::GaProblem

mod catalog;
pub mod fitness;
mod generator;
mod grid;
pub mod init;
mod ledger;
pub mod operators;
mod problem;
mod validation;

pub use catalog::{CatalogError, CourseSet, StaffId, SubjectId, SubjectKind, SubjectSpec, SubjectSummary};
pub use fitness::FitnessBreakdown;
pub use generator::{generate_all, generate_section, Cohort, Section, SectionSchedule};
pub use grid::{
    period_time_range, DaySlots, ScheduleGrid, SlotPos, DAYS_PER_WEEK, DAY_NAMES, HALF_DAY,
    PERIODS_PER_DAY, SLOTS_PER_WEEK,
};
pub use init::InitReport;
pub use ledger::{BusyMask, Commitment, StaffUsageLedger};
pub use operators::MutationOutcome;
pub use problem::{Timetable, TimetableProblem};
pub use validation::{
    check_feasibility, validate_cohort, AcademicYear, FeasibilityIssue, FeasibilityReport,
    ValidationError,
};
