//! Weekly class timetable generation.
//!
//! Assigns each subject of a cohort its weekly periods on a fixed
//! 5-day × 8-period grid, favouring schedules where:
//!
//! - each lab is one contiguous block on a single day, inside a half-day;
//! - no theory subject appears more than twice a day;
//! - no staff member teaches two different subjects of a section on the
//!   same day.
//!
//! The search is a best-effort genetic algorithm; a feasible schedule is
//! not guaranteed.
//!
//! # Modules
//!
//! - [`ga`]: generic GA engine (truncation selection, elitist merge,
//!   fixed generation count)
//! - [`timetable`]: grid, subject catalog, fitness model, operators,
//!   validation, and multi-cohort orchestration
//! - [`random`]: seedable RNG helpers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use u_timetable::ga::GaConfig;
//! use u_timetable::timetable::{generate_all, validate_cohort, Cohort, StaffUsageLedger, SubjectSpec};
//!
//! let catalog = validate_cohort(vec![
//!     SubjectSpec::theory("MATH", 20, "Dr. A"),
//!     SubjectSpec::theory("PHYS", 17, "Dr. B"),
//!     SubjectSpec::lab("LAB1", 3, "Dr. L"),
//! ])
//! .unwrap();
//!
//! let cohorts = vec![Cohort::new("2nd Year", Arc::new(catalog))];
//! let mut ledger = StaffUsageLedger::new();
//! let config = GaConfig::fast().with_max_generations(10).with_seed(1);
//! let schedules = generate_all(&cohorts, &mut ledger, &config).unwrap();
//!
//! assert_eq!(schedules.len(), 2);
//! println!("{}", schedules[0].timetable);
//! ```

pub mod ga;
pub mod random;
pub mod timetable;
