//! Cohort validation and feasibility pre-flight.
//!
//! Two layers:
//! - [`validate_cohort`]: hard structural checks, including the weekly total
//!   of 40. Collects every problem instead of stopping at the first.
//! - [`check_feasibility`]: soft findings about a catalog that is
//!   structurally fine but cannot score perfectly (labs that do not fit,
//!   theory subjects that must break the daily cap). The GA still runs on
//!   such catalogs.

use super::catalog::{structural_errors, CatalogError, CourseSet, SubjectSpec};
use super::fitness::MAX_THEORY_PER_DAY;
use super::grid::{DAYS_PER_WEEK, PERIODS_PER_DAY, SLOTS_PER_WEEK};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// All problems found in a cohort's subject list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid cohort: {}", join_errors(.errors))]
pub struct ValidationError {
    /// Every problem, in input order.
    pub errors: Vec<CatalogError>,
}

fn join_errors(errors: &[CatalogError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validates a cohort and builds its catalog.
///
/// Checks:
/// 1. At least one subject
/// 2. Non-empty, unique names
/// 3. Weekly periods in `1..=40`
/// 4. Non-empty staff
/// 5. Weekly periods summing to exactly 40
///
/// ```
/// use u_timetable::timetable::{validate_cohort, SubjectSpec};
///
/// let ok = validate_cohort(vec![
///     SubjectSpec::theory("MATH", 37, "Dr. A"),
///     SubjectSpec::lab("LAB1", 3, "Dr. L"),
/// ]);
/// assert!(ok.is_ok());
///
/// let short = validate_cohort(vec![SubjectSpec::theory("MATH", 30, "Dr. A")]);
/// assert!(short.is_err());
/// ```
pub fn validate_cohort(
    specs: impl IntoIterator<Item = SubjectSpec>,
) -> Result<CourseSet, ValidationError> {
    let specs: Vec<SubjectSpec> = specs.into_iter().collect();
    let mut errors = structural_errors(&specs);

    if !specs.is_empty() {
        let actual: u32 = specs.iter().map(|s| s.weekly_periods).sum();
        let expected = SLOTS_PER_WEEK as u32;
        if actual != expected {
            errors.push(CatalogError::TotalPeriods { expected, actual });
        }
    }

    if !errors.is_empty() {
        return Err(ValidationError { errors });
    }
    CourseSet::new(specs).map_err(|e| ValidationError { errors: vec![e] })
}

/// An academic year label such as `2021-2025`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcademicYear {
    /// First calendar year.
    pub start: u16,
    /// Last calendar year, strictly after `start`.
    pub end: u16,
}

impl AcademicYear {
    /// Parses `YYYY-YYYY`. Surrounding whitespace is ignored.
    ///
    /// Beyond the pattern, the end year must be strictly after the start
    /// year, so `2025-2021` and `2021-2021` are rejected.
    ///
    /// ```
    /// use u_timetable::timetable::AcademicYear;
    ///
    /// let y = AcademicYear::parse("2021-2025").unwrap();
    /// assert_eq!((y.start, y.end), (2021, 2025));
    /// assert!(AcademicYear::parse("21-25").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        let invalid = || CatalogError::InvalidAcademicYear(s.to_string());
        let (a, b) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = |part: &str| -> Option<u16> {
            if part.len() == 4 && part.bytes().all(|c| c.is_ascii_digit()) {
                part.parse().ok()
            } else {
                None
            }
        };
        let start = year(a).ok_or_else(invalid)?;
        let end = year(b).ok_or_else(invalid)?;
        if end <= start {
            return Err(invalid());
        }
        Ok(Self { start, end })
    }
}

impl FromStr for AcademicYear {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:04}", self.start, self.end)
    }
}

/// A reason a catalog cannot reach a perfect score.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeasibilityIssue {
    /// Weekly total is not 40; some slots stay free or some periods drop.
    TotalMismatch {
        /// Sum over all subjects.
        actual: u32,
    },
    /// A lab is longer than a day and can never be placed.
    LabTooLong {
        /// Lab name.
        name: String,
        /// Required periods.
        periods: u32,
    },
    /// The lab blocks cannot be packed into the week's days.
    LabsDoNotFit,
    /// A theory subject needs more periods than the daily cap allows.
    TheoryExceedsDailyCap {
        /// Subject name.
        name: String,
        /// Required periods.
        periods: u32,
    },
}

impl fmt::Display for FeasibilityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TotalMismatch { actual } => {
                write!(f, "total periods is {actual}, expected {SLOTS_PER_WEEK}")
            }
            Self::LabTooLong { name, periods } => write!(
                f,
                "lab '{name}' needs {periods} consecutive periods but a day has {PERIODS_PER_DAY}"
            ),
            Self::LabsDoNotFit => write!(f, "lab blocks cannot all fit into {DAYS_PER_WEEK} days"),
            Self::TheoryExceedsDailyCap { name, periods } => write!(
                f,
                "theory subject '{name}' has {periods} periods, more than {} per day",
                MAX_THEORY_PER_DAY
            ),
        }
    }
}

/// Result of [`check_feasibility`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeasibilityReport {
    /// Findings, in check order.
    pub issues: Vec<FeasibilityIssue>,
}

impl FeasibilityReport {
    /// Whether no issue was found.
    pub fn is_feasible(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Pre-flight check for conditions that make a perfect timetable impossible.
///
/// Never fails; the driver runs regardless of the outcome.
pub fn check_feasibility(catalog: &CourseSet) -> FeasibilityReport {
    let mut issues = Vec::new();

    let actual = catalog.total_periods();
    if actual != SLOTS_PER_WEEK as u32 {
        issues.push(FeasibilityIssue::TotalMismatch { actual });
    }

    let mut lab_lengths = Vec::new();
    for &lab in catalog.labs() {
        let spec = catalog.spec(lab);
        let len = spec.weekly_periods as usize;
        if len > PERIODS_PER_DAY {
            issues.push(FeasibilityIssue::LabTooLong {
                name: spec.name.clone(),
                periods: spec.weekly_periods,
            });
        } else {
            lab_lengths.push(len);
        }
    }
    if !labs_fit(&mut lab_lengths) {
        issues.push(FeasibilityIssue::LabsDoNotFit);
    }

    let daily_limit = (MAX_THEORY_PER_DAY * DAYS_PER_WEEK) as u32;
    for &subject in catalog.theory() {
        let spec = catalog.spec(subject);
        if spec.weekly_periods > daily_limit {
            issues.push(FeasibilityIssue::TheoryExceedsDailyCap {
                name: spec.name.clone(),
                periods: spec.weekly_periods,
            });
        }
    }

    FeasibilityReport { issues }
}

/// Exact bin packing of lab blocks into `DAYS_PER_WEEK` days of
/// `PERIODS_PER_DAY` slots each.
fn labs_fit(lengths: &mut [usize]) -> bool {
    if lengths.iter().sum::<usize>() > SLOTS_PER_WEEK {
        return false;
    }
    lengths.sort_unstable_by(|a, b| b.cmp(a));
    let mut free = [PERIODS_PER_DAY; DAYS_PER_WEEK];
    pack(lengths, &mut free)
}

fn pack(lengths: &[usize], free: &mut [usize; DAYS_PER_WEEK]) -> bool {
    let Some((&len, rest)) = lengths.split_first() else {
        return true;
    };
    for day in 0..DAYS_PER_WEEK {
        // days with equal remaining capacity are interchangeable
        if free[day] < len || free[..day].contains(&free[day]) {
            continue;
        }
        free[day] -= len;
        let placed = pack(rest, free);
        free[day] += len;
        if placed {
            return true;
        }
    }
    false
}
