//! Subject catalog for one cohort.
//!
//! A [`CourseSet`] is an index-backed table of [`SubjectSpec`]s. Subjects
//! and staff are addressed by small integer ids ([`SubjectId`],
//! [`StaffId`]) so that the grid and the fitness evaluator never perform
//! string lookups.

use super::grid::SLOTS_PER_WEEK;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Index of a subject within its [`CourseSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubjectId(pub(crate) u16);

impl SubjectId {
    /// The table index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a staff member within its [`CourseSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StaffId(pub(crate) u16);

impl StaffId {
    /// The table index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Whether a subject is taught as scattered theory periods or as one
/// contiguous lab block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SubjectKind {
    /// Lecture periods, placed individually.
    Theory,
    /// Practical session, placed as one contiguous block on a single day.
    Lab,
}

impl SubjectKind {
    /// Display label, as used in staff commitments.
    pub fn label(self) -> &'static str {
        match self {
            SubjectKind::Theory => "Theory",
            SubjectKind::Lab => "Lab",
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SubjectKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "theory" => Ok(SubjectKind::Theory),
            "lab" => Ok(SubjectKind::Lab),
            other => Err(CatalogError::UnknownKind(other.to_string())),
        }
    }
}

/// Errors raised while building or validating a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No subjects were supplied.
    #[error("catalog has no subjects")]
    Empty,

    /// A subject name is blank.
    #[error("subject #{index} has an empty name")]
    EmptyName {
        /// 1-based position in the input.
        index: usize,
    },

    /// Two subjects share a name.
    #[error("duplicate subject name: {0}")]
    DuplicateName(String),

    /// Weekly periods outside `1..=40`.
    #[error("subject '{name}': periods per week must be between 1 and {max}, got {periods}")]
    InvalidPeriods {
        /// Subject name.
        name: String,
        /// Offending value.
        periods: u32,
        /// Upper bound (slots per week).
        max: u32,
    },

    /// A subject has no staff.
    #[error("subject '{name}' has an empty staff name")]
    EmptyStaff {
        /// Subject name.
        name: String,
    },

    /// Subject type is neither `theory` nor `lab`.
    #[error("unknown subject type '{0}' (expected 'theory' or 'lab')")]
    UnknownKind(String),

    /// Weekly periods do not fill the grid exactly.
    #[error("total periods must be exactly {expected}, got {actual}")]
    TotalPeriods {
        /// Slots per week.
        expected: u32,
        /// Sum over all subjects.
        actual: u32,
    },

    /// Academic year label is not `YYYY-YYYY`.
    #[error("invalid academic year '{0}' (expected YYYY-YYYY)")]
    InvalidAcademicYear(String),

    /// More subjects than ids can address.
    #[error("too many subjects: {0}")]
    TooManySubjects(usize),
}

/// One subject's requirements.
///
/// ```
/// use u_timetable::timetable::{SubjectKind, SubjectSpec};
///
/// let spec = SubjectSpec::new("Physics Lab", 3, SubjectKind::Lab, "Dr. Rao")
///     .with_short_name("PHYL")
///     .with_code("PH8161");
/// assert_eq!(spec.display_name(), "PHYL");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubjectSpec {
    /// Full subject name. Unique within a catalog.
    pub name: String,
    /// Short display name. Falls back to `name` when empty.
    #[cfg_attr(feature = "serde", serde(default))]
    pub short_name: String,
    /// Subject code. Falls back to `name` when empty.
    #[cfg_attr(feature = "serde", serde(default))]
    pub code: String,
    /// Required periods per week.
    pub weekly_periods: u32,
    /// Theory or lab.
    pub kind: SubjectKind,
    /// Staff member teaching the subject.
    pub staff: String,
}

impl SubjectSpec {
    /// Creates a spec with no short name or code.
    pub fn new(
        name: impl Into<String>,
        weekly_periods: u32,
        kind: SubjectKind,
        staff: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            short_name: String::new(),
            code: String::new(),
            weekly_periods,
            kind,
            staff: staff.into(),
        }
    }

    /// Shorthand for a theory subject.
    pub fn theory(name: impl Into<String>, weekly_periods: u32, staff: impl Into<String>) -> Self {
        Self::new(name, weekly_periods, SubjectKind::Theory, staff)
    }

    /// Shorthand for a lab subject.
    pub fn lab(name: impl Into<String>, weekly_periods: u32, staff: impl Into<String>) -> Self {
        Self::new(name, weekly_periods, SubjectKind::Lab, staff)
    }

    /// Sets the short display name.
    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = short_name.into();
        self
    }

    /// Sets the subject code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Short name, or the full name when no short name was given.
    pub fn display_name(&self) -> &str {
        if self.short_name.trim().is_empty() {
            &self.name
        } else {
            &self.short_name
        }
    }

    /// Code, or the full name when no code was given.
    pub fn display_code(&self) -> &str {
        if self.code.trim().is_empty() {
            &self.name
        } else {
            &self.code
        }
    }

    /// Whether this is a lab subject.
    pub fn is_lab(&self) -> bool {
        self.kind == SubjectKind::Lab
    }
}

/// One row of the subject summary shown next to a timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubjectSummary {
    /// 1-based serial number.
    pub serial_no: usize,
    /// Subject code.
    pub code: String,
    /// Short display name.
    pub short_name: String,
    /// Staff name.
    pub staff: String,
    /// Weekly periods.
    pub total_periods: u32,
}

/// Validated subject table for one cohort.
///
/// Construction checks each subject individually (names, periods, staff,
/// uniqueness) but does **not** require the weekly total to equal 40: the
/// search core tolerates such catalogs and degrades to best effort. Use
/// [`validate_cohort`](super::validate_cohort) for the full check.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<SubjectSpec>", into = "Vec<SubjectSpec>")
)]
pub struct CourseSet {
    subjects: Vec<SubjectSpec>,
    subject_staff: Vec<StaffId>,
    staff_names: Vec<String>,
    labs: Vec<SubjectId>,
    theory: Vec<SubjectId>,
}

impl CourseSet {
    /// Builds a catalog, failing on the first structural error.
    ///
    /// ```
    /// use u_timetable::timetable::{CourseSet, SubjectSpec};
    ///
    /// let catalog = CourseSet::new(vec![
    ///     SubjectSpec::theory("MATH", 20, "Dr. A"),
    ///     SubjectSpec::theory("PHYS", 17, "Dr. B"),
    ///     SubjectSpec::lab("LAB1", 3, "Dr. L"),
    /// ])
    /// .unwrap();
    /// assert_eq!(catalog.total_periods(), 40);
    /// assert_eq!(catalog.labs().len(), 1);
    /// ```
    pub fn new(specs: impl IntoIterator<Item = SubjectSpec>) -> Result<Self, CatalogError> {
        let specs: Vec<SubjectSpec> = specs.into_iter().collect();
        match structural_errors(&specs).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(Self::build(specs)),
        }
    }

    /// Assembles the index tables. Callers must have checked the specs.
    fn build(subjects: Vec<SubjectSpec>) -> Self {
        let mut staff_index: HashMap<&str, StaffId> = HashMap::new();
        let mut staff_names = Vec::new();
        let mut subject_staff = Vec::with_capacity(subjects.len());
        let mut labs = Vec::new();
        let mut theory = Vec::new();

        for (i, spec) in subjects.iter().enumerate() {
            let key = spec.staff.trim();
            let staff = *staff_index.entry(key).or_insert_with(|| {
                staff_names.push(key.to_string());
                StaffId((staff_names.len() - 1) as u16)
            });
            subject_staff.push(staff);

            let id = SubjectId(i as u16);
            match spec.kind {
                SubjectKind::Lab => labs.push(id),
                SubjectKind::Theory => theory.push(id),
            }
        }

        Self {
            subjects,
            subject_staff,
            staff_names,
            labs,
            theory,
        }
    }

    /// Number of subjects.
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Whether the catalog is empty. A constructed catalog never is.
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// All subject ids in input order.
    pub fn ids(&self) -> impl Iterator<Item = SubjectId> + '_ {
        (0..self.subjects.len()).map(|i| SubjectId(i as u16))
    }

    /// Lab subject ids in input order.
    pub fn labs(&self) -> &[SubjectId] {
        &self.labs
    }

    /// Theory subject ids in input order.
    pub fn theory(&self) -> &[SubjectId] {
        &self.theory
    }

    /// The spec for a subject id.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this catalog.
    pub fn spec(&self, id: SubjectId) -> &SubjectSpec {
        &self.subjects[id.index()]
    }

    /// All specs in input order.
    pub fn specs(&self) -> &[SubjectSpec] {
        &self.subjects
    }

    /// Looks up a subject by its full name.
    pub fn id_of(&self, name: &str) -> Option<SubjectId> {
        self.subjects
            .iter()
            .position(|s| s.name == name)
            .map(|i| SubjectId(i as u16))
    }

    /// Whether `id` names a lab subject. Unknown ids are not labs.
    pub fn is_lab(&self, id: SubjectId) -> bool {
        self.subjects.get(id.index()).is_some_and(|s| s.is_lab())
    }

    /// Required weekly periods. Unknown ids require nothing.
    pub fn required(&self, id: SubjectId) -> usize {
        self.subjects
            .get(id.index())
            .map_or(0, |s| s.weekly_periods as usize)
    }

    /// Staff teaching `id`, or `None` for an unknown id.
    pub fn staff_of(&self, id: SubjectId) -> Option<StaffId> {
        self.subject_staff.get(id.index()).copied()
    }

    /// Number of distinct staff members.
    pub fn staff_count(&self) -> usize {
        self.staff_names.len()
    }

    /// Name of a staff member.
    ///
    /// # Panics
    /// Panics if `staff` does not belong to this catalog.
    pub fn staff_name(&self, staff: StaffId) -> &str {
        &self.staff_names[staff.index()]
    }

    /// Sum of weekly periods over all subjects.
    pub fn total_periods(&self) -> u32 {
        self.subjects.iter().map(|s| s.weekly_periods).sum()
    }

    /// Summary rows in input order.
    pub fn summary(&self) -> Vec<SubjectSummary> {
        self.subjects
            .iter()
            .enumerate()
            .map(|(i, s)| SubjectSummary {
                serial_no: i + 1,
                code: s.display_code().to_string(),
                short_name: s.display_name().to_string(),
                staff: s.staff.trim().to_string(),
                total_periods: s.weekly_periods,
            })
            .collect()
    }
}

impl TryFrom<Vec<SubjectSpec>> for CourseSet {
    type Error = CatalogError;

    fn try_from(specs: Vec<SubjectSpec>) -> Result<Self, Self::Error> {
        Self::new(specs)
    }
}

impl From<CourseSet> for Vec<SubjectSpec> {
    fn from(catalog: CourseSet) -> Self {
        catalog.subjects
    }
}

/// Every per-subject problem in input order (empty when the specs are sound).
pub(crate) fn structural_errors(specs: &[SubjectSpec]) -> Vec<CatalogError> {
    let mut errors = Vec::new();
    if specs.is_empty() {
        errors.push(CatalogError::Empty);
        return errors;
    }
    if specs.len() > u16::MAX as usize {
        errors.push(CatalogError::TooManySubjects(specs.len()));
        return errors;
    }

    let max = SLOTS_PER_WEEK as u32;
    let mut seen = std::collections::HashSet::new();
    for (i, spec) in specs.iter().enumerate() {
        let name = spec.name.trim();
        if name.is_empty() {
            errors.push(CatalogError::EmptyName { index: i + 1 });
        } else if !seen.insert(name) {
            errors.push(CatalogError::DuplicateName(name.to_string()));
        }
        if spec.weekly_periods == 0 || spec.weekly_periods > max {
            errors.push(CatalogError::InvalidPeriods {
                name: spec.name.clone(),
                periods: spec.weekly_periods,
                max,
            });
        }
        if spec.staff.trim().is_empty() {
            errors.push(CatalogError::EmptyStaff {
                name: spec.name.clone(),
            });
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CourseSet {
        CourseSet::new(vec![
            SubjectSpec::theory("MATH", 20, "Dr. A").with_short_name("MA"),
            SubjectSpec::lab("LAB1", 3, "Dr. L").with_code("LB101"),
            SubjectSpec::theory("PHYS", 17, "Dr. A"),
        ])
        .unwrap()
    }

    #[test]
    fn test_index_tables() {
        let c = sample();
        assert_eq!(c.len(), 3);
        assert_eq!(c.labs(), &[SubjectId(1)]);
        assert_eq!(c.theory(), &[SubjectId(0), SubjectId(2)]);
        assert_eq!(c.staff_count(), 2);
        assert_eq!(c.staff_of(SubjectId(0)), c.staff_of(SubjectId(2)));
        assert_ne!(c.staff_of(SubjectId(0)), c.staff_of(SubjectId(1)));
        assert_eq!(c.staff_name(c.staff_of(SubjectId(1)).unwrap()), "Dr. L");
        assert_eq!(c.id_of("PHYS"), Some(SubjectId(2)));
        assert_eq!(c.id_of("CHEM"), None);
        assert_eq!(c.total_periods(), 40);
    }

    #[test]
    fn test_unknown_ids_are_harmless() {
        let c = sample();
        assert!(!c.is_lab(SubjectId(99)));
        assert_eq!(c.required(SubjectId(99)), 0);
        assert_eq!(c.staff_of(SubjectId(99)), None);
    }

    #[test]
    fn test_display_fallbacks() {
        let c = sample();
        let summary = c.summary();
        assert_eq!(summary[0].short_name, "MA");
        assert_eq!(summary[0].code, "MATH");
        assert_eq!(summary[1].short_name, "LAB1");
        assert_eq!(summary[1].code, "LB101");
        assert_eq!(summary[2].serial_no, 3);
    }

    #[test]
    fn test_staff_names_are_trimmed() {
        let c = CourseSet::new(vec![
            SubjectSpec::theory("A", 20, "X "),
            SubjectSpec::theory("B", 20, " X"),
        ])
        .unwrap();
        assert_eq!(c.staff_count(), 1);
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(CourseSet::new(Vec::new()), Err(CatalogError::Empty));
    }

    #[test]
    fn test_rejects_duplicate_name() {
        let err = CourseSet::new(vec![
            SubjectSpec::theory("MATH", 20, "A"),
            SubjectSpec::theory("MATH", 20, "B"),
        ]);
        assert_eq!(err, Err(CatalogError::DuplicateName("MATH".into())));
    }

    #[test]
    fn test_rejects_bad_periods_and_staff() {
        let err = CourseSet::new(vec![SubjectSpec::theory("MATH", 0, "A")]);
        assert!(matches!(err, Err(CatalogError::InvalidPeriods { periods: 0, .. })));
        let err = CourseSet::new(vec![SubjectSpec::theory("MATH", 41, "A")]);
        assert!(matches!(err, Err(CatalogError::InvalidPeriods { periods: 41, .. })));
        let err = CourseSet::new(vec![SubjectSpec::theory("MATH", 4, "  ")]);
        assert!(matches!(err, Err(CatalogError::EmptyStaff { .. })));
        let err = CourseSet::new(vec![SubjectSpec::theory(" ", 4, "A")]);
        assert_eq!(err, Err(CatalogError::EmptyName { index: 1 }));
    }

    #[test]
    fn test_total_not_enforced_by_constructor() {
        let c = CourseSet::new(vec![SubjectSpec::theory("MATH", 5, "A")]).unwrap();
        assert_eq!(c.total_periods(), 5);
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("Lab".parse::<SubjectKind>(), Ok(SubjectKind::Lab));
        assert_eq!(" THEORY ".parse::<SubjectKind>(), Ok(SubjectKind::Theory));
        assert!(matches!(
            "seminar".parse::<SubjectKind>(),
            Err(CatalogError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_kind_ordering() {
        assert!(SubjectKind::Theory < SubjectKind::Lab);
        let kinds: std::collections::BTreeSet<SubjectKind> =
            [SubjectKind::Lab, SubjectKind::Theory, SubjectKind::Lab].into_iter().collect();
        assert_eq!(kinds.into_iter().collect::<Vec<_>>(), vec![SubjectKind::Theory, SubjectKind::Lab]);
    }
}
