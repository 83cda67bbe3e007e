//! Cross-section staff bookkeeping.
//!
//! The [`StaffUsageLedger`] lives for a whole multi-cohort run. The
//! contract is:
//!
//! - **read during initialization**: a section's lab placement avoids
//!   slots where the lab's staff is already teaching another section;
//! - **write after acceptance**: once a section's timetable is accepted,
//!   the orchestrator records that section's commitments and busy slots.
//!
//! The GA never writes to the ledger, and mutation never consults it.

use super::catalog::{CourseSet, StaffId, SubjectKind};
use super::grid::{ScheduleGrid, SlotPos, DAYS_PER_WEEK, PERIODS_PER_DAY};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// A staff member's commitment to one cohort and subject type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Commitment {
    /// Cohort label, e.g. `"2nd Year"`.
    pub year: String,
    /// Whether the staff teaches theory or lab in that cohort.
    pub kind: SubjectKind,
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.year, self.kind)
    }
}

/// Staff commitments and busy slots accumulated across accepted sections.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaffUsageLedger {
    commitments: HashMap<String, BTreeSet<Commitment>>,
    busy: HashMap<String, BTreeSet<SlotPos>>,
}

impl StaffUsageLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `staff` teaches `kind` subjects in `year`.
    pub fn commit(&mut self, staff: &str, year: &str, kind: SubjectKind) {
        self.commitments
            .entry(staff.trim().to_string())
            .or_default()
            .insert(Commitment {
                year: year.to_string(),
                kind,
            });
    }

    /// Commitments held by `staff`, in sorted order.
    pub fn commitments(&self, staff: &str) -> impl Iterator<Item = &Commitment> {
        self.commitments.get(staff.trim()).into_iter().flatten()
    }

    /// Marks `staff` as teaching at `pos`.
    pub fn mark_busy(&mut self, staff: &str, pos: SlotPos) {
        self.busy
            .entry(staff.trim().to_string())
            .or_default()
            .insert(pos);
    }

    /// Whether `staff` is already teaching at `pos` in an accepted section.
    pub fn is_busy(&self, staff: &str, pos: SlotPos) -> bool {
        self.busy
            .get(staff.trim())
            .is_some_and(|slots| slots.contains(&pos))
    }

    /// Number of staff with at least one commitment or busy slot.
    pub fn staff_count(&self) -> usize {
        let mut names: BTreeSet<&str> = self.commitments.keys().map(String::as_str).collect();
        names.extend(self.busy.keys().map(String::as_str));
        names.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.commitments.is_empty() && self.busy.is_empty()
    }

    /// Records an accepted section: every subject's staff gets a
    /// `(year, kind)` commitment, and every occupied slot marks its staff busy.
    pub fn record_section(&mut self, year: &str, catalog: &CourseSet, grid: &ScheduleGrid) {
        for spec in catalog.specs() {
            self.commit(&spec.staff, year, spec.kind);
        }
        for (pos, subject) in grid.slots() {
            if let Some(id) = subject.filter(|id| id.index() < catalog.len()) {
                let staff = catalog.spec(id).staff.clone();
                self.mark_busy(&staff, pos);
            }
        }
    }

    /// Projects the busy slots onto a catalog's staff ids.
    ///
    /// Built once per section run so the initializer's hot loop does array
    /// lookups instead of string hashing.
    pub fn busy_mask(&self, catalog: &CourseSet) -> BusyMask {
        let mut per_staff = vec![[[false; PERIODS_PER_DAY]; DAYS_PER_WEEK]; catalog.staff_count()];
        for (i, mask) in per_staff.iter_mut().enumerate() {
            let name = catalog.staff_name(StaffId(i as u16));
            if let Some(slots) = self.busy.get(name) {
                for pos in slots.iter().filter(|p| p.in_bounds()) {
                    mask[pos.day][pos.period] = true;
                }
            }
        }
        BusyMask { per_staff }
    }
}

/// Per-staff busy slots from earlier sections, indexed by [`StaffId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusyMask {
    per_staff: Vec<[[bool; PERIODS_PER_DAY]; DAYS_PER_WEEK]>,
}

impl BusyMask {
    /// A mask with nothing blocked.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether `staff` is busy at `pos`. Unknown staff are never busy.
    pub fn is_busy(&self, staff: StaffId, pos: SlotPos) -> bool {
        self.per_staff
            .get(staff.index())
            .and_then(|m| m.get(pos.day))
            .and_then(|d| d.get(pos.period))
            .copied()
            .unwrap_or(false)
    }
}
