//! The weekly slot grid.
//!
//! A [`ScheduleGrid`] is a fixed `DAYS_PER_WEEK × PERIODS_PER_DAY` array of
//! optional subject ids. The shape is part of the type, so every grid
//! always has exactly 40 slots no matter which operator touched it.

use super::catalog::SubjectId;
use std::fmt;

/// Teaching days per week.
pub const DAYS_PER_WEEK: usize = 5;

/// Periods per teaching day.
pub const PERIODS_PER_DAY: usize = 8;

/// Total slots in a week.
pub const SLOTS_PER_WEEK: usize = DAYS_PER_WEEK * PERIODS_PER_DAY;

/// First period of the second half of the day. Periods `0..HALF_DAY` form
/// the morning, `HALF_DAY..PERIODS_PER_DAY` the afternoon.
pub const HALF_DAY: usize = PERIODS_PER_DAY / 2;

/// Weekday names, indexed by day.
pub const DAY_NAMES: [&str; DAYS_PER_WEEK] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// One day's sequence of slots.
pub type DaySlots = [Option<SubjectId>; PERIODS_PER_DAY];

/// A `(day, period)` position in the grid, both 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotPos {
    /// Day index, `0..DAYS_PER_WEEK`.
    pub day: usize,
    /// Period index, `0..PERIODS_PER_DAY`.
    pub period: usize,
}

impl SlotPos {
    /// Creates a position. Out-of-range values are not rejected here; grid
    /// accessors treat them as absent.
    pub fn new(day: usize, period: usize) -> Self {
        Self { day, period }
    }

    /// Iterates every position of the week, day-major.
    pub fn all() -> impl Iterator<Item = SlotPos> {
        (0..DAYS_PER_WEEK).flat_map(|day| (0..PERIODS_PER_DAY).map(move |period| SlotPos { day, period }))
    }

    /// Whether this position lies inside the grid.
    pub fn in_bounds(&self) -> bool {
        self.day < DAYS_PER_WEEK && self.period < PERIODS_PER_DAY
    }
}

impl fmt::Display for SlotPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let day = DAY_NAMES.get(self.day).copied().unwrap_or("?");
        write!(f, "{} P{}", day, self.period + 1)
    }
}

/// A weekly timetable grid for one class section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleGrid {
    days: [DaySlots; DAYS_PER_WEEK],
}

impl ScheduleGrid {
    /// Creates an empty grid: every slot unoccupied.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a grid from explicit day rows.
    pub fn from_days(days: [DaySlots; DAYS_PER_WEEK]) -> Self {
        Self { days }
    }

    /// All days, Monday first.
    pub fn days(&self) -> &[DaySlots; DAYS_PER_WEEK] {
        &self.days
    }

    /// One day's slots.
    ///
    /// # Panics
    /// Panics if `day >= DAYS_PER_WEEK`.
    pub fn day(&self, day: usize) -> &DaySlots {
        &self.days[day]
    }

    /// Mutable access to one day's slots.
    ///
    /// # Panics
    /// Panics if `day >= DAYS_PER_WEEK`.
    pub fn day_mut(&mut self, day: usize) -> &mut DaySlots {
        &mut self.days[day]
    }

    /// The subject at a position, or `None` when empty or out of range.
    pub fn get(&self, pos: SlotPos) -> Option<SubjectId> {
        self.days
            .get(pos.day)
            .and_then(|d| d.get(pos.period))
            .copied()
            .flatten()
    }

    /// Writes a slot.
    ///
    /// # Panics
    /// Panics if `pos` is out of range.
    pub fn set(&mut self, pos: SlotPos, subject: Option<SubjectId>) {
        self.days[pos.day][pos.period] = subject;
    }

    /// Whether a position is inside the grid and unoccupied.
    pub fn is_free(&self, pos: SlotPos) -> bool {
        pos.in_bounds() && self.days[pos.day][pos.period].is_none()
    }

    /// Iterates every position with its content, day-major.
    pub fn slots(&self) -> impl Iterator<Item = (SlotPos, Option<SubjectId>)> + '_ {
        SlotPos::all().map(move |pos| (pos, self.days[pos.day][pos.period]))
    }

    /// Iterates unoccupied positions, day-major.
    pub fn free_slots(&self) -> impl Iterator<Item = SlotPos> + '_ {
        self.slots().filter(|(_, s)| s.is_none()).map(|(pos, _)| pos)
    }

    /// Number of occupied slots.
    pub fn occupied_count(&self) -> usize {
        self.days.iter().flatten().filter(|s| s.is_some()).count()
    }

    /// Number of slots assigned to `subject`.
    pub fn count(&self, subject: SubjectId) -> usize {
        self.days
            .iter()
            .flatten()
            .filter(|&&s| s == Some(subject))
            .count()
    }

    /// Per-subject occupancy counts, indexed by [`SubjectId::index`].
    ///
    /// Ids at or beyond `subject_count` are ignored.
    pub fn occupancy(&self, subject_count: usize) -> Vec<usize> {
        let mut counts = vec![0; subject_count];
        for id in self.days.iter().flatten().flatten() {
            if let Some(c) = counts.get_mut(id.index()) {
                *c += 1;
            }
        }
        counts
    }
}

/// Clock range of a period as `"HH:MM - HH:MM"`.
///
/// The day starts at 09:15 with 45-minute periods, a 15-minute break after
/// the 2nd and 4th periods, and a 60-minute lunch after the 5th.
///
/// ```
/// use u_timetable::timetable::period_time_range;
///
/// assert_eq!(period_time_range(0), "09:15 - 10:00");
/// assert_eq!(period_time_range(5), "14:30 - 15:15");
/// ```
pub fn period_time_range(period: usize) -> String {
    const PERIOD_MIN: usize = 45;
    const BREAK_MIN: usize = 15;
    const LUNCH_MIN: usize = 60;

    let mut minutes = 9 * 60 + 15;
    for i in 0..period {
        minutes += PERIOD_MIN;
        if i == 1 || i == 3 {
            minutes += BREAK_MIN;
        }
        if i == 4 {
            minutes += LUNCH_MIN;
        }
    }
    let end = minutes + PERIOD_MIN;
    format!(
        "{:02}:{:02} - {:02}:{:02}",
        minutes / 60,
        minutes % 60,
        end / 60,
        end % 60
    )
}
