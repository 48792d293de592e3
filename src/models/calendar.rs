//! Working-hours and holiday models.
//!
//! The productive day is a fixed, date-independent sequence of named
//! windows (morning, mid-day, afternoon). Gaps between consecutive
//! windows are breaks: nothing may be scheduled across them.
//!
//! # Time Model
//! Clock times are local shop times (`NaiveTime`). Windows are half-open
//! `[start, end)`, so a window ending at 10:00 and an entry starting at
//! 10:00 do not overlap.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A named productive period of the working day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHoursWindow {
    /// Display name (e.g., "Morning").
    pub name: String,
    /// Window start (inclusive).
    pub start: NaiveTime,
    /// Window end (exclusive).
    pub end: NaiveTime,
}

impl WorkingHoursWindow {
    /// Creates a new window.
    pub fn new(name: impl Into<String>, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }

    /// Creates a window from `(hour, minute)` pairs.
    ///
    /// Returns `None` for out-of-range clock values.
    pub fn from_hm(name: impl Into<String>, start: (u32, u32), end: (u32, u32)) -> Option<Self> {
        Some(Self::new(
            name,
            NaiveTime::from_hms_opt(start.0, start.1, 0)?,
            NaiveTime::from_hms_opt(end.0, end.1, 0)?,
        ))
    }

    /// Window length in minutes (zero or negative for inverted windows).
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whether `[start, end)` lies entirely within this window.
    pub fn contains_span(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start >= self.start && end <= self.end
    }
}

/// A break between two consecutive working-hours windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakGap {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl BreakGap {
    /// Whether `[start, end)` overlaps this break.
    pub fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start < self.end && self.start < end
    }
}

/// The static working-day layout shared by all workers and dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkingDay {
    windows: Vec<WorkingHoursWindow>,
}

impl WorkingDay {
    /// Creates a working day from windows in chronological order.
    pub fn new(windows: Vec<WorkingHoursWindow>) -> Self {
        Self { windows }
    }

    /// The windows in order.
    pub fn windows(&self) -> &[WorkingHoursWindow] {
        &self.windows
    }

    /// Total productive minutes in the day.
    pub fn capacity_minutes(&self) -> i64 {
        self.windows.iter().map(|w| w.duration_minutes().max(0)).sum()
    }

    /// Start of the first window.
    pub fn timeline_start(&self) -> Option<NaiveTime> {
        self.windows.first().map(|w| w.start)
    }

    /// End of the last window.
    pub fn timeline_end(&self) -> Option<NaiveTime> {
        self.windows.last().map(|w| w.end)
    }

    /// Gaps between consecutive windows.
    pub fn breaks(&self) -> Vec<BreakGap> {
        self.windows
            .windows(2)
            .filter(|pair| pair[1].start > pair[0].end)
            .map(|pair| BreakGap {
                start: pair[0].end,
                end: pair[1].start,
            })
            .collect()
    }

    /// Whether `[start, end)` overlaps any break.
    pub fn crosses_break(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.breaks().iter().any(|b| b.overlaps(start, end))
    }

    /// The window fully containing `[start, end)`, if any.
    pub fn window_for(&self, start: NaiveTime, end: NaiveTime) -> Option<&WorkingHoursWindow> {
        self.windows.iter().find(|w| w.contains_span(start, end))
    }

    /// Whether the day has no windows.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// A team-wide production holiday. Blocks planning for the whole day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionHoliday {
    pub date: NaiveDate,
    /// Team the holiday applies to. `None` = every team.
    #[serde(default)]
    pub team: Option<String>,
}

impl ProductionHoliday {
    /// Creates a holiday for every team.
    pub fn new(date: NaiveDate) -> Self {
        Self { date, team: None }
    }

    /// Restricts the holiday to one team.
    pub fn for_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    /// Whether the holiday applies to `team`.
    pub fn applies_to(&self, team: &str) -> bool {
        self.team.as_deref().map_or(true, |t| t.eq_ignore_ascii_case(team))
    }
}

/// Approval state of a personal holiday request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// A worker's personal holiday request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRequest {
    pub id: String,
    pub worker_id: String,
    /// First day off (inclusive).
    pub start_date: NaiveDate,
    /// Last day off (inclusive).
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: HolidayStatus,
}

impl HolidayRequest {
    /// Creates a pending request.
    pub fn new(
        id: impl Into<String>,
        worker_id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            worker_id: worker_id.into(),
            start_date,
            end_date,
            status: HolidayStatus::Pending,
        }
    }

    /// Marks the request approved.
    pub fn approved(mut self) -> Self {
        self.status = HolidayStatus::Approved;
        self
    }

    /// Whether this is an approved holiday covering `date`.
    pub fn blocks(&self, date: NaiveDate) -> bool {
        self.status == HolidayStatus::Approved && self.start_date <= date && date <= self.end_date
    }
}
