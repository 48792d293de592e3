//! Availability resolution.
//!
//! Decides whether planning may happen on a date at all (production
//! holidays) and whether a given worker may be planned (approved personal
//! holidays). Production holidays block the whole date; personal holidays
//! only skip the one worker.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::models::{HolidayRequest, ProductionHoliday};

/// Holiday lookups over a snapshot of holiday records.
#[derive(Debug, Clone, Copy)]
pub struct Availability<'a> {
    production_holidays: &'a [ProductionHoliday],
    holiday_requests: &'a [HolidayRequest],
    team: &'a str,
    skip_weekends: bool,
}

impl<'a> Availability<'a> {
    /// Creates a resolver for the given team's production holidays.
    pub fn new(
        production_holidays: &'a [ProductionHoliday],
        holiday_requests: &'a [HolidayRequest],
        team: &'a str,
    ) -> Self {
        Self {
            production_holidays,
            holiday_requests,
            team,
            skip_weekends: false,
        }
    }

    /// Also treats Saturdays and Sundays as non-planning days in
    /// [`next_eligible_date`](Self::next_eligible_date).
    pub fn with_skip_weekends(mut self, skip: bool) -> Self {
        self.skip_weekends = skip;
        self
    }

    /// Whether `date` is a team-wide production holiday.
    pub fn is_blocked_date(&self, date: NaiveDate) -> bool {
        self.production_holidays
            .iter()
            .any(|h| h.date == date && h.applies_to(self.team))
    }

    /// Whether the worker has an approved personal holiday covering `date`.
    pub fn is_worker_unavailable(&self, worker_id: &str, date: NaiveDate) -> bool {
        self.holiday_requests
            .iter()
            .any(|r| r.worker_id == worker_id && r.blocks(date))
    }

    /// The first day strictly after `from` that is not blocked.
    ///
    /// Returns `None` only at the end of the supported calendar range.
    pub fn next_eligible_date(&self, from: NaiveDate) -> Option<NaiveDate> {
        let mut candidate = from.checked_add_days(Days::new(1))?;
        while self.is_blocked_date(candidate) || self.is_skipped_weekday(candidate) {
            candidate = candidate.checked_add_days(Days::new(1))?;
        }
        Some(candidate)
    }

    fn is_skipped_weekday(&self, date: NaiveDate) -> bool {
        self.skip_weekends && matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }
}
