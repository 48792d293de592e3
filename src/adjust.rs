//! Manual adjustment validation.
//!
//! Users drag (move) or stretch (resize) entries on the planning board.
//! The pixel delta is rounded to the snap granularity, then the new
//! placement is checked against:
//! - the working-day timeline bounds,
//! - the breaks between working-hours windows,
//! - the worker's other entries that day,
//! - and, for resizes, the minimum entry length.
//!
//! Moves are forgiving: a move past the timeline edge is clamped to the
//! edge, and a move onto another entry snaps once to just before or just
//! after that entry, whichever is nearer. Resizes are never corrected.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PlacementError;
use crate::models::{ScheduleEntry, WorkingDay};

/// A user edit of one entry, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Adjustment {
    /// Shift start and end by the same delta.
    Move { delta_minutes: i64 },
    /// Shift the end only.
    Resize { delta_minutes: i64 },
}

/// A validated time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Placement {
    fn shifted(start: NaiveDateTime, end: NaiveDateTime, minutes: i64) -> Self {
        Self {
            start: start + Duration::minutes(minutes),
            end: end + Duration::minutes(minutes),
        }
    }

    fn length(&self) -> Duration {
        self.end - self.start
    }
}

/// How an accepted placement relates to what the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdjustmentOutcome {
    /// Accepted as requested.
    Exact(Placement),
    /// Move pulled back inside the timeline.
    Clamped(Placement),
    /// Move placed next to the entry it collided with.
    Snapped(Placement),
}

impl AdjustmentOutcome {
    /// The placement to persist.
    pub fn placement(&self) -> Placement {
        match *self {
            AdjustmentOutcome::Exact(p)
            | AdjustmentOutcome::Clamped(p)
            | AdjustmentOutcome::Snapped(p) => p,
        }
    }
}

/// Converts a drag distance to minutes, rounded to the nearest `snap`.
pub fn pixels_to_minutes(pixels: f64, pixels_per_minute: f64, snap_minutes: i64) -> i64 {
    if pixels_per_minute <= 0.0 || snap_minutes <= 0 {
        return 0;
    }
    let minutes = pixels / pixels_per_minute;
    (minutes / snap_minutes as f64).round() as i64 * snap_minutes
}

/// Checks manual edits against one worker's day.
#[derive(Debug, Clone, Copy)]
pub struct AdjustmentValidator<'a> {
    working_day: &'a WorkingDay,
    min_entry_minutes: i64,
}

impl<'a> AdjustmentValidator<'a> {
    /// Creates a validator with a 5-minute minimum entry length.
    pub fn new(working_day: &'a WorkingDay) -> Self {
        Self {
            working_day,
            min_entry_minutes: 5,
        }
    }

    /// Sets the minimum entry length for resizes.
    pub fn with_min_entry_minutes(mut self, minutes: i64) -> Self {
        self.min_entry_minutes = minutes;
        self
    }

    /// Validates `adjustment` of `entry` against the worker's `others`.
    ///
    /// `others` may include `entry` itself and entries of other workers
    /// or dates; those are ignored.
    pub fn validate(
        &self,
        entry: &ScheduleEntry,
        others: &[ScheduleEntry],
        adjustment: Adjustment,
    ) -> Result<AdjustmentOutcome, PlacementError> {
        let date = entry.date();
        let neighbours: Vec<&ScheduleEntry> = others
            .iter()
            .filter(|o| o.id != entry.id && o.worker_id == entry.worker_id && o.date() == date)
            .collect();

        match adjustment {
            Adjustment::Move { delta_minutes } => {
                self.validate_move(entry, date, &neighbours, delta_minutes)
            }
            Adjustment::Resize { delta_minutes } => {
                let end = entry.end + Duration::minutes(delta_minutes);
                let minutes = (end - entry.start).num_minutes();
                if minutes < self.min_entry_minutes {
                    return Err(PlacementError::TooShort { minutes });
                }
                let placement = Placement {
                    start: entry.start,
                    end,
                };
                self.check(date, &neighbours, placement)?;
                Ok(AdjustmentOutcome::Exact(placement))
            }
        }
    }

    fn validate_move(
        &self,
        entry: &ScheduleEntry,
        date: NaiveDate,
        neighbours: &[&ScheduleEntry],
        delta_minutes: i64,
    ) -> Result<AdjustmentOutcome, PlacementError> {
        let (day_start, day_end) = self.bounds(date)?;
        let mut placement = Placement::shifted(entry.start, entry.end, delta_minutes);
        let mut clamped = false;

        if placement.start < day_start {
            placement = Placement::shifted(
                placement.start,
                placement.end,
                (day_start - placement.start).num_minutes(),
            );
            clamped = true;
        } else if placement.end > day_end {
            placement = Placement::shifted(
                placement.start,
                placement.end,
                -(placement.end - day_end).num_minutes(),
            );
            clamped = true;
        }

        self.check_bounds(date, placement)?;
        self.check_breaks(placement)?;

        let Some(blocker) = first_overlap(neighbours, placement) else {
            return Ok(if clamped {
                AdjustmentOutcome::Clamped(placement)
            } else {
                AdjustmentOutcome::Exact(placement)
            });
        };

        let length = placement.length();
        let before = Placement {
            start: blocker.start - length,
            end: blocker.start,
        };
        let after = Placement {
            start: blocker.end,
            end: blocker.end + length,
        };
        let to_before = (placement.start - before.start).num_minutes().abs();
        let to_after = (after.start - placement.start).num_minutes().abs();
        let snapped = if to_before <= to_after { before } else { after };

        debug!(
            event = "adjust_snap",
            entry_id = %entry.id,
            blocker_id = %blocker.id,
            start = %snapped.start,
        );
        self.check(date, neighbours, snapped)?;
        Ok(AdjustmentOutcome::Snapped(snapped))
    }

    /// Full check without corrections: bounds, breaks, overlaps.
    fn check(
        &self,
        date: NaiveDate,
        neighbours: &[&ScheduleEntry],
        placement: Placement,
    ) -> Result<(), PlacementError> {
        self.check_bounds(date, placement)?;
        self.check_breaks(placement)?;
        if let Some(blocker) = first_overlap(neighbours, placement) {
            return Err(PlacementError::Overlaps {
                entry_id: blocker.id.clone(),
            });
        }
        Ok(())
    }

    fn bounds(&self, date: NaiveDate) -> Result<(NaiveDateTime, NaiveDateTime), PlacementError> {
        match (self.working_day.timeline_start(), self.working_day.timeline_end()) {
            (Some(start), Some(end)) => Ok((date.and_time(start), date.and_time(end))),
            _ => Err(PlacementError::OutOfBounds),
        }
    }

    fn check_bounds(&self, date: NaiveDate, placement: Placement) -> Result<(), PlacementError> {
        let (day_start, day_end) = self.bounds(date)?;
        if placement.start < day_start || placement.end > day_end || placement.end <= placement.start
        {
            return Err(PlacementError::OutOfBounds);
        }
        Ok(())
    }

    fn check_breaks(&self, placement: Placement) -> Result<(), PlacementError> {
        if self
            .working_day
            .crosses_break(placement.start.time(), placement.end.time())
        {
            return Err(PlacementError::CrossesBreak);
        }
        Ok(())
    }
}

/// The earliest-starting neighbour overlapping `placement`.
fn first_overlap<'e>(
    neighbours: &[&'e ScheduleEntry],
    placement: Placement,
) -> Option<&'e ScheduleEntry> {
    neighbours
        .iter()
        .copied()
        .filter(|n| n.overlaps_span(placement.start, placement.end))
        .min_by_key(|n| n.start)
}
