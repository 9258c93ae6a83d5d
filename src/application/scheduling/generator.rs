//! Recurring slot generation
//!
//! Pure candidate production: no persistence, no clock. The caller
//! (SlotService) re-checks the non-overlap invariant against stored
//! slots before inserting.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use chrono::{Datelike, TimeZone};

use crate::domain::{DomainError, DomainResult};

/// Shortest accepted slot duration, minutes
pub const MIN_SLOT_MINUTES: u32 = 15;
/// Longest accepted slot duration, minutes
pub const MAX_SLOT_MINUTES: u32 = 480;

/// Recurrence specification for bulk slot generation
#[derive(Debug, Clone)]
pub struct RecurrenceSpec {
    pub technician_id: i64,
    /// First calendar date considered (inclusive)
    pub range_start: NaiveDate,
    /// Last calendar date considered (inclusive)
    pub range_end: NaiveDate,
    pub slot_duration_minutes: u32,
    /// Weekdays on which slots are generated
    pub weekdays: Vec<Weekday>,
    /// Daily working window start
    pub daily_start: NaiveTime,
    /// Daily working window end
    pub daily_end: NaiveTime,
}

/// An unsaved slot produced by the generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCandidate {
    pub technician_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl RecurrenceSpec {
    fn validate(&self) -> DomainResult<()> {
        if !(MIN_SLOT_MINUTES..=MAX_SLOT_MINUTES).contains(&self.slot_duration_minutes) {
            return Err(DomainError::Validation(format!(
                "slot duration must be {MIN_SLOT_MINUTES}-{MAX_SLOT_MINUTES} minutes, got {}",
                self.slot_duration_minutes
            )));
        }
        if self.daily_start >= self.daily_end {
            return Err(DomainError::Validation(
                "daily start time must be before daily end time".to_string(),
            ));
        }
        if self.range_start > self.range_end {
            return Err(DomainError::Validation(
                "range start date must not be after range end date".to_string(),
            ));
        }
        if self.weekdays.is_empty() {
            return Err(DomainError::Validation(
                "at least one weekday is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Produce candidate slots for every matching date in the range.
///
/// Walks each day's window from `daily_start` in duration steps and
/// discards a trailing remainder shorter than the duration; no partial
/// slots. Times are interpreted as UTC (no time-zone normalization).
pub fn generate_slots(spec: &RecurrenceSpec) -> DomainResult<Vec<SlotCandidate>> {
    spec.validate()?;

    let step = Duration::minutes(i64::from(spec.slot_duration_minutes));
    let mut candidates = Vec::new();

    let mut date = spec.range_start;
    while date <= spec.range_end {
        if spec.weekdays.contains(&date.weekday()) {
            let day_end = date.and_time(spec.daily_end);
            let mut cursor = date.and_time(spec.daily_start);

            while cursor + step <= day_end {
                candidates.push(SlotCandidate {
                    technician_id: spec.technician_id,
                    start_time: Utc.from_utc_datetime(&cursor),
                    end_time: Utc.from_utc_datetime(&(cursor + step)),
                });
                cursor += step;
            }
        }
        date = date.succ_opt().ok_or_else(|| {
            DomainError::Validation("range end date out of calendar bounds".to_string())
        })?;
    }

    Ok(candidates)
}

// ── Tests ──────────────────────────────────────────────────────
