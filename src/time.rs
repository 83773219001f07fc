//! Time & shift arithmetic (C1).
//!
//! Everything downstream works in *normalized minutes*: minutes since the
//! operating date's midnight, with overnight shifts folded into a single
//! monotonically increasing range that may run past 1440. Wall-clock
//! reconstruction (with its day-offset quirks) happens in
//! [`reconstruct_timestamp`]/[`reconstruct_interval`], when a solver value
//! is turned back into an ISO-8601 string. An interval's start and end must
//! go through [`reconstruct_interval`] together so both endpoints land on
//! the same calendar day offset.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::SchedulerError;

/// Parses `HH:MM` (or the `HH:MM:SS` variant some callers send) into minutes
/// since midnight.
pub fn parse_hhmm(s: &str) -> Result<i64, SchedulerError> {
    let parts: Vec<&str> = s.trim().split(':').collect();
    let (h, m) = match parts.as_slice() {
        [h, m] => (h, m),
        [h, m, _s] => (h, m),
        _ => {
            return Err(SchedulerError::BadInput(format!(
                "invalid time format: {s:?}"
            )))
        }
    };
    let h: i64 = h
        .parse()
        .map_err(|_| SchedulerError::BadInput(format!("invalid time format: {s:?}")))?;
    let m: i64 = m
        .parse()
        .map_err(|_| SchedulerError::BadInput(format!("invalid time format: {s:?}")))?;
    if !(0..24).contains(&h) || !(0..60).contains(&m) {
        return Err(SchedulerError::BadInput(format!(
            "time out of range: {s:?}"
        )));
    }
    Ok(h * 60 + m)
}

/// A worker's shift window normalized to `[start, end)` minutes since the
/// operating date's midnight, with `end` possibly `>= 1440` for overnight
/// shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    pub start: i64,
    pub end: i64,
    /// Whether `shift_end <= shift_start` before normalization (i.e. the
    /// raw, pre-normalization window actually crossed midnight). Needed to
    /// distinguish a same-day 00:00→08:00 shift from a normalized overnight
    /// one during timestamp reconstruction.
    raw_crossed_midnight: bool,
}

impl ShiftWindow {
    pub fn normalize(shift_start: &str, shift_end: &str) -> Result<Self, SchedulerError> {
        let start = parse_hhmm(shift_start)?;
        let mut end = parse_hhmm(shift_end)?;
        let raw_crossed_midnight = end <= start;
        if raw_crossed_midnight {
            end += 24 * 60;
        }
        Ok(Self {
            start,
            end,
            raw_crossed_midnight,
        })
    }

    pub fn length(&self) -> i64 {
        self.end - self.start
    }

    /// Work minutes left over once the mandatory break is removed. May be
    /// negative if `break_minutes` exceeds the shift; callers treat
    /// non-positive as "no candidate has any capacity here".
    pub fn available_minutes(&self, break_minutes: i64) -> i64 {
        self.length() - break_minutes
    }

    /// The fixed break window: starts 240 minutes after the normalized
    /// shift start, per the design's deliberate "break is not a decision
    /// variable" simplification.
    pub fn break_window(&self, break_minutes: i64) -> (i64, i64) {
        let break_start = self.start + 240;
        (break_start, break_start + break_minutes)
    }

    /// True if this shift is a "pure night shift" for display purposes:
    /// starts at midnight and ends at or before 08:00, pre-normalization.
    /// Such shifts are rendered on `date + 1` so they stay visible on an
    /// `08:00 → 08:00+1` Gantt timeline, even though technically they never
    /// crossed midnight.
    fn is_pure_night_shift(&self) -> bool {
        !self.raw_crossed_midnight && self.start == 0 && self.end <= 8 * 60
    }
}

/// Picks the day offset (`0` or `1`) for the two overnight display patterns
/// from the spec, based on a single reference minute. Callers reconstructing
/// a whole interval must derive this once from the interval's *start* and
/// reuse it for the end — see [`reconstruct_interval`] — since deciding it
/// independently per endpoint can place `end` on an earlier calendar day
/// than `start` whenever the interval straddles the 16:00 threshold.
fn day_offset_for(window: &ShiftWindow, minute: i64) -> i64 {
    if window.is_pure_night_shift() {
        1
    } else if window.end > 24 * 60 {
        // Evening-into-next-day shift: minutes before 16:00 are the
        // next-day portion, minutes at/after 16:00 are same-day.
        if minute < 16 * 60 {
            1
        } else {
            0
        }
    } else {
        0
    }
}

/// Converts a single normalized minute value (possibly `>= 1440`) into a
/// wall-clock timestamp on `date` or `date + 1`. For a start/end pair of the
/// same interval, prefer [`reconstruct_interval`], which picks the day
/// offset once from the start rather than once per endpoint.
pub fn reconstruct_timestamp(date: NaiveDate, window: &ShiftWindow, minute: i64) -> NaiveDateTime {
    let day_offset = day_offset_for(window, minute);
    let base = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
    base + chrono::Duration::days(day_offset) + chrono::Duration::minutes(minute)
}

/// Converts a `(start, end)` normalized-minute pair belonging to the same
/// interval into wall-clock timestamps, deciding the day offset once from
/// `start_minute` and applying it to both endpoints. This keeps an interval
/// that straddles the evening-into-next-day 16:00 threshold from having its
/// `end` land on an earlier calendar day than its `start`.
pub fn reconstruct_interval(
    date: NaiveDate,
    window: &ShiftWindow,
    start_minute: i64,
    end_minute: i64,
) -> (NaiveDateTime, NaiveDateTime) {
    let day_offset = day_offset_for(window, start_minute);
    let base = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
    let day = chrono::Duration::days(day_offset);
    (
        base + day + chrono::Duration::minutes(start_minute),
        base + day + chrono::Duration::minutes(end_minute),
    )
}

/// `ceil(60 * units / productivity)`, matching invariant 4.
pub fn ceil_duration_minutes(units: i64, productivity: i64) -> i64 {
    debug_assert!(productivity > 0);
    (60 * units + productivity - 1) / productivity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_hhmm() {
        assert_eq!(parse_hhmm("08:00").unwrap(), 480);
        assert_eq!(parse_hhmm("00:00").unwrap(), 0);
        assert_eq!(parse_hhmm("23:59").unwrap(), 1439);
    }

    #[test]
    fn rejects_malformed_time() {
        assert!(parse_hhmm("8:00:00:00").is_err());
        assert!(parse_hhmm("25:00").is_err());
        assert!(parse_hhmm("08:60").is_err());
        assert!(parse_hhmm("").is_err());
    }

    #[test]
    fn regular_shift_normalizes_to_itself() {
        let w = ShiftWindow::normalize("08:00", "16:00").unwrap();
        assert_eq!(w.start, 480);
        assert_eq!(w.end, 960);
        assert_eq!(w.length(), 480);
    }

    #[test]
    fn overnight_shift_extends_past_midnight() {
        let w = ShiftWindow::normalize("22:00", "06:00").unwrap();
        assert_eq!(w.start, 22 * 60);
        assert_eq!(w.end, 6 * 60 + 24 * 60);
        assert_eq!(w.length(), 8 * 60);
    }

    #[test]
    fn break_window_is_four_hours_in() {
        let w = ShiftWindow::normalize("08:00", "16:00").unwrap();
        let (bs, be) = w.break_window(60);
        assert_eq!(bs, 480 + 240);
        assert_eq!(be, 480 + 240 + 60);
    }

    #[test]
    fn available_minutes_subtracts_break() {
        let w = ShiftWindow::normalize("08:00", "16:00").unwrap();
        assert_eq!(w.available_minutes(60), 420);
    }

    #[test]
    fn ceil_duration_matches_examples() {
        assert_eq!(ceil_duration_minutes(50, 80), 38);
        assert_eq!(ceil_duration_minutes(40, 40), 60);
        assert_eq!(ceil_duration_minutes(0, 10), 0);
    }

    #[test]
    fn regular_shift_reconstructs_same_day() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 5).unwrap();
        let w = ShiftWindow::normalize("08:00", "16:00").unwrap();
        let ts = reconstruct_timestamp(date, &w, 500);
        assert_eq!(ts.date(), date);
    }

    #[test]
    fn pure_night_shift_reconstructs_next_day() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 5).unwrap();
        let w = ShiftWindow::normalize("00:00", "08:00").unwrap();
        let ts = reconstruct_timestamp(date, &w, 100);
        assert_eq!(ts.date(), date.succ_opt().unwrap());
    }

    #[test]
    fn evening_shift_splits_at_sixteen_hundred() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 5).unwrap();
        let w = ShiftWindow::normalize("16:00", "00:00").unwrap();
        assert_eq!(w.end, 24 * 60);

        let late = reconstruct_timestamp(date, &w, 17 * 60);
        assert_eq!(late.date(), date);

        // after normalization, minutes past 1440 represent the next day's
        // early hours — but this shift's domain never reaches below 16:00
        // on a fresh day, so exercise the split using a wider window.
        let w2 = ShiftWindow::normalize("18:00", "10:00").unwrap();
        assert!(w2.end > 24 * 60);
        let early = reconstruct_timestamp(date, &w2, 9 * 60);
        assert_eq!(early.date(), date.succ_opt().unwrap());
        let evening = reconstruct_timestamp(date, &w2, 19 * 60);
        assert_eq!(evening.date(), date);
    }

    #[test]
    fn interval_straddling_sixteen_hundred_keeps_start_before_end() {
        // "14:00" -> "02:00" normalizes to start=840, end=1560 (> 1440).
        let date = NaiveDate::from_ymd_opt(2025, 8, 5).unwrap();
        let w = ShiftWindow::normalize("14:00", "02:00").unwrap();
        assert!(w.end > 24 * 60);

        // start=930 (15:30, before the threshold), end=1020 (17:00, at/after it).
        let (start, end) = reconstruct_interval(date, &w, 930, 1020);
        assert!(start < end);
        assert_eq!(start.date(), date.succ_opt().unwrap());
        assert_eq!(end.date(), date.succ_opt().unwrap());
        assert_eq!(start.format("%H:%M").to_string(), "15:30");
        assert_eq!(end.format("%H:%M").to_string(), "17:00");
    }
}
