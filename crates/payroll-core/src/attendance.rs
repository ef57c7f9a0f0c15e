//! # Attendance Normalization
//!
//! Converts one raw clock-in/clock-out record plus the employee's schedule
//! into canonical worked segments and day flags.
//!
//! ## The Timeline Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Minutes-from-midnight of the record date, extended past 1440 for      │
//! │  overnight shifts:                                                     │
//! │                                                                        │
//! │        07:50    08:00              17:00   17:30                       │
//! │  ───────┬────────┬───────────────────┬──────┬────────────────────────  │
//! │         │ early  │   regular hours   │  OT  │                          │
//! │         │ (10m,  │  (break window    │(30m) │                          │
//! │         │ unpaid)│   subtracted)     │      │                          │
//! │                                                                        │
//! │  Early clock-in policy: the 10 early minutes are NOT paid as regular  │
//! │  time, and are additionally deducted from overtime earned at the end  │
//! │  of the shift (30m → 20m), floored at zero. Regular pay is never      │
//! │  reduced by an early arrival.                                         │
//! │                                                                        │
//! │  Night differential window: 22:00–06:00, crossing midnight. Any       │
//! │  intersection with a worked span is split out, whether the span is    │
//! │  regular or overtime.                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The overtime deduction trims the *tail* of the overtime span before the
//! night-diff split, so night-diff earned inside regular hours is never
//! reduced by an early arrival.

use crate::error::ComputeError;
use crate::types::{
    minutes_of, AttendanceFlags, AttendanceRecord, BreakPolicy, ClockState, Schedule, TimeType,
    WorkedSegment, WorkedSegments,
};
use crate::validation::validate_schedule;
use crate::{NIGHT_DIFF_END_MIN, NIGHT_DIFF_START_MIN};

const DAY_MIN: i64 = 24 * 60;

/// Night-diff windows on the extended timeline.
///
/// A worked interval lives in [0, 2880): clock-in is on the record date
/// and a shift spans at most 24 hours.
const ND_WINDOWS: [(i64, i64); 3] = [
    (0, NIGHT_DIFF_END_MIN),                              // 00:00–06:00 day 1
    (NIGHT_DIFF_START_MIN, DAY_MIN + NIGHT_DIFF_END_MIN), // 22:00 day 1 – 06:00 day 2
    (DAY_MIN + NIGHT_DIFF_START_MIN, 2 * DAY_MIN),        // 22:00 day 2 onward
];

/// Splits a half-open span into (night-diff minutes, other minutes).
fn split_night_diff(span: (i64, i64)) -> (i64, i64) {
    let len = span.1 - span.0;
    let nd: i64 = ND_WINDOWS
        .iter()
        .map(|&(ws, we)| (span.1.min(we) - span.0.max(ws)).max(0))
        .sum();
    (nd, len - nd)
}

/// Subtracts a break window from a span, yielding up to two spans.
fn subtract_window(span: (i64, i64), window: (i64, i64)) -> Vec<(i64, i64)> {
    let mut out = Vec::with_capacity(2);
    let before = (span.0, span.1.min(window.0));
    let after = (span.0.max(window.1), span.1);
    if before.1 > before.0 {
        out.push(before);
    }
    if after.1 > after.0 {
        out.push(after);
    }
    out
}

/// Normalizes one attendance record against the employee's schedule.
///
/// ## Output Invariants
/// - Segments are non-overlapping; their minutes sum to elapsed time
///   minus break overlap, minus unpaid early minutes, minus the
///   early-arrival overtime deduction.
/// - An open record is an error, never a fabricated time-out.
/// - A paid leave day yields zero segments and the scheduled minutes as
///   `leave_minutes`; unpaid leave yields nothing.
pub fn normalize(
    record: &AttendanceRecord,
    schedule: &Schedule,
) -> Result<WorkedSegments, ComputeError> {
    validate_schedule(schedule).map_err(|reason| ComputeError::InvalidSchedule { reason })?;

    let (time_in, time_out) = match record.clock {
        ClockState::Open { .. } => {
            return Err(ComputeError::OpenAttendance { date: record.date });
        }
        ClockState::OnLeave { paid } => {
            return Ok(WorkedSegments {
                date: record.date,
                segments: Vec::new(),
                leave_minutes: if paid { schedule.scheduled_minutes() } else { 0 },
                early_minutes: 0,
                overtime_deducted_minutes: 0,
                flags: AttendanceFlags::default(),
            });
        }
        ClockState::Closed { time_in, time_out } => (time_in, time_out),
    };

    let t_in = minutes_of(time_in);
    let mut t_out = minutes_of(time_out);
    if t_out < t_in {
        t_out += DAY_MIN; // overnight shift
    }
    if t_out == t_in {
        return Err(ComputeError::EmptyWorkedInterval { date: record.date });
    }

    let (sched_start, sched_end) = schedule.shift_bounds();

    // A clock pair that sits entirely after midnight on an overnight
    // schedule belongs to the tail of that shift, not to the next
    // morning. Anchor it past the wrap so a late arrival reads as late,
    // not as a day-long early arrival.
    let (t_in, t_out) = if sched_end > DAY_MIN && t_out <= sched_end - DAY_MIN {
        (t_in + DAY_MIN, t_out + DAY_MIN)
    } else {
        (t_in, t_out)
    };

    // Minutes before the scheduled start: unpaid, and later deducted from
    // overtime earned at the end of the shift.
    let early_minutes = (sched_start - t_in).max(0);
    let paid_start = t_in.max(sched_start);

    // In-schedule spans, with the break removed.
    let regular_window = (paid_start, t_out.min(sched_end));
    let regular_spans: Vec<(i64, i64)> = if regular_window.1 > regular_window.0 {
        match schedule.break_policy {
            BreakPolicy::None => vec![regular_window],
            // A positionless break shrinks the in-schedule tail.
            BreakPolicy::Fixed { minutes } => {
                let end = (regular_window.1 - minutes).max(regular_window.0);
                if end > regular_window.0 {
                    vec![(regular_window.0, end)]
                } else {
                    Vec::new()
                }
            }
            BreakPolicy::Window { start, end } => {
                let bs = minutes_of(start);
                let mut be = minutes_of(end);
                if be <= bs {
                    be += DAY_MIN;
                }
                subtract_window(regular_window, (bs, be))
            }
        }
    } else {
        Vec::new()
    };

    // Overtime span past the scheduled end, with the early-arrival
    // deduction trimming its tail (capped at the overtime earned).
    let ot_start = sched_end.max(paid_start);
    let mut ot_end = t_out;
    let mut overtime_deducted = 0;
    if ot_end > ot_start {
        overtime_deducted = early_minutes.min(ot_end - ot_start);
        ot_end -= overtime_deducted;
    } else {
        ot_end = ot_start;
    }

    // Split every span against the night-diff window and collapse into
    // per-(day_type, time_type) segments.
    let mut regular = 0i64;
    let mut night_diff = 0i64;
    for &span in &regular_spans {
        let (nd, other) = split_night_diff(span);
        night_diff += nd;
        regular += other;
    }
    let (ot_night_diff, overtime) = if ot_end > ot_start {
        split_night_diff((ot_start, ot_end))
    } else {
        (0, 0)
    };

    let mut segments = Vec::with_capacity(4);
    let mut push = |time_type: TimeType, minutes: i64| {
        if minutes > 0 {
            segments.push(WorkedSegment {
                day_type: record.day_type,
                time_type,
                minutes,
            });
        }
    };
    push(TimeType::Regular, regular);
    push(TimeType::NightDiff, night_diff);
    push(TimeType::Overtime, overtime);
    push(TimeType::OvertimeNightDiff, ot_night_diff);

    let scheduled = schedule.scheduled_minutes();
    let in_schedule = regular + night_diff;
    let flags = AttendanceFlags {
        late_minutes: (t_in - sched_start).max(0),
        undertime_minutes: (scheduled - in_schedule).max(0),
        halfday: in_schedule * 2 < scheduled,
    };

    Ok(WorkedSegments {
        date: record.date,
        segments,
        leave_minutes: 0,
        early_minutes,
        overtime_deducted_minutes: overtime_deducted,
        flags,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DayType;
    use chrono::{NaiveDate, NaiveTime};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn day_schedule() -> Schedule {
        Schedule {
            start: t(8, 0),
            end: t(17, 0),
            break_policy: BreakPolicy::Window {
                start: t(12, 0),
                end: t(13, 0),
            },
            workdays: 0b0011111,
        }
    }

    fn closed(day_type: DayType, time_in: NaiveTime, time_out: NaiveTime) -> AttendanceRecord {
        AttendanceRecord {
            employee_id: "e".to_string(),
            date: date(),
            day_type,
            clock: ClockState::Closed { time_in, time_out },
        }
    }

    fn minutes_for(segments: &WorkedSegments, time_type: TimeType) -> i64 {
        segments
            .segments
            .iter()
            .filter(|s| s.time_type == time_type)
            .map(|s| s.minutes)
            .sum()
    }

    /// The canonical early clock-in scenario: 07:50 in, 08:00–17:00
    /// schedule with a 12:00–13:00 break, 17:30 out. Ten early minutes
    /// must reduce the 30-minute overtime to 20, never regular pay.
    #[test]
    fn test_early_clock_in_deducts_from_overtime() {
        let record = closed(DayType::Regular, t(7, 50), t(17, 30));
        let out = normalize(&record, &day_schedule()).unwrap();

        assert_eq!(out.early_minutes, 10);
        assert_eq!(out.overtime_deducted_minutes, 10);
        assert_eq!(minutes_for(&out, TimeType::Regular), 480);
        assert_eq!(minutes_for(&out, TimeType::Overtime), 20);
        assert!(!out.flags.is_late());
        assert!(!out.flags.is_undertime());
    }

    #[test]
    fn test_early_clock_in_never_goes_negative() {
        // Out exactly on time: no overtime to absorb the early minutes.
        let record = closed(DayType::Regular, t(7, 30), t(17, 0));
        let out = normalize(&record, &day_schedule()).unwrap();

        assert_eq!(out.early_minutes, 30);
        assert_eq!(out.overtime_deducted_minutes, 0);
        assert_eq!(minutes_for(&out, TimeType::Regular), 480);
        assert_eq!(out.overtime_minutes(), 0);
    }

    #[test]
    fn test_on_time_full_day() {
        let record = closed(DayType::Regular, t(8, 0), t(17, 0));
        let out = normalize(&record, &day_schedule()).unwrap();

        assert_eq!(out.total_minutes(), 480);
        assert_eq!(minutes_for(&out, TimeType::Regular), 480);
        assert_eq!(out.flags, AttendanceFlags::default());
    }

    #[test]
    fn test_open_record_is_an_error() {
        let record = AttendanceRecord {
            employee_id: "e".to_string(),
            date: date(),
            day_type: DayType::Regular,
            clock: ClockState::Open { time_in: t(8, 0) },
        };
        assert_eq!(
            normalize(&record, &day_schedule()),
            Err(ComputeError::OpenAttendance { date: date() })
        );
    }

    #[test]
    fn test_overnight_shift_is_all_night_diff() {
        let schedule = Schedule {
            start: t(22, 0),
            end: t(6, 0),
            break_policy: BreakPolicy::None,
            workdays: 0b0011111,
        };
        let record = closed(DayType::Regular, t(22, 0), t(6, 0));
        let out = normalize(&record, &schedule).unwrap();

        assert_eq!(minutes_for(&out, TimeType::NightDiff), 480);
        assert_eq!(minutes_for(&out, TimeType::Regular), 0);
    }

    /// Arriving after midnight on an overnight shift is a late arrival
    /// into the shift's tail, not an early arrival for the next day.
    #[test]
    fn test_post_midnight_arrival_on_overnight_shift_is_late() {
        let schedule = Schedule {
            start: t(22, 0),
            end: t(6, 0),
            break_policy: BreakPolicy::None,
            workdays: 0b0011111,
        };
        let record = closed(DayType::Regular, t(0, 30), t(6, 0));
        let out = normalize(&record, &schedule).unwrap();

        // 00:30–06:00 is 330 minutes, all inside the night-diff window.
        assert_eq!(minutes_for(&out, TimeType::NightDiff), 330);
        assert_eq!(minutes_for(&out, TimeType::Regular), 0);
        assert_eq!(out.early_minutes, 0);
        assert_eq!(out.flags.late_minutes, 150);
        assert_eq!(out.flags.undertime_minutes, 150);
        assert!(!out.flags.halfday);
    }

    #[test]
    fn test_overtime_crossing_into_night_window() {
        let schedule = Schedule {
            start: t(13, 0),
            end: t(22, 0),
            break_policy: BreakPolicy::None,
            workdays: 0b0011111,
        };
        let record = closed(DayType::Regular, t(13, 0), t(23, 30));
        let out = normalize(&record, &schedule).unwrap();

        assert_eq!(minutes_for(&out, TimeType::Regular), 540);
        assert_eq!(minutes_for(&out, TimeType::OvertimeNightDiff), 90);
        assert_eq!(minutes_for(&out, TimeType::Overtime), 0);
    }

    #[test]
    fn test_early_deduction_trims_overtime_tail_in_night_window() {
        // Ten early minutes; the OT span 22:00–23:30 is inside the night
        // window, so the trim comes off overtime-night-diff.
        let schedule = Schedule {
            start: t(13, 0),
            end: t(22, 0),
            break_policy: BreakPolicy::None,
            workdays: 0b0011111,
        };
        let record = closed(DayType::Regular, t(12, 50), t(23, 30));
        let out = normalize(&record, &schedule).unwrap();

        assert_eq!(out.overtime_deducted_minutes, 10);
        assert_eq!(minutes_for(&out, TimeType::OvertimeNightDiff), 80);
        // Regular-hours pay untouched by the early arrival.
        assert_eq!(minutes_for(&out, TimeType::Regular), 540);
    }

    #[test]
    fn test_rest_day_segments_carry_rest_day_type() {
        let record = closed(DayType::RestDay, t(8, 0), t(17, 0));
        let out = normalize(&record, &day_schedule()).unwrap();

        assert!(out.segments.iter().all(|s| s.day_type == DayType::RestDay));
        assert_eq!(out.total_minutes(), 480);
    }

    #[test]
    fn test_late_and_halfday_flags() {
        // In 08:30, out 13:00: 30 late minutes; 210 paid minutes is less
        // than half the 480-minute shift.
        let record = closed(DayType::Regular, t(8, 30), t(13, 0));
        let out = normalize(&record, &day_schedule()).unwrap();

        assert_eq!(out.flags.late_minutes, 30);
        assert_eq!(out.total_minutes(), 210);
        assert_eq!(out.flags.undertime_minutes, 270);
        assert!(out.flags.halfday);
    }

    #[test]
    fn test_paid_leave_earns_scheduled_minutes() {
        let record = AttendanceRecord {
            employee_id: "e".to_string(),
            date: date(),
            day_type: DayType::Regular,
            clock: ClockState::OnLeave { paid: true },
        };
        let out = normalize(&record, &day_schedule()).unwrap();
        assert!(out.segments.is_empty());
        assert_eq!(out.leave_minutes, 480);

        let record = AttendanceRecord {
            clock: ClockState::OnLeave { paid: false },
            ..record
        };
        let out = normalize(&record, &day_schedule()).unwrap();
        assert_eq!(out.leave_minutes, 0);
    }

    /// Conservation: segments account for elapsed − break − early − deduction.
    #[test]
    fn test_conservation() {
        let record = closed(DayType::Regular, t(7, 50), t(17, 30));
        let out = normalize(&record, &day_schedule()).unwrap();

        let elapsed = (17 * 60 + 30) - (7 * 60 + 50);
        let break_overlap = 60;
        assert_eq!(
            out.total_minutes(),
            elapsed - break_overlap - out.early_minutes - out.overtime_deducted_minutes
        );
    }
}
