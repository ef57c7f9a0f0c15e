//! # Domain Types
//!
//! Core domain types for the payroll computation pipeline.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────┐      │
//! │  │ AttendanceRecord │  │     Schedule     │  │ EmployeeProfile  │      │
//! │  │  ──────────────  │  │  ──────────────  │  │  ──────────────  │      │
//! │  │  date            │  │  start / end     │  │  id (UUID)       │      │
//! │  │  day_type        │  │  break policy    │  │  employee_no     │      │
//! │  │  clock (enum!)   │  │  workdays mask   │  │  hourly_rate     │      │
//! │  └────────┬─────────┘  └────────┬─────────┘  └──────────────────┘      │
//! │           │                     │                                       │
//! │           ▼                     ▼                                       │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            WorkedSegments               │  normalize() output       │
//! │  │  (DayType, TimeType, minutes) list      │                           │
//! │  └─────────────────────────────────────────┘                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Employees have:
//! - `id`: UUID v4 string - immutable, used for storage relations
//! - `employee_no`: human-readable business identifier
//!
//! ## Sum Types Over Flag Soup
//! The clock state is `ClockState::{Open, Closed, OnLeave}` — a record can
//! never claim to be simultaneously present and absent, and an open record
//! cannot accidentally carry a fabricated time-out.

use chrono::{NaiveDate, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Day Type / Time Type
// =============================================================================

/// Classification of the calendar day being worked.
///
/// Taken from the attendance record (which in turn comes from the holiday
/// calendar and the employee's rest-day assignment). Exactly one per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    /// An ordinary scheduled working day.
    Regular,
    /// The employee's scheduled day off; work performed earns a premium.
    RestDay,
    /// A regular (legal) holiday — 200% pay when worked.
    RegularHoliday,
    /// A special (non-working) holiday — 130% pay when worked.
    SpecialHoliday,
}

impl DayType {
    /// Every day type, for exhaustive table validation.
    pub const ALL: [DayType; 4] = [
        DayType::Regular,
        DayType::RestDay,
        DayType::RegularHoliday,
        DayType::SpecialHoliday,
    ];
}

/// Classification of a slice of worked time within a day.
///
/// Night-diff stacking is expressed as dedicated variants rather than a
/// boolean flag so the (DayType, TimeType) pair forms a complete composite
/// key into the rate multiplier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TimeType {
    /// Inside the scheduled shift, outside the night window.
    Regular,
    /// Past the scheduled shift end, outside the night window.
    Overtime,
    /// Inside the scheduled shift and inside 22:00–06:00.
    NightDiff,
    /// Past the scheduled shift end and inside 22:00–06:00.
    OvertimeNightDiff,
}

impl TimeType {
    /// Every time type, for exhaustive table validation.
    pub const ALL: [TimeType; 4] = [
        TimeType::Regular,
        TimeType::Overtime,
        TimeType::NightDiff,
        TimeType::OvertimeNightDiff,
    ];

    /// Whether this slice belongs to the overtime group of the breakdown.
    #[inline]
    pub const fn is_overtime(&self) -> bool {
        matches!(self, TimeType::Overtime | TimeType::OvertimeNightDiff)
    }

    /// Whether this slice falls inside the night differential window.
    #[inline]
    pub const fn is_night_diff(&self) -> bool {
        matches!(self, TimeType::NightDiff | TimeType::OvertimeNightDiff)
    }
}

// =============================================================================
// Pay Category
// =============================================================================

/// The closed set of payslip line categories.
///
/// ## Why an Enum?
/// The predecessor of this engine keyed its breakdown document by free-form
/// strings, which allowed `total` to drift out of sync with the parts and
/// let typo'd categories vanish from audits. Every reachable
/// (DayType, TimeType) pair maps to exactly one variant here, and `total`
/// is always derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PayCategory {
    Regular,
    NightDiff,
    OvertimeRegular,
    OvertimeNightDiff,
    RestDay,
    RestDayNightDiff,
    RestDayOvertime,
    RestDayOvertimeNightDiff,
    HolidayRegular,
    HolidayRegularNightDiff,
    HolidayRegularOvertime,
    HolidayRegularOvertimeNightDiff,
    HolidaySpecial,
    HolidaySpecialNightDiff,
    HolidaySpecialOvertime,
    HolidaySpecialOvertimeNightDiff,
    /// Paid leave hours (always 1.00×, no table lookup).
    Leave,
}

impl PayCategory {
    /// Maps a composite rate key to its payslip category.
    ///
    /// Exhaustive over all 16 combinations — the compiler guarantees no
    /// reachable key is missing a category.
    pub const fn from_key(day: DayType, time: TimeType) -> PayCategory {
        use DayType as D;
        use TimeType as T;
        match (day, time) {
            (D::Regular, T::Regular) => PayCategory::Regular,
            (D::Regular, T::NightDiff) => PayCategory::NightDiff,
            (D::Regular, T::Overtime) => PayCategory::OvertimeRegular,
            (D::Regular, T::OvertimeNightDiff) => PayCategory::OvertimeNightDiff,
            (D::RestDay, T::Regular) => PayCategory::RestDay,
            (D::RestDay, T::NightDiff) => PayCategory::RestDayNightDiff,
            (D::RestDay, T::Overtime) => PayCategory::RestDayOvertime,
            (D::RestDay, T::OvertimeNightDiff) => PayCategory::RestDayOvertimeNightDiff,
            (D::RegularHoliday, T::Regular) => PayCategory::HolidayRegular,
            (D::RegularHoliday, T::NightDiff) => PayCategory::HolidayRegularNightDiff,
            (D::RegularHoliday, T::Overtime) => PayCategory::HolidayRegularOvertime,
            (D::RegularHoliday, T::OvertimeNightDiff) => {
                PayCategory::HolidayRegularOvertimeNightDiff
            }
            (D::SpecialHoliday, T::Regular) => PayCategory::HolidaySpecial,
            (D::SpecialHoliday, T::NightDiff) => PayCategory::HolidaySpecialNightDiff,
            (D::SpecialHoliday, T::Overtime) => PayCategory::HolidaySpecialOvertime,
            (D::SpecialHoliday, T::OvertimeNightDiff) => {
                PayCategory::HolidaySpecialOvertimeNightDiff
            }
        }
    }

    /// Stable snake_case key used in serialized breakdowns and diffs.
    pub const fn slug(&self) -> &'static str {
        match self {
            PayCategory::Regular => "regular",
            PayCategory::NightDiff => "night_diff",
            PayCategory::OvertimeRegular => "overtime_regular",
            PayCategory::OvertimeNightDiff => "overtime_night_diff",
            PayCategory::RestDay => "rest_day",
            PayCategory::RestDayNightDiff => "rest_day_night_diff",
            PayCategory::RestDayOvertime => "rest_day_overtime",
            PayCategory::RestDayOvertimeNightDiff => "rest_day_overtime_night_diff",
            PayCategory::HolidayRegular => "holiday_regular",
            PayCategory::HolidayRegularNightDiff => "holiday_regular_night_diff",
            PayCategory::HolidayRegularOvertime => "holiday_regular_overtime",
            PayCategory::HolidayRegularOvertimeNightDiff => {
                "holiday_regular_overtime_night_diff"
            }
            PayCategory::HolidaySpecial => "holiday_special",
            PayCategory::HolidaySpecialNightDiff => "holiday_special_night_diff",
            PayCategory::HolidaySpecialOvertime => "holiday_special_overtime",
            PayCategory::HolidaySpecialOvertimeNightDiff => {
                "holiday_special_overtime_night_diff"
            }
            PayCategory::Leave => "leave",
        }
    }

    /// Whether this category covers hours inside the night-diff window.
    pub const fn is_night_diff(&self) -> bool {
        matches!(
            self,
            PayCategory::NightDiff
                | PayCategory::OvertimeNightDiff
                | PayCategory::RestDayNightDiff
                | PayCategory::RestDayOvertimeNightDiff
                | PayCategory::HolidayRegularNightDiff
                | PayCategory::HolidayRegularOvertimeNightDiff
                | PayCategory::HolidaySpecialNightDiff
                | PayCategory::HolidaySpecialOvertimeNightDiff
        )
    }
}

// =============================================================================
// Employee Profile
// =============================================================================

/// The contract facts the pipeline needs about one employee.
///
/// CRUD for the full employee entity lives in an external collaborator;
/// this is the narrow read model consumed per run.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmployeeProfile {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Human-readable business identifier (badge/RFID number).
    pub employee_no: String,

    /// Display name for the payslip header.
    pub name: String,

    /// Contract hourly rate in centavos.
    pub hourly_rate_cents: i64,

    /// Monthly basic salary in centavos (contribution base).
    pub monthly_rate_cents: i64,
}

impl EmployeeProfile {
    /// Returns the hourly rate as Money.
    #[inline]
    pub fn hourly_rate(&self) -> crate::money::Money {
        crate::money::Money::from_cents(self.hourly_rate_cents)
    }

    /// Returns the monthly rate as Money.
    #[inline]
    pub fn monthly_rate(&self) -> crate::money::Money {
        crate::money::Money::from_cents(self.monthly_rate_cents)
    }
}

// =============================================================================
// Schedule
// =============================================================================

/// How mid-shift breaks are deducted from worked time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BreakPolicy {
    /// No unpaid break.
    None,
    /// A fixed clock window; only the overlap with worked time is deducted.
    Window {
        #[ts(as = "String")]
        start: NaiveTime,
        #[ts(as = "String")]
        end: NaiveTime,
    },
    /// A flat deduction regardless of when the break is taken.
    Fixed { minutes: i64 },
}

/// An employee's assigned work schedule.
///
/// Owned by schedule-assignment storage; the pipeline only reads it.
/// Shifts may cross midnight (`end <= start` means next-day end).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Schedule {
    /// Shift start time.
    #[ts(as = "String")]
    pub start: NaiveTime,

    /// Shift end time (next day if `end <= start`).
    #[ts(as = "String")]
    pub end: NaiveTime,

    /// Unpaid break rule.
    pub break_policy: BreakPolicy,

    /// Working days as a bitmask, bit 0 = Monday … bit 6 = Sunday.
    pub workdays: u8,
}

/// Minutes-from-midnight helper for clock times.
#[inline]
pub(crate) fn minutes_of(t: NaiveTime) -> i64 {
    (t.hour() * 60 + t.minute()) as i64
}

impl Schedule {
    /// Builds a workdays bitmask from a weekday list.
    pub fn workdays_mask(days: &[Weekday]) -> u8 {
        days.iter()
            .fold(0u8, |mask, d| mask | 1 << (d.num_days_from_monday() as u8))
    }

    /// Whether the given weekday is a scheduled working day.
    pub fn is_workday(&self, day: Weekday) -> bool {
        self.workdays & (1 << (day.num_days_from_monday() as u8)) != 0
    }

    /// Shift bounds as minutes from midnight; end is pushed past 1440
    /// when the shift crosses midnight.
    pub(crate) fn shift_bounds(&self) -> (i64, i64) {
        let start = minutes_of(self.start);
        let mut end = minutes_of(self.end);
        if end <= start {
            end += 24 * 60;
        }
        (start, end)
    }

    /// Scheduled paid minutes for a full shift (break removed).
    pub fn scheduled_minutes(&self) -> i64 {
        let (start, end) = self.shift_bounds();
        let shift = end - start;
        match self.break_policy {
            BreakPolicy::None => shift,
            BreakPolicy::Fixed { minutes } => (shift - minutes).max(0),
            BreakPolicy::Window { start: bs, end: be } => {
                let (bs, be) = (minutes_of(bs), minutes_of(be));
                let be = if be <= bs { be + 24 * 60 } else { be };
                let overlap = (be.min(end) - bs.max(start)).max(0);
                shift - overlap
            }
        }
    }
}

// =============================================================================
// Attendance Record
// =============================================================================

/// The clock state of an attendance record.
///
/// A sum type instead of nullable time fields: an open record carries no
/// time-out at all, and a leave day carries no clock events at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClockState {
    /// Clock-in recorded, shift not finished. Produces no pay segments.
    Open {
        #[ts(as = "String")]
        time_in: NaiveTime,
    },
    /// Complete clock pair. `time_out <= time_in` means an overnight shift.
    Closed {
        #[ts(as = "String")]
        time_in: NaiveTime,
        #[ts(as = "String")]
        time_out: NaiveTime,
    },
    /// Approved leave; paid leave earns the scheduled hours at 1.00×.
    OnLeave { paid: bool },
}

/// One employee-day of raw attendance.
///
/// Created on clock-in, completed on clock-out or manual edit, immutable
/// once consumed by a payroll run. Invariant (enforced upstream and
/// re-checked in the run): exactly one record per employee per date.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AttendanceRecord {
    /// Employee UUID this record belongs to.
    pub employee_id: String,

    /// Calendar date of the shift start.
    #[ts(as = "String")]
    pub date: NaiveDate,

    /// Day classification from the holiday calendar / rest-day assignment.
    pub day_type: DayType,

    /// Clock events for the day.
    pub clock: ClockState,
}

// =============================================================================
// Worked Segments (normalizer output)
// =============================================================================

/// A contiguous-equivalent slice of paid time at one composite rate key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WorkedSegment {
    pub day_type: DayType,
    pub time_type: TimeType,
    /// Whole minutes; decimal hours exist only at the display layer.
    pub minutes: i64,
}

/// Flags derived from a day's clock events versus the schedule.
///
/// Outputs of normalization, never inputs — upstream systems cannot hand
/// us contradictory flag combinations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AttendanceFlags {
    /// Minutes clocked in after the scheduled start.
    pub late_minutes: i64,
    /// Paid minutes short of the full scheduled shift.
    pub undertime_minutes: i64,
    /// Worked less than half the scheduled shift.
    pub halfday: bool,
}

impl AttendanceFlags {
    #[inline]
    pub const fn is_late(&self) -> bool {
        self.late_minutes > 0
    }

    #[inline]
    pub const fn is_undertime(&self) -> bool {
        self.undertime_minutes > 0
    }
}

/// The canonical output of attendance normalization for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WorkedSegments {
    #[ts(as = "String")]
    pub date: NaiveDate,

    /// Non-overlapping paid segments; empty on a leave day.
    pub segments: Vec<WorkedSegment>,

    /// Paid-leave minutes (scheduled minutes on a paid leave day).
    pub leave_minutes: i64,

    /// Minutes clocked in before the scheduled start (unpaid).
    pub early_minutes: i64,

    /// Overtime minutes removed by the early clock-in policy.
    pub overtime_deducted_minutes: i64,

    /// Late/undertime/half-day findings for the audit display.
    pub flags: AttendanceFlags,
}

impl WorkedSegments {
    /// Total paid clock minutes across all segments (excludes leave).
    pub fn total_minutes(&self) -> i64 {
        self.segments.iter().map(|s| s.minutes).sum()
    }

    /// Paid minutes in the overtime group.
    pub fn overtime_minutes(&self) -> i64 {
        self.segments
            .iter()
            .filter(|s| s.time_type.is_overtime())
            .map(|s| s.minutes)
            .sum()
    }

    /// Paid minutes in the worked-hours group.
    pub fn worked_minutes(&self) -> i64 {
        self.total_minutes() - self.overtime_minutes()
    }
}

// =============================================================================
// Pay Period & Loan Deductions
// =============================================================================

/// The payroll period header reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PayPeriod {
    #[ts(as = "String")]
    pub start: NaiveDate,
    #[ts(as = "String")]
    pub end: NaiveDate,
}

/// A loan/advance installment due this period.
///
/// Read-only view from the external loan ledger. Amortization state
/// (balance decrement) is the ledger's responsibility — the pipeline only
/// records the amount it deducted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoanDeduction {
    /// Ledger reference for reconciliation.
    pub reference: String,

    /// Label shown on the payslip ("SSS salary loan", "Cash advance").
    pub label: String,

    /// Installment amount due this period, in centavos.
    pub amount_cents: i64,
}

/// A one-off addition to gross pay for the period.
///
/// Granted by the external compensation admin; the pipeline adds it to
/// gross (and therefore to the tax base) and reports it itemized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Bonus {
    /// Label shown on the payslip ("Perfect attendance", "Performance").
    pub label: String,

    /// Bonus amount in centavos.
    pub amount_cents: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
