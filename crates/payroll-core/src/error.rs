//! # Error Types
//!
//! Domain-specific error types for payroll-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  payroll-core errors (this file)                                       │
//! │  ├── ConfigError   - Bad rate tables/brackets. FATAL for a whole run:  │
//! │  │                   a silently-wrong rate corrupts every payslip,    │
//! │  │                   so the run aborts before any employee.           │
//! │  ├── ComputeError  - Per-employee input/invariant problems.           │
//! │  │                   RECOVERABLE: skip the employee with a reason,    │
//! │  │                   keep processing the batch.                       │
//! │  └── PayrollError  - Either of the above, for pipeline seams.         │
//! │                                                                       │
//! │  Persistence/HTTP errors live in the calling service, not here.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (employee id, bracket bounds, etc.)
//! 3. Errors are enum variants, never String
//! 4. The fatal/recoverable split mirrors the batch-run semantics

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::types::{DayType, TimeType};

// =============================================================================
// Config Error (fatal for a payroll run)
// =============================================================================

/// Configuration errors in a `PayrollConfig` snapshot.
///
/// Detected by `PayrollConfig::validate()` before any employee is processed.
/// Any of these aborts the entire run — no payslip may be produced against
/// a broken rate table.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ConfigError {
    /// The multiplier table has no entry for a reachable composite key.
    ///
    /// A missing entry is never defaulted to 1.0× — underpaying an
    /// employee silently is worse than refusing to run.
    #[error("No rate multiplier for ({day_type:?}, {time_type:?})")]
    MissingRateEntry {
        day_type: DayType,
        time_type: TimeType,
    },

    /// The multiplier table has two entries for the same composite key.
    #[error("Duplicate rate multiplier for ({day_type:?}, {time_type:?})")]
    DuplicateRateEntry {
        day_type: DayType,
        time_type: TimeType,
    },

    /// A multiplier below 1.0× (10000 bps) or absurdly large.
    #[error("Multiplier {bps} bps for ({day_type:?}, {time_type:?}) is out of range")]
    InvalidMultiplier {
        day_type: DayType,
        time_type: TimeType,
        bps: u32,
    },

    /// A contribution/tax table has no brackets at all.
    #[error("{table} bracket table is empty")]
    EmptyBracketTable { table: &'static str },

    /// Brackets do not partition [0, ∞): the first bracket must start at 0.
    #[error("{table} brackets must start at 0, first lower bound is {lower_cents}")]
    BracketsNotFromZero { table: &'static str, lower_cents: i64 },

    /// A gap or overlap between consecutive brackets.
    ///
    /// Ranges are half-open `[lower, upper)`; each bracket's lower bound
    /// must equal the previous bracket's upper bound exactly.
    #[error("{table} bracket at {lower_cents} does not continue from {expected_cents}")]
    BracketDiscontinuity {
        table: &'static str,
        expected_cents: i64,
        lower_cents: i64,
    },

    /// A bracket whose upper bound is not above its lower bound.
    #[error("{table} bracket [{lower_cents}, {upper_cents}) is empty or inverted")]
    BracketInverted {
        table: &'static str,
        lower_cents: i64,
        upper_cents: i64,
    },

    /// The last bracket must be unbounded so every input resolves.
    #[error("{table} brackets do not cover [0, ∞): last bracket ends at {upper_cents}")]
    BracketsNotExhaustive { table: &'static str, upper_cents: i64 },
}

// =============================================================================
// Compute Error (recoverable, per-employee)
// =============================================================================

/// Per-employee computation failures.
///
/// These skip one employee inside a batch run; they never abort the run.
/// Serializable so a run summary can carry structured skip reasons.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ComputeError {
    /// Attendance record has a time-in but no time-out.
    ///
    /// ## When This Occurs
    /// - Employee forgot to clock out
    /// - The record was consumed before the shift ended
    ///
    /// We never fabricate a time-out; the record stays "open" and the
    /// employee is skipped with this reason.
    #[error("Attendance for {date} is still open (no time-out)")]
    OpenAttendance { date: NaiveDate },

    /// Clock-out is not after clock-in (after overnight adjustment).
    #[error("Attendance for {date} has a zero or negative worked interval")]
    EmptyWorkedInterval { date: NaiveDate },

    /// More than one attendance record for the same calendar date.
    ///
    /// Invariant: exactly one canonical record per employee per date.
    #[error("Duplicate attendance record for {date}")]
    DuplicateRecord { date: NaiveDate },

    /// No schedule is assigned to the employee.
    #[error("Employee {employee_id} has no assigned schedule")]
    MissingSchedule { employee_id: String },

    /// The schedule itself is malformed (e.g. break outside the shift).
    #[error("Schedule is invalid: {reason}")]
    InvalidSchedule { reason: String },

    /// Income tax would be computed on a negative taxable base.
    ///
    /// Contributions exceeded gross pay. Surfaced as a failure rather
    /// than emitting a wrong payslip.
    #[error("Taxable income is negative: {taxable_cents} centavos")]
    NegativeTaxable { taxable_cents: i64 },

    /// A breakdown failed its conservation check (total ≠ sum of parts).
    ///
    /// This is a defect in the pipeline, not in the input. It fails loudly
    /// in the compliance harness and skips the employee in production.
    #[error("Breakdown total {total_cents} does not match sum of parts {sum_cents}")]
    BreakdownMismatch { total_cents: i64, sum_cents: i64 },

    /// The run was cancelled before this employee was processed.
    ///
    /// Already-finished payslips remain valid; the unit of atomicity is
    /// one employee, not the whole run.
    #[error("Payroll run cancelled before this employee was processed")]
    Cancelled,
}

// =============================================================================
// Payroll Error (either kind, for pipeline seams)
// =============================================================================

/// Any payroll-core error.
///
/// Used at seams where both kinds can surface (e.g. pricing segments can
/// hit a missing rate entry if the caller skipped `validate()`).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum PayrollError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Compute(#[from] ComputeError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience alias for Results with PayrollError.
pub type CoreResult<T> = Result<T, PayrollError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::MissingRateEntry {
            day_type: DayType::RestDay,
            time_type: TimeType::OvertimeNightDiff,
        };
        assert_eq!(
            err.to_string(),
            "No rate multiplier for (RestDay, OvertimeNightDiff)"
        );
    }

    #[test]
    fn test_compute_error_messages() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
        let err = ComputeError::OpenAttendance { date };
        assert_eq!(
            err.to_string(),
            "Attendance for 2025-03-17 is still open (no time-out)"
        );
    }

    #[test]
    fn test_errors_convert_to_payroll_error() {
        let config_err = ConfigError::EmptyBracketTable { table: "sss" };
        let err: PayrollError = config_err.into();
        assert!(matches!(err, PayrollError::Config(_)));

        let compute_err = ComputeError::Cancelled;
        let err: PayrollError = compute_err.into();
        assert!(matches!(err, PayrollError::Compute(_)));
    }
}
