//! # Payroll Run
//!
//! The batch engine: computes a whole roster's payslips for one pay
//! period against one immutable config snapshot.
//!
//! ## Failure and Atomicity Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate(config) ── any error ──► ABORT: no employee is processed     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  per employee (parallel, chunked):                                     │
//! │    cancellation flag set? ──► skip with Cancelled                      │
//! │    normalize + assemble  ──► payslip                                   │
//! │            └── any ComputeError ──► skip with structured reason        │
//! │                                                                         │
//! │  The unit of atomicity is ONE employee. A skip never aborts the run;   │
//! │  a cancelled run keeps every payslip already finished.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Output order equals input order regardless of thread scheduling, so a
//! run summary diffs cleanly against a previous run of the same roster.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::attendance::normalize;
use crate::config::PayrollConfig;
use crate::error::{ComputeError, ConfigError, CoreResult, PayrollError};
use crate::payslip::{assemble, Payslip};
use crate::types::{
    AttendanceRecord, Bonus, EmployeeProfile, LoanDeduction, PayPeriod, Schedule, WorkedSegments,
};

// =============================================================================
// Run Inputs
// =============================================================================

fn default_version() -> u32 {
    1
}

/// Everything the engine needs to compute one employee's payslip.
///
/// Assembled by the calling service from its stores; the engine itself
/// never touches storage.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmployeeRunInput {
    pub employee: EmployeeProfile,
    /// Missing schedule skips the employee, it never defaults.
    pub schedule: Option<Schedule>,
    pub attendance: Vec<AttendanceRecord>,
    #[serde(default)]
    pub bonuses: Vec<Bonus>,
    #[serde(default)]
    pub loans: Vec<LoanDeduction>,
    /// Payslip version to produce; bump when recomputing a period.
    #[serde(default = "default_version")]
    pub version: u32,
}

// =============================================================================
// Run Outputs
// =============================================================================

/// One employee the run could not pay, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEmployee {
    pub employee_id: String,
    pub employee_no: String,
    pub reason: PayrollError,
}

/// The outcome of one payroll run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub period: PayPeriod,
    pub payslips: Vec<Payslip>,
    pub skipped: Vec<SkippedEmployee>,
    /// True when the cancellation flag was observed during the run.
    pub cancelled: bool,
}

impl RunSummary {
    pub fn processed(&self) -> usize {
        self.payslips.len() + self.skipped.len()
    }
}

// =============================================================================
// Single-Employee Pipeline
// =============================================================================

/// Runs the full pipeline for one employee: filter the period's records,
/// normalize each day, price, and assemble.
///
/// Records outside the period are ignored; two records on the same date
/// are a `DuplicateRecord` error, never silently merged.
pub fn compute_employee_payslip(
    input: &EmployeeRunInput,
    period: PayPeriod,
    config: &PayrollConfig,
) -> CoreResult<Payslip> {
    let schedule = input
        .schedule
        .as_ref()
        .ok_or_else(|| ComputeError::MissingSchedule {
            employee_id: input.employee.id.clone(),
        })?;

    let mut records: Vec<&AttendanceRecord> = input
        .attendance
        .iter()
        .filter(|r| r.date >= period.start && r.date <= period.end)
        .collect();
    records.sort_by_key(|r| r.date);
    for pair in records.windows(2) {
        if pair[0].date == pair[1].date {
            return Err(ComputeError::DuplicateRecord { date: pair[0].date }.into());
        }
    }

    let mut days: Vec<WorkedSegments> = Vec::with_capacity(records.len());
    for record in records {
        days.push(normalize(record, schedule)?);
    }
    debug!(
        employee_no = %input.employee.employee_no,
        days = days.len(),
        "normalized attendance"
    );

    assemble(
        &input.employee,
        period,
        &days,
        &input.bonuses,
        &input.loans,
        config,
        input.version,
    )
}

// =============================================================================
// Batch Run
// =============================================================================

/// Computes payslips for a roster in parallel.
///
/// The config snapshot is validated before any employee is touched; a
/// validation failure aborts the whole run. The cancellation flag is
/// checked between employees — an in-flight employee always finishes.
pub fn run_payroll(
    inputs: &[EmployeeRunInput],
    period: PayPeriod,
    config: &PayrollConfig,
    cancel: &AtomicBool,
) -> Result<RunSummary, ConfigError> {
    config.validate()?;

    let threads = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(inputs.len())
        .max(1);
    let chunk_size = inputs.len().div_ceil(threads).max(1);
    info!(
        employees = inputs.len(),
        threads,
        period_start = %period.start,
        period_end = %period.end,
        "starting payroll run"
    );

    let mut results: Vec<Option<CoreResult<Payslip>>> = inputs.iter().map(|_| None).collect();
    thread::scope(|scope| {
        for (input_chunk, result_chunk) in
            inputs.chunks(chunk_size).zip(results.chunks_mut(chunk_size))
        {
            scope.spawn(|| {
                for (input, slot) in input_chunk.iter().zip(result_chunk.iter_mut()) {
                    if cancel.load(Ordering::SeqCst) {
                        *slot = Some(Err(ComputeError::Cancelled.into()));
                        continue;
                    }
                    *slot = Some(compute_employee_payslip(input, period, config));
                }
            });
        }
    });

    let mut summary = RunSummary {
        period,
        payslips: Vec::with_capacity(inputs.len()),
        skipped: Vec::new(),
        cancelled: cancel.load(Ordering::SeqCst),
    };
    for (input, slot) in inputs.iter().zip(results) {
        let result = slot.unwrap_or_else(|| Err(ComputeError::Cancelled.into()));
        match result {
            Ok(payslip) => summary.payslips.push(payslip),
            Err(reason) => {
                warn!(
                    employee_no = %input.employee.employee_no,
                    %reason,
                    "skipping employee"
                );
                summary.skipped.push(SkippedEmployee {
                    employee_id: input.employee.id.clone(),
                    employee_no: input.employee.employee_no.clone(),
                    reason,
                });
            }
        }
    }
    info!(
        payslips = summary.payslips.len(),
        skipped = summary.skipped.len(),
        cancelled = summary.cancelled,
        "payroll run finished"
    );
    Ok(summary)
}

// =============================================================================
// Unit Tests
// =============================================================================
