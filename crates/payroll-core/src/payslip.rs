//! # Payslip Assembly
//!
//! Assembles one employee's payslip for one pay period from the priced
//! breakdown, the statutory tables, and the employee's loan deductions.
//!
//! ## Deduction Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  earned + bonuses = gross                                              │
//! │  gross ──► − SSS − PhilHealth − Pag-IBIG ──► taxable ──► − tax         │
//! │                                                  │                      │
//! │                                                  ▼                      │
//! │                                − loan amortizations ──► net             │
//! │                                                                         │
//! │  Contributions are computed on the MONTHLY rate; the withholding       │
//! │  base is the period's gross minus those contributions. The order is    │
//! │  an invariant: contributions come off gross before tax, loans only     │
//! │  ever come off net.                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A payslip is identified by (employee, period, version). Assembly is
//! deterministic: no clock reads, no generated ids — recomputing the same
//! inputs at the same version yields a byte-identical payslip.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::breakdown::{price_segments, PayrollBreakdown};
use crate::config::PayrollConfig;
use crate::error::{ComputeError, CoreResult};
use crate::money::Money;
use crate::statutory;
use crate::types::{Bonus, EmployeeProfile, LoanDeduction, PayPeriod, WorkedSegments};

// =============================================================================
// Contributions
// =============================================================================

/// The employee-share statutory deductions for one payslip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Contributions {
    pub sss_cents: i64,
    pub philhealth_cents: i64,
    pub pagibig_cents: i64,
}

impl Contributions {
    /// Sum of the three contributions (the amount that comes off gross
    /// before the tax base is formed).
    pub fn total(&self) -> Money {
        Money::from_cents(self.sss_cents + self.philhealth_cents + self.pagibig_cents)
    }
}

// =============================================================================
// Attendance Summary
// =============================================================================

/// Period-level attendance roll-up carried on the payslip for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AttendanceSummary {
    pub days: u32,
    pub late_minutes: i64,
    pub undertime_minutes: i64,
    pub halfdays: u32,
    pub leave_minutes: i64,
}

impl AttendanceSummary {
    fn from_days(days: &[WorkedSegments]) -> Self {
        let mut summary = AttendanceSummary::default();
        for day in days {
            summary.days += 1;
            summary.late_minutes += day.flags.late_minutes;
            summary.undertime_minutes += day.flags.undertime_minutes;
            if day.flags.halfday {
                summary.halfdays += 1;
            }
            summary.leave_minutes += day.leave_minutes;
        }
        summary
    }
}

// =============================================================================
// Payslip
// =============================================================================

/// One employee's payslip for one pay period.
///
/// `version` starts at 1; recomputing a period against a corrected config
/// or corrected attendance is an explicit action producing version + 1,
/// never a silent overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Payslip {
    pub employee_id: String,
    pub employee_no: String,
    pub period: PayPeriod,
    pub version: u32,

    pub breakdown: PayrollBreakdown,
    pub attendance: AttendanceSummary,

    /// Earned pay plus bonuses.
    pub gross_cents: i64,
    /// Overtime-section pay (subset of gross).
    pub overtime_cents: i64,
    /// Pay earned inside the night-diff window (subset of gross).
    pub night_diff_cents: i64,
    /// Paid-leave pay (subset of gross).
    pub leave_cents: i64,
    /// Itemized one-off additions included in gross.
    pub bonuses: Vec<Bonus>,

    pub contributions: Contributions,
    pub taxable_cents: i64,
    pub income_tax_cents: i64,
    pub loans: Vec<LoanDeduction>,

    pub total_deductions_cents: i64,
    pub net_cents: i64,

    /// 13th-month pay accrued by this period (reported, not paid out).
    pub thirteenth_month_cents: i64,
}

impl Payslip {
    pub fn gross(&self) -> Money {
        Money::from_cents(self.gross_cents)
    }

    pub fn net(&self) -> Money {
        Money::from_cents(self.net_cents)
    }

    pub fn loan_total(&self) -> Money {
        self.loans
            .iter()
            .map(|l| Money::from_cents(l.amount_cents))
            .sum()
    }

    pub fn bonus_total(&self) -> Money {
        self.bonuses
            .iter()
            .map(|b| Money::from_cents(b.amount_cents))
            .sum()
    }

    /// Re-derives every stored total from its parts and checks they agree.
    ///
    /// The compliance harness runs this on every scenario; `assemble`
    /// runs it before returning so a drifted payslip can never leave the
    /// pipeline.
    pub fn verify(&self) -> Result<(), ComputeError> {
        let gross = self.breakdown.gross() + self.bonus_total();
        if gross.cents() != self.gross_cents {
            return Err(ComputeError::BreakdownMismatch {
                total_cents: self.gross_cents,
                sum_cents: gross.cents(),
            });
        }
        let deductions =
            self.contributions.total() + Money::from_cents(self.income_tax_cents) + self.loan_total();
        if deductions.cents() != self.total_deductions_cents
            || self.gross_cents - self.total_deductions_cents != self.net_cents
        {
            return Err(ComputeError::BreakdownMismatch {
                total_cents: self.net_cents,
                sum_cents: (gross - deductions).cents(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Assembly
// =============================================================================

/// Assembles one payslip from normalized attendance days.
///
/// Pure: everything the result depends on is in the arguments. The
/// effective hourly rate honors per-run overrides in the config.
pub fn assemble(
    employee: &EmployeeProfile,
    period: PayPeriod,
    days: &[WorkedSegments],
    bonuses: &[Bonus],
    loans: &[LoanDeduction],
    config: &PayrollConfig,
    version: u32,
) -> CoreResult<Payslip> {
    let hourly_rate = config.hourly_rate_for(employee);
    let breakdown = price_segments(days, hourly_rate, config)?;
    let earned = breakdown.gross();
    let bonus_total: Money = bonuses.iter().map(|b| Money::from_cents(b.amount_cents)).sum();
    let gross = earned + bonus_total;
    let overtime = breakdown.overtime_total();
    let night_diff = breakdown.night_diff_pay();
    let leave = breakdown.leave_pay();

    let monthly_rate = employee.monthly_rate();
    let contributions = Contributions {
        sss_cents: statutory::compute_sss(monthly_rate, config)?.cents(),
        philhealth_cents: statutory::compute_philhealth(monthly_rate, config)?.cents(),
        pagibig_cents: statutory::compute_pagibig(monthly_rate, config)?.cents(),
    };

    let taxable = gross - contributions.total();
    let income_tax = statutory::compute_income_tax(taxable, config)?;

    let loan_total: Money = loans.iter().map(|l| Money::from_cents(l.amount_cents)).sum();
    let total_deductions = contributions.total() + income_tax + loan_total;
    let net = gross - total_deductions;

    let payslip = Payslip {
        employee_id: employee.id.clone(),
        employee_no: employee.employee_no.clone(),
        period,
        version,
        breakdown,
        attendance: AttendanceSummary::from_days(days),
        gross_cents: gross.cents(),
        overtime_cents: overtime.cents(),
        night_diff_cents: night_diff.cents(),
        leave_cents: leave.cents(),
        bonuses: bonuses.to_vec(),
        contributions,
        taxable_cents: taxable.cents(),
        income_tax_cents: income_tax.cents(),
        loans: loans.to_vec(),
        total_deductions_cents: total_deductions.cents(),
        net_cents: net.cents(),
        // 13th month accrues on basic earned pay; one-off bonuses stay out.
        thirteenth_month_cents: statutory::thirteenth_month_accrual(earned).cents(),
    };
    payslip.verify().map_err(crate::error::PayrollError::from)?;
    Ok(payslip)
}

/// Re-assembles a payslip at the next version after a correction.
///
/// Corrections never overwrite: the prior payslip stays on record and the
/// replacement carries `prior.version + 1`.
pub fn recompute(
    prior: &Payslip,
    employee: &EmployeeProfile,
    days: &[WorkedSegments],
    bonuses: &[Bonus],
    loans: &[LoanDeduction],
    config: &PayrollConfig,
) -> CoreResult<Payslip> {
    assemble(employee, prior.period, days, bonuses, loans, config, prior.version + 1)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttendanceFlags, DayType, TimeType, WorkedSegment};
    use chrono::NaiveDate;

    fn config() -> PayrollConfig {
        PayrollConfig::standard_2024(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    fn employee() -> EmployeeProfile {
        EmployeeProfile {
            id: "4b4b2a12-9f0f-4f5f-9a55-000000000001".to_string(),
            employee_no: "EMP-0001".to_string(),
            name: "Ana Reyes".to_string(),
            hourly_rate_cents: 100_00,
            monthly_rate_cents: 20_000_00,
        }
    }

    fn period() -> PayPeriod {
        PayPeriod {
            start: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        }
    }

    fn regular_day(minutes: i64) -> WorkedSegments {
        WorkedSegments {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            segments: vec![WorkedSegment {
                day_type: DayType::Regular,
                time_type: TimeType::Regular,
                minutes,
            }],
            leave_minutes: 0,
            early_minutes: 0,
            overtime_deducted_minutes: 0,
            flags: AttendanceFlags::default(),
        }
    }

    #[test]
    fn test_deduction_order_contributions_before_tax() {
        // Ten 8-hour days at ₱100/hr: gross ₱8,000.
        let days: Vec<WorkedSegments> = (0..10).map(|_| regular_day(480)).collect();
        let slip = assemble(&employee(), period(), &days, &[], &[], &config(), 1).unwrap();

        assert_eq!(slip.gross_cents, 8_000_00);
        // Monthly ₱20,000: SSS ₱900, PhilHealth ₱500, Pag-IBIG ₱100.
        assert_eq!(slip.contributions.sss_cents, 900_00);
        assert_eq!(slip.contributions.philhealth_cents, 500_00);
        assert_eq!(slip.contributions.pagibig_cents, 100_00);
        // Tax base is gross minus contributions, and it sits below the
        // monthly exemption threshold.
        assert_eq!(slip.taxable_cents, 6_500_00);
        assert_eq!(slip.income_tax_cents, 0);
        assert_eq!(slip.net_cents, 6_500_00);
    }

    #[test]
    fn test_loans_come_off_net_not_taxable() {
        let days: Vec<WorkedSegments> = (0..10).map(|_| regular_day(480)).collect();
        let loans = vec![LoanDeduction {
            reference: "SSS-CAL-2024-07".to_string(),
            label: "SSS calamity loan".to_string(),
            amount_cents: 500_00,
        }];
        let with = assemble(&employee(), period(), &days, &[], &loans, &config(), 1).unwrap();
        let without = assemble(&employee(), period(), &days, &[], &[], &config(), 1).unwrap();

        assert_eq!(with.taxable_cents, without.taxable_cents);
        assert_eq!(with.income_tax_cents, without.income_tax_cents);
        assert_eq!(with.net_cents, without.net_cents - 500_00);
        assert_eq!(with.total_deductions_cents, without.total_deductions_cents + 500_00);
    }

    #[test]
    fn test_bonuses_raise_gross_and_taxable_but_not_thirteenth_month() {
        let days: Vec<WorkedSegments> = (0..10).map(|_| regular_day(480)).collect();
        let bonuses = vec![Bonus {
            label: "Perfect attendance".to_string(),
            amount_cents: 1_000_00,
        }];
        let with = assemble(&employee(), period(), &days, &bonuses, &[], &config(), 1).unwrap();
        let without = assemble(&employee(), period(), &days, &[], &[], &config(), 1).unwrap();

        assert_eq!(with.gross_cents, without.gross_cents + 1_000_00);
        assert_eq!(with.taxable_cents, without.taxable_cents + 1_000_00);
        // 13th month accrues on basic earned pay only.
        assert_eq!(with.thirteenth_month_cents, without.thirteenth_month_cents);
        assert!(with.verify().is_ok());
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let days: Vec<WorkedSegments> = (0..10).map(|_| regular_day(480)).collect();
        let a = assemble(&employee(), period(), &days, &[], &[], &config(), 1).unwrap();
        let b = assemble(&employee(), period(), &days, &[], &[], &config(), 1).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_version_is_carried_not_invented() {
        let days: Vec<WorkedSegments> = (0..5).map(|_| regular_day(480)).collect();
        let slip = assemble(&employee(), period(), &days, &[], &[], &config(), 3).unwrap();
        assert_eq!(slip.version, 3);
    }

    #[test]
    fn test_recompute_bumps_version_and_reprices() {
        let days: Vec<WorkedSegments> = (0..5).map(|_| regular_day(480)).collect();
        let prior = assemble(&employee(), period(), &days, &[], &[], &config(), 1).unwrap();

        // Correction: five more days of attendance surface after the first run.
        let corrected: Vec<WorkedSegments> = (0..10).map(|_| regular_day(480)).collect();
        let slip = recompute(&prior, &employee(), &corrected, &[], &[], &config()).unwrap();
        assert_eq!(slip.version, 2);
        assert_eq!(slip.period, prior.period);
        assert_eq!(slip.gross_cents, 2 * prior.gross_cents);
    }

    #[test]
    fn test_rate_override_changes_gross() {
        let days: Vec<WorkedSegments> = (0..5).map(|_| regular_day(480)).collect();
        let mut config = config();
        config.rate_overrides.push(crate::config::EmployeeRateOverride {
            employee_id: employee().id,
            hourly_rate_cents: 150_00,
        });
        let slip = assemble(&employee(), period(), &days, &[], &[], &config, 1).unwrap();
        assert_eq!(slip.gross_cents, 6_000_00);
    }

    #[test]
    fn test_negative_taxable_fails_assembly() {
        // One 1-hour day: gross ₱100, contributions ₱1,500.
        let days = vec![regular_day(60)];
        let err = assemble(&employee(), period(), &days, &[], &[], &config(), 1).unwrap_err();
        assert!(matches!(
            err,
            crate::error::PayrollError::Compute(ComputeError::NegativeTaxable { .. })
        ));
    }

    #[test]
    fn test_thirteenth_month_accrues_a_twelfth_of_gross() {
        let days: Vec<WorkedSegments> = (0..10).map(|_| regular_day(480)).collect();
        let slip = assemble(&employee(), period(), &days, &[], &[], &config(), 1).unwrap();
        assert_eq!(slip.thirteenth_month_cents, 666_67);
    }

    #[test]
    fn test_attendance_summary_rolls_up_flags() {
        let mut late = regular_day(450);
        late.flags.late_minutes = 30;
        late.flags.undertime_minutes = 30;
        let mut half = regular_day(200);
        half.flags.halfday = true;
        half.flags.undertime_minutes = 280;
        let days = vec![regular_day(480), late, half];

        let slip = assemble(&employee(), period(), &days, &[], &[], &config(), 1).unwrap();
        assert_eq!(slip.attendance.days, 3);
        assert_eq!(slip.attendance.late_minutes, 30);
        assert_eq!(slip.attendance.undertime_minutes, 310);
        assert_eq!(slip.attendance.halfdays, 1);
    }

    #[test]
    fn test_payslip_survives_serde_round_trip() {
        let days: Vec<WorkedSegments> = (0..10).map(|_| regular_day(480)).collect();
        let slip = assemble(&employee(), period(), &days, &[], &[], &config(), 1).unwrap();

        let json = serde_json::to_string_pretty(&slip).unwrap();
        let restored: Payslip = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, slip);
        assert!(restored.verify().is_ok());
    }
}
