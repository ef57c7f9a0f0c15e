//! # Statutory Deductions
//!
//! Bracket-table evaluation for the mandatory Philippine deductions:
//! SSS, PhilHealth, Pag-IBIG, and BIR withholding tax.
//!
//! ## Bracket Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every table partitions [0, ∞) into half-open [lower, upper)           │
//! │  brackets — validated up front, so lookup can never land in a gap.     │
//! │                                                                        │
//! │  An input equal to a bracket's upper bound belongs to the NEXT         │
//! │  bracket. One rule for all four schemes; no per-table boundary lore.   │
//! │                                                                        │
//! │  amount_due = fixed + rate × (input − lower), clamped to cap           │
//! │                                                                        │
//! │  Deduction order is fixed: contributions come off gross BEFORE the     │
//! │  withholding-tax base is formed. Taxable = gross − SSS − PhilHealth    │
//! │  − Pag-IBIG; a negative taxable base is an error, never clamped.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Contribution bases are the employee's MONTHLY rate, not the period's
//! gross — statutory schedules are monthly schedules.

use crate::config::{ContributionBracket, ContributionTable, PayrollConfig};
use crate::error::{ComputeError, ConfigError, PayrollError};
use crate::money::Money;

// =============================================================================
// Bracket Evaluation
// =============================================================================

/// Finds the bracket containing `amount` (half-open bounds).
fn bracket_for(table: &ContributionTable, amount: Money) -> Result<&ContributionBracket, ConfigError> {
    let cents = amount.max_zero().cents();
    table
        .brackets
        .iter()
        .find(|b| cents >= b.lower_cents && b.upper_cents.map_or(true, |u| cents < u))
        .ok_or(ConfigError::EmptyBracketTable {
            table: table.kind.as_str(),
        })
}

/// Evaluates one bracket table at `amount`.
///
/// `fixed + rate × excess-over-lower`, clamped to the bracket cap. The
/// rate rounds half-up at the last step, same as every other monetary
/// rounding in the crate.
pub fn evaluate(table: &ContributionTable, amount: Money) -> Result<Money, ConfigError> {
    let bracket = bracket_for(table, amount)?;
    let excess = amount.max_zero() - Money::from_cents(bracket.lower_cents);
    let due = Money::from_cents(bracket.fixed_cents) + excess.apply_rate_bps(bracket.rate_bps);
    Ok(match bracket.cap_cents {
        Some(cap) => due.min(Money::from_cents(cap)),
        None => due,
    })
}

// =============================================================================
// The Four Schemes
// =============================================================================

/// SSS employee share for a monthly rate.
pub fn compute_sss(monthly_rate: Money, config: &PayrollConfig) -> Result<Money, ConfigError> {
    evaluate(&config.sss, monthly_rate)
}

/// PhilHealth employee share for a monthly rate.
pub fn compute_philhealth(monthly_rate: Money, config: &PayrollConfig) -> Result<Money, ConfigError> {
    evaluate(&config.philhealth, monthly_rate)
}

/// Pag-IBIG employee share for a monthly rate.
pub fn compute_pagibig(monthly_rate: Money, config: &PayrollConfig) -> Result<Money, ConfigError> {
    evaluate(&config.pagibig, monthly_rate)
}

/// Monthly withholding tax on a taxable base.
///
/// The base is gross pay minus the three contributions; forming it is the
/// caller's job so the deduction order stays in one place. A negative
/// base fails — the employee gets skipped, not a nonsense payslip.
pub fn compute_income_tax(taxable: Money, config: &PayrollConfig) -> Result<Money, PayrollError> {
    if taxable.is_negative() {
        return Err(ComputeError::NegativeTaxable {
            taxable_cents: taxable.cents(),
        }
        .into());
    }
    Ok(evaluate(&config.income_tax, taxable)?)
}

/// 13th-month pay accrued by one period's gross: gross ÷ 12, rounded
/// half-up. Reported on the payslip as an accrual, never paid out here.
pub fn thirteenth_month_accrual(gross: Money) -> Money {
    Money::from_cents((gross.cents() + 6) / 12)
}

// =============================================================================
// Unit Tests
// =============================================================================
