//! # Compliance Harness
//!
//! Replays JSON scenario fixtures through the real pipeline and diffs the
//! resulting payslips against hand-computed expected values.
//!
//! ## Tolerances
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  minutes  — exact. A minute off is a normalization bug, full stop.  │
//! │  money    — within one centavo. Statutory reference figures are     │
//! │             published rounded; the engine's half-up rounding may    │
//! │             land one centavo to either side of them.                │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every expected field is optional: a scenario asserts only the figures
//! it was written to pin down. Scenarios that expect a failure name the
//! error text instead of figures.

use serde::{Deserialize, Serialize};

use crate::config::PayrollConfig;
use crate::error::PayrollError;
use crate::payslip::Payslip;
use crate::run::{compute_employee_payslip, EmployeeRunInput};
use crate::types::{PayCategory, PayPeriod};

/// Allowed drift on money fields, in centavos.
pub const MONEY_TOLERANCE_CENTS: i64 = 1;

// =============================================================================
// Scenario Model
// =============================================================================

/// Expected payslip figures. Absent fields are not checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Expected {
    pub gross_cents: Option<i64>,
    pub net_cents: Option<i64>,
    pub taxable_cents: Option<i64>,
    pub income_tax_cents: Option<i64>,
    pub sss_cents: Option<i64>,
    pub philhealth_cents: Option<i64>,
    pub pagibig_cents: Option<i64>,
    pub night_diff_cents: Option<i64>,
    pub thirteenth_month_cents: Option<i64>,
    pub worked_minutes: Option<i64>,
    pub overtime_minutes: Option<i64>,
    pub leave_minutes: Option<i64>,
    /// When present, the scenario must FAIL and the error's display text
    /// must contain this substring.
    pub error_contains: Option<String>,
}

/// One replayable scenario: an employee's inputs plus expected figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub period: PayPeriod,
    pub input: EmployeeRunInput,
    /// Config override; the standard tables when absent.
    #[serde(default)]
    pub config: Option<PayrollConfig>,
    pub expected: Expected,
}

// =============================================================================
// Outcomes
// =============================================================================

/// One field that landed outside its tolerance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDiff {
    pub field: &'static str,
    pub expected: i64,
    pub actual: i64,
    pub tolerance: i64,
}

/// The result of replaying one scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub diffs: Vec<FieldDiff>,
    /// Set when the pipeline failed in a way the scenario did not expect,
    /// or succeeded when a failure was expected.
    pub unexpected: Option<String>,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        self.diffs.is_empty() && self.unexpected.is_none()
    }
}

/// The result of a whole fixture file.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceReport {
    pub outcomes: Vec<ScenarioOutcome>,
}

impl ComplianceReport {
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(ScenarioOutcome::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScenarioOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }
}

// =============================================================================
// Replay
// =============================================================================

fn check(
    diffs: &mut Vec<FieldDiff>,
    field: &'static str,
    expected: Option<i64>,
    actual: i64,
    tolerance: i64,
) {
    if let Some(expected) = expected {
        if (actual - expected).abs() > tolerance {
            diffs.push(FieldDiff {
                field,
                expected,
                actual,
                tolerance,
            });
        }
    }
}

fn diff_payslip(expected: &Expected, payslip: &Payslip) -> Vec<FieldDiff> {
    let mut diffs = Vec::new();
    let money = MONEY_TOLERANCE_CENTS;

    check(&mut diffs, "gross_cents", expected.gross_cents, payslip.gross_cents, money);
    check(&mut diffs, "net_cents", expected.net_cents, payslip.net_cents, money);
    check(&mut diffs, "taxable_cents", expected.taxable_cents, payslip.taxable_cents, money);
    check(
        &mut diffs,
        "income_tax_cents",
        expected.income_tax_cents,
        payslip.income_tax_cents,
        money,
    );
    check(&mut diffs, "sss_cents", expected.sss_cents, payslip.contributions.sss_cents, money);
    check(
        &mut diffs,
        "philhealth_cents",
        expected.philhealth_cents,
        payslip.contributions.philhealth_cents,
        money,
    );
    check(
        &mut diffs,
        "pagibig_cents",
        expected.pagibig_cents,
        payslip.contributions.pagibig_cents,
        money,
    );
    check(
        &mut diffs,
        "night_diff_cents",
        expected.night_diff_cents,
        payslip.night_diff_cents,
        money,
    );
    check(
        &mut diffs,
        "thirteenth_month_cents",
        expected.thirteenth_month_cents,
        payslip.thirteenth_month_cents,
        money,
    );

    let worked: i64 = payslip
        .breakdown
        .worked
        .iter()
        .filter(|l| l.category != PayCategory::Leave)
        .map(|l| l.minutes)
        .sum();
    let overtime: i64 = payslip.breakdown.overtime.iter().map(|l| l.minutes).sum();
    check(&mut diffs, "worked_minutes", expected.worked_minutes, worked, 0);
    check(&mut diffs, "overtime_minutes", expected.overtime_minutes, overtime, 0);
    check(
        &mut diffs,
        "leave_minutes",
        expected.leave_minutes,
        payslip.attendance.leave_minutes,
        0,
    );

    diffs
}

/// Replays one scenario through `compute_employee_payslip`.
pub fn run_scenario(scenario: &Scenario) -> ScenarioOutcome {
    let config = match &scenario.config {
        Some(config) => config.clone(),
        None => PayrollConfig::standard_2024(scenario.period.start),
    };
    let result = compute_employee_payslip(&scenario.input, scenario.period, &config);

    let (diffs, unexpected) = match (&result, &scenario.expected.error_contains) {
        (Ok(payslip), None) => {
            let unexpected = payslip
                .verify()
                .err()
                .map(|e| format!("conservation check failed: {}", e));
            (diff_payslip(&scenario.expected, payslip), unexpected)
        }
        (Ok(_), Some(want)) => (
            Vec::new(),
            Some(format!("expected failure containing {:?}, but the scenario passed", want)),
        ),
        (Err(err), Some(want)) => {
            let text = error_text(err);
            if text.contains(want.as_str()) {
                (Vec::new(), None)
            } else {
                (Vec::new(), Some(format!("expected failure containing {:?}, got {:?}", want, text)))
            }
        }
        (Err(err), None) => (Vec::new(), Some(error_text(err))),
    };

    ScenarioOutcome {
        name: scenario.name.clone(),
        diffs,
        unexpected,
    }
}

fn error_text(err: &PayrollError) -> String {
    err.to_string()
}

/// Replays every scenario of a fixture.
pub fn run_scenarios(scenarios: &[Scenario]) -> ComplianceReport {
    ComplianceReport {
        outcomes: scenarios.iter().map(run_scenario).collect(),
    }
}

/// Parses a fixture file (a JSON array of scenarios).
pub fn load_scenarios(json: &str) -> serde_json::Result<Vec<Scenario>> {
    serde_json::from_str(json)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(json: &'static str) -> Vec<Scenario> {
        load_scenarios(json).unwrap()
    }

    #[test]
    fn test_early_clock_in_fixture_passes() {
        let report = run_scenarios(&fixture(include_str!("../fixtures/early_clock_in.json")));
        for failure in report.failures() {
            panic!("{}: {:?} {:?}", failure.name, failure.diffs, failure.unexpected);
        }
    }

    #[test]
    fn test_statutory_brackets_fixture_passes() {
        let report = run_scenarios(&fixture(include_str!("../fixtures/statutory_brackets.json")));
        for failure in report.failures() {
            panic!("{}: {:?} {:?}", failure.name, failure.diffs, failure.unexpected);
        }
    }

    #[test]
    fn test_premium_days_fixture_passes() {
        let report = run_scenarios(&fixture(include_str!("../fixtures/premium_days.json")));
        for failure in report.failures() {
            panic!("{}: {:?} {:?}", failure.name, failure.diffs, failure.unexpected);
        }
    }

    #[test]
    fn test_wrong_expectation_is_reported_as_diff() {
        let mut scenarios = fixture(include_str!("../fixtures/early_clock_in.json"));
        scenarios[0].expected.overtime_minutes = Some(999);

        let report = run_scenarios(&scenarios);
        assert!(!report.passed());
        let outcome = &report.outcomes[0];
        assert_eq!(outcome.diffs[0].field, "overtime_minutes");
        assert_eq!(outcome.diffs[0].expected, 999);
    }

    #[test]
    fn test_money_tolerance_is_one_centavo() {
        let mut scenarios = fixture(include_str!("../fixtures/early_clock_in.json"));
        let gross = scenarios[0].expected.gross_cents.unwrap();
        scenarios[0].expected.gross_cents = Some(gross + 1);
        assert!(run_scenarios(&scenarios).outcomes[0].passed());

        scenarios[0].expected.gross_cents = Some(gross + 2);
        assert!(!run_scenarios(&scenarios).outcomes[0].passed());
    }
}
