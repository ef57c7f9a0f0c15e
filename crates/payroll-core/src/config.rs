//! # Payroll Configuration
//!
//! Versioned, effective-dated configuration for a payroll run: the rate
//! multiplier table, the statutory contribution brackets, the withholding
//! tax brackets, and per-employee rate overrides.
//!
//! ## Snapshot Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Snapshot Per Run                                 │
//! │                                                                         │
//! │  Config admin (external) ──edits──► configuration store                │
//! │                                          │                              │
//! │                              snapshot at run start                     │
//! │                                          ▼                              │
//! │  run_payroll(…, &PayrollConfig) ── reads only, never mutates           │
//! │                                                                         │
//! │  Concurrent edits never affect an in-flight run. Recomputing a        │
//! │  period against a newer snapshot is an explicit action producing a    │
//! │  new payslip VERSION, never an implicit overwrite.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The predecessor of this engine read rate tables from a shared database
//! handle at call time. Here every entry point takes `&PayrollConfig`
//! explicitly, which is what makes the pipeline pure and the snapshot's
//! lifetime visible in the signature.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ConfigError;
use crate::money::{Money, Multiplier};
use crate::types::{DayType, EmployeeProfile, TimeType};
use crate::validation::{validate_brackets, validate_rate_table};

// =============================================================================
// Rate Multiplier Table
// =============================================================================

/// One composite-key entry of the multiplier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RateEntry {
    pub day_type: DayType,
    pub time_type: TimeType,
    /// Multiplier in basis points of 1.0× (13000 = 1.30×).
    pub multiplier_bps: u32,
}

/// The full (day_type × time_type) → multiplier mapping.
///
/// ## Composite Keys, Not Products
/// Stacked situations (rest-day overtime inside the night window) are ONE
/// row here. Multiplying independent factors at runtime double-counts in
/// ambiguous ways; the table makes each reachable combination an explicit,
/// auditable number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RateMultiplierTable {
    pub entries: Vec<RateEntry>,
}

impl RateMultiplierTable {
    /// The standard Philippine premium ladder (DOLE rules).
    ///
    /// Premiums compose multiplicatively AT TABLE-BUILD TIME — e.g.
    /// rest-day overtime is 1.30 × 1.30 = 1.69×, and its night-diff
    /// stacking adds 10% of that: 1.859×. The runtime only ever sees the
    /// finished composite numbers.
    pub fn standard() -> Self {
        use DayType as D;
        use TimeType as T;

        let rows: [(DayType, TimeType, u32); 16] = [
            (D::Regular, T::Regular, 10_000),
            (D::Regular, T::NightDiff, 11_000),
            (D::Regular, T::Overtime, 12_500),
            (D::Regular, T::OvertimeNightDiff, 13_750),
            (D::RestDay, T::Regular, 13_000),
            (D::RestDay, T::NightDiff, 14_300),
            (D::RestDay, T::Overtime, 16_900),
            (D::RestDay, T::OvertimeNightDiff, 18_590),
            (D::RegularHoliday, T::Regular, 20_000),
            (D::RegularHoliday, T::NightDiff, 22_000),
            (D::RegularHoliday, T::Overtime, 26_000),
            (D::RegularHoliday, T::OvertimeNightDiff, 28_600),
            (D::SpecialHoliday, T::Regular, 13_000),
            (D::SpecialHoliday, T::NightDiff, 14_300),
            (D::SpecialHoliday, T::Overtime, 16_900),
            (D::SpecialHoliday, T::OvertimeNightDiff, 18_590),
        ];

        RateMultiplierTable {
            entries: rows
                .into_iter()
                .map(|(day_type, time_type, multiplier_bps)| RateEntry {
                    day_type,
                    time_type,
                    multiplier_bps,
                })
                .collect(),
        }
    }

    /// Looks up the multiplier for a composite key.
    ///
    /// Sixteen entries at most — a linear scan beats hashing here and
    /// keeps the table serde-friendly for fixtures.
    pub fn get(&self, day_type: DayType, time_type: TimeType) -> Option<Multiplier> {
        self.entries
            .iter()
            .find(|e| e.day_type == day_type && e.time_type == time_type)
            .map(|e| Multiplier::from_bps(e.multiplier_bps))
    }
}

// =============================================================================
// Contribution Brackets
// =============================================================================

/// One bracket of a contribution or tax table.
///
/// Ranges are half-open `[lower, upper)`; `upper: None` means unbounded.
/// The amount for an input inside the bracket is
/// `fixed + rate × (input − lower)`, clamped to `cap` when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContributionBracket {
    pub lower_cents: i64,
    pub upper_cents: Option<i64>,
    /// Fixed amount owed at the bracket's lower bound.
    pub fixed_cents: i64,
    /// Marginal rate in basis points applied to the excess over `lower`.
    pub rate_bps: u32,
    /// Absolute ceiling on the bracket's output, when present.
    pub cap_cents: Option<i64>,
}

/// Which statutory scheme a bracket table belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ContributionKind {
    Sss,
    PhilHealth,
    PagIbig,
    IncomeTax,
}

impl ContributionKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ContributionKind::Sss => "sss",
            ContributionKind::PhilHealth => "philhealth",
            ContributionKind::PagIbig => "pagibig",
            ContributionKind::IncomeTax => "income_tax",
        }
    }
}

/// A sorted bracket table for one contribution kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContributionTable {
    pub kind: ContributionKind,
    pub brackets: Vec<ContributionBracket>,
}

impl ContributionTable {
    /// SSS employee-share table, 2024 schedule.
    ///
    /// The monthly salary credit (MSC) ladder runs ₱4,000–₱30,000 in ₱500
    /// steps; salary brackets straddle each MSC at ±₱250 and the employee
    /// share is 4.5% of the MSC. Generated rather than keyed in — 53 rows
    /// of hand-typed centavos is how wrong tables happen.
    pub fn sss_2024() -> Self {
        let mut brackets = Vec::with_capacity(53);
        let mut lower = 0i64;
        let mut msc = 4_000_00i64;

        loop {
            let upper = if msc >= 30_000_00 {
                None
            } else {
                Some(msc + 250_00)
            };
            brackets.push(ContributionBracket {
                lower_cents: lower,
                upper_cents: upper,
                // 4.5% of the MSC; exact because MSC is a multiple of ₱500
                fixed_cents: msc * 450 / 10_000,
                rate_bps: 0,
                cap_cents: None,
            });
            match upper {
                Some(u) => {
                    lower = u;
                    msc += 500_00;
                }
                None => break,
            }
        }

        ContributionTable {
            kind: ContributionKind::Sss,
            brackets,
        }
    }

    /// PhilHealth employee-share table, 2024: half of the 5% premium,
    /// with the ₱10,000 salary floor and ₱100,000 ceiling.
    pub fn philhealth_2024() -> Self {
        ContributionTable {
            kind: ContributionKind::PhilHealth,
            brackets: vec![
                // Below the floor: premium computed as if salary were ₱10,000
                ContributionBracket {
                    lower_cents: 0,
                    upper_cents: Some(10_000_00),
                    fixed_cents: 250_00,
                    rate_bps: 0,
                    cap_cents: None,
                },
                // 2.5% of actual salary (fixed floor amount + marginal excess)
                ContributionBracket {
                    lower_cents: 10_000_00,
                    upper_cents: Some(100_000_00),
                    fixed_cents: 250_00,
                    rate_bps: 250,
                    cap_cents: None,
                },
                // Above the ceiling: premium frozen at the ₱100,000 level
                ContributionBracket {
                    lower_cents: 100_000_00,
                    upper_cents: None,
                    fixed_cents: 2_500_00,
                    rate_bps: 0,
                    cap_cents: None,
                },
            ],
        }
    }

    /// Pag-IBIG employee-share table: 1% up to ₱1,500 monthly, 2% above,
    /// against a fund salary cap of ₱5,000 (maximum share ₱100).
    pub fn pagibig_2024() -> Self {
        ContributionTable {
            kind: ContributionKind::PagIbig,
            brackets: vec![
                ContributionBracket {
                    lower_cents: 0,
                    upper_cents: Some(1_500_00),
                    fixed_cents: 0,
                    rate_bps: 100,
                    cap_cents: None,
                },
                ContributionBracket {
                    lower_cents: 1_500_00,
                    upper_cents: None,
                    fixed_cents: 30_00,
                    rate_bps: 200,
                    cap_cents: Some(100_00),
                },
            ],
        }
    }

    /// Monthly withholding tax brackets, TRAIN schedule effective 2023.
    ///
    /// Derived from the annual table divided by 12, which keeps the
    /// brackets continuous at every edge (the fixed amount of each
    /// bracket equals the previous bracket evaluated at the boundary).
    pub fn bir_monthly_2023() -> Self {
        ContributionTable {
            kind: ContributionKind::IncomeTax,
            brackets: vec![
                ContributionBracket {
                    lower_cents: 0,
                    upper_cents: Some(2_083_333),
                    fixed_cents: 0,
                    rate_bps: 0,
                    cap_cents: None,
                },
                ContributionBracket {
                    lower_cents: 2_083_333,
                    upper_cents: Some(3_333_333),
                    fixed_cents: 0,
                    rate_bps: 1_500,
                    cap_cents: None,
                },
                ContributionBracket {
                    lower_cents: 3_333_333,
                    upper_cents: Some(6_666_667),
                    fixed_cents: 187_500,
                    rate_bps: 2_000,
                    cap_cents: None,
                },
                ContributionBracket {
                    lower_cents: 6_666_667,
                    upper_cents: Some(16_666_667),
                    fixed_cents: 854_167,
                    rate_bps: 2_500,
                    cap_cents: None,
                },
                ContributionBracket {
                    lower_cents: 16_666_667,
                    upper_cents: Some(66_666_667),
                    fixed_cents: 3_354_167,
                    rate_bps: 3_000,
                    cap_cents: None,
                },
                ContributionBracket {
                    lower_cents: 66_666_667,
                    upper_cents: None,
                    fixed_cents: 18_354_167,
                    rate_bps: 3_500,
                    cap_cents: None,
                },
            ],
        }
    }
}

// =============================================================================
// Per-Employee Overrides
// =============================================================================

/// A contract-rate override for one employee.
///
/// Used for retroactive rate corrections scoped to a run without touching
/// the employee master record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmployeeRateOverride {
    pub employee_id: String,
    pub hourly_rate_cents: i64,
}

// =============================================================================
// Payroll Config (the snapshot)
// =============================================================================

/// The immutable configuration bundle one payroll run computes against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PayrollConfig {
    /// The date this configuration version became effective.
    #[ts(as = "String")]
    pub effective_date: NaiveDate,

    pub rate_table: RateMultiplierTable,
    pub sss: ContributionTable,
    pub philhealth: ContributionTable,
    pub pagibig: ContributionTable,
    pub income_tax: ContributionTable,

    /// Per-employee hourly-rate overrides for this run.
    #[serde(default)]
    pub rate_overrides: Vec<EmployeeRateOverride>,
}

impl PayrollConfig {
    /// The standard 2024 configuration: DOLE multipliers plus the current
    /// statutory tables. Fixtures and tests start from here.
    pub fn standard_2024(effective_date: NaiveDate) -> Self {
        PayrollConfig {
            effective_date,
            rate_table: RateMultiplierTable::standard(),
            sss: ContributionTable::sss_2024(),
            philhealth: ContributionTable::philhealth_2024(),
            pagibig: ContributionTable::pagibig_2024(),
            income_tax: ContributionTable::bir_monthly_2023(),
            rate_overrides: Vec::new(),
        }
    }

    /// Validates the whole snapshot.
    ///
    /// Called by `run_payroll` before any employee is processed; any
    /// error here aborts the entire run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_rate_table(&self.rate_table)?;
        validate_brackets("sss", &self.sss.brackets)?;
        validate_brackets("philhealth", &self.philhealth.brackets)?;
        validate_brackets("pagibig", &self.pagibig.brackets)?;
        validate_brackets("income_tax", &self.income_tax.brackets)?;
        Ok(())
    }

    /// The effective hourly rate for an employee (override beats contract).
    pub fn hourly_rate_for(&self, employee: &EmployeeProfile) -> Money {
        self.rate_overrides
            .iter()
            .find(|o| o.employee_id == employee.id)
            .map(|o| Money::from_cents(o.hourly_rate_cents))
            .unwrap_or_else(|| employee.hourly_rate())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PayrollConfig {
        PayrollConfig::standard_2024(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    #[test]
    fn test_standard_config_validates() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_standard_table_lookup() {
        let table = RateMultiplierTable::standard();
        assert_eq!(
            table.get(DayType::RestDay, TimeType::Overtime),
            Some(Multiplier::from_bps(16_900))
        );
        assert_eq!(
            table.get(DayType::Regular, TimeType::Regular),
            Some(Multiplier::ONE)
        );
    }

    #[test]
    fn test_sss_table_shape() {
        let sss = ContributionTable::sss_2024();
        assert_eq!(sss.brackets.len(), 53);
        // First bracket: MSC ₱4,000 → employee share ₱180.00
        assert_eq!(sss.brackets[0].fixed_cents, 180_00);
        assert_eq!(sss.brackets[0].upper_cents, Some(4_250_00));
        // Last bracket: MSC ₱30,000 → employee share ₱1,350.00, unbounded
        let last = sss.brackets.last().unwrap();
        assert_eq!(last.fixed_cents, 1_350_00);
        assert_eq!(last.lower_cents, 29_750_00);
        assert_eq!(last.upper_cents, None);
    }

    #[test]
    fn test_hourly_rate_override() {
        let mut cfg = config();
        let employee = EmployeeProfile {
            id: "4b4b2a12-9f0f-4f5f-9a55-000000000001".to_string(),
            employee_no: "EMP-0001".to_string(),
            name: "Ana Reyes".to_string(),
            hourly_rate_cents: 10_000,
            monthly_rate_cents: 1_760_000,
        };
        assert_eq!(cfg.hourly_rate_for(&employee).cents(), 10_000);

        cfg.rate_overrides.push(EmployeeRateOverride {
            employee_id: employee.id.clone(),
            hourly_rate_cents: 12_000,
        });
        assert_eq!(cfg.hourly_rate_for(&employee).cents(), 12_000);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let cfg = config();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: PayrollConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
