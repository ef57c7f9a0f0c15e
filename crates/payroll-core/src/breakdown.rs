//! # Pay Breakdown
//!
//! Prices normalized worked segments into itemized pay lines.
//!
//! ## Rounding Discipline
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  Each line keeps its exact value as an integer numerator over a      │
//! │  fixed scale (60 minutes × 10 000 bps). Per-line `pay_cents` is a    │
//! │  rounded display figure; section totals re-sum the exact numerators  │
//! │  and round ONCE, so a breakdown never drifts from its total by       │
//! │  accumulated per-line rounding.                                      │
//! │                                                                      │
//! │  Totals are always derived from (base, minutes, multiplier) — they   │
//! │  are never stored, so a serialized breakdown re-prices to the same   │
//! │  centavo after any round-trip.                                       │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::PayrollConfig;
use crate::error::ConfigError;
use crate::money::{ExactPay, Money, Multiplier};
use crate::rates;
use crate::types::{DayType, PayCategory, TimeType, WorkedSegments};

// =============================================================================
// Breakdown Lines
// =============================================================================

/// One itemized pay line: a pay category priced at a base rate and
/// multiplier for some number of minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BreakdownLine {
    pub category: PayCategory,
    pub minutes: i64,
    /// Hourly base rate in centavos.
    pub base_cents: i64,
    /// Rate multiplier in basis points (10 000 = 1.0×).
    pub multiplier_bps: u32,
    /// Rounded line pay, for display. Totals ignore this and re-derive
    /// from the exact fields above.
    pub pay_cents: i64,
}

impl BreakdownLine {
    fn new(category: PayCategory, minutes: i64, base: Money, multiplier: Multiplier) -> Self {
        let exact = ExactPay::segment(base, minutes, multiplier);
        BreakdownLine {
            category,
            minutes,
            base_cents: base.cents(),
            multiplier_bps: multiplier.bps(),
            pay_cents: exact.to_money().cents(),
        }
    }

    /// Exact (unrounded) value of this line.
    pub fn exact(&self) -> ExactPay {
        ExactPay::segment(
            Money::from_cents(self.base_cents),
            self.minutes,
            Multiplier::from_bps(self.multiplier_bps),
        )
    }
}

/// Itemized pay for one employee over one period, split into regular-hours
/// and overtime sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PayrollBreakdown {
    pub worked: Vec<BreakdownLine>,
    pub overtime: Vec<BreakdownLine>,
}

impl PayrollBreakdown {
    /// Regular-hours pay: exact line values summed, rounded once.
    pub fn worked_total(&self) -> Money {
        Self::section_total(&self.worked)
    }

    /// Overtime pay: exact line values summed, rounded once.
    pub fn overtime_total(&self) -> Money {
        Self::section_total(&self.overtime)
    }

    /// Gross pay across both sections, rounded once over the whole sum.
    pub fn gross(&self) -> Money {
        self.worked
            .iter()
            .chain(&self.overtime)
            .map(BreakdownLine::exact)
            .sum::<ExactPay>()
            .to_money()
    }

    /// Pay earned inside the night-diff window, both regular and overtime.
    pub fn night_diff_pay(&self) -> Money {
        self.worked
            .iter()
            .chain(&self.overtime)
            .filter(|line| line.category.is_night_diff())
            .map(BreakdownLine::exact)
            .sum::<ExactPay>()
            .to_money()
    }

    /// Pay for the leave line, if any.
    pub fn leave_pay(&self) -> Money {
        self.worked
            .iter()
            .filter(|line| line.category == PayCategory::Leave)
            .map(BreakdownLine::exact)
            .sum::<ExactPay>()
            .to_money()
    }

    pub fn total_minutes(&self) -> i64 {
        self.worked
            .iter()
            .chain(&self.overtime)
            .map(|line| line.minutes)
            .sum()
    }

    fn section_total(lines: &[BreakdownLine]) -> Money {
        lines.iter().map(BreakdownLine::exact).sum::<ExactPay>().to_money()
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// Prices a period's worth of normalized days into an itemized breakdown.
///
/// Minutes are merged per pay category across days, so one category yields
/// one line no matter how many days contributed to it. Lines are emitted
/// in a fixed category order regardless of input order. Leave minutes are
/// priced at 1.0× on the worked section.
///
/// A rate table entry missing for any worked (day, time) key is a
/// configuration error, never a silent 1.0× fallback.
pub fn price_segments(
    days: &[WorkedSegments],
    hourly_rate: Money,
    config: &PayrollConfig,
) -> Result<PayrollBreakdown, ConfigError> {
    let mut minutes_by_category: HashMap<PayCategory, i64> = HashMap::new();
    let mut leave_minutes = 0i64;

    for day in days {
        for segment in &day.segments {
            let category = PayCategory::from_key(segment.day_type, segment.time_type);
            *minutes_by_category.entry(category).or_insert(0) += segment.minutes;
        }
        leave_minutes += day.leave_minutes;
    }

    let mut worked = Vec::new();
    let mut overtime = Vec::new();
    for day_type in DayType::ALL {
        for time_type in TimeType::ALL {
            let category = PayCategory::from_key(day_type, time_type);
            let minutes = match minutes_by_category.get(&category) {
                Some(&minutes) if minutes > 0 => minutes,
                _ => continue,
            };
            let multiplier = rates::resolve(day_type, time_type, config)?;
            let line = BreakdownLine::new(category, minutes, hourly_rate, multiplier);
            if time_type.is_overtime() {
                overtime.push(line);
            } else {
                worked.push(line);
            }
        }
    }
    if leave_minutes > 0 {
        worked.push(BreakdownLine::new(
            PayCategory::Leave,
            leave_minutes,
            hourly_rate,
            Multiplier::ONE,
        ));
    }

    Ok(PayrollBreakdown { worked, overtime })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttendanceFlags, WorkedSegment};
    use chrono::NaiveDate;

    fn config() -> PayrollConfig {
        PayrollConfig::standard_2024(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    fn day(segments: Vec<WorkedSegment>, leave_minutes: i64) -> WorkedSegments {
        WorkedSegments {
            date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            segments,
            leave_minutes,
            early_minutes: 0,
            overtime_deducted_minutes: 0,
            flags: AttendanceFlags::default(),
        }
    }

    fn seg(day_type: DayType, time_type: TimeType, minutes: i64) -> WorkedSegment {
        WorkedSegment {
            day_type,
            time_type,
            minutes,
        }
    }

    #[test]
    fn test_plain_day_prices_at_base_rate() {
        let days = [day(vec![seg(DayType::Regular, TimeType::Regular, 480)], 0)];
        let breakdown = price_segments(&days, Money::from_pesos(100), &config()).unwrap();

        assert_eq!(breakdown.worked.len(), 1);
        assert_eq!(breakdown.worked[0].category, PayCategory::Regular);
        assert_eq!(breakdown.worked_total(), Money::from_pesos(800));
        assert_eq!(breakdown.overtime_total(), Money::zero());
    }

    #[test]
    fn test_categories_merge_across_days() {
        let days = [
            day(vec![seg(DayType::Regular, TimeType::Regular, 480)], 0),
            day(vec![seg(DayType::Regular, TimeType::Regular, 240)], 0),
        ];
        let breakdown = price_segments(&days, Money::from_pesos(100), &config()).unwrap();

        assert_eq!(breakdown.worked.len(), 1);
        assert_eq!(breakdown.worked[0].minutes, 720);
    }

    #[test]
    fn test_overtime_lands_in_overtime_section() {
        let days = [day(
            vec![
                seg(DayType::Regular, TimeType::Regular, 480),
                seg(DayType::Regular, TimeType::Overtime, 60),
            ],
            0,
        )];
        let breakdown = price_segments(&days, Money::from_pesos(100), &config()).unwrap();

        assert_eq!(breakdown.worked.len(), 1);
        assert_eq!(breakdown.overtime.len(), 1);
        // 1.25× for one hour at ₱100/hr.
        assert_eq!(breakdown.overtime_total(), Money::from_pesos(125));
        // ₱800 regular + ₱125 overtime.
        assert_eq!(breakdown.gross(), Money::from_pesos(925));
    }

    /// At a fixed hourly rate, every extra minute worked strictly raises
    /// the worked-hour pay.
    #[test]
    fn test_gross_strictly_increases_with_minutes() {
        let config = config();
        let rate = Money::from_pesos(100);
        let mut previous = Money::from_cents(-1);
        for minutes in (30_i64..=600).step_by(7) {
            let days = [day(vec![seg(DayType::Regular, TimeType::Regular, minutes)], 0)];
            let breakdown = price_segments(&days, rate, &config).unwrap();
            assert!(breakdown.gross() > previous, "not monotone at {minutes} min");
            previous = breakdown.gross();
        }
    }

    /// Three 20-minute segments at ₱100.01/hr: each rounds to ₱33.34 on
    /// its own, but the exact sum is ₱100.01 — totals must round once.
    #[test]
    fn test_total_rounds_once_over_exact_sum() {
        let days = [
            day(vec![seg(DayType::Regular, TimeType::Regular, 20)], 0),
            day(vec![seg(DayType::RestDay, TimeType::Regular, 20)], 0),
            day(vec![seg(DayType::SpecialHoliday, TimeType::Regular, 20)], 0),
        ];
        let mut config = config();
        // Flatten the premium categories so all three segments price at 1.0×.
        for entry in &mut config.rate_table.entries {
            entry.multiplier_bps = 10_000;
        }
        let breakdown = price_segments(&days, Money::from_cents(100_01), &config).unwrap();

        let per_line: i64 = breakdown.worked.iter().map(|l| l.pay_cents).sum();
        assert_eq!(per_line, 100_02); // each line rounds up on its own
        assert_eq!(breakdown.worked_total(), Money::from_cents(100_01));
    }

    #[test]
    fn test_totals_survive_serde_round_trip() {
        let days = [day(
            vec![
                seg(DayType::Regular, TimeType::Regular, 470),
                seg(DayType::Regular, TimeType::NightDiff, 10),
            ],
            0,
        )];
        let breakdown = price_segments(&days, Money::from_cents(76_71), &config()).unwrap();

        let json = serde_json::to_string(&breakdown).unwrap();
        let restored: PayrollBreakdown = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.worked_total(), breakdown.worked_total());
        assert_eq!(restored.gross(), breakdown.gross());
    }

    #[test]
    fn test_leave_minutes_price_at_base_rate() {
        let days = [day(vec![], 480)];
        let breakdown = price_segments(&days, Money::from_pesos(100), &config()).unwrap();

        assert_eq!(breakdown.worked.len(), 1);
        assert_eq!(breakdown.worked[0].category, PayCategory::Leave);
        assert_eq!(breakdown.worked[0].multiplier_bps, 10_000);
        assert_eq!(breakdown.leave_pay(), Money::from_pesos(800));
    }

    #[test]
    fn test_night_diff_pay_covers_both_sections() {
        let days = [day(
            vec![
                seg(DayType::Regular, TimeType::NightDiff, 60),
                seg(DayType::Regular, TimeType::OvertimeNightDiff, 60),
            ],
            0,
        )];
        let breakdown = price_segments(&days, Money::from_pesos(100), &config()).unwrap();

        // 1.10× + 1.375× at ₱100/hr.
        assert_eq!(breakdown.night_diff_pay(), Money::from_cents(247_50));
        assert_eq!(breakdown.night_diff_pay(), breakdown.gross());
    }

    #[test]
    fn test_missing_rate_entry_is_fatal() {
        let mut config = config();
        config
            .rate_table
            .entries
            .retain(|e| e.time_type != TimeType::Overtime || e.day_type != DayType::RestDay);

        let days = [day(vec![seg(DayType::RestDay, TimeType::Overtime, 60)], 0)];
        let err = price_segments(&days, Money::from_pesos(100), &config).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingRateEntry {
                day_type: DayType::RestDay,
                time_type: TimeType::Overtime,
            }
        );
    }

    #[test]
    fn test_line_order_is_canonical() {
        // Feed segments in scrambled order; lines come out day-major.
        let days = [day(
            vec![
                seg(DayType::RestDay, TimeType::Regular, 60),
                seg(DayType::Regular, TimeType::NightDiff, 60),
                seg(DayType::Regular, TimeType::Regular, 60),
            ],
            0,
        )];
        let breakdown = price_segments(&days, Money::from_pesos(100), &config()).unwrap();

        let categories: Vec<PayCategory> =
            breakdown.worked.iter().map(|l| l.category).collect();
        assert_eq!(
            categories,
            vec![
                PayCategory::Regular,
                PayCategory::NightDiff,
                PayCategory::RestDay,
            ]
        );
    }
}
