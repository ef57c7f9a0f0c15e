//! # Rate Multiplier Resolution
//!
//! Resolves a worked segment's composite (DayType, TimeType) key to its
//! pay multiplier against a config snapshot.
//!
//! ## Fail Fast, Never Guess
//! A missing table entry returns `ConfigError::MissingRateEntry`. The
//! tempting fallback — "no entry, assume 1.0×" — silently underpays
//! premium hours, which is exactly the failure mode a compliance audit
//! exists to catch. `run_payroll` validates the table up front, so in a
//! normal run this error is unreachable.

use crate::config::PayrollConfig;
use crate::error::ConfigError;
use crate::money::Multiplier;
use crate::types::{DayType, TimeType};

/// Resolves the composed multiplier for a segment's composite key.
///
/// Stacking (rest-day + overtime + night-diff) is a single table row,
/// never a runtime product of independent multipliers — see
/// [`crate::config::RateMultiplierTable`].
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use payroll_core::config::PayrollConfig;
/// use payroll_core::rates::resolve;
/// use payroll_core::types::{DayType, TimeType};
///
/// let config = PayrollConfig::standard_2024(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
/// let m = resolve(DayType::RestDay, TimeType::Overtime, &config).unwrap();
/// assert_eq!(m.bps(), 16_900); // 1.69×
/// ```
pub fn resolve(
    day_type: DayType,
    time_type: TimeType,
    config: &PayrollConfig,
) -> Result<Multiplier, ConfigError> {
    config
        .rate_table
        .get(day_type, time_type)
        .ok_or(ConfigError::MissingRateEntry {
            day_type,
            time_type,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn config() -> PayrollConfig {
        PayrollConfig::standard_2024(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    #[test]
    fn test_resolve_all_reachable_keys() {
        let config = config();
        for day in DayType::ALL {
            for time in TimeType::ALL {
                assert!(resolve(day, time, &config).is_ok(), "{day:?}/{time:?}");
            }
        }
    }

    #[test]
    fn test_missing_entry_is_an_error_not_a_default() {
        let mut config = config();
        config
            .rate_table
            .entries
            .retain(|e| e.time_type != TimeType::OvertimeNightDiff);

        let err = resolve(DayType::Regular, TimeType::OvertimeNightDiff, &config).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRateEntry { .. }));
    }

    #[test]
    fn test_composite_stacking_is_not_a_product() {
        // The regular-holiday OT+ND row is 2.86×, which happens to equal
        // 2.0 × 1.3 × 1.1 — but the resolver must read the table row, not
        // multiply. Verify by bending the table.
        let mut config = config();
        for e in &mut config.rate_table.entries {
            if e.day_type == DayType::RegularHoliday && e.time_type == TimeType::OvertimeNightDiff
            {
                e.multiplier_bps = 30_000;
            }
        }
        let m = resolve(DayType::RegularHoliday, TimeType::OvertimeNightDiff, &config).unwrap();
        assert_eq!(m.bps(), 30_000);
    }
}
