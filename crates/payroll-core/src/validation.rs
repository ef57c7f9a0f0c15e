//! # Validation Module
//!
//! Load-time validation for configuration snapshots and run inputs.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Configuration admin UI (external collaborator)               │
//! │  ├── Basic format checks, immediate feedback                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE — PayrollConfig::validate() at run start         │
//! │  ├── Rate table fully enumerated, no duplicates                        │
//! │  ├── Brackets partition [0, ∞) with half-open ranges                   │
//! │  └── Any failure aborts the run BEFORE any employee is processed       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Per-employee input checks inside the pipeline                │
//! │  └── Open records, missing schedules → skip with reason                │
//! │                                                                         │
//! │  A silently-wrong rate corrupts every payslip; layer 2 is therefore    │
//! │  fatal by design.                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use crate::config::{ContributionBracket, RateMultiplierTable};
use crate::error::ConfigError;
use crate::types::{minutes_of, BreakPolicy, DayType, Schedule, TimeType};

/// Result type for config validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Widest multiplier the table accepts: 10.00×.
///
/// Regulatory stacks top out well below this (regular-holiday rest-day
/// OT+ND is 3.38×); anything above ten is a data-entry mistake.
pub const MAX_MULTIPLIER_BPS: u32 = 100_000;

// =============================================================================
// Rate Table
// =============================================================================

/// Validates a rate multiplier table.
///
/// ## Rules
/// - Every reachable (DayType, TimeType) combination has exactly one entry
/// - No multiplier below 1.00× (premium tables never pay under base rate)
/// - No multiplier above [`MAX_MULTIPLIER_BPS`]
///
/// A missing entry is a configuration error here, never a silent 1.0×
/// default at lookup time.
pub fn validate_rate_table(table: &RateMultiplierTable) -> ConfigResult<()> {
    let mut seen: HashSet<(DayType, TimeType)> = HashSet::new();

    for entry in &table.entries {
        if !seen.insert((entry.day_type, entry.time_type)) {
            return Err(ConfigError::DuplicateRateEntry {
                day_type: entry.day_type,
                time_type: entry.time_type,
            });
        }
        if entry.multiplier_bps < 10_000 || entry.multiplier_bps > MAX_MULTIPLIER_BPS {
            return Err(ConfigError::InvalidMultiplier {
                day_type: entry.day_type,
                time_type: entry.time_type,
                bps: entry.multiplier_bps,
            });
        }
    }

    for day in DayType::ALL {
        for time in TimeType::ALL {
            if !seen.contains(&(day, time)) {
                return Err(ConfigError::MissingRateEntry {
                    day_type: day,
                    time_type: time,
                });
            }
        }
    }

    Ok(())
}

// =============================================================================
// Bracket Tables
// =============================================================================

/// Validates a contribution/tax bracket table.
///
/// ## Rules
/// - At least one bracket
/// - First bracket starts at 0
/// - Ranges are half-open `[lower, upper)`, sorted, gap-free, overlap-free:
///   each lower bound equals the previous upper bound exactly
/// - The last bracket is unbounded so every input resolves
pub fn validate_brackets(table: &'static str, brackets: &[ContributionBracket]) -> ConfigResult<()> {
    let Some(first) = brackets.first() else {
        return Err(ConfigError::EmptyBracketTable { table });
    };

    if first.lower_cents != 0 {
        return Err(ConfigError::BracketsNotFromZero {
            table,
            lower_cents: first.lower_cents,
        });
    }

    let mut expected = 0i64;
    for bracket in brackets {
        if bracket.lower_cents != expected {
            return Err(ConfigError::BracketDiscontinuity {
                table,
                expected_cents: expected,
                lower_cents: bracket.lower_cents,
            });
        }
        match bracket.upper_cents {
            Some(upper) if upper <= bracket.lower_cents => {
                return Err(ConfigError::BracketInverted {
                    table,
                    lower_cents: bracket.lower_cents,
                    upper_cents: upper,
                });
            }
            Some(upper) => expected = upper,
            // Unbounded bracket: must be the last one; a successor would
            // fail the continuity check against i64::MAX.
            None => expected = i64::MAX,
        }
    }

    if expected != i64::MAX {
        return Err(ConfigError::BracketsNotExhaustive {
            table,
            upper_cents: expected,
        });
    }

    Ok(())
}

// =============================================================================
// Schedule
// =============================================================================

/// Validates a schedule's break window against its shift bounds.
///
/// Returns a human-readable reason; the caller wraps it into a
/// per-employee `ComputeError::InvalidSchedule`.
pub fn validate_schedule(schedule: &Schedule) -> Result<(), String> {
    let (start, end) = schedule.shift_bounds();

    if schedule.workdays == 0 {
        return Err("no working days configured".to_string());
    }

    match schedule.break_policy {
        BreakPolicy::None => {}
        BreakPolicy::Fixed { minutes } => {
            if minutes < 0 || minutes >= end - start {
                return Err(format!("fixed break of {minutes} minutes exceeds the shift"));
            }
        }
        BreakPolicy::Window { start: bs, end: be } => {
            let (bs, be) = (minutes_of(bs), minutes_of(be));
            let be = if be <= bs { be + 24 * 60 } else { be };
            if bs < start || be > end {
                return Err("break window lies outside the shift".to_string());
            }
        }
    }

    Ok(())
}

/// Validates an employee/record UUID string.
pub fn validate_uuid(id: &str) -> Result<(), String> {
    if id.trim().is_empty() {
        return Err("id is required".to_string());
    }
    uuid::Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| format!("'{id}' is not a valid UUID"))
}

// =============================================================================
// Unit Tests
// =============================================================================
