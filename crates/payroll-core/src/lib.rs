//! # payroll-core: Pure Payroll Computation for Sweldo
//!
//! This crate is the **heart** of Sweldo. It turns raw attendance records
//! into audited payslips as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sweldo Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   HR Service (external)                         │   │
//! │  │    employees ──► schedules ──► attendance ──► loans             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ EmployeeRunInput + PayrollConfig       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ payroll-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ attendance │─►│ breakdown │─►│ statutory │─►│  payslip  │  │   │
//! │  │   │  normalize │  │   price   │  │  deduct   │  │  assemble │  │   │
//! │  │   └────────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK READS • PURE FUNCTIONS       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Payslip / RunSummary                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              Payslip store + payout (external)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (schedules, attendance, segments, periods)
//! - [`money`] - Integer centavo arithmetic and exact segment pay
//! - [`config`] - The immutable per-run configuration snapshot
//! - [`rates`] - Composite-key multiplier resolution
//! - [`attendance`] - Clock-event normalization into worked segments
//! - [`breakdown`] - Segment pricing into itemized pay lines
//! - [`statutory`] - SSS, PhilHealth, Pag-IBIG and withholding tax
//! - [`payslip`] - Payslip assembly and conservation checks
//! - [`run`] - The parallel batch engine
//! - [`compliance`] - Scenario replay against hand-computed figures
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, clock access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are centavos (i64); rates are
//!    basis points (u32). No floating point anywhere on the money path.
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//! 5. **Round Once**: Segment pay stays exact until it is summed into a
//!    total, then rounds half-up a single time.
//!
//! ## Example Usage
//!
//! ```rust
//! use payroll_core::money::{ExactPay, Money, Multiplier};
//!
//! // Create money from centavos (never from floats!)
//! let hourly = Money::from_cents(7671); // ₱76.71
//!
//! // Price 90 minutes of rest-day work at 1.30×
//! let pay = ExactPay::segment(hourly, 90, Multiplier::from_bps(13_000));
//!
//! // ₱76.71 × 1.5h × 1.30 = ₱149.58 (rounded once)
//! assert_eq!(pay.to_money().cents(), 14958);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod attendance;
pub mod breakdown;
pub mod compliance;
pub mod config;
pub mod error;
pub mod money;
pub mod payslip;
pub mod rates;
pub mod run;
pub mod statutory;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use payroll_core::Money` instead of
// `use payroll_core::money::Money`

pub use config::PayrollConfig;
pub use error::{ComputeError, ConfigError, CoreResult, PayrollError};
pub use money::{ExactPay, Money, Multiplier};
pub use payslip::{assemble, recompute, Payslip};
pub use run::{run_payroll, EmployeeRunInput, RunSummary};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Start of the statutory night-differential window, minutes from midnight
/// (22:00).
///
/// ## Why a constant?
/// The 10pm-6am window is fixed by the Labor Code, not by employer policy,
/// so it does not live in `PayrollConfig` where an admin could edit it.
pub const NIGHT_DIFF_START_MIN: i64 = 22 * 60;

/// End of the statutory night-differential window, minutes from midnight
/// (06:00).
pub const NIGHT_DIFF_END_MIN: i64 = 6 * 60;
