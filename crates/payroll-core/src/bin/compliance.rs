//! # Compliance Scenario Runner
//!
//! Replays JSON scenario fixtures through the payroll pipeline and prints
//! a pass/fail report with per-field diffs.
//!
//! ## Usage
//! ```bash
//! # Replay the bundled fixtures
//! cargo run -p payroll-core --bin compliance
//!
//! # Replay specific fixture files
//! cargo run -p payroll-core --bin compliance -- fixtures/early_clock_in.json
//!
//! # JSON report instead of the human-readable one
//! cargo run -p payroll-core --bin compliance -- --json
//! ```
//!
//! Exit code 0 when every scenario passes, 1 otherwise — suitable for CI.

use std::env;
use std::fs;
use std::process;

use payroll_core::compliance::{load_scenarios, run_scenarios, ComplianceReport, Scenario};

/// Fixture files compiled into the binary so the runner works from any
/// working directory.
const BUNDLED: &[(&str, &str)] = &[
    ("early_clock_in", include_str!("../../fixtures/early_clock_in.json")),
    ("statutory_brackets", include_str!("../../fixtures/statutory_brackets.json")),
    ("premium_days", include_str!("../../fixtures/premium_days.json")),
];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut json_report = false;
    let mut files: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--json" | "-j" => json_report = true,
            "--help" | "-h" => {
                println!("Sweldo Compliance Scenario Runner");
                println!();
                println!("Usage: compliance [OPTIONS] [FILE ...]");
                println!();
                println!("Options:");
                println!("  -j, --json         Print the report as JSON");
                println!("  -h, --help         Show this help message");
                println!();
                println!("With no FILE arguments the bundled fixtures are replayed.");
                return;
            }
            other => files.push(other.to_string()),
        }
        i += 1;
    }

    let mut suites: Vec<(String, Vec<Scenario>)> = Vec::new();
    if files.is_empty() {
        for (name, json) in BUNDLED {
            match load_scenarios(json) {
                Ok(scenarios) => suites.push((name.to_string(), scenarios)),
                Err(e) => {
                    eprintln!("bundled fixture {} is malformed: {}", name, e);
                    process::exit(2);
                }
            }
        }
    } else {
        for path in files {
            let json = match fs::read_to_string(&path) {
                Ok(json) => json,
                Err(e) => {
                    eprintln!("cannot read {}: {}", path, e);
                    process::exit(2);
                }
            };
            match load_scenarios(&json) {
                Ok(scenarios) => suites.push((path, scenarios)),
                Err(e) => {
                    eprintln!("cannot parse {}: {}", path, e);
                    process::exit(2);
                }
            }
        }
    }

    println!("Sweldo Compliance Runner");
    println!("========================");
    println!();

    let mut all_passed = true;
    for (name, scenarios) in suites {
        let report = run_scenarios(&scenarios);
        if json_report {
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("cannot serialize report for {}: {}", name, e);
                    process::exit(2);
                }
            }
        } else {
            print_report(&name, &report);
        }
        all_passed &= report.passed();
    }

    if all_passed {
        println!("All scenarios passed.");
    } else {
        println!("FAILURES — see diffs above.");
        process::exit(1);
    }
}

fn print_report(suite: &str, report: &ComplianceReport) {
    println!("Suite: {}", suite);
    for outcome in &report.outcomes {
        if outcome.passed() {
            println!("  ✓ {}", outcome.name);
            continue;
        }
        println!("  ✗ {}", outcome.name);
        for diff in &outcome.diffs {
            println!(
                "      {}: expected {} (±{}), got {}",
                diff.field, diff.expected, diff.tolerance, diff.actual
            );
        }
        if let Some(unexpected) = &outcome.unexpected {
            println!("      {}", unexpected);
        }
    }
    println!();
}
