//! # Check-Store Subcommand

use std::path::Path;

use anyhow::Result;

use raven_schema::{check_store, Resolver};

use crate::{EXIT_ERROR, EXIT_FAILURE, EXIT_OK};

/// Execute the check-store subcommand.
///
/// Returns exit code: 0 for a clean store, 1 if problems were found,
/// 2 if the store could not be listed.
pub fn run_check_store(schema_dir: &Path) -> Result<u8> {
    let report = match check_store(&Resolver::new(schema_dir)) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return Ok(EXIT_ERROR);
        }
    };

    println!(
        "Store: {} schema(s), {} sample(s) checked",
        report.schemas_checked, report.samples_checked
    );
    for problem in &report.problems {
        let line = problem.to_string();
        let line = line
            .strip_prefix(&format!("{}/", schema_dir.display()))
            .unwrap_or(&line);
        println!("  FAIL: {line}");
    }

    if report.is_clean() {
        println!("OK: {}", schema_dir.display());
        Ok(EXIT_OK)
    } else {
        println!("\n{} problem(s) found.", report.problems.len());
        Ok(EXIT_FAILURE)
    }
}
