//! Process exit codes

use plc_lint_core::{LintReport, Status};

pub const OK: i32 = 0;
/// A required dependency (skeleton data, history) was missing
pub const DEPENDENCY_MISSING: i32 = 67;
/// The skeleton could not be downloaded
pub const SERVICE_UNAVAILABLE: i32 = 69;
/// The project directory does not exist
pub const TEMPORARY_FAILURE: i32 = 75;
pub const INVALID_PARAMETERS: i32 = 66;
/// At least one rule failed
pub const VALIDATION_FAILED: i32 = 90;

/// Failures take precedence over errors
pub fn for_report(report: &LintReport) -> i32 {
    if report.has_status(Status::Fail) {
        VALIDATION_FAILED
    } else if report.has_status(Status::Error) {
        DEPENDENCY_MISSING
    } else {
        OK
    }
}
