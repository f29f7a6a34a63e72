//! Use case orchestration for dataguard.
//!
//! This crate provides the application layer: use cases that coordinate the
//! settings, backend, and domain layers. It is intentionally thin and
//! delegates heavy lifting to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and
//! terminal output.

#![forbid(unsafe_code)]

mod history;
mod report;
mod scan;

pub use history::{ScanHistory, ScanRecord, ViolationFilter, filter_violations};
pub use report::{parse_report_json, serialize_report, write_report};
pub use scan::{ScanInput, ScanOutput, parse_rules_json, run_scan, run_scan_with_backend,
    scan_exit_code};
