//! One checker per rule category, behind a closed registry.
//!
//! Every checker is a function of (table, rule, columns, backend) producing
//! raw hits. Query failures inside per-column loops skip the column; a
//! failure of a single-query check propagates so the coordinator can record
//! a diagnostic for the (table, rule) pair.

use dataguard_backend::{Backend, BackendError};
use dataguard_types::{PotentialViolation, Rule, RuleType};

mod access;
mod age_restriction;
mod audit_logging;
mod encryption;
mod geographic;
mod masking;
pub mod predicate;
mod retention;
mod utils;


/// Everything a checker may look at.
pub struct CheckContext<'a> {
    pub table: &'a str,
    pub rule: &'a Rule,
    /// Full column set of the table, in schema order.
    pub columns: &'a [String],
    /// Output of the column matcher for this (table, rule) pair.
    pub matched: &'a [String],
    pub backend: &'a dyn Backend,
}

pub type CheckFn = fn(&CheckContext<'_>) -> Result<Vec<PotentialViolation>, BackendError>;

/// Registry mapping rule categories to checkers.
///
/// Categories without a dedicated checker (consent, notification, other)
/// fall back to the generic predicate check at the dispatch site.
pub fn checker_for(rule_type: RuleType) -> Option<CheckFn> {
    match rule_type {
        RuleType::DataRetention => Some(retention::run),
        RuleType::DataEncryption => Some(encryption::run),
        RuleType::DataMasking => Some(masking::run),
        RuleType::DataAccess => Some(access::run),
        RuleType::AgeRestriction => Some(age_restriction::run),
        RuleType::GeographicRestriction => Some(geographic::run),
        RuleType::AuditLogging => Some(audit_logging::run),
        RuleType::Consent | RuleType::Notification | RuleType::Other => None,
    }
}
