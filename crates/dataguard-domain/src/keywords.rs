//! Pinned heuristic keyword fixtures.
//!
//! These literals ARE the detection heuristics: both the matcher/checkers and
//! the test suite read them from here, so the lists cannot drift apart
//! silently. Matching is always substring-on-lowercased-column-name.

use dataguard_types::RuleType;

/// Column-name fragments the matcher adds for encryption rules.
pub const ENCRYPTION_KEYWORDS: &[&str] = &[
    "password",
    "ssn",
    "credit_card",
    "account_number",
    "secret",
    "token",
    "key",
];

/// Column-name fragments the matcher adds for masking rules.
pub const MASKING_KEYWORDS: &[&str] =
    &["email", "phone", "ssn", "credit_card", "account", "address"];

/// Column-name fragments the matcher adds for consent rules.
pub const CONSENT_KEYWORDS: &[&str] = &["email", "marketing", "consent", "opted"];

/// Column-name fragments the matcher adds for age-restriction rules.
pub const AGE_KEYWORDS: &[&str] = &["birthdate", "birth_date", "dob", "date_of_birth", "age"];

/// Column-name fragments the matcher adds for geographic-restriction rules.
pub const GEOGRAPHIC_KEYWORDS: &[&str] =
    &["country", "region", "location", "address", "city", "state"];

/// Fragments that make a column date-like for the retention check.
pub const DATE_COLUMN_HINTS: &[&str] = &["date", "time", "created", "updated", "modified"];

/// Fragments that make a column birth-date-like for the age check.
pub const BIRTH_COLUMN_HINTS: &[&str] = &["birth", "dob", "date_of_birth"];

/// Fragments that make a column geography-like for the geographic check.
pub const GEO_COLUMN_HINTS: &[&str] = &["country", "region", "location"];

/// Column names the access check treats as sensitive.
pub const SENSITIVE_COLUMN_NAMES: &[&str] =
    &["password", "secret", "token", "key", "ssn", "credit"];

/// Canonical audit columns; a table without any of these fails the
/// audit-logging check.
pub const AUDIT_COLUMN_NAMES: &[&str] = &[
    "created_at",
    "updated_at",
    "modified_at",
    "created_by",
    "modified_by",
    "audit_log",
];

/// Matcher augmentation list for a rule category. Categories without a
/// keyword heuristic match on entity hints only.
pub fn matcher_keywords(rule_type: RuleType) -> &'static [&'static str] {
    match rule_type {
        RuleType::DataEncryption => ENCRYPTION_KEYWORDS,
        RuleType::DataMasking => MASKING_KEYWORDS,
        RuleType::Consent => CONSENT_KEYWORDS,
        RuleType::AgeRestriction => AGE_KEYWORDS,
        RuleType::GeographicRestriction => GEOGRAPHIC_KEYWORDS,
        RuleType::DataRetention
        | RuleType::DataAccess
        | RuleType::AuditLogging
        | RuleType::Notification
        | RuleType::Other => &[],
    }
}
