//! Validation Utilities
//!
//! Input validation and normalization for snapshot ingestion and view
//! queries.

use regex::Regex;
use std::sync::OnceLock;
use validator::ValidationError;

/// Validates referral code format
///
/// Codes are issued as short alphanumeric tokens. Anything outside that
/// shape is treated as garbage from an upstream feed and dropped on ingest.
pub fn validate_referral_code(code: &str) -> bool {
    static CODE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = CODE_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_-]{4,24}$").expect("Failed to compile referral code regex")
    });

    regex.is_match(code)
}

/// Normalizes email address to lowercase and removes whitespace
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalizes a search term for case-insensitive substring matching
pub fn normalize_search_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Custom validator for referral code fields using the validator crate
pub fn referral_code_validator(code: &str) -> Result<(), ValidationError> {
    if validate_referral_code(code) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_referral_code"))
    }
}

/// Validation error messages for user-friendly responses
pub mod messages {
    pub const INVALID_REFERRAL_CODE: &str =
        "Referral codes must be 4-24 characters of letters, digits, hyphens, or underscores";
    pub const INVALID_PAGE: &str = "Page numbers start at 1";
    pub const INVALID_PAGE_SIZE: &str = "Page size must be at least 1";
    pub const SEARCH_TOO_LONG: &str = "Search terms are limited to 120 characters";
}
