// File: src/email.rs
// Purpose: Email shape validation

use once_cell::sync::Lazy;
use regex::Regex;

// Email validation regex
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

/// Validate email shape.
///
/// An empty string fails here. Optional fields skip the check at the rule
/// layer instead: the convention throughout is "if non-empty and invalid,
/// fail".
pub fn is_valid_email(email: &str) -> bool {
    // The regex alone would accept consecutive dots in the domain part
    if email.contains("..") {
        return false;
    }
    EMAIL_REGEX.is_match(email)
}
