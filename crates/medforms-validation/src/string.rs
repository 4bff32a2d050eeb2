// File: src/string.rs
// Purpose: Presence and cross-field comparison helpers

/// Required-field check: non-empty after trimming surrounding whitespace.
pub fn is_present(s: &str) -> bool {
    !s.trim().is_empty()
}

pub fn equals(value: &str, other: &str) -> bool {
    value == other
}

pub fn differs(value: &str, other: &str) -> bool {
    value != other
}
