// File: src/phone.rs
// Purpose: Phone number shape validation

/// Validate phone number shape.
///
/// Deliberately permissive: an optional leading `+`, digits mixed with the
/// usual separators (spaces, dashes, dots, parentheses), and 7 to 15 digits
/// in total. Anything stricter rejects real numbers.
pub fn is_valid_phone(phone: &str) -> bool {
    let trimmed = phone.trim();
    if trimmed.is_empty() {
        return false;
    }

    let rest = trimmed.strip_prefix('+').unwrap_or(trimmed);

    let mut digits = 0usize;
    for c in rest.chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return false,
        }
    }

    (7..=15).contains(&digits)
}
