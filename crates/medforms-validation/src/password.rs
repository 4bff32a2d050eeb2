// File: src/password.rs
// Purpose: Password strength scoring

/// The four independent checks behind the strength score.
///
/// Exposed individually so a page can tick requirement rows as the user
/// types, not just show the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordChecks {
    /// At least 8 characters
    pub min_length: bool,
    /// Contains a letter
    pub has_letter: bool,
    /// Contains a digit
    pub has_digit: bool,
    /// Contains a special character
    pub has_special: bool,
}

/// Four-level category derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthLevel {
    Weak,
    Fair,
    Good,
    Strong,
}

/// Derived assessment of one password. Pure function of the string,
/// recomputed on every keystroke or submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    /// Number of satisfied checks, 0-4
    pub score: u8,
    pub checks: PasswordChecks,
    pub level: StrengthLevel,
}

impl PasswordStrength {
    /// Forms that enforce strength reject anything below their floor
    /// (score 2 everywhere in this application).
    pub fn meets(&self, min_score: u8) -> bool {
        self.score >= min_score
    }
}

const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

/// Score a password: length >= 8, contains a letter, contains a digit,
/// contains a special character. One point per satisfied check.
///
/// Categories: score <= 1 weak, 2 fair, 3 good, 4 strong.
pub fn assess_password_strength(password: &str) -> PasswordStrength {
    let checks = PasswordChecks {
        min_length: password.len() >= 8,
        has_letter: password.chars().any(|c| c.is_ascii_alphabetic()),
        has_digit: password.chars().any(|c| c.is_ascii_digit()),
        has_special: password.chars().any(|c| SPECIAL_CHARS.contains(c)),
    };

    let score = [
        checks.min_length,
        checks.has_letter,
        checks.has_digit,
        checks.has_special,
    ]
    .iter()
    .filter(|&&satisfied| satisfied)
    .count() as u8;

    let level = match score {
        0 | 1 => StrengthLevel::Weak,
        2 => StrengthLevel::Fair,
        3 => StrengthLevel::Good,
        _ => StrengthLevel::Strong,
    };

    PasswordStrength {
        score,
        checks,
        level,
    }
}
