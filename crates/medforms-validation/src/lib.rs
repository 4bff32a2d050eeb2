// MedForms Validation
// Stateless predicates shared by every form controller.
//
// Predicates never panic and never report errors of their own: invalid or
// absent input reads as "check fails", and the rule layer decides whether
// that means "skip" (optional field) or "reject" (required field).

pub mod email;
pub mod password;
pub mod phone;
pub mod string;

pub use email::is_valid_email;
pub use password::{assess_password_strength, PasswordChecks, PasswordStrength, StrengthLevel};
pub use phone::is_valid_phone;
pub use string::{differs, equals, is_present};
