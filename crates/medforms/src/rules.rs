// File: src/rules.rs
// Purpose: Declarative validation rules evaluated on submit

use medforms_validation::{assess_password_strength, is_present, is_valid_email, is_valid_phone};

use crate::form_data::FormData;
use crate::report::{FieldTarget, ValidationReport};

pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const PHONE_MESSAGE: &str = "Please enter a valid phone number";
pub const WEAK_PASSWORD_MESSAGE: &str =
    "Password is too weak. Use at least 8 characters with letters and numbers.";

/// One validation constraint against the current form values.
///
/// Format rules skip empty values; emptiness is a `Required` concern and
/// every field gets its own `Required` rule when it is mandatory.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Non-empty after trimming
    Required { field: String, message: String },
    /// Email shape, checked only when non-empty
    Email { field: String },
    /// Phone shape, checked only when non-empty
    Phone { field: String },
    /// Password strength floor, checked only when non-empty
    MinStrength { field: String, min_score: u8 },
    /// Field must equal another field; skipped while the field is empty
    /// (its own `Required` rule reports emptiness)
    MustMatch {
        field: String,
        other: String,
        message: String,
    },
    /// Field must differ from another field; applies when both are non-empty
    MustDiffer {
        field: String,
        other: String,
        message: String,
    },
    /// A select with a chosen (non-empty) value
    Selected { field: String, message: String },
    /// Checkbox that must be ticked. There is no single field to mark, so
    /// failure is form-scoped and surfaces as a toast.
    Checked { field: String, message: String },
}

impl Rule {
    pub fn required(field: impl Into<String>, message: impl Into<String>) -> Self {
        Rule::Required {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn email(field: impl Into<String>) -> Self {
        Rule::Email {
            field: field.into(),
        }
    }

    pub fn phone(field: impl Into<String>) -> Self {
        Rule::Phone {
            field: field.into(),
        }
    }

    pub fn min_strength(field: impl Into<String>, min_score: u8) -> Self {
        Rule::MinStrength {
            field: field.into(),
            min_score,
        }
    }

    pub fn must_match(
        field: impl Into<String>,
        other: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Rule::MustMatch {
            field: field.into(),
            other: other.into(),
            message: message.into(),
        }
    }

    pub fn must_differ(
        field: impl Into<String>,
        other: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Rule::MustDiffer {
            field: field.into(),
            other: other.into(),
            message: message.into(),
        }
    }

    pub fn selected(field: impl Into<String>, message: impl Into<String>) -> Self {
        Rule::Selected {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn checked(field: impl Into<String>, message: impl Into<String>) -> Self {
        Rule::Checked {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The field this rule is attached to.
    pub fn field(&self) -> &str {
        match self {
            Rule::Required { field, .. }
            | Rule::Email { field }
            | Rule::Phone { field }
            | Rule::MinStrength { field, .. }
            | Rule::MustMatch { field, .. }
            | Rule::MustDiffer { field, .. }
            | Rule::Selected { field, .. }
            | Rule::Checked { field, .. } => field,
        }
    }

    /// True for shape rules that also run live on blur.
    pub fn is_format_rule(&self) -> bool {
        matches!(self, Rule::Email { .. } | Rule::Phone { .. })
    }

    pub(crate) fn evaluate(&self, form: &FormData, report: &mut ValidationReport) {
        match self {
            Rule::Required { field, message } => {
                if !is_present(form.value(field)) {
                    report.add_field_error(FieldTarget::named(field), message);
                }
            }
            Rule::Email { field } => {
                let value = form.value(field).trim();
                if !value.is_empty() && !is_valid_email(value) {
                    report.add_field_error(FieldTarget::named(field), EMAIL_MESSAGE);
                }
            }
            Rule::Phone { field } => {
                let value = form.value(field).trim();
                if !value.is_empty() && !is_valid_phone(value) {
                    report.add_field_error(FieldTarget::named(field), PHONE_MESSAGE);
                }
            }
            Rule::MinStrength { field, min_score } => {
                let value = form.value(field);
                if !value.is_empty() && !assess_password_strength(value).meets(*min_score) {
                    report.add_field_error(FieldTarget::named(field), WEAK_PASSWORD_MESSAGE);
                }
            }
            Rule::MustMatch {
                field,
                other,
                message,
            } => {
                let value = form.value(field);
                if !value.is_empty() && value != form.value(other) {
                    report.add_field_error(FieldTarget::named(field), message);
                }
            }
            Rule::MustDiffer {
                field,
                other,
                message,
            } => {
                let value = form.value(field);
                let other_value = form.value(other);
                if !value.is_empty() && !other_value.is_empty() && value == other_value {
                    report.add_field_error(FieldTarget::named(field), message);
                }
            }
            Rule::Selected { field, message } => {
                if form.value(field).is_empty() {
                    report.add_field_error(FieldTarget::named(field), message);
                }
            }
            Rule::Checked { field, message } => {
                if !form.is_checked(field) {
                    report.add_form_error(message);
                }
            }
        }
    }
}

/// Ordered rule collection for one form. Every rule is evaluated on each
/// pass and failures aggregate; nothing short-circuits.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn evaluate(&self, form: &FormData) -> ValidationReport {
        let mut report = ValidationReport::new();
        for rule in &self.rules {
            rule.evaluate(form, &mut report);
        }
        report
    }
}
