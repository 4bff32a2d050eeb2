// File: src/report.rs
// Purpose: Outcome of one validation pass

use std::fmt;

use crate::fieldset::FieldRef;
use crate::form_data::FormData;

/// Where a failure is attached: a plain named field, or a field inside a
/// dynamic sub-form instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldTarget {
    Named(String),
    Instanced(FieldRef),
}

impl FieldTarget {
    pub fn named(name: impl Into<String>) -> Self {
        FieldTarget::Named(name.into())
    }
}

impl fmt::Display for FieldTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldTarget::Named(name) => write!(f, "{}", name),
            FieldTarget::Instanced(field_ref) => {
                write!(f, "[{}][{}]", field_ref.instance, field_ref.key)
            }
        }
    }
}

/// One field-scoped failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FieldTarget,
    pub message: String,
}

/// Created fresh on each submit attempt, consumed by the presentation
/// bridge, then discarded. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Field-scoped failures, in rule evaluation order
    pub field_errors: Vec<FieldError>,
    /// Whole-form failures with no single field to attach to
    pub form_errors: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.field_errors.is_empty() && self.form_errors.is_empty()
    }

    pub fn add_field_error(&mut self, field: FieldTarget, message: impl Into<String>) {
        self.field_errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn add_form_error(&mut self, message: impl Into<String>) {
        self.form_errors.push(message.into());
    }

    pub fn has_error(&self, field: &FieldTarget) -> bool {
        self.field_errors.iter().any(|e| &e.field == field)
    }

    /// First recorded message for a field.
    pub fn error_for(&self, field: &FieldTarget) -> Option<&str> {
        self.field_errors
            .iter()
            .find(|e| &e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Number of distinct fields with at least one error.
    pub fn invalid_field_count(&self) -> usize {
        let mut seen: Vec<&FieldTarget> = Vec::new();
        for error in &self.field_errors {
            if !seen.contains(&&error.field) {
                seen.push(&error.field);
            }
        }
        seen.len()
    }

    /// First invalid field in document order: the form's named fields in
    /// page order first, then dynamic-instance fields in evaluation order
    /// (instances render below the named fields on every page here).
    pub fn first_invalid(&self, form: &FormData) -> Option<FieldTarget> {
        for name in form.names() {
            let target = FieldTarget::named(name);
            if self.has_error(&target) {
                return Some(target);
            }
        }
        self.field_errors
            .iter()
            .find(|e| matches!(e.field, FieldTarget::Instanced(_)))
            .map(|e| e.field.clone())
    }
}
