// File: src/controller.rs
// Purpose: Submit-time validation orchestration for a single form

use crate::bridge::{PresentationBridge, Severity};
use crate::form_data::FormData;
use crate::report::{FieldTarget, ValidationReport};
use crate::rules::RuleSet;

/// Idle between submits, Validating inside one synchronous pass. The
/// transition back to Idle happens before the submit handler returns, so
/// two passes can never interleave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Validating,
}

/// What the submit interceptor does next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitDecision {
    /// Let the navigation-based submission (or the async hand-off) go ahead
    Proceed,
    /// Keep the page where it is; the errors have been rendered
    Block,
}

/// Per-form orchestrator: owns the rule set and runs the submit pass.
pub struct FormController {
    form_id: String,
    rules: RuleSet,
    state: ControllerState,
}

impl FormController {
    pub fn new(form_id: impl Into<String>, rules: RuleSet) -> Self {
        Self {
            form_id: form_id.into(),
            rules,
            state: ControllerState::Idle,
        }
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// One synchronous validation pass:
    /// 1. clear stale field errors,
    /// 2. evaluate every rule and aggregate,
    /// 3. on failure render errors, focus the first invalid field in
    ///    document order and block,
    /// 4. on success let the submission proceed.
    pub fn handle_submit(
        &mut self,
        form: &FormData,
        bridge: &mut dyn PresentationBridge,
    ) -> SubmitDecision {
        self.state = ControllerState::Validating;
        bridge.clear_form_errors();

        let report = self.rules.evaluate(form);
        let decision = render_report(&report, form, bridge);

        self.state = ControllerState::Idle;
        decision
    }

    /// Live shape check while the user tabs through the form: a non-empty
    /// invalid value marks the field, anything else clears it. Only format
    /// rules (email/phone) participate; required-ness waits for submit.
    pub fn validate_field_on_blur(
        &self,
        field: &str,
        form: &FormData,
        bridge: &mut dyn PresentationBridge,
    ) {
        let target = FieldTarget::named(field);
        let mut report = ValidationReport::new();
        for rule in self.rules.iter() {
            if rule.is_format_rule() && rule.field() == field {
                rule.evaluate(form, &mut report);
            }
        }

        match report.error_for(&target) {
            Some(message) => bridge.show_field_error(&target, message),
            None => bridge.clear_field_error(&target),
        }
    }
}

/// Push a report through the bridge and decide. Field-scoped failures mark
/// their fields, form-scoped ones toast; any failure blocks and the first
/// invalid field (document order) gets focus.
pub(crate) fn render_report(
    report: &ValidationReport,
    form: &FormData,
    bridge: &mut dyn PresentationBridge,
) -> SubmitDecision {
    for error in &report.field_errors {
        bridge.show_field_error(&error.field, &error.message);
    }
    for message in &report.form_errors {
        bridge.show_toast(message, Severity::Error);
    }

    if report.is_valid() {
        SubmitDecision::Proceed
    } else {
        if let Some(first) = report.first_invalid(form) {
            bridge.focus_field(&first);
        }
        SubmitDecision::Block
    }
}
