// File: tests/form_flow_tests.rs
// Purpose: End-to-end submit passes for the fixed account forms

use medforms::{forms, FieldTarget, FormController, MemoryBridge, SubmitDecision};

fn filled_registration() -> medforms::FormData {
    let mut form = forms::registration_form();
    form.set("first_name", "Ann");
    form.set("last_name", "Lee");
    form.set("username", "ann");
    form.set("email", "ann@example.com");
    form.set("phone", "+1 555-0100");
    form.set("role", "doctor");
    // letters + digits, length 8: score 3, good
    form.set("password1", "abc12345");
    form.set("password2", "abc12345");
    form.set("terms", "on");
    form
}

#[test]
fn registration_with_good_password_proceeds_cleanly() {
    let mut controller = FormController::new("registerForm", forms::registration_rules());
    let mut bridge = MemoryBridge::new();

    let decision = controller.handle_submit(&filled_registration(), &mut bridge);
    assert_eq!(decision, SubmitDecision::Proceed);
    assert_eq!(bridge.error_count(), 0);
    assert!(bridge.toasts().is_empty());
}

#[test]
fn registration_with_mismatched_confirmation_marks_only_that_field() {
    let mut controller = FormController::new("registerForm", forms::registration_rules());
    let mut bridge = MemoryBridge::new();

    let mut form = filled_registration();
    form.set("password2", "different");

    let decision = controller.handle_submit(&form, &mut bridge);
    assert_eq!(decision, SubmitDecision::Block);
    assert_eq!(bridge.error_count(), 1);
    assert_eq!(
        bridge.field_error(&FieldTarget::named("password2")),
        Some("Passwords do not match")
    );
    assert_eq!(
        bridge.focused_field(),
        Some(&FieldTarget::named("password2"))
    );
}

#[test]
fn registration_with_weak_password_blocks() {
    let mut controller = FormController::new("registerForm", forms::registration_rules());
    let mut bridge = MemoryBridge::new();

    let mut form = filled_registration();
    // digits only, short: score 1, weak
    form.set("password1", "1234");
    form.set("password2", "1234");

    assert_eq!(controller.handle_submit(&form, &mut bridge), SubmitDecision::Block);
    assert!(bridge.field_error(&FieldTarget::named("password1")).is_some());
}

#[test]
fn empty_registration_focuses_first_field_in_document_order() {
    let mut controller = FormController::new("registerForm", forms::registration_rules());
    let mut bridge = MemoryBridge::new();

    let decision = controller.handle_submit(&forms::registration_form(), &mut bridge);
    assert_eq!(decision, SubmitDecision::Block);
    assert_eq!(
        bridge.focused_field(),
        Some(&FieldTarget::named("first_name"))
    );
}

#[test]
fn password_change_rejects_unchanged_password() {
    let mut controller =
        FormController::new("passwordChangeForm", forms::password_change_rules());
    let mut bridge = MemoryBridge::new();

    let mut form = forms::password_change_form();
    form.set("old_password", "secret1");
    form.set("new_password1", "secret1");
    form.set("new_password2", "secret1");

    // strength and match both pass individually; must-differ still fires
    let decision = controller.handle_submit(&form, &mut bridge);
    assert_eq!(decision, SubmitDecision::Block);
    assert_eq!(bridge.error_count(), 1);
    assert_eq!(
        bridge.field_error(&FieldTarget::named("new_password1")),
        Some("New password must be different from current password")
    );
}

#[test]
fn password_change_with_new_password_proceeds() {
    let mut controller =
        FormController::new("passwordChangeForm", forms::password_change_rules());
    let mut bridge = MemoryBridge::new();

    let mut form = forms::password_change_form();
    form.set("old_password", "secret1");
    form.set("new_password1", "brandNew42");
    form.set("new_password2", "brandNew42");

    assert_eq!(controller.handle_submit(&form, &mut bridge), SubmitDecision::Proceed);
    assert_eq!(bridge.error_count(), 0);
}

#[test]
fn profile_edit_checks_email_shape_but_not_phone() {
    let mut controller = FormController::new("profileForm", forms::profile_edit_rules());
    let mut bridge = MemoryBridge::new();

    let mut form = forms::profile_edit_form();
    form.set("first_name", "Ann");
    form.set("last_name", "Lee");
    form.set("email", "not-an-email");
    form.set("phone", "abc");

    assert_eq!(controller.handle_submit(&form, &mut bridge), SubmitDecision::Block);
    assert!(bridge.field_error(&FieldTarget::named("email")).is_some());
    // the phone field is submitted as-is on this page
    assert!(bridge.field_error(&FieldTarget::named("phone")).is_none());
    assert_eq!(bridge.error_count(), 1);
}

#[test]
fn profile_edit_with_email_only_proceeds() {
    let mut controller = FormController::new("profileForm", forms::profile_edit_rules());
    let mut bridge = MemoryBridge::new();

    let mut form = forms::profile_edit_form();
    form.set("first_name", "Ann");
    form.set("last_name", "Lee");
    form.set("email", "ann@example.com");

    assert_eq!(controller.handle_submit(&form, &mut bridge), SubmitDecision::Proceed);
}
