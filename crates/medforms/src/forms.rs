// File: src/forms.rs
// Purpose: Fixed per-form rule sets and field declarations
//
// Rule sets are fixed per page, not user-configurable. The *_form()
// constructors declare fields in the order they appear on the page, which
// is what "first invalid field" resolution runs against.

use crate::form_data::FormData;
use crate::rules::{Rule, RuleSet};

pub const REQUIRED_MESSAGE: &str = "This field is required";

pub fn login_form() -> FormData {
    FormData::from_declared(["username", "password"])
}

pub fn login_rules() -> RuleSet {
    RuleSet::new()
        .with(Rule::required("username", "Please enter your username or email"))
        .with(Rule::required("password", "Please enter your password"))
}

pub fn registration_form() -> FormData {
    FormData::from_declared([
        "first_name",
        "last_name",
        "username",
        "email",
        "phone",
        "role",
        "password1",
        "password2",
        "terms",
    ])
}

pub fn registration_rules() -> RuleSet {
    let mut rules = RuleSet::new();
    for field in [
        "first_name",
        "last_name",
        "username",
        "email",
        "role",
        "password1",
        "password2",
    ] {
        rules.push(Rule::required(field, REQUIRED_MESSAGE));
    }
    rules.push(Rule::email("email"));
    // phone is optional, shape-checked only when filled in
    rules.push(Rule::phone("phone"));
    rules.push(Rule::min_strength("password1", 2));
    rules.push(Rule::must_match("password2", "password1", "Passwords do not match"));
    rules.push(Rule::checked("terms", "Please accept the Terms & Conditions"));
    rules
}

pub fn profile_edit_form() -> FormData {
    FormData::from_declared(["first_name", "last_name", "email", "phone"])
}

pub fn profile_edit_rules() -> RuleSet {
    // this page validates email shape only; phone is submitted as-is
    RuleSet::new()
        .with(Rule::required("first_name", REQUIRED_MESSAGE))
        .with(Rule::required("last_name", REQUIRED_MESSAGE))
        .with(Rule::required("email", REQUIRED_MESSAGE))
        .with(Rule::email("email"))
}

pub fn password_change_form() -> FormData {
    FormData::from_declared(["old_password", "new_password1", "new_password2"])
}

pub fn password_change_rules() -> RuleSet {
    RuleSet::new()
        .with(Rule::required("old_password", "Please enter your current password"))
        .with(Rule::required("new_password1", "Please enter a new password"))
        .with(Rule::min_strength("new_password1", 2))
        .with(Rule::required("new_password2", "Please confirm your new password"))
        .with(Rule::must_match("new_password2", "new_password1", "Passwords do not match"))
        .with(Rule::must_differ(
            "new_password1",
            "old_password",
            "New password must be different from current password",
        ))
}

/// Named fields of the prescription page; medication entries live in the
/// dynamic field set next to this.
pub fn prescription_form() -> FormData {
    FormData::from_declared(["patient", "notes"])
}
