//! # MedForms — form validation and dynamic-field engine
//!
//! Progressive-enhancement logic for the MedApp pages, reworked as an
//! explicit engine: per-form rule sets evaluated on submit, a presentation
//! bridge for field errors and toasts, repeatable sub-form management with
//! stable indexing, draft autosave/restore, and an asynchronous hand-off
//! to the booking API.
//!
//! ## Model
//!
//! Everything is single-threaded-cooperative: a submit pass runs all rules
//! synchronously and either blocks or proceeds before anything else can
//! happen on the same form. Suspension only occurs in the autosave timer
//! and the submission transport.
//!
//! ## Example
//!
//! ```rust
//! use medforms::{forms, FormController, MemoryBridge, SubmitDecision};
//!
//! let mut form = forms::login_form();
//! form.set("username", "pat");
//! form.set("password", "secret1");
//!
//! let mut bridge = MemoryBridge::new();
//! let mut controller = FormController::new("loginForm", forms::login_rules());
//! assert_eq!(controller.handle_submit(&form, &mut bridge), SubmitDecision::Proceed);
//! ```

pub mod autosave;
pub mod bridge;
pub mod config;
pub mod controller;
pub mod draft;
pub mod fieldset;
pub mod form_data;
pub mod forms;
pub mod prescription;
pub mod report;
pub mod rules;
pub mod submit;

pub use autosave::DraftAutosaver;
pub use bridge::{MemoryBridge, PresentationBridge, Severity, Toast};
pub use config::MedformsConfig;
pub use controller::{ControllerState, FormController, SubmitDecision};
pub use draft::{DraftSnapshot, DraftStore, FileDraftStore, MemoryDraftStore};
pub use fieldset::{FieldInstance, FieldRef, FieldSet};
pub use form_data::FormData;
pub use prescription::PrescriptionController;
pub use report::{FieldError, FieldTarget, ValidationReport};
pub use rules::{Rule, RuleSet};
pub use submit::{BookingOutcome, HttpTransport, SubmissionBridge, Transport, TransportResponse};
