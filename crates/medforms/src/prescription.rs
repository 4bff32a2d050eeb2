// File: src/prescription.rs
// Purpose: Prescription-creation controller: patient select, medication
// entries, draft autosave/restore

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::Result;
use tracing::warn;

use crate::autosave::DraftAutosaver;
use crate::bridge::{PresentationBridge, Severity};
use crate::config::MedformsConfig;
use crate::controller::{render_report, ControllerState, SubmitDecision};
use crate::draft::{DraftSnapshot, DraftStore};
use crate::fieldset::{FieldRef, FieldSet};
use crate::form_data::FormData;
use crate::forms;
use crate::report::{FieldTarget, ValidationReport};
use crate::rules::{Rule, RuleSet};

/// Fixed draft key, one draft per form type. Shared across every user of
/// the same profile; inherited scoping, kept as-is.
pub const PRESCRIPTION_DRAFT_KEY: &str = "prescriptionDraft";

const MEDICATION_KEYS: [&str; 4] = ["name", "dosage", "frequency", "duration"];
const MEDICATION_MESSAGES: [(&str, &str); 4] = [
    ("name", "Medication name is required"),
    ("dosage", "Dosage is required"),
    ("frequency", "Frequency is required"),
    ("duration", "Duration is required"),
];

/// The one form with enough moving parts to own a controller of its own:
/// named fields, a dynamic medication set, and a persisted draft.
pub struct PrescriptionController {
    rules: RuleSet,
    form: Arc<Mutex<FormData>>,
    medications: Arc<Mutex<FieldSet>>,
    store: Arc<dyn DraftStore>,
    draft_key: String,
    state: ControllerState,
}

impl PrescriptionController {
    pub fn new(store: Arc<dyn DraftStore>) -> Self {
        Self {
            rules: RuleSet::new().with(Rule::selected("patient", "Please select a patient")),
            form: Arc::new(Mutex::new(forms::prescription_form())),
            medications: Arc::new(Mutex::new(FieldSet::new(
                "medications",
                "medication",
                MEDICATION_KEYS,
            ))),
            store,
            draft_key: PRESCRIPTION_DRAFT_KEY.to_string(),
            state: ControllerState::Idle,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Shared handle to the named page fields.
    pub fn form(&self) -> Arc<Mutex<FormData>> {
        Arc::clone(&self.form)
    }

    /// Shared handle to the medication entries.
    pub fn medications(&self) -> Arc<Mutex<FieldSet>> {
        Arc::clone(&self.medications)
    }

    pub fn add_medication(&self, bridge: &mut dyn PresentationBridge) -> u64 {
        self.medications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .add_instance(bridge)
    }

    /// Confirmation-gated removal; unknown indices and the last remaining
    /// entry are no-ops.
    pub fn remove_medication(&self, index: u64, bridge: &mut dyn PresentationBridge) {
        FieldSet::request_remove(&self.medications, index, bridge);
    }

    /// Full rule evaluation: patient selected, at least one medication
    /// (form-scoped when violated), and every entry's required fields.
    pub fn validate(&self) -> ValidationReport {
        let form = self.form.lock().unwrap_or_else(PoisonError::into_inner);
        let medications = self
            .medications
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Self::evaluate(&self.rules, &form, &medications)
    }

    fn evaluate(rules: &RuleSet, form: &FormData, medications: &FieldSet) -> ValidationReport {
        let mut report = rules.evaluate(form);

        if medications.is_empty() {
            report.add_form_error("Please add at least one medication");
        }

        for instance in medications.instances() {
            for (key, message) in MEDICATION_MESSAGES {
                if instance.value(key).trim().is_empty() {
                    report.add_field_error(
                        FieldTarget::Instanced(FieldRef::new(instance.index(), key)),
                        message,
                    );
                }
            }
        }

        report
    }

    /// Submit pass, same shape as every other form; on success the stored
    /// draft is cleared before the page navigates away.
    pub fn handle_submit(&mut self, bridge: &mut dyn PresentationBridge) -> SubmitDecision {
        self.state = ControllerState::Validating;
        bridge.clear_form_errors();

        let (report, form_snapshot) = {
            let form = self.form.lock().unwrap_or_else(PoisonError::into_inner);
            let medications = self
                .medications
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            (Self::evaluate(&self.rules, &form, &medications), form.clone())
        };

        let decision = render_report(&report, &form_snapshot, bridge);

        if decision == SubmitDecision::Proceed {
            if let Err(err) = self.store.delete(&self.draft_key) {
                warn!(key = %self.draft_key, error = %err, "failed to clear draft after submit");
            }
        }

        self.state = ControllerState::Idle;
        decision
    }

    /// Everything the page would submit: named fields plus flattened
    /// medication entries. This is what gets drafted.
    pub fn page_snapshot(&self) -> DraftSnapshot {
        let form = self.form.lock().unwrap_or_else(PoisonError::into_inner);
        let medications = self
            .medications
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut snapshot = DraftSnapshot::from_form(&form);
        for (name, value) in medications.serialize() {
            snapshot.insert(name, value);
        }
        snapshot
    }

    /// Interval taken from the loaded configuration.
    pub fn start_autosave_from_config(&self, config: &MedformsConfig) -> DraftAutosaver {
        self.start_autosave(config.autosave.interval())
    }

    /// Start the periodic draft writer. The returned handle bounds the
    /// timer's lifetime to the page view; drop it on navigation.
    pub fn start_autosave(&self, interval: Duration) -> DraftAutosaver {
        let form = Arc::clone(&self.form);
        let medications = Arc::clone(&self.medications);

        DraftAutosaver::start(
            Arc::clone(&self.store),
            self.draft_key.clone(),
            interval,
            move || {
                let form = form.lock().unwrap_or_else(PoisonError::into_inner);
                let medications = medications.lock().unwrap_or_else(PoisonError::into_inner);
                let mut snapshot = DraftSnapshot::from_form(&form);
                for (name, value) in medications.serialize() {
                    snapshot.insert(name, value);
                }
                snapshot
            },
        )
    }

    /// Load-time restore prompt. Stored values land in fields that still
    /// exist (named or medication entries); names with no match are
    /// skipped. Declining deletes the snapshot.
    pub fn restore_draft(&self, bridge: &mut dyn PresentationBridge) -> Result<()> {
        let Some(snapshot) = self.store.get(&self.draft_key)? else {
            return Ok(());
        };

        let form = Arc::clone(&self.form);
        let medications = Arc::clone(&self.medications);
        let store = Arc::clone(&self.store);
        let key = self.draft_key.clone();

        bridge.confirm(
            "Load saved draft?",
            Box::new(move |bridge| {
                let mut form = form.lock().unwrap_or_else(PoisonError::into_inner);
                let mut medications = medications.lock().unwrap_or_else(PoisonError::into_inner);
                for (name, value) in snapshot.iter() {
                    if !form.set_existing(name, value) {
                        medications.apply_flat(name, value);
                    }
                }
                bridge.show_toast("Draft loaded", Severity::Success);
            }),
            Box::new(move |_| {
                if let Err(err) = store.delete(&key) {
                    warn!(key = %key, error = %err, "failed to delete declined draft");
                }
            }),
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::MemoryBridge;
    use crate::draft::MemoryDraftStore;

    fn controller() -> (PrescriptionController, Arc<MemoryDraftStore>) {
        let store = Arc::new(MemoryDraftStore::new());
        (PrescriptionController::new(store.clone()), store)
    }

    fn fill_valid(controller: &PrescriptionController) {
        controller.form().lock().unwrap().set("patient", "12");
        let medications = controller.medications();
        let mut medications = medications.lock().unwrap();
        let first = medications.instances()[0].index();
        let entry = medications.instance_mut(first).unwrap();
        entry.set_value("name", "Amoxicillin");
        entry.set_value("dosage", "500mg");
        entry.set_value("frequency", "twice daily");
        entry.set_value("duration", "7 days");
    }

    #[test]
    fn test_blank_page_blocks_with_field_errors() {
        let (mut controller, _store) = controller();
        let mut bridge = MemoryBridge::new();

        let decision = controller.handle_submit(&mut bridge);
        assert_eq!(decision, SubmitDecision::Block);

        // patient plus the four entry fields
        assert_eq!(bridge.error_count(), 5);
        assert_eq!(bridge.focused_field(), Some(&FieldTarget::named("patient")));
    }

    #[test]
    fn test_empty_medication_set_is_form_scoped() {
        let store: Arc<dyn DraftStore> = Arc::new(MemoryDraftStore::new());
        let controller = PrescriptionController::new(store);
        {
            let medications = controller.medications();
            let mut guard = medications.lock().unwrap();
            *guard = FieldSet::new_empty("medications", "medication", MEDICATION_KEYS);
        }
        controller.form().lock().unwrap().set("patient", "12");

        let report = controller.validate();
        assert!(!report.is_valid());
        assert!(report.field_errors.is_empty());
        assert_eq!(report.form_errors, vec!["Please add at least one medication"]);
    }

    #[test]
    fn test_valid_page_proceeds_and_clears_draft() {
        let (mut controller, store) = controller();
        let mut bridge = MemoryBridge::new();

        store
            .set(PRESCRIPTION_DRAFT_KEY, &DraftSnapshot::new())
            .unwrap();
        fill_valid(&controller);

        assert_eq!(controller.handle_submit(&mut bridge), SubmitDecision::Proceed);
        assert_eq!(bridge.error_count(), 0);
        assert!(!store.exists(PRESCRIPTION_DRAFT_KEY).unwrap());
    }

    #[test]
    fn test_partial_medication_entry_reports_each_missing_field() {
        let (mut controller, _store) = controller();
        let mut bridge = MemoryBridge::new();

        controller.form().lock().unwrap().set("patient", "12");
        {
            let medications = controller.medications();
            let mut guard = medications.lock().unwrap();
            let entry = guard.instance_mut(0).unwrap();
            entry.set_value("name", "Amoxicillin");
            entry.set_value("dosage", "500mg");
        }

        assert_eq!(controller.handle_submit(&mut bridge), SubmitDecision::Block);
        let frequency = FieldTarget::Instanced(FieldRef::new(0, "frequency"));
        let duration = FieldTarget::Instanced(FieldRef::new(0, "duration"));
        assert_eq!(bridge.field_error(&frequency), Some("Frequency is required"));
        assert_eq!(bridge.field_error(&duration), Some("Duration is required"));
        assert_eq!(bridge.error_count(), 2);
    }

    #[test]
    fn test_restore_accept_populates_matching_fields_only() {
        let (controller, store) = controller();
        let mut bridge = MemoryBridge::new();

        let mut snapshot = DraftSnapshot::new();
        snapshot.insert("patient", "12");
        snapshot.insert("medications[0][name]", "Ibuprofen");
        snapshot.insert("obsolete_field", "ignored");
        snapshot.insert("medications[9][name]", "ignored");
        store.set(PRESCRIPTION_DRAFT_KEY, &snapshot).unwrap();

        controller.restore_draft(&mut bridge).unwrap();
        assert_eq!(bridge.next_confirm_message(), Some("Load saved draft?"));
        bridge.resolve_confirm(true);

        assert_eq!(controller.form().lock().unwrap().value("patient"), "12");
        let medications = controller.medications();
        let guard = medications.lock().unwrap();
        assert_eq!(guard.instance(0).unwrap().value("name"), "Ibuprofen");
        assert!(!controller.form().lock().unwrap().contains("obsolete_field"));
        assert!(bridge.toasts().iter().any(|t| t.message == "Draft loaded"));
        // accepted drafts stay until submission succeeds
        assert!(store.exists(PRESCRIPTION_DRAFT_KEY).unwrap());
    }

    #[test]
    fn test_restore_decline_deletes_snapshot() {
        let (controller, store) = controller();
        let mut bridge = MemoryBridge::new();

        let mut snapshot = DraftSnapshot::new();
        snapshot.insert("patient", "12");
        store.set(PRESCRIPTION_DRAFT_KEY, &snapshot).unwrap();

        controller.restore_draft(&mut bridge).unwrap();
        bridge.resolve_confirm(false);

        assert!(!store.exists(PRESCRIPTION_DRAFT_KEY).unwrap());
        assert_eq!(controller.form().lock().unwrap().value("patient"), "");
    }

    #[test]
    fn test_restore_without_snapshot_prompts_nothing() {
        let (controller, _store) = controller();
        let mut bridge = MemoryBridge::new();

        controller.restore_draft(&mut bridge).unwrap();
        assert_eq!(bridge.pending_confirms(), 0);
    }

    #[test]
    fn test_page_snapshot_includes_flattened_entries() {
        let (controller, _store) = controller();
        fill_valid(&controller);

        let snapshot = controller.page_snapshot();
        assert_eq!(snapshot.get("patient"), Some("12"));
        assert_eq!(snapshot.get("medications[0][dosage]"), Some("500mg"));
    }
}
