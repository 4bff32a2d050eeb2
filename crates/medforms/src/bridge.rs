// File: src/bridge.rs
// Purpose: Presentation bridge contract and in-memory implementation

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::time::{Duration, Instant};

use crate::config::MedformsConfig;
use crate::report::FieldTarget;

/// Toast severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Continuation invoked once a confirmation is resolved. It receives the
/// bridge back so it can toast or clear errors without re-entrancy.
pub type Continuation = Box<dyn FnOnce(&mut dyn PresentationBridge) + Send>;

/// The rendering contract every form component consumes. Injected at
/// construction so tests can substitute a fake; never a process-wide
/// singleton.
pub trait PresentationBridge {
    /// Mark a field invalid with a message. Calling twice on the same
    /// field replaces the message rather than stacking.
    fn show_field_error(&mut self, field: &FieldTarget, message: &str);

    /// Remove the invalid mark. No-op when the field is not marked.
    fn clear_field_error(&mut self, field: &FieldTarget);

    /// Clear every field error. Afterwards zero fields are marked invalid.
    fn clear_form_errors(&mut self);

    /// Transient auto-dismissing notification. Fire-and-forget; multiple
    /// toasts may stack. Must never fail.
    fn show_toast(&mut self, message: &str, severity: Severity);

    /// Scroll/focus the given field (used for the first invalid field).
    fn focus_field(&mut self, field: &FieldTarget);

    /// Yes/no interaction. Non-blocking: the decision arrives later via
    /// exactly one of the two continuations.
    fn confirm(&mut self, message: &str, on_accept: Continuation, on_decline: Continuation);
}

/// A transient notification with its display timestamp.
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
    shown_at: Instant,
}

impl Toast {
    pub fn age(&self) -> Duration {
        self.shown_at.elapsed()
    }
}

struct PendingConfirm {
    message: String,
    on_accept: Continuation,
    on_decline: Continuation,
}

/// In-memory presentation state.
///
/// This is the source of truth a host UI projects from: the error map, the
/// focused field and the toast tray are explicit state, never read back
/// from whatever rendered them. Confirmations queue up until the host
/// resolves them with [`MemoryBridge::resolve_confirm`].
pub struct MemoryBridge {
    field_errors: HashMap<FieldTarget, String>,
    focused: Option<FieldTarget>,
    toasts: Vec<Toast>,
    toast_visible: Duration,
    pending: VecDeque<PendingConfirm>,
}

// 3 s visible plus a short fade
const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3300);

impl MemoryBridge {
    pub fn new() -> Self {
        Self::with_toast_duration(DEFAULT_TOAST_DURATION)
    }

    /// Toast lifetime taken from the loaded configuration.
    pub fn from_config(config: &MedformsConfig) -> Self {
        Self::with_toast_duration(config.toast.total_duration())
    }

    pub fn with_toast_duration(toast_visible: Duration) -> Self {
        Self {
            field_errors: HashMap::new(),
            focused: None,
            toasts: Vec::new(),
            toast_visible,
            pending: VecDeque::new(),
        }
    }

    pub fn field_error(&self, field: &FieldTarget) -> Option<&str> {
        self.field_errors.get(field).map(|s| s.as_str())
    }

    /// Number of fields currently marked invalid.
    pub fn error_count(&self) -> usize {
        self.field_errors.len()
    }

    pub fn focused_field(&self) -> Option<&FieldTarget> {
        self.focused.as_ref()
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Drop toasts past their visible duration.
    pub fn prune_expired(&mut self) {
        let visible = self.toast_visible;
        self.toasts.retain(|toast| toast.age() < visible);
    }

    pub fn pending_confirms(&self) -> usize {
        self.pending.len()
    }

    pub fn next_confirm_message(&self) -> Option<&str> {
        self.pending.front().map(|p| p.message.as_str())
    }

    /// Resolve the oldest pending confirmation, running exactly one of its
    /// continuations. Returns false when nothing was pending.
    pub fn resolve_confirm(&mut self, accepted: bool) -> bool {
        let Some(pending) = self.pending.pop_front() else {
            return false;
        };
        let continuation = if accepted {
            pending.on_accept
        } else {
            pending.on_decline
        };
        continuation(self);
        true
    }
}

impl Default for MemoryBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBridge")
            .field("field_errors", &self.field_errors)
            .field("focused", &self.focused)
            .field("toasts", &self.toasts.len())
            .field("pending_confirms", &self.pending.len())
            .finish()
    }
}

impl PresentationBridge for MemoryBridge {
    fn show_field_error(&mut self, field: &FieldTarget, message: &str) {
        // replace, never stack
        self.field_errors
            .insert(field.clone(), message.to_string());
    }

    fn clear_field_error(&mut self, field: &FieldTarget) {
        self.field_errors.remove(field);
    }

    fn clear_form_errors(&mut self) {
        self.field_errors.clear();
        self.focused = None;
    }

    fn show_toast(&mut self, message: &str, severity: Severity) {
        self.toasts.push(Toast {
            message: message.to_string(),
            severity,
            shown_at: Instant::now(),
        });
    }

    fn focus_field(&mut self, field: &FieldTarget) {
        self.focused = Some(field.clone());
    }

    fn confirm(&mut self, message: &str, on_accept: Continuation, on_decline: Continuation) {
        self.pending.push_back(PendingConfirm {
            message: message.to_string(),
            on_accept,
            on_decline,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_field() -> FieldTarget {
        FieldTarget::named("email")
    }

    #[test]
    fn test_field_error_replaces() {
        let mut bridge = MemoryBridge::new();
        bridge.show_field_error(&email_field(), "first");
        bridge.show_field_error(&email_field(), "second");

        assert_eq!(bridge.error_count(), 1);
        assert_eq!(bridge.field_error(&email_field()), Some("second"));
    }

    #[test]
    fn test_clear_field_error_is_noop_when_unmarked() {
        let mut bridge = MemoryBridge::new();
        bridge.clear_field_error(&email_field());
        assert_eq!(bridge.error_count(), 0);
    }

    #[test]
    fn test_clear_form_errors_is_idempotent() {
        let mut bridge = MemoryBridge::new();
        bridge.show_field_error(&email_field(), "bad");
        bridge.show_field_error(&FieldTarget::named("phone"), "bad");

        bridge.clear_form_errors();
        assert_eq!(bridge.error_count(), 0);

        bridge.clear_form_errors();
        assert_eq!(bridge.error_count(), 0);
    }

    #[test]
    fn test_toasts_stack_and_expire() {
        let mut bridge = MemoryBridge::with_toast_duration(Duration::ZERO);
        bridge.show_toast("one", Severity::Info);
        bridge.show_toast("two", Severity::Error);
        assert_eq!(bridge.toasts().len(), 2);

        bridge.prune_expired();
        assert!(bridge.toasts().is_empty());
    }

    #[test]
    fn test_confirm_runs_exactly_one_continuation() {
        let mut bridge = MemoryBridge::new();
        bridge.confirm(
            "Load saved draft?",
            Box::new(|bridge| bridge.show_toast("accepted", Severity::Success)),
            Box::new(|bridge| bridge.show_toast("declined", Severity::Info)),
        );
        assert_eq!(bridge.pending_confirms(), 1);
        assert_eq!(bridge.next_confirm_message(), Some("Load saved draft?"));

        assert!(bridge.resolve_confirm(true));
        assert_eq!(bridge.pending_confirms(), 0);
        assert_eq!(bridge.toasts().len(), 1);
        assert_eq!(bridge.toasts()[0].message, "accepted");

        // nothing left to resolve
        assert!(!bridge.resolve_confirm(true));
    }

    #[test]
    fn test_confirm_decline_path() {
        let mut bridge = MemoryBridge::new();
        bridge.confirm(
            "Remove this medication?",
            Box::new(|bridge| bridge.show_toast("accepted", Severity::Success)),
            Box::new(|bridge| bridge.show_toast("declined", Severity::Info)),
        );
        assert!(bridge.resolve_confirm(false));
        assert_eq!(bridge.toasts()[0].message, "declined");
    }

    #[test]
    fn test_confirms_resolve_in_fifo_order() {
        let mut bridge = MemoryBridge::new();
        bridge.confirm("first", Box::new(|_| {}), Box::new(|_| {}));
        bridge.confirm("second", Box::new(|_| {}), Box::new(|_| {}));

        assert_eq!(bridge.next_confirm_message(), Some("first"));
        bridge.resolve_confirm(false);
        assert_eq!(bridge.next_confirm_message(), Some("second"));
    }
}
