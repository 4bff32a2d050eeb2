// File: src/fieldset.rs
// Purpose: Repeatable sub-form instances with stable, never-reused indexing

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::bridge::{PresentationBridge, Severity};

/// Structured identifier of one field inside one sub-form instance.
///
/// Resolution to a flat submitted name happens only at the serialization
/// boundary ([`FieldSet::serialize`]); nothing else does string surgery on
/// names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    /// Instance index, assigned once and never reused within a page session
    pub instance: u64,
    /// Field key within the template shape, e.g. "dosage"
    pub key: String,
}

impl FieldRef {
    pub fn new(instance: u64, key: impl Into<String>) -> Self {
        Self {
            instance,
            key: key.into(),
        }
    }
}

/// One sub-form instance: its permanent index plus current values for the
/// template's field keys.
#[derive(Debug, Clone)]
pub struct FieldInstance {
    index: u64,
    values: HashMap<String, String>,
}

impl FieldInstance {
    fn blank(index: u64, keys: &[String]) -> Self {
        Self {
            index,
            values: keys.iter().map(|k| (k.clone(), String::new())).collect(),
        }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn value(&self, key: &str) -> &str {
        self.values.get(key).map(|v| v.as_str()).unwrap_or("")
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Set a value for a known template key; unknown keys are ignored.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) {
        if let Some(slot) = self.values.get_mut(key) {
            *slot = value.into();
        }
    }
}

/// An ordered set of repeatable sub-forms sharing one template shape
/// (e.g. the medication entries of a prescription).
///
/// Indices grow monotonically and are never reused after a removal, so a
/// removed instance can never collide with a later one's submitted names.
/// User-facing ordinals are positions (1-based) and stay contiguous.
#[derive(Debug, Clone)]
pub struct FieldSet {
    /// Flat-name prefix, e.g. "medications"
    label: String,
    /// Human word for prompts and toasts, e.g. "medication"
    noun: String,
    /// Template shape: the field keys every instance carries
    keys: Vec<String>,
    next_index: u64,
    instances: Vec<FieldInstance>,
}

impl FieldSet {
    /// A set that starts with one blank instance, the usual page state.
    pub fn new<I, K>(label: impl Into<String>, noun: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut set = Self::new_empty(label, noun, keys);
        set.push_blank();
        set
    }

    /// A set with no instances yet; submitting requires adding at least one.
    pub fn new_empty<I, K>(label: impl Into<String>, noun: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            label: label.into(),
            noun: noun.into(),
            keys: keys.into_iter().map(Into::into).collect(),
            next_index: 0,
            instances: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn instances(&self) -> &[FieldInstance] {
        &self.instances
    }

    pub fn instance(&self, index: u64) -> Option<&FieldInstance> {
        self.instances.iter().find(|i| i.index == index)
    }

    pub fn instance_mut(&mut self, index: u64) -> Option<&mut FieldInstance> {
        self.instances.iter_mut().find(|i| i.index == index)
    }

    fn push_blank(&mut self) -> u64 {
        let index = self.next_index;
        self.next_index += 1;
        self.instances.push(FieldInstance::blank(index, &self.keys));
        index
    }

    /// Clone the template shape under the next unused index and announce
    /// it. Returns the new instance's permanent index.
    pub fn add_instance(&mut self, bridge: &mut dyn PresentationBridge) -> u64 {
        let index = self.push_blank();
        bridge.show_toast(
            &format!("{} field added", capitalize(&self.noun)),
            Severity::Success,
        );
        index
    }

    /// 1-based position shown to the user; contiguous even when underlying
    /// indices have gaps.
    pub fn ordinal_of(&self, index: u64) -> Option<usize> {
        self.instances
            .iter()
            .position(|i| i.index == index)
            .map(|pos| pos + 1)
    }

    /// (index, ordinal) pairs in display order.
    pub fn ordinals(&self) -> Vec<(u64, usize)> {
        self.instances
            .iter()
            .enumerate()
            .map(|(pos, i)| (i.index, pos + 1))
            .collect()
    }

    /// Remove controls are hidden while only one instance remains; the
    /// minimum-one invariant is enforced by disabling removal, never by
    /// re-adding.
    pub fn can_remove(&self) -> bool {
        self.instances.len() > 1
    }

    /// Remove without confirmation. Returns false (no-op) for unknown
    /// indices or when removal is currently disabled.
    pub fn remove_now(&mut self, index: u64) -> bool {
        if !self.can_remove() {
            return false;
        }
        let Some(pos) = self.instances.iter().position(|i| i.index == index) else {
            return false;
        };
        self.instances.remove(pos);
        true
    }

    /// Confirmation-gated removal. Unknown indices and the last remaining
    /// instance are no-ops before the prompt ever appears.
    pub fn request_remove(
        set: &Arc<Mutex<FieldSet>>,
        index: u64,
        bridge: &mut dyn PresentationBridge,
    ) {
        let (prompt, removed_message) = {
            let guard = set.lock().unwrap_or_else(PoisonError::into_inner);
            if guard.instance(index).is_none() || !guard.can_remove() {
                return;
            }
            (
                format!("Remove this {}?", guard.noun),
                format!("{} removed", capitalize(&guard.noun)),
            )
        };

        let set = Arc::clone(set);
        bridge.confirm(
            &prompt,
            Box::new(move |bridge| {
                let removed = set
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove_now(index);
                if removed {
                    bridge.show_toast(&removed_message, Severity::Info);
                }
            }),
            Box::new(|_| {}),
        );
    }

    /// Flat submitted name for one instance field, e.g.
    /// `medications[2][dosage]`.
    pub fn flat_name(&self, index: u64, key: &str) -> String {
        format!("{}[{}][{}]", self.label, index, key)
    }

    /// Serialization boundary: flatten every instance's values into
    /// submitted name/value pairs, display order, template key order.
    pub fn serialize(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for instance in &self.instances {
            for key in &self.keys {
                out.push((
                    self.flat_name(instance.index, key),
                    instance.value(key).to_string(),
                ));
            }
        }
        out
    }

    /// Reverse of [`FieldSet::serialize`] for a single entry, used when
    /// restoring drafts. Returns false for names that do not resolve to an
    /// existing instance field (never an error).
    pub fn apply_flat(&mut self, name: &str, value: &str) -> bool {
        let Some(rest) = name.strip_prefix(self.label.as_str()) else {
            return false;
        };
        let Some(rest) = rest.strip_prefix('[') else {
            return false;
        };
        let Some((index_str, rest)) = rest.split_once(']') else {
            return false;
        };
        let Ok(index) = index_str.parse::<u64>() else {
            return false;
        };
        let Some(rest) = rest.strip_prefix('[') else {
            return false;
        };
        let Some(key) = rest.strip_suffix(']') else {
            return false;
        };

        match self.instance_mut(index) {
            Some(instance) if instance.has_key(key) => {
                instance.set_value(key, value);
                true
            }
            _ => false,
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
