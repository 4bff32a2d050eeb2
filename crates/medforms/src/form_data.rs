// File: src/form_data.rs
// Purpose: Current field values of one form, in document order

/// Flat field-name to value mapping for a single form.
///
/// Fields keep the order they were declared in, which stands in for
/// document order on the page: "first invalid field" resolution depends
/// on it. Owned by one form instance, lifetime bounded by the page view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Build from name/value pairs, keeping iteration order.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut data = Self::new();
        for (name, value) in fields {
            data.set(name, value);
        }
        data
    }

    /// Declare the form's fields up front, empty, in page order.
    pub fn from_declared<I, K>(names: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut data = Self::new();
        for name in names {
            data.declare(name);
        }
        data
    }

    /// Declare a field without a value. Declaring twice is a no-op.
    pub fn declare(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.contains(&name) {
            self.fields.push((name, String::new()));
        }
    }

    /// Set a field's value, declaring it at the end when unknown.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Set a field's value only when the field already exists.
    /// Returns false (and changes nothing) for unknown names.
    pub fn set_existing(&mut self, name: &str, value: &str) -> bool {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => {
                slot.1 = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Current value; missing fields read as empty.
    pub fn value(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// Checkbox convention: browsers submit "on" for a ticked box.
    pub fn is_checked(&self, name: &str) -> bool {
        matches!(self.value(name), "on" | "true" | "1" | "checked")
    }

    /// Field names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Name/value pairs in document order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_set_and_get() {
        let mut form = FormData::new();
        form.set("name", "Ann");
        assert_eq!(form.get("name"), Some("Ann"));
        assert_eq!(form.value("missing"), "");

        form.set("name", "Ben");
        assert_eq!(form.get("name"), Some("Ben"));
        assert_eq!(form.len(), 1);
    }

    #[test]
    fn test_document_order_preserved() {
        let mut form = FormData::from_declared(["first_name", "last_name", "email"]);
        form.set("email", "a@b.co");
        form.set("first_name", "Ann");

        let names: Vec<&str> = form.names().collect();
        assert_eq!(names, vec!["first_name", "last_name", "email"]);
    }

    #[test]
    fn test_set_existing_skips_unknown_names() {
        let mut form = FormData::from_declared(["first_name"]);
        assert!(form.set_existing("first_name", "Ann"));
        assert!(!form.set_existing("nonexistent", "x"));
        assert!(!form.contains("nonexistent"));
        assert_eq!(form.value("first_name"), "Ann");
    }

    #[rstest]
    #[case("on", true)]
    #[case("true", true)]
    #[case("1", true)]
    #[case("checked", true)]
    #[case("", false)]
    #[case("off", false)]
    #[case("no", false)]
    fn test_is_checked(#[case] value: &str, #[case] expected: bool) {
        let mut form = FormData::new();
        assert!(!form.is_checked("terms"));
        form.set("terms", value);
        assert_eq!(form.is_checked("terms"), expected);
    }

    #[test]
    fn test_declare_twice_is_noop() {
        let mut form = FormData::new();
        form.set("a", "1");
        form.declare("a");
        assert_eq!(form.value("a"), "1");
        assert_eq!(form.len(), 1);
    }
}
