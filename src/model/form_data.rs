/// An ordered snapshot of every form value, in document order.
///
/// Repeated fields (the activity arrays) appear once per block under the same key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, String)>,
}

impl FormData {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Returns the last value recorded for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns every value recorded for `name`, in order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Returns all entries in order.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Returns a copy with every value passed through [`clean_input`].
    pub fn cleaned(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(key, value)| (key.clone(), clean_input(value)))
                .collect(),
        }
    }
}

/// Replaces non-breaking spaces with plain spaces and trims the result.
pub fn clean_input(value: &str) -> String {
    value.replace('\u{a0}', " ").trim().to_string()
}
