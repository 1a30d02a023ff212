use serde::Serialize;

/// Per-task metadata. Keys are stored lower-cased and kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskMetadata {
    entries: Vec<(String, String)>,
}

impl TaskMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `key`. Returns the canonical (lower-cased) key.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) -> String {
        let canonical = key.to_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == canonical) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((canonical.clone(), value)),
        }
        canonical
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let canonical = key.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == canonical)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Schedule-wide index of every metadata key seen on any task, first-seen
/// order. The display casing is whatever casing the key had when first seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetadataColumns {
    columns: Vec<MetadataColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataColumn {
    pub key: String,
    pub display: String,
}

impl MetadataColumns {
    pub fn record(&mut self, key: &str) {
        let canonical = key.to_lowercase();
        if self.columns.iter().any(|c| c.key == canonical) {
            return;
        }
        self.columns.push(MetadataColumn {
            key: canonical,
            display: key.to_string(),
        });
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetadataColumn> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
