//! The ordered section document that overrides are applied to.
//!
//! A document is a plain `Vec<Section>`. Section names are not unique: the
//! same name may appear several times, and the relative order of those
//! occurrences is what tells them apart.

use serde::{Deserialize, Serialize};

/// A single `key = value` line inside a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A named section with an optional comment and its ordered entries.
///
/// ```
/// use qemu_cfg_override::Section;
///
/// let section = Section::new("device \"qemu_gpu\"")
///     .with_comment("GPU")
///     .with_entry("driver", "virtio-vga");
///
/// assert_eq!(section.get("driver"), Some("virtio-vga"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl Section {
    /// Creates an empty section with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Appends an entry. Duplicate keys are not rejected.
    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push(Entry::new(key, value));
        self
    }

    /// Returns the value of the first entry with the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }
}
