//! Applying overrides to the sections that already exist.

use std::collections::HashMap;

use tracing::debug;

use super::index::OverrideMap;
use super::Address;
use crate::document::{Entry, Section};

/// Walks the original sections once, applying every override addressed at an
/// existing section occurrence and consuming it from `overrides`.
///
/// Occurrence indices count same-named sections in the original list, so
/// deleting `global[0]` does not turn `global[1]` into `global[0]`.
pub(crate) fn merge_sections(sections: &[Section], overrides: &mut OverrideMap) -> Vec<Section> {
    let mut merged = Vec::with_capacity(sections.len());
    let mut seen: HashMap<&str, u64> = HashMap::new();

    for section in sections {
        let count = seen.entry(section.name.as_str()).or_insert(0);
        let index = *count;
        *count += 1;

        let section_key = Address::section_level(section.name.as_str(), index);
        // A non-empty value here has no effect and is left for the appender to drop.
        if overrides.get(&section_key) == Some("") {
            overrides.take(&section_key);
            debug!(section = %section.name, index, "deleted config section");
            continue;
        }

        let mut entries = update_entries(section, index, overrides);

        let added: Vec<Entry> = overrides
            .take_occurrence(&section.name, index)
            .into_iter()
            .map(|(key, value)| Entry { key, value })
            .collect();
        if !added.is_empty() {
            debug!(
                section = %section.name,
                index,
                count = added.len(),
                "appended entries to config section"
            );
            entries.extend(added);
        }

        merged.push(Section {
            name: section.name.clone(),
            comment: section.comment.clone(),
            entries,
        });
    }

    merged
}

/// Rebuilds a section's entries in their original order, replacing or
/// dropping the ones that have an override.
fn update_entries(section: &Section, index: u64, overrides: &mut OverrideMap) -> Vec<Entry> {
    section
        .entries
        .iter()
        .filter_map(|entry| {
            let key = Address::entry_level(section.name.as_str(), index, entry.key.as_str());
            match overrides.take(&key) {
                Some(value) if value.is_empty() => None,
                Some(value) => Some(Entry {
                    key: entry.key.clone(),
                    value,
                }),
                None => Some(entry.clone()),
            }
        })
        .collect()
}
