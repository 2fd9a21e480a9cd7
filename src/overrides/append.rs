//! Materialising overrides that matched no existing section.

use tracing::debug;

use super::index::OverrideMap;
use crate::document::{Entry, Section};

/// Turns the overrides left after merging into new sections at the end of
/// `sections`.
///
/// New sections are ordered by name and then by occurrence index, and their
/// entries by entry name. Indices only order the new sections: `global[2]`
/// and `global[11]` produce exactly two sections.
pub(crate) fn append_sections(sections: &mut Vec<Section>, overrides: OverrideMap) {
    let mut current: Option<(String, u64, Section)> = None;

    for (address, value) in overrides.into_sorted() {
        let Some(entry) = address.entry() else {
            debug!(%address, "dropping section override with no matching section");
            continue;
        };
        let same_group = matches!(
            &current,
            Some((name, index, _)) if address.is_in(name, *index)
        );
        if !same_group {
            if let Some((_, _, section)) = current.take() {
                push_new(sections, section);
            }
            current = Some((
                address.section().to_string(),
                address.index(),
                Section::new(address.section()),
            ));
        }

        if let Some((_, _, section)) = current.as_mut() {
            section.entries.push(Entry {
                key: entry.to_string(),
                value,
            });
        }
    }

    if let Some((_, _, section)) = current {
        push_new(sections, section);
    }
}

fn push_new(sections: &mut Vec<Section>, section: Section) {
    debug!(
        section = %section.name,
        entries = section.entries.len(),
        "appended config section"
    );
    sections.push(section);
}
