//! The per-call working set of parsed overrides.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::{parse_key, Address, OverrideError};

/// Parsed overrides keyed by [`Address`].
///
/// Built once per [`apply_overrides`](super::apply_overrides) call and
/// consumed as overrides are applied. Iteration order of the backing map is
/// never observable: everything that enumerates it sorts first.
#[derive(Debug, Default)]
pub(crate) struct OverrideMap {
    values: HashMap<Address, String>,
}

impl OverrideMap {
    /// Parses every key of a flat dictionary, keeping those that are
    /// override keys.
    ///
    /// Two different literal keys that resolve to the same address (for
    /// example `global.value` and `global[0].value`) are rejected. All
    /// spellings are collected before reporting, so the error names the
    /// smallest colliding address and its two lexicographically smallest
    /// spellings whatever order the dictionary yields them in.
    pub fn from_config<I, K, V>(config: I) -> Result<Self, OverrideError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        // Literal key -> value, per address. Repeats of one literal key keep the last value.
        let mut spellings: HashMap<Address, BTreeMap<String, String>> = HashMap::new();

        for (key, value) in config {
            let key = key.as_ref();
            let Some(address) = parse_key(key) else {
                continue;
            };
            spellings
                .entry(address)
                .or_default()
                .insert(key.to_string(), value.as_ref().to_string());
        }

        let collision = spellings
            .iter()
            .filter(|(_, keys)| keys.len() > 1)
            .min_by(|a, b| a.0.cmp(b.0));
        if let Some((address, keys)) = collision {
            let mut literals = keys.keys().cloned();
            if let (Some(first), Some(second)) = (literals.next(), literals.next()) {
                return Err(OverrideError::DuplicateAddress {
                    address: address.clone(),
                    first,
                    second,
                });
            }
        }

        let values: HashMap<_, _> = spellings
            .into_iter()
            .filter_map(|(address, keys)| Some((address, keys.into_values().next()?)))
            .collect();
        debug!(count = values.len(), "indexed qemu config overrides");

        Ok(Self { values })
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, address: &Address) -> Option<&str> {
        self.values.get(address).map(String::as_str)
    }

    pub fn take(&mut self, address: &Address) -> Option<String> {
        self.values.remove(address)
    }

    /// Removes every entry-level override for one section occurrence and
    /// returns `(entry, value)` pairs sorted by entry name.
    ///
    /// The section-level address of the occurrence, if any, stays in place.
    pub fn take_occurrence(&mut self, section: &str, index: u64) -> Vec<(String, String)> {
        let mut addresses: Vec<Address> = self
            .values
            .keys()
            .filter(|a| a.is_in(section, index) && a.entry().is_some())
            .cloned()
            .collect();
        addresses.sort();

        addresses
            .into_iter()
            .filter_map(|address| {
                let value = self.values.remove(&address)?;
                Some((address.into_entry()?, value))
            })
            .collect()
    }

    /// Consumes the map, returning what is left in [`Address`] order.
    pub fn into_sorted(self) -> Vec<(Address, String)> {
        let mut rest: Vec<_> = self.values.into_iter().collect();
        rest.sort_by(|a, b| a.0.cmp(&b.0));
        rest
    }
}
