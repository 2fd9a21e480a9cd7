//! Overrides for generated QEMU configuration documents.
//!
//! Users adjust the generated document through flat configuration keys:
//!
//! ```text
//! raw.qemu.config.global.value: "0"          # set [global] value = "0"
//! raw.qemu.config.global[1].value: "1"       # same, in the second [global]
//! raw.qemu.config.device "qemu_gpu".driver: qxl-vga
//! raw.qemu.config.device "qemu_balloon".multifunction: ""   # delete entry
//! raw.qemu.config.device "qemu_balloon": ""                 # delete section
//! ```
//!
//! The bracketed index picks an occurrence of a repeated section name and
//! defaults to 0. Entries and sections that do not exist yet are appended,
//! sorted so that the output does not depend on dictionary order.

mod append;
mod error;
mod index;
mod key;
mod merge;

use std::borrow::Cow;

use tracing::debug;

use crate::document::Section;
use append::append_sections;
use index::OverrideMap;
use merge::merge_sections;

pub use error::OverrideError;
pub use key::{parse_key, Address, KEY_PREFIX};

/// Applies every `raw.qemu.config.*` key in `config` to `sections`.
///
/// Keys outside that namespace are ignored. When there are no override keys
/// the input is returned borrowed and untouched; otherwise a new list is
/// built and neither input is modified.
///
/// ```
/// use std::collections::HashMap;
/// use qemu_cfg_override::{apply_overrides, Section};
///
/// let sections = vec![Section::new("global").with_entry("value", "1")];
/// let config = HashMap::from([("raw.qemu.config.global.value", "0")]);
///
/// let result = apply_overrides(&sections, &config)?;
/// assert_eq!(result[0].get("value"), Some("0"));
/// # Ok::<(), qemu_cfg_override::OverrideError>(())
/// ```
///
/// # Errors
///
/// Returns [`OverrideError::DuplicateAddress`] when two different keys,
/// such as `global.value` and `global[0].value`, address the same entry.
///
/// # Panics
///
/// Panics if a bracketed index overflows `u64` (see [`parse_key`]).
pub fn apply_overrides<I, K, V>(
    sections: &[Section],
    config: I,
) -> Result<Cow<'_, [Section]>, OverrideError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut overrides = OverrideMap::from_config(config)?;
    if overrides.is_empty() {
        return Ok(Cow::Borrowed(sections));
    }

    let mut merged = merge_sections(sections, &mut overrides);
    debug!(remaining = overrides.len(), "merged overrides into existing sections");
    append_sections(&mut merged, overrides);

    Ok(Cow::Owned(merged))
}
