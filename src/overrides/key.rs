//! Parsing of `raw.qemu.config.*` keys into structured addresses.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Prefix shared by every override key.
pub const KEY_PREFIX: &str = "raw.qemu.config.";

static KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^raw\.qemu\.config\.([^.\[]+)(?:\[(\d+)\])?(?:\.(.+))?$")
        .expect("override key pattern is valid")
});

/// Where an override applies: a section occurrence, or one entry inside it.
///
/// Ordering is lexicographic over section name, then occurrence index, then
/// entry name, with a section-level address sorting before the entry
/// addresses of the same occurrence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address {
    section: String,
    index: u64,
    entry: Option<String>,
}

impl Address {
    /// Addresses a whole section occurrence.
    pub fn section_level(section: impl Into<String>, index: u64) -> Self {
        Self {
            section: section.into(),
            index,
            entry: None,
        }
    }

    /// Addresses a single entry inside a section occurrence.
    pub fn entry_level(section: impl Into<String>, index: u64, entry: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            index,
            entry: Some(entry.into()),
        }
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    /// Zero-based occurrence of the section name in the original document.
    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn entry(&self) -> Option<&str> {
        self.entry.as_deref()
    }

    pub(crate) fn into_entry(self) -> Option<String> {
        self.entry
    }

    /// True if `self` points into the given section occurrence, at any level.
    pub(crate) fn is_in(&self, section: &str, index: u64) -> bool {
        self.section == section && self.index == index
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{KEY_PREFIX}{}[{}]", self.section, self.index)?;
        if let Some(entry) = &self.entry {
            write!(f, ".{entry}")?;
        }
        Ok(())
    }
}

/// Parses a flat configuration key into an [`Address`].
///
/// Returns `None` for keys outside the `raw.qemu.config.` grammar; those
/// belong to unrelated configuration and are not an error. An omitted
/// `[index]` means occurrence 0.
///
/// ```
/// use qemu_cfg_override::{parse_key, Address};
///
/// assert_eq!(
///     parse_key("raw.qemu.config.global[1].value"),
///     Some(Address::entry_level("global", 1, "value"))
/// );
/// assert_eq!(parse_key("limits.cpu"), None);
/// ```
///
/// # Panics
///
/// Panics if the bracketed index does not fit in a `u64`. The grammar only
/// admits digits there, so this can only be an overflow.
pub fn parse_key(key: &str) -> Option<Address> {
    let caps = KEY_PATTERN.captures(key)?;

    let section = caps.get(1)?.as_str().to_string();
    let index = match caps.get(2) {
        Some(digits) => digits
            .as_str()
            .parse::<u64>()
            .unwrap_or_else(|e| panic!("failed to parse section index in {key:?}: {e}")),
        None => 0,
    };
    let entry = caps.get(3).map(|m| m.as_str().to_string());

    Some(Address {
        section,
        index,
        entry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_key_with_default_index() {
        assert_eq!(
            parse_key("raw.qemu.config.global.value"),
            Some(Address::entry_level("global", 0, "value"))
        );
    }

    #[test]
    fn test_explicit_index() {
        assert_eq!(
            parse_key("raw.qemu.config.global[11].value"),
            Some(Address::entry_level("global", 11, "value"))
        );
        assert_eq!(
            parse_key("raw.qemu.config.global[0]"),
            Some(Address::section_level("global", 0))
        );
    }

    #[test]
    fn test_section_level_key() {
        assert_eq!(
            parse_key(r#"raw.qemu.config.device "qemu_balloon""#),
            Some(Address::section_level(r#"device "qemu_balloon""#, 0))
        );
    }

    #[test]
    fn test_section_name_with_spaces_and_quotes() {
        let addr = parse_key(r#"raw.qemu.config.device "qemu_gpu".driver"#).unwrap();
        assert_eq!(addr.section(), r#"device "qemu_gpu""#);
        assert_eq!(addr.index(), 0);
        assert_eq!(addr.entry(), Some("driver"));
    }

    #[test]
    fn test_entry_may_contain_dots() {
        let addr = parse_key("raw.qemu.config.global[2].virtio-pci.disable-legacy").unwrap();
        assert_eq!(addr.section(), "global");
        assert_eq!(addr.index(), 2);
        assert_eq!(addr.entry(), Some("virtio-pci.disable-legacy"));
    }

    #[test]
    fn test_non_override_keys_are_ignored() {
        for key in [
            "limits.cpu",
            "raw.qemu",
            "raw.qemu.config",
            "raw.qemu.config.",
            "raw.qemu.config.global.",
            "raw.qemu.config.global[x].value",
            "raw.qemu.config.global[-1].value",
            "raw.qemu.config.global[1]x",
            "RAW.QEMU.CONFIG.global.value",
            "xraw.qemu.config.global.value",
        ] {
            assert_eq!(parse_key(key), None, "{key}");
        }
    }

    #[test]
    #[should_panic(expected = "failed to parse section index")]
    fn test_index_overflow_panics() {
        parse_key("raw.qemu.config.global[99999999999999999999999].value");
    }

    #[test]
    fn test_display_is_canonical() {
        assert_eq!(
            parse_key("raw.qemu.config.global.value").unwrap().to_string(),
            "raw.qemu.config.global[0].value"
        );
        assert_eq!(
            Address::section_level("memory", 3).to_string(),
            "raw.qemu.config.memory[3]"
        );
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut addrs = vec![
            Address::entry_level("global", 11, "a"),
            Address::entry_level("global", 2, "z"),
            Address::entry_level("device", 5, "b"),
            Address::section_level("global", 2),
            Address::entry_level("global", 2, "a"),
        ];
        addrs.sort();

        assert_eq!(
            addrs,
            vec![
                Address::entry_level("device", 5, "b"),
                Address::section_level("global", 2),
                Address::entry_level("global", 2, "a"),
                Address::entry_level("global", 2, "z"),
                Address::entry_level("global", 11, "a"),
            ]
        );
    }
}
