use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use super::file::FileSource;
use super::layer::{ConfigSource, MapSource};
use super::SourceError;
use crate::document::Section;
use crate::overrides::apply_overrides;
use crate::Error;

/// Builder for the flat configuration dictionary that overrides are read from.
///
/// Sources are applied in registration order, with later sources replacing
/// values of the same literal key from earlier ones. Keys that are not
/// `raw.qemu.config.*` keys are carried along and ignored when applied.
///
/// ## Example
///
/// ```no_run
/// use qemu_cfg_override::{Overrides, Section};
///
/// let generated = vec![Section::new("global").with_entry("value", "1")];
///
/// let sections = Overrides::builder()
///     .with_file("instance.toml", true)
///     .with_file("local.toml", false)
///     .with_entry("raw.qemu.config.global.value", "0")
///     .apply(&generated)?;
/// # Ok::<(), qemu_cfg_override::Error>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() or .apply() is called"]
pub struct Overrides {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl Overrides {
    /// Creates a new builder with no sources.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds a TOML file of QEMU sections to be loaded.
    ///
    /// Top-level tables name section occurrences and their scalars are the
    /// entries to set, so `["global[1]"]` followed by `value = "0"` becomes
    /// `raw.qemu.config.global[1].value`. A top-level scalar addresses a
    /// whole section (`'device "qemu_balloon"' = ""` deletes it). If
    /// `required` is `true`, the build fails when the file doesn't exist.
    pub fn with_file(self, path: impl AsRef<Path>, required: bool) -> Self {
        self.with_source(FileSource::new(path, required))
    }

    /// Adds a single key/value pair.
    pub fn with_entry(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let pair: (String, String) = (key.into(), value.into());
        self.with_entries([pair])
    }

    /// Adds a batch of key/value pairs, such as an instance's expanded config.
    pub fn with_entries<I, K, V>(self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut source = MapSource::default();
        for (key, value) in entries {
            source.push(key.into(), value.into());
        }
        self.with_source(source)
    }

    /// Adds a custom source.
    pub fn with_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Loads every source and merges them into one dictionary.
    pub fn build(self) -> Result<BTreeMap<String, String>, SourceError> {
        let mut merged = BTreeMap::new();

        for source in &self.sources {
            for (key, value) in source.entries()? {
                merged.insert(key, value);
            }
        }

        debug!(
            sources = self.sources.len(),
            keys = merged.len(),
            "loaded configuration dictionary"
        );
        Ok(merged)
    }

    /// Builds the dictionary and applies it to `sections`.
    ///
    /// # Panics
    ///
    /// Panics if an override key's bracketed index overflows `u64`.
    pub fn apply(self, sections: &[Section]) -> Result<Vec<Section>, Error> {
        let config = self.build()?;
        let result = apply_overrides(sections, &config)?;
        Ok(result.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_later_sources_win() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[global]").unwrap();
        writeln!(file, "value = \"from-file\"").unwrap();
        writeln!(file, "other = \"kept\"").unwrap();

        let config = Overrides::builder()
            .with_entry("raw.qemu.config.global.value", "first")
            .with_file(file.path(), true)
            .with_entries([("raw.qemu.config.global.value", "last")])
            .build()
            .unwrap();

        assert_eq!(config["raw.qemu.config.global.value"], "last");
        assert_eq!(config["raw.qemu.config.global.other"], "kept");
    }

    #[test]
    fn test_optional_missing_file_is_skipped() {
        let config = Overrides::builder()
            .with_file("/nonexistent/overrides.toml", false)
            .build()
            .unwrap();

        assert!(config.is_empty());
    }

    #[test]
    fn test_required_missing_file_fails_apply() {
        let result = Overrides::builder()
            .with_file("/nonexistent/overrides.toml", true)
            .apply(&[]);

        assert!(matches!(
            result,
            Err(Error::Source(SourceError::FileNotFound(_)))
        ));
    }

    #[test]
    fn test_apply_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "\"global[1]\" = \"\"").unwrap();
        writeln!(file, "['device \"qemu_gpu\"']").unwrap();
        writeln!(file, "driver = \"qxl-vga\"").unwrap();

        let sections = vec![
            Section::new("global").with_entry("value", "1"),
            Section::new("global").with_entry("value", "2"),
            Section::new("device \"qemu_gpu\"").with_entry("driver", "virtio-vga"),
        ];

        let result = Overrides::builder()
            .with_entry("limits.cpu", "4")
            .with_file(file.path(), true)
            .apply(&sections)
            .unwrap();

        assert_eq!(
            result,
            vec![
                Section::new("global").with_entry("value", "1"),
                Section::new("device \"qemu_gpu\"").with_entry("driver", "qxl-vga"),
            ]
        );
    }

    #[test]
    fn test_apply_reports_colliding_keys() {
        let result = Overrides::builder()
            .with_entry("raw.qemu.config.global.value", "1")
            .with_entry("raw.qemu.config.global[0].value", "2")
            .apply(&[]);

        assert!(matches!(result, Err(Error::Override(_))));
    }
}
