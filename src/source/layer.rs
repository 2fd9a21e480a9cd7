use toml::{Table, Value};

use super::SourceError;
use crate::overrides::{parse_key, KEY_PREFIX};

/// Something that contributes flat `key -> value` pairs to the dictionary.
pub trait ConfigSource: Send + Sync + std::fmt::Debug {
    fn entries(&self) -> Result<Vec<(String, String)>, SourceError>;
}

/// In-memory pairs registered directly on the builder.
#[derive(Debug, Clone, Default)]
pub(crate) struct MapSource {
    entries: Vec<(String, String)>,
}

impl MapSource {
    pub(crate) fn push(&mut self, key: String, value: String) {
        self.entries.push((key, value));
    }
}

impl ConfigSource for MapSource {
    fn entries(&self) -> Result<Vec<(String, String)>, SourceError> {
        Ok(self.entries.clone())
    }
}

/// Renders a table of QEMU sections into `raw.qemu.config.*` keys.
///
/// Each top-level table is a section occurrence and its scalars are entries:
///
/// ```toml
/// ['device "qemu_gpu"']
/// driver = "qxl-vga"
///
/// ["global[1]"]
/// value = 0
/// ```
///
/// A top-level scalar addresses a whole section, so
/// `'device "qemu_balloon"' = ""` deletes it. Every rendered key must parse
/// back to the address it was written for.
pub(crate) fn section_keys(table: &Table) -> Result<Vec<(String, String)>, SourceError> {
    let mut out = Vec::new();

    for (section, value) in table {
        match value {
            Value::Table(entries) => {
                for (entry, value) in entries {
                    let key = format!("{KEY_PREFIX}{section}.{entry}");
                    let value = scalar_text(&key, value)?;
                    out.push((checked(key, Some(entry))?, value));
                }
            }
            value => {
                let key = format!("{KEY_PREFIX}{section}");
                let value = scalar_text(&key, value)?;
                out.push((checked(key, None)?, value));
            }
        }
    }

    Ok(out)
}

/// Rejects section or entry names the key grammar would split differently,
/// such as a section name containing `.`.
fn checked(key: String, entry: Option<&str>) -> Result<String, SourceError> {
    match parse_key(&key) {
        Some(address) if address.entry() == entry => Ok(key),
        _ => Err(SourceError::InvalidKey(key)),
    }
}

fn scalar_text(key: &str, value: &Value) -> Result<String, SourceError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(dt) => Ok(dt.to_string()),
        Value::Array(_) | Value::Table(_) => Err(SourceError::UnsupportedValue(key.to_string())),
    }
}
