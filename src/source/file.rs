//! Override files written as QEMU sections.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::layer::{section_keys, ConfigSource};
use super::SourceError;

/// A TOML file whose top-level tables are the QEMU sections to override.
///
/// See [`Overrides::with_file`](super::Overrides::with_file) for the layout.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    required: bool,
}

impl FileSource {
    /// Creates a new file source. A missing file is an error only when
    /// `required` is set.
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }
}

impl ConfigSource for FileSource {
    fn entries(&self) -> Result<Vec<(String, String)>, SourceError> {
        let path = self.path.as_path();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound && !self.required => {
                debug!(path = %path.display(), "optional override file missing; skipping");
                return Ok(Vec::new());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SourceError::FileNotFound(path.to_path_buf()));
            }
            Err(source) => {
                return Err(SourceError::ReadError {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let sections: toml::Table =
            toml::from_str(&contents).map_err(|source| SourceError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;
        let keys = section_keys(&sections)?;
        debug!(path = %path.display(), keys = keys.len(), "read override file");
        Ok(keys)
    }
}
