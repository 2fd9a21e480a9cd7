use crate::overrides::OverrideError;
use crate::source::SourceError;
use thiserror::Error;

/// Top-level error type for the qemu-cfg-override library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("override error: {0}")]
    Override(#[from] OverrideError),

    #[error("configuration source error: {0}")]
    Source(#[from] SourceError),
}
