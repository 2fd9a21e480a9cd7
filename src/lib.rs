pub mod document;
mod error;
pub mod overrides;
pub mod source;

pub use document::{Entry, Section};
pub use error::Error;
pub use overrides::{apply_overrides, parse_key, Address, OverrideError, KEY_PREFIX};
pub use source::{Overrides, SourceError};
