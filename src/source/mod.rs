//! Loading the flat configuration dictionary that carries override keys.

mod builder;
mod error;
mod file;
mod layer;

pub use builder::Overrides;
pub use error::SourceError;
pub use file::FileSource;
pub use layer::ConfigSource;
