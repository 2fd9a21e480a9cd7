use thiserror::Error;

use super::Address;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OverrideError {
    #[error("override keys '{first}' and '{second}' both address {address}")]
    DuplicateAddress {
        address: Address,
        first: String,
        second: String,
    },
}
