//! Error types for the NFC surface

use thiserror::Error;

/// Result type for NFC surface operations
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised by the NFC surface
#[derive(Debug, Error)]
pub enum Error {
    /// The write path received neither a current nor a saved intent
    #[error("didn't receive an intent")]
    NoIntent,

    /// The resolved intent carried no tag to write to
    #[error("no tag found to write to")]
    NoTagFound,

    /// Tag protocol failure
    #[error(transparent)]
    Tag(#[from] tactus_mifare::Error),
}
