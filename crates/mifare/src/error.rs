//! Error types for MIFARE Classic tag operations
//!
//! Failures come in two layers: [`TransportError`] covers a single raw
//! exchange with the tag (link loss, timeout, rejected frame), while
//! [`Error`] covers the protocol engine and tags block-scoped failures
//! with the physical block address that failed, so callers can branch on
//! the error kind instead of parsing messages.

use thiserror::Error;

/// Result type for MIFARE Classic operations
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised by a tag transport during a single exchange
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to establish or tear down the radio connection
    #[error("tag connection failed")]
    Connection,

    /// The tag rejected a frame or the link dropped mid-exchange
    #[error("transmission error: {0}")]
    Transmission(&'static str),

    /// The platform NFC stack timed out waiting for the tag
    #[error("transceive timed out")]
    Timeout,

    /// Other transport error
    #[error("transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Create a transmission error with a static description
    pub const fn transmission(message: &'static str) -> Self {
        Self::Transmission(message)
    }

    /// Create an `Other` error from any displayable value
    pub fn other<T: core::fmt::Display>(message: T) -> Self {
        Self::Other(message.to_string())
    }
}

/// Errors raised by the MIFARE Classic protocol engine
#[derive(Debug, Error)]
pub enum Error {
    /// A read request carried no block offsets
    #[error("no blocks given")]
    NoBlocksGiven,

    /// Every well-known key candidate was refused for the sector
    #[error("cannot authenticate sector {sector}")]
    AuthenticationFailed {
        /// Sector that refused all key candidates
        sector: u8,
    },

    /// A read-block exchange failed
    #[error("error while reading block {block}")]
    ReadBlock {
        /// Absolute address of the block that failed
        block: u8,
        /// Underlying transport failure
        source: TransportError,
    },

    /// A write-block exchange failed
    #[error("error while writing block {block}")]
    WriteBlock {
        /// Absolute address of the block that failed
        block: u8,
        /// Underlying transport failure
        source: TransportError,
    },

    /// Transport failure outside any block exchange
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl Error {
    /// Absolute block address attached to the error, if any
    pub const fn block(&self) -> Option<u8> {
        match self {
            Self::ReadBlock { block, .. } | Self::WriteBlock { block, .. } => Some(*block),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_address_is_exposed() {
        let err = Error::ReadBlock {
            block: 6,
            source: TransportError::Timeout,
        };
        assert_eq!(err.block(), Some(6));

        let err = Error::AuthenticationFailed { sector: 1 };
        assert_eq!(err.block(), None);
    }

    #[test]
    fn messages_match_wire_level_diagnostics() {
        assert_eq!(Error::NoBlocksGiven.to_string(), "no blocks given");
        assert_eq!(
            Error::AuthenticationFailed { sector: 3 }.to_string(),
            "cannot authenticate sector 3"
        );
        assert_eq!(
            TransportError::transmission("tag did not acknowledge").to_string(),
            "transmission error: tag did not acknowledge"
        );
    }
}
