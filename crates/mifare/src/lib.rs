//! MIFARE Classic sector authentication and block transfer
//!
//! This crate drives the MIFARE Classic wire protocol over a pluggable
//! tag transport: authenticating sectors against the well-known Key A
//! candidates and moving 16-byte blocks in and out of the tag.
//!
//! ## Overview
//!
//! MIFARE Classic tags partition storage into sectors of fixed-size
//! blocks. This crate provides:
//!
//! - A [`TagTransport`] trait binding the engine to a platform NFC stack
//! - The [`authenticate_sector`](MifareClassic::authenticate_sector) key
//!   cascade over the published default keys
//! - All-or-nothing block reads and chunked block writes with
//!   block-scoped errors
//! - A scripted [`MockTag`] transport for tests and simulations
//!
//! Every operation connects the transport once, works strictly
//! sequentially and closes the transport again before returning, on
//! success and on failure alike.
//!
//! ```
//! use tactus_mifare::{MifareClassic, MockTag, TagUid, keys};
//!
//! let mut mock = MockTag::with_accepted_key(keys::FACTORY_DEFAULT);
//! mock.queue_response(vec![0u8; 16]);
//!
//! let mut tag = MifareClassic::new(TagUid::new(vec![0x04, 0xE1, 0x5C, 0x32]), mock);
//! let blocks = tag.read_blocks(1, &[0])?;
//! assert_eq!(blocks[0].len(), 16);
//! # Ok::<(), tactus_mifare::Error>(())
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

// Main modules
pub mod frame;
pub mod keys;
pub mod tag;
pub mod transport;

// Core error types
mod error;
pub use error::{Error, Result, TransportError};

// Re-exports for common types
pub use frame::BLOCK_SIZE;
pub use keys::KeyCandidate;
pub use tag::{MifareClassic, TagUid};
pub use transport::{MockTag, TagTransport};

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{
        BLOCK_SIZE, Bytes, BytesMut, Error, MifareClassic, Result, TagUid,
        keys::KeyCandidate,
        transport::TagTransport,
    };
}
