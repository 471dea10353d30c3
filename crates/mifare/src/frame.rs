//! MIFARE Classic command framing
//!
//! The wire protocol consists of two frame shapes sent over the tag's
//! transceive channel: read = `[0x30, block]` and
//! write = `[0xA0, block, ..payload]`. Block addresses are absolute and
//! fit in a single byte, exactly as the tag sees them.

use bytes::{BufMut, Bytes, BytesMut};

/// Size in bytes of one MIFARE Classic block
pub const BLOCK_SIZE: usize = 16;

/// Command bytes understood by MIFARE Classic tags
pub mod cmd {
    /// Read one 16-byte block
    pub const READ_BLOCK: u8 = 0x30;
    /// Write one 16-byte block
    pub const WRITE_BLOCK: u8 = 0xA0;
}

/// Build a read-block frame for an absolute block address
pub const fn read_block(block: u8) -> [u8; 2] {
    [cmd::READ_BLOCK, block]
}

/// Build a write-block frame carrying `chunk` for an absolute block
/// address.
///
/// The chunk is framed exactly as supplied; a final chunk shorter than
/// [`BLOCK_SIZE`] is not zero-padded.
pub fn write_block(block: u8, chunk: &[u8]) -> Bytes {
    let mut frame = BytesMut::with_capacity(2 + chunk.len());
    frame.put_u8(cmd::WRITE_BLOCK);
    frame.put_u8(block);
    frame.put_slice(chunk);
    frame.freeze()
}
