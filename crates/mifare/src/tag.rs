//! MIFARE Classic tag engine
//!
//! [`MifareClassic`] binds a discovered tag's identifier to its transport
//! and drives the protocol: authenticate a sector through the well-known
//! key cascade, then read or write blocks strictly sequentially. Every
//! operation opens the radio link once and closes it once, on success and
//! on every failure path after connecting.

use core::fmt;

use bytes::Bytes;
use derive_more::Deref;
use tracing::debug;

use crate::error::{Error, Result};
use crate::frame::{self, BLOCK_SIZE};
use crate::keys::KeyCandidate;
use crate::transport::TagTransport;

/// Identifier of a physical tag, captured at discovery time
#[derive(Clone, PartialEq, Eq, Hash, Deref)]
#[deref(forward)]
pub struct TagUid(Vec<u8>);

impl TagUid {
    /// Wrap raw identifier bytes
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Identifier bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&[u8]> for TagUid {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Display for TagUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Debug for TagUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TagUid({})", hex::encode(&self.0))
    }
}

/// A discovered MIFARE Classic tag bound to its transport
///
/// One value represents one physical tag for the duration of a session.
/// The transport is exclusively owned: block operations are inherently
/// sequential and address-dependent, so nothing here is shareable or
/// reentrant.
#[derive(Debug)]
pub struct MifareClassic<T: TagTransport> {
    uid: TagUid,
    transport: T,
}

impl<T: TagTransport> MifareClassic<T> {
    /// Bind a tag identifier to its transport
    pub const fn new(uid: TagUid, transport: T) -> Self {
        Self { uid, transport }
    }

    /// Identifier of the physical tag
    pub const fn uid(&self) -> &TagUid {
        &self.uid
    }

    /// Get a reference to the underlying transport
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Get a mutable reference to the underlying transport
    pub const fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the tag and return its transport
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Authenticate a sector with the well-known Key A candidates
    ///
    /// Candidates are tried in the fixed order of
    /// [`KeyCandidate::CANDIDATES`]; the first one the tag accepts wins
    /// and is returned. When all of them are refused the sector is
    /// reported as unauthenticatable and no partial state is retained.
    /// Requires a connected transport; a transport failure aborts the
    /// cascade immediately.
    pub fn authenticate_sector(&mut self, sector: u8) -> Result<KeyCandidate> {
        for candidate in KeyCandidate::CANDIDATES {
            if self
                .transport
                .authenticate_sector_with_key_a(sector, candidate.bytes())?
            {
                debug!(sector, key = %candidate, "sector authenticated");
                return Ok(candidate);
            }
        }
        Err(Error::AuthenticationFailed { sector })
    }

    /// Read whole blocks from one sector
    ///
    /// `offsets` addresses blocks relative to the sector's first block
    /// and must not be empty. The result is index-aligned with the
    /// requested offsets. The contract is all-or-nothing: the first
    /// failing block fails the whole call and later offsets are never
    /// attempted.
    pub fn read_blocks(&mut self, sector: u8, offsets: &[u8]) -> Result<Vec<Bytes>> {
        if offsets.is_empty() {
            return Err(Error::NoBlocksGiven);
        }
        self.transport.connect()?;
        let result = self.read_connected(sector, offsets);
        self.finish(result)
    }

    fn read_connected(&mut self, sector: u8, offsets: &[u8]) -> Result<Vec<Bytes>> {
        self.authenticate_sector(sector)?;
        let base = self.transport.sector_to_block(sector);
        let mut payloads = Vec::with_capacity(offsets.len());
        for &offset in offsets {
            let block = base.wrapping_add(offset);
            let payload = self
                .transport
                .transceive(&frame::read_block(block))
                .map_err(|source| Error::ReadBlock { block, source })?;
            payloads.push(payload);
        }
        Ok(payloads)
    }

    /// Write a buffer to consecutive blocks of one sector
    ///
    /// The buffer is split into chunks of at most [`BLOCK_SIZE`] bytes,
    /// written to consecutive blocks starting at the sector's first
    /// block. The final chunk is framed exactly as supplied, without
    /// zero padding; callers wanting full-block writes supply a multiple
    /// of [`BLOCK_SIZE`]. An empty buffer authenticates the sector and
    /// writes nothing.
    ///
    /// The first failing block aborts the remaining chunks. Chunks
    /// already written are not rolled back; partial writes persist on
    /// the physical tag.
    pub fn write_blocks(&mut self, sector: u8, buffer: &[u8]) -> Result<()> {
        self.transport.connect()?;
        let result = self.write_connected(sector, buffer);
        self.finish(result)
    }

    fn write_connected(&mut self, sector: u8, buffer: &[u8]) -> Result<()> {
        self.authenticate_sector(sector)?;
        let mut block = self.transport.sector_to_block(sector);
        for chunk in buffer.chunks(BLOCK_SIZE) {
            debug!(block, len = chunk.len(), "writing chunk");
            self.transport
                .transceive(&frame::write_block(block, chunk))
                .map_err(|source| Error::WriteBlock { block, source })?;
            block = block.wrapping_add(1);
        }
        Ok(())
    }

    /// Close the transport and merge the close outcome into the
    /// operation result. The operation's own error wins; a close failure
    /// is surfaced only when the operation itself succeeded, otherwise
    /// it is logged and dropped.
    fn finish<V>(&mut self, result: Result<V>) -> Result<V> {
        let closed = self.transport.close();
        match result {
            Ok(value) => {
                closed?;
                Ok(value)
            }
            Err(error) => {
                if let Err(close_error) = closed {
                    debug!(error = ?close_error, "closing tag after failed operation also failed");
                }
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::error::TransportError;
    use crate::keys;
    use crate::transport::MockTag;

    fn tag(mock: MockTag) -> MifareClassic<MockTag> {
        MifareClassic::new(TagUid::new(vec![0x04, 0xE1, 0x5C, 0x32]), mock)
    }

    #[test]
    fn uid_renders_as_hex() {
        let uid = TagUid::from(&hex!("04AABBCC")[..]);
        assert_eq!(uid.to_string(), "04aabbcc");
        assert_eq!(format!("{uid:?}"), "TagUid(04aabbcc)");
        assert_eq!(uid.len(), 4);
    }

    #[test]
    fn read_returns_index_aligned_payloads() {
        let mut mock = MockTag::with_accepted_key(keys::FACTORY_DEFAULT);
        let first = hex!("000102030405060708090A0B0C0D0E0F");
        let second = hex!("101112131415161718191A1B1C1D1E1F");
        mock.queue_response(first.to_vec());
        mock.queue_response(second.to_vec());
        let mut tag = tag(mock);

        let payloads = tag.read_blocks(1, &[0, 1]).unwrap();

        assert_eq!(payloads.len(), 2);
        assert!(payloads.iter().all(|payload| payload.len() == BLOCK_SIZE));
        assert_eq!(payloads[0].as_ref(), &first);
        assert_eq!(payloads[1].as_ref(), &second);
        // sector 1 starts at block 4
        let frames = tag.transport().frames();
        assert_eq!(frames[0].as_ref(), &[0x30, 4]);
        assert_eq!(frames[1].as_ref(), &[0x30, 5]);
    }

    #[test]
    fn empty_read_request_fails_before_connecting() {
        let mut tag = tag(MockTag::with_accepted_key(keys::FACTORY_DEFAULT));

        let err = tag.read_blocks(1, &[]).unwrap_err();

        assert!(matches!(err, Error::NoBlocksGiven));
        assert_eq!(tag.transport().connect_count(), 0);
        assert!(tag.transport().auth_attempts().is_empty());
    }

    #[test]
    fn authentication_tries_candidates_in_order() {
        // this tag only accepts the third candidate
        let mut tag = tag(MockTag::with_accepted_key(keys::NFC_FORUM));

        let key = tag.authenticate_sector(2).unwrap();

        assert_eq!(key, KeyCandidate::NfcForum);
        let attempts = tag.transport().auth_attempts();
        assert_eq!(attempts.len(), 3);
        assert_eq!(attempts[0], (2, keys::APPLICATION_DIRECTORY));
        assert_eq!(attempts[1], (2, keys::FACTORY_DEFAULT));
        assert_eq!(attempts[2], (2, keys::NFC_FORUM));
    }

    #[test]
    fn authentication_stops_at_first_accepted_candidate() {
        let mut tag = tag(MockTag::with_accepted_key(keys::APPLICATION_DIRECTORY));

        let key = tag.authenticate_sector(0).unwrap();

        assert_eq!(key, KeyCandidate::ApplicationDirectory);
        assert_eq!(tag.transport().auth_attempts().len(), 1);
    }

    #[test]
    fn exhausted_candidates_fail_without_block_operations() {
        let mut tag = tag(MockTag::new());

        let err = tag.read_blocks(1, &[0]).unwrap_err();

        assert!(matches!(err, Error::AuthenticationFailed { sector: 1 }));
        assert_eq!(tag.transport().auth_attempts().len(), 3);
        assert!(tag.transport().frames().is_empty());
        // the handle is still closed exactly once
        assert_eq!(tag.transport().close_count(), 1);
    }

    #[test]
    fn out_of_range_sector_fails_authentication() {
        // 1K/4K layouts top out at sector 39
        let mut tag = tag(MockTag::with_accepted_key(keys::FACTORY_DEFAULT));

        let err = tag.read_blocks(40, &[0]).unwrap_err();

        assert!(matches!(err, Error::AuthenticationFailed { sector: 40 }));
        assert_eq!(tag.transport().auth_attempts().len(), 3);
        assert!(tag.transport().frames().is_empty());
        assert_eq!(tag.transport().close_count(), 1);
    }

    #[test]
    fn transport_failure_aborts_the_cascade() {
        let mut mock = MockTag::with_accepted_key(keys::NFC_FORUM);
        mock.fail_authentication(TransportError::Timeout);
        let mut tag = tag(mock);

        let err = tag.authenticate_sector(2).unwrap_err();

        // a dropped link is a transport error, not an exhausted cascade
        assert!(matches!(err, Error::Transport(TransportError::Timeout)));
        assert_eq!(tag.transport().auth_attempts().len(), 1);
    }

    #[test]
    fn write_chunks_forty_bytes_into_three_frames() {
        let mut tag = tag(MockTag::with_accepted_key(keys::FACTORY_DEFAULT));
        let buffer: Vec<u8> = (0..40).collect();

        tag.write_blocks(1, &buffer).unwrap();

        let frames = tag.transport().frames();
        assert_eq!(frames.len(), 3);
        // chunk lengths 16, 16, 8 against blocks 4, 5, 6
        assert_eq!(frames[0][..2], [0xA0, 4]);
        assert_eq!(&frames[0][2..], &buffer[..16]);
        assert_eq!(frames[1][..2], [0xA0, 5]);
        assert_eq!(&frames[1][2..], &buffer[16..32]);
        assert_eq!(frames[2][..2], [0xA0, 6]);
        assert_eq!(&frames[2][2..], &buffer[32..]);
        assert_eq!(frames[2].len(), 2 + 8);
    }

    #[test]
    fn write_failure_on_second_chunk_aborts_the_rest() {
        let mut mock = MockTag::with_accepted_key(keys::FACTORY_DEFAULT);
        mock.queue_response(Bytes::new());
        mock.queue_failure(TransportError::Timeout);
        let mut tag = tag(mock);

        let err = tag.write_blocks(1, &[0u8; 48]).unwrap_err();

        assert!(matches!(err, Error::WriteBlock { block: 5, .. }));
        // the third chunk was never framed
        assert_eq!(tag.transport().frames().len(), 2);
        assert_eq!(tag.transport().close_count(), 1);
    }

    #[test]
    fn read_failure_mid_sequence_aborts_remaining_offsets() {
        let mut mock = MockTag::with_accepted_key(keys::FACTORY_DEFAULT);
        mock.queue_response(vec![0u8; BLOCK_SIZE]);
        mock.queue_response(vec![0u8; BLOCK_SIZE]);
        mock.queue_failure(TransportError::transmission("tag did not acknowledge"));
        let mut tag = tag(mock);

        let err = tag.read_blocks(1, &[0, 1, 2, 3, 4]).unwrap_err();

        assert!(matches!(err, Error::ReadBlock { block: 6, .. }));
        assert_eq!(tag.transport().frames().len(), 3);
        assert_eq!(tag.transport().close_count(), 1);
    }

    #[test]
    fn empty_buffer_authenticates_and_writes_nothing() {
        let mut tag = tag(MockTag::with_accepted_key(keys::FACTORY_DEFAULT));

        tag.write_blocks(1, &[]).unwrap();

        assert_eq!(tag.transport().auth_attempts().len(), 2);
        assert!(tag.transport().frames().is_empty());
        assert_eq!(tag.transport().connect_count(), 1);
        assert_eq!(tag.transport().close_count(), 1);
    }

    #[test]
    fn connect_failure_leaves_nothing_to_close() {
        let mut mock = MockTag::with_accepted_key(keys::FACTORY_DEFAULT);
        mock.refuse_connect();
        let mut tag = tag(mock);

        let err = tag.read_blocks(1, &[0]).unwrap_err();

        assert!(matches!(err, Error::Transport(TransportError::Connection)));
        assert_eq!(tag.transport().close_count(), 0);
        assert!(tag.transport().auth_attempts().is_empty());
    }

    #[test]
    fn successful_read_closes_the_handle_once() {
        let mut tag = tag(MockTag::with_accepted_key(keys::FACTORY_DEFAULT));

        tag.read_blocks(0, &[0]).unwrap();

        assert_eq!(tag.transport().connect_count(), 1);
        assert_eq!(tag.transport().close_count(), 1);
    }
}
