//! Transport trait for talking to a physical tag
//!
//! This module abstracts the platform NFC stack behind a trait: opening
//! and closing the radio link, sector geometry, Key A authentication and
//! the raw transceive exchange.

use std::collections::VecDeque;
use std::fmt;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::error::TransportError;
use crate::keys::KEY_LENGTH;

/// Trait for MIFARE Classic tag transports
///
/// A transport owns the radio link to one physical tag. It has no
/// knowledge of the authentication cascade or block addressing; those
/// live in [`MifareClassic`](crate::MifareClassic), which drives the
/// transport strictly sequentially.
pub trait TagTransport: Send + fmt::Debug {
    /// Open the radio connection to the tag
    fn connect(&mut self) -> Result<(), TransportError>;

    /// Close the radio connection to the tag
    fn close(&mut self) -> Result<(), TransportError>;

    /// First absolute block address of the given sector
    ///
    /// Defined only for sectors the tag actually has; block operations
    /// reach it only after the sector authenticates.
    fn sector_to_block(&self, sector: u8) -> u8;

    /// Try one Key A value against a sector
    ///
    /// Returns `Ok(false)` when the tag refuses the key. Transport
    /// failures (link loss, timeout) are errors, not refusals.
    fn authenticate_sector_with_key_a(
        &mut self,
        sector: u8,
        key: &[u8; KEY_LENGTH],
    ) -> Result<bool, TransportError>;

    /// Exchange one frame with the tag and return its response
    ///
    /// This wraps [`do_transceive`](Self::do_transceive) with tracing of
    /// the raw traffic; implementations only supply the platform
    /// exchange itself.
    fn transceive(&mut self, frame: &[u8]) -> Result<Bytes, TransportError> {
        trace!(frame = %hex::encode(frame), "transceiving frame");
        let result = self.do_transceive(frame);
        match &result {
            Ok(response) => {
                trace!(response = %hex::encode(response), "received response");
            }
            Err(error) => {
                debug!(error = ?error, "transport error during transceive");
            }
        }
        result
    }

    /// Internal implementation of transceive
    /// This is the method that concrete implementations should override
    fn do_transceive(&mut self, frame: &[u8]) -> Result<Bytes, TransportError>;
}

/// Scripted in-memory tag transport
///
/// Simulates a MIFARE Classic 1K/4K tag for tests and examples: records
/// every connect, close, authentication attempt and transceived frame,
/// and replays scripted transceive outcomes in order. Once the script is
/// exhausted, further exchanges succeed with an empty payload. Sectors
/// past the 4K layout refuse every key, like real hardware.
#[derive(Debug, Default)]
pub struct MockTag {
    accepted_key: Option<[u8; KEY_LENGTH]>,
    outcomes: VecDeque<Result<Bytes, TransportError>>,
    refuse_connect: bool,
    auth_error: Option<TransportError>,
    connects: usize,
    closes: usize,
    auth_attempts: Vec<(u8, [u8; KEY_LENGTH])>,
    frames: Vec<Bytes>,
}

impl MockTag {
    /// Number of sectors on the simulated 4K tag
    pub const SECTOR_COUNT: u8 = 40;

    /// Create a tag that refuses every key
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tag that accepts the given Key A value
    pub fn with_accepted_key(key: [u8; KEY_LENGTH]) -> Self {
        Self {
            accepted_key: Some(key),
            ..Self::default()
        }
    }

    /// Queue a successful transceive outcome carrying `payload`
    pub fn queue_response(&mut self, payload: impl Into<Bytes>) {
        self.outcomes.push_back(Ok(payload.into()));
    }

    /// Queue a failing transceive outcome
    pub fn queue_failure(&mut self, error: TransportError) {
        self.outcomes.push_back(Err(error));
    }

    /// Make the next `connect` call fail
    pub const fn refuse_connect(&mut self) {
        self.refuse_connect = true;
    }

    /// Make the next authentication attempt fail with a transport error
    pub fn fail_authentication(&mut self, error: TransportError) {
        self.auth_error = Some(error);
    }

    /// Number of times the transport was connected
    pub const fn connect_count(&self) -> usize {
        self.connects
    }

    /// Number of times the transport was closed
    pub const fn close_count(&self) -> usize {
        self.closes
    }

    /// Authentication attempts seen so far, as (sector, key) pairs
    pub fn auth_attempts(&self) -> &[(u8, [u8; KEY_LENGTH])] {
        &self.auth_attempts
    }

    /// Frames transceived so far, in order
    pub fn frames(&self) -> &[Bytes] {
        &self.frames
    }
}

impl TagTransport for MockTag {
    fn connect(&mut self) -> Result<(), TransportError> {
        if self.refuse_connect {
            return Err(TransportError::Connection);
        }
        self.connects += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.closes += 1;
        Ok(())
    }

    fn sector_to_block(&self, sector: u8) -> u8 {
        // MIFARE Classic layout: 32 sectors of 4 blocks, then 8 of 16
        if sector < 32 {
            sector * 4
        } else {
            128 + (sector - 32) * 16
        }
    }

    fn authenticate_sector_with_key_a(
        &mut self,
        sector: u8,
        key: &[u8; KEY_LENGTH],
    ) -> Result<bool, TransportError> {
        self.auth_attempts.push((sector, *key));
        if let Some(error) = self.auth_error.take() {
            return Err(error);
        }
        // a sector the tag does not have refuses every key
        if sector >= Self::SECTOR_COUNT {
            return Ok(false);
        }
        Ok(self.accepted_key.as_ref() == Some(key))
    }

    fn do_transceive(&mut self, frame: &[u8]) -> Result<Bytes, TransportError> {
        self.frames.push(Bytes::copy_from_slice(frame));
        self.outcomes.pop_front().unwrap_or_else(|| Ok(Bytes::new()))
    }
}
