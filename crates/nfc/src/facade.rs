//! Cross-platform NFC surface
//!
//! [`Nfc`] pairs the host environment probes with the tag discovery
//! dispatcher and the intent-driven write path. Block reads go through
//! the [`MifareClassic`](tactus_mifare::MifareClassic) value the
//! discovery listener receives; nothing here keeps ambient tag state.

use std::sync::Arc;

use bytes::Bytes;
use tactus_mifare::TagTransport;
use tracing::debug;

use crate::adapter::NfcAdapter;
use crate::dispatch::{Subscription, TagDispatcher};
use crate::error::Result;
use crate::event::TagDiscoveredHandler;
use crate::intent::TagIntents;

/// Options for a chunked tag write
#[derive(Debug, Clone)]
pub struct WriteTagOptions {
    /// Sector to authenticate and write into
    pub sector: u8,
    /// Bytes to write, split into 16-byte chunks against consecutive
    /// blocks from the sector's first block
    pub buffer: Bytes,
}

/// Cross-platform NFC surface
///
/// One value serves a whole host session: the adapter answers
/// availability probes, the dispatcher delivers discovered tags to the
/// registered listener, and [`write_tag`](Self::write_tag) drives the
/// intent-resolved write path.
#[derive(Debug)]
pub struct Nfc<A: NfcAdapter, T: TagTransport> {
    adapter: A,
    dispatcher: Arc<TagDispatcher<T>>,
}

impl<A: NfcAdapter, T: TagTransport> Nfc<A, T> {
    /// Create the surface around a host adapter
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            dispatcher: Arc::new(TagDispatcher::new()),
        }
    }

    /// Whether the device has NFC hardware
    pub fn available(&self) -> bool {
        self.adapter.is_available()
    }

    /// Whether NFC is switched on right now
    pub fn enabled(&self) -> bool {
        self.adapter.is_enabled()
    }

    /// The dispatcher the platform glue feeds tag-presented events into
    pub fn dispatcher(&self) -> Arc<TagDispatcher<T>> {
        Arc::clone(&self.dispatcher)
    }

    /// Register the single discovery listener, replacing any previous
    /// one
    ///
    /// Returns the subscription handle identifying this registration.
    pub fn set_tag_discovered_listener<H>(&self, listener: H) -> Subscription
    where
        H: TagDiscoveredHandler<T> + Send + 'static,
    {
        self.dispatcher.subscribe(listener)
    }

    /// Clear the discovery listener, if any is registered
    pub fn clear_tag_discovered_listener(&self) {
        self.dispatcher.clear();
    }

    /// Write a buffer to the tag resolved from the given intents
    ///
    /// The target is taken from the current intent when one exists,
    /// falling back to the saved intent. See
    /// [`MifareClassic::write_blocks`](tactus_mifare::MifareClassic::write_blocks)
    /// for the chunking and partial-write semantics.
    pub fn write_tag(&self, intents: TagIntents<T>, options: &WriteTagOptions) -> Result<()> {
        let mut tag = intents.resolve()?;
        debug!(
            uid = %tag.uid(),
            sector = options.sector,
            len = options.buffer.len(),
            "writing tag"
        );
        tag.write_blocks(options.sector, &options.buffer)?;
        Ok(())
    }
}
