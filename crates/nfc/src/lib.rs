//! Tag discovery dispatch and NFC surface for MIFARE Classic access
//!
//! This crate is the host-facing half of the stack: it answers NFC
//! availability probes, fans tag-presented events out to the single
//! registered listener, and resolves write requests against the
//! current or saved dispatch intent. The wire-level work lives in
//! [`tactus_mifare`].
//!
//! ## Overview
//!
//! ```rust
//! use tactus_mifare::{keys, MockTag, TagUid};
//! use tactus_nfc::{discovered_tag_channel, Nfc, StaticAdapter, TagEvent};
//!
//! let nfc = Nfc::new(StaticAdapter { available: true, enabled: true });
//! let (sender, receiver) = discovered_tag_channel();
//! nfc.set_tag_discovered_listener(move |tag| {
//!     let _ = sender.send(tag);
//! });
//!
//! nfc.dispatcher().dispatch(TagEvent {
//!     uid: TagUid::new(vec![0x04, 0xE1, 0x5C, 0x32]),
//!     technology: Some(MockTag::with_accepted_key(keys::FACTORY_DEFAULT)),
//! });
//!
//! let tag = receiver.recv().unwrap();
//! assert_eq!(format!("{}", tag.uid()), "04e15c32");
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

pub mod adapter;
pub mod dispatch;
pub mod event;
pub mod intent;

mod error;
mod facade;

pub use adapter::{NfcAdapter, StaticAdapter};
pub use dispatch::{Subscription, TagDispatcher};
pub use error::{Error, Result};
pub use event::{
    DiscoveredTagReceiver, DiscoveredTagSender, TagDiscoveredHandler, TagEvent,
    discovered_tag_channel,
};
pub use facade::{Nfc, WriteTagOptions};
pub use intent::{DispatchIntent, TagIntents};
