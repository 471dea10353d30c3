//! Single-slot tag discovery dispatch
//!
//! At most one listener receives discovered tags. Registration hands the
//! caller a [`Subscription`] and replaces any previous listener (last
//! register wins). Events arriving with no listener, or for a tag whose
//! technology could not be resolved, are logged and dropped; they are
//! never buffered for a later registration.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tactus_mifare::{MifareClassic, TagTransport};
use tracing::debug;

use crate::event::{DiscoveredTagSender, TagDiscoveredHandler, TagEvent};

/// Handle identifying one listener registration
///
/// Returned by [`TagDispatcher::subscribe`]. A later registration
/// supersedes it, after which unsubscribing through the stale handle does
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

type SharedHandler<T> = Arc<Mutex<Box<dyn TagDiscoveredHandler<T> + Send>>>;

struct Slot<T> {
    id: u64,
    handler: SharedHandler<T>,
}

/// Delivers discovered tags to at most one registered listener
pub struct TagDispatcher<T: TagTransport> {
    slot: Mutex<Option<Slot<T>>>,
    next_id: AtomicU64,
}

impl<T: TagTransport> fmt::Debug for TagDispatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagDispatcher")
            .field("listener", &self.slot.lock().is_some())
            .finish()
    }
}

impl<T: TagTransport> TagDispatcher<T> {
    /// Create a dispatcher with no listener registered
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a listener, replacing any previous one
    ///
    /// The swap is atomic: last register wins and the superseded
    /// listener is dropped.
    pub fn subscribe<H>(&self, handler: H) -> Subscription
    where
        H: TagDiscoveredHandler<T> + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        *self.slot.lock() = Some(Slot {
            id,
            handler: Arc::new(Mutex::new(Box::new(handler))),
        });
        Subscription(id)
    }

    /// Register a channel sender as the listener
    ///
    /// Discovered tags are forwarded into the channel; a disconnected
    /// receiver behaves like an absent listener.
    pub fn subscribe_channel(&self, sender: DiscoveredTagSender<T>) -> Subscription
    where
        T: 'static,
    {
        self.subscribe(move |tag: MifareClassic<T>| {
            if sender.send(tag).is_err() {
                debug!("discovered tag dropped, channel receiver is gone");
            }
        })
    }

    /// Remove the listener registered under `subscription`
    ///
    /// Does nothing when a later registration already replaced it.
    pub fn unsubscribe(&self, subscription: Subscription) {
        let mut slot = self.slot.lock();
        if slot.as_ref().is_some_and(|active| active.id == subscription.0) {
            *slot = None;
        }
    }

    /// Remove any registered listener
    pub fn clear(&self) {
        *self.slot.lock() = None;
    }

    /// Whether a listener is currently registered
    pub fn has_listener(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Deliver a tag-presented event to the registered listener
    ///
    /// The listener receives the tag bound to its transport, ready for
    /// block operations. Events without a resolved technology, and
    /// events arriving while no listener is registered, are dropped with
    /// a diagnostic log only.
    pub fn dispatch(&self, event: TagEvent<T>) {
        let Some(transport) = event.technology else {
            debug!(uid = %event.uid, "tag discovered, but its technology provider is empty");
            return;
        };

        // clone the handler out so the listener can re-register through
        // the dispatcher without deadlocking on the slot
        let handler = self
            .slot
            .lock()
            .as_ref()
            .map(|active| Arc::clone(&active.handler));

        match handler {
            Some(handler) => {
                debug!(uid = %event.uid, "dispatching discovered tag");
                handler
                    .lock()
                    .on_tag_discovered(MifareClassic::new(event.uid, transport));
            }
            None => {
                debug!(uid = %event.uid, "tag discovered, but no listener was registered");
            }
        }
    }
}

impl<T: TagTransport> Default for TagDispatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}
