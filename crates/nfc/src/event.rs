//! Discovery events and listener plumbing

use crossbeam_channel::{Receiver, Sender, unbounded};
use tactus_mifare::{MifareClassic, TagTransport, TagUid};

/// A tag-presented event from the platform dispatch layer
///
/// Carries the raw tag identifier and the tag's transport when the
/// platform resolved it to MIFARE Classic. Technology resolution happens
/// before this event is built; an unresolvable tag arrives with no
/// transport and is dropped by the dispatcher.
#[derive(Debug)]
pub struct TagEvent<T> {
    /// Raw identifier of the presented tag
    pub uid: TagUid,
    /// Resolved MIFARE Classic transport, or `None` when the tag speaks
    /// a different technology
    pub technology: Option<T>,
}

/// Trait for handling discovered tags
pub trait TagDiscoveredHandler<T: TagTransport> {
    /// Handle a discovered tag
    fn on_tag_discovered(&mut self, tag: MifareClassic<T>);
}

// Implement the handler for closures
impl<T, F> TagDiscoveredHandler<T> for F
where
    T: TagTransport,
    F: FnMut(MifareClassic<T>),
{
    fn on_tag_discovered(&mut self, tag: MifareClassic<T>) {
        self(tag)
    }
}

/// Sender for discovered tags
pub type DiscoveredTagSender<T> = Sender<MifareClassic<T>>;
/// Receiver for discovered tags
pub type DiscoveredTagReceiver<T> = Receiver<MifareClassic<T>>;

/// Create an unbounded channel for discovered tags
pub fn discovered_tag_channel<T: TagTransport>() -> (DiscoveredTagSender<T>, DiscoveredTagReceiver<T>)
{
    unbounded()
}
