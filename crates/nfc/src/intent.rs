//! Dispatch intents for the write path
//!
//! A write resolves its target tag from an intent-like carrier instead
//! of ambient application state: the caller passes the currently active
//! intent and the previously saved one explicitly, and resolution picks
//! the current one first.

use tactus_mifare::{MifareClassic, TagTransport};

use crate::error::{Error, Result};

/// An intent delivered by the platform dispatch, possibly carrying a
/// discovered tag as its tag extra
#[derive(Debug)]
pub struct DispatchIntent<T: TagTransport> {
    tag_extra: Option<MifareClassic<T>>,
}

impl<T: TagTransport> DispatchIntent<T> {
    /// Intent carrying a discovered tag
    pub const fn with_tag(tag: MifareClassic<T>) -> Self {
        Self {
            tag_extra: Some(tag),
        }
    }

    /// Intent that carried no tag extra
    pub const fn without_tag() -> Self {
        Self { tag_extra: None }
    }

    /// Whether a tag extra is attached
    pub const fn has_tag(&self) -> bool {
        self.tag_extra.is_some()
    }

    /// Take the attached tag out of the intent
    pub fn into_tag(self) -> Option<MifareClassic<T>> {
        self.tag_extra
    }
}

/// The intents a write operation may draw its target tag from
#[derive(Debug)]
pub struct TagIntents<T: TagTransport> {
    current: Option<DispatchIntent<T>>,
    saved: Option<DispatchIntent<T>>,
}

impl<T: TagTransport> TagIntents<T> {
    /// No intents at all
    pub const fn none() -> Self {
        Self {
            current: None,
            saved: None,
        }
    }

    /// Attach the currently active intent
    #[must_use]
    pub fn with_current(mut self, intent: DispatchIntent<T>) -> Self {
        self.current = Some(intent);
        self
    }

    /// Attach a previously saved intent as the fallback
    #[must_use]
    pub fn with_saved(mut self, intent: DispatchIntent<T>) -> Self {
        self.saved = Some(intent);
        self
    }

    /// Resolve the tag to operate on
    ///
    /// The current intent wins over the saved one. The fallback applies
    /// only when no current intent exists at all, not when the current
    /// one merely lacks a tag extra.
    pub fn resolve(self) -> Result<MifareClassic<T>> {
        let intent = self.current.or(self.saved).ok_or(Error::NoIntent)?;
        intent.into_tag().ok_or(Error::NoTagFound)
    }
}

impl<T: TagTransport> Default for TagIntents<T> {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use tactus_mifare::{MockTag, TagUid};

    use super::*;

    fn tag(uid: u8) -> MifareClassic<MockTag> {
        MifareClassic::new(TagUid::new(vec![uid]), MockTag::new())
    }

    #[test]
    fn no_intents_resolve_to_no_intent() {
        let err = TagIntents::<MockTag>::none().resolve().unwrap_err();
        assert!(matches!(err, Error::NoIntent));
    }

    #[test]
    fn current_intent_wins_over_saved() {
        let intents = TagIntents::none()
            .with_current(DispatchIntent::with_tag(tag(0x01)))
            .with_saved(DispatchIntent::with_tag(tag(0x02)));

        let resolved = intents.resolve().unwrap();
        assert_eq!(resolved.uid().as_bytes(), &[0x01]);
    }

    #[test]
    fn saved_intent_is_the_fallback() {
        let intents = TagIntents::none().with_saved(DispatchIntent::with_tag(tag(0x02)));

        let resolved = intents.resolve().unwrap();
        assert_eq!(resolved.uid().as_bytes(), &[0x02]);
    }

    #[test]
    fn current_intent_without_tag_extra_does_not_fall_back() {
        let intents = TagIntents::none()
            .with_current(DispatchIntent::without_tag())
            .with_saved(DispatchIntent::with_tag(tag(0x02)));

        let err = intents.resolve().unwrap_err();
        assert!(matches!(err, Error::NoTagFound));
    }

    #[test]
    fn intent_reports_its_tag_extra() {
        assert!(DispatchIntent::with_tag(tag(0x03)).has_tag());
        assert!(!DispatchIntent::<MockTag>::without_tag().has_tag());
    }
}
