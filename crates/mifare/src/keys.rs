//! Well-known MIFARE Classic Key A candidates
//!
//! Sector authentication tries a fixed, ordered set of published keys.
//! Order matters: the likelier keys come first, the first one the tag
//! accepts wins and the remaining candidates are never tried.

use derive_more::Display;

/// Size in bytes of a MIFARE Classic sector key
pub const KEY_LENGTH: usize = 6;

/// MIFARE Application Directory key
pub const APPLICATION_DIRECTORY: [u8; KEY_LENGTH] = [0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5];

/// Factory default key shipped on blank tags
pub const FACTORY_DEFAULT: [u8; KEY_LENGTH] = [0xFF; KEY_LENGTH];

/// NFC Forum default key
pub const NFC_FORUM: [u8; KEY_LENGTH] = [0xD3, 0xF7, 0xD3, 0xF7, 0xD3, 0xF7];

/// Source of a Key A value tried during sector authentication
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCandidate {
    /// MIFARE Application Directory key
    #[display("application directory key")]
    ApplicationDirectory,
    /// Factory default key
    #[display("factory default key")]
    FactoryDefault,
    /// NFC Forum default key
    #[display("NFC Forum key")]
    NfcForum,
}

impl KeyCandidate {
    /// Candidates in the order they are tried
    pub const CANDIDATES: [Self; 3] = [
        Self::ApplicationDirectory,
        Self::FactoryDefault,
        Self::NfcForum,
    ];

    /// The 6-byte Key A value of this candidate
    pub const fn bytes(&self) -> &'static [u8; KEY_LENGTH] {
        match self {
            Self::ApplicationDirectory => &APPLICATION_DIRECTORY,
            Self::FactoryDefault => &FACTORY_DEFAULT,
            Self::NfcForum => &NFC_FORUM,
        }
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn candidate_order_is_fixed() {
        assert_eq!(
            KeyCandidate::CANDIDATES,
            [
                KeyCandidate::ApplicationDirectory,
                KeyCandidate::FactoryDefault,
                KeyCandidate::NfcForum,
            ]
        );
    }

    #[test]
    fn key_values_match_published_defaults() {
        assert_eq!(
            KeyCandidate::ApplicationDirectory.bytes(),
            &hex!("A0A1A2A3A4A5")
        );
        assert_eq!(KeyCandidate::FactoryDefault.bytes(), &hex!("FFFFFFFFFFFF"));
        assert_eq!(KeyCandidate::NfcForum.bytes(), &hex!("D3F7D3F7D3F7"));
    }
}
