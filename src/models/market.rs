use serde::{Serialize, Serializer};
use std::fmt;

/// Canonical identifier for a trading market (mandi)
///
/// The string form doubles as the archive folder name and the wire
/// spelling, so `HBhalli` keeps its historical mixed case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketKey {
    Davangere,
    Gangavathi,
    HBhalli,
    Hospet,
}

impl MarketKey {
    pub const ALL: &'static [MarketKey] = &[
        MarketKey::Davangere,
        MarketKey::Gangavathi,
        MarketKey::HBhalli,
        MarketKey::Hospet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketKey::Davangere => "davangere",
            MarketKey::Gangavathi => "gangavathi",
            MarketKey::HBhalli => "HBhalli",
            MarketKey::Hospet => "hospet",
        }
    }

    /// Parse a canonical key, case-insensitively
    pub fn parse(raw: &str) -> Option<MarketKey> {
        let raw = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for MarketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MarketKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
