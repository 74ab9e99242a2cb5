//! Static registry of markets, their crops, and market-name aliases.
//!
//! The live source and user input spell market names inconsistently
//! ("gangavati" vs "gangavathi"), so resolution runs against a
//! declared, ordered alias table instead of fuzzy matching. The
//! catalog is immutable: built once at startup and shared by
//! reference.

use crate::models::MarketKey;

struct MarketEntry {
    key: MarketKey,
    crops: &'static [&'static str],
    aliases: &'static [&'static str],
}

const ENTRIES: &[MarketEntry] = &[
    MarketEntry {
        key: MarketKey::Davangere,
        crops: &["Cotton", "Maize", "Ragi", "Rice", "Tomato"],
        aliases: &["davangere"],
    },
    MarketEntry {
        key: MarketKey::Gangavathi,
        crops: &["Cotton", "Maize", "Ragi", "Rice"],
        aliases: &["gangavathi", "gangavati"],
    },
    MarketEntry {
        key: MarketKey::HBhalli,
        crops: &["Cotton", "Maize", "Ragi", "Rice"],
        aliases: &["hb halli", "hbhalli", "h.b.halli", "hb halli market"],
    },
    MarketEntry {
        key: MarketKey::Hospet,
        crops: &["Maize", "Ragi", "Rice", "Tomato"],
        aliases: &["hospet"],
    },
];

/// Lowercase, trim, and drop a trailing "market" token.
/// The token must stand alone ("hospet market" yes, "supermarket" no).
fn normalize_market_text(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    match lowered.strip_suffix("market") {
        Some(rest) if rest.ends_with(char::is_whitespace) => rest.trim_end().to_string(),
        _ => lowered,
    }
}

/// Capitalize the first character, leaving the rest untouched
fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

pub struct MarketCatalog {
    entries: &'static [MarketEntry],
}

impl MarketCatalog {
    pub fn new() -> Self {
        Self { entries: ENTRIES }
    }

    /// Known markets in declared order
    pub fn markets(&self) -> impl Iterator<Item = MarketKey> + '_ {
        self.entries.iter().map(|e| e.key)
    }

    /// Fixed crop list for a market
    pub fn list_crops(&self, market: MarketKey) -> &'static [&'static str] {
        self.entries
            .iter()
            .find(|e| e.key == market)
            .map(|e| e.crops)
            .unwrap_or(&[])
    }

    /// Resolve free-text market input to a canonical key.
    ///
    /// Canonical keys match case-insensitively before the alias scan,
    /// so resolution is idempotent. Both sides are normalized (lowered,
    /// trimmed, trailing "market" token stripped) and compared exactly;
    /// the first match in declared order wins.
    pub fn resolve_alias(&self, raw: &str) -> Option<MarketKey> {
        let wanted = normalize_market_text(raw);
        if wanted.is_empty() {
            return None;
        }
        if let Some(market) = MarketKey::parse(&wanted) {
            return Some(market);
        }
        for entry in self.entries {
            let candidates = std::iter::once(entry.key.as_str()).chain(entry.aliases.iter().copied());
            for candidate in candidates {
                if normalize_market_text(candidate) == wanted {
                    return Some(entry.key);
                }
            }
        }
        None
    }

    /// Scraper-side resolution: first market with an alias that is a
    /// substring of the lowercased table cell ("Gangavati APMC" still
    /// resolves).
    pub fn resolve_scraped(&self, cell_text: &str) -> Option<MarketKey> {
        let haystack = cell_text.trim().to_lowercase();
        for entry in self.entries {
            if entry.aliases.iter().any(|a| haystack.contains(a)) {
                return Some(entry.key);
            }
        }
        None
    }

    /// Exact match against the canonical crop list
    pub fn is_valid_crop(&self, market: MarketKey, crop: &str) -> bool {
        self.list_crops(market).contains(&crop)
    }

    /// Normalize raw crop input to its canonical capitalized form.
    ///
    /// Tries the capitalized spelling first, then a case-insensitive
    /// scan of the crop list.
    pub fn normalize_crop(&self, market: MarketKey, raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let capitalized = capitalize(raw);
        if self.is_valid_crop(market, &capitalized) {
            return Some(capitalized);
        }
        self.list_crops(market)
            .iter()
            .find(|c| c.eq_ignore_ascii_case(raw))
            .map(|c| (*c).to_string())
    }
}

impl Default for MarketCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_crops() {
        let catalog = MarketCatalog::new();
        assert_eq!(
            catalog.list_crops(MarketKey::Gangavathi),
            &["Cotton", "Maize", "Ragi", "Rice"]
        );
        assert_eq!(
            catalog.list_crops(MarketKey::Davangere),
            &["Cotton", "Maize", "Ragi", "Rice", "Tomato"]
        );
    }

    #[test]
    fn test_resolve_alias_variant_spelling() {
        let catalog = MarketCatalog::new();
        assert_eq!(catalog.resolve_alias("gangavati"), Some(MarketKey::Gangavathi));
        assert_eq!(catalog.resolve_alias("h.b.halli"), Some(MarketKey::HBhalli));
        assert_eq!(catalog.resolve_alias("HB Halli"), Some(MarketKey::HBhalli));
    }

    #[test]
    fn test_resolve_alias_is_idempotent_on_canonical_keys() {
        let catalog = MarketCatalog::new();
        for &market in MarketKey::ALL {
            assert_eq!(catalog.resolve_alias(market.as_str()), Some(market));
            assert_eq!(
                catalog.resolve_alias(&market.as_str().to_uppercase()),
                Some(market)
            );
        }
    }

    #[test]
    fn test_resolve_alias_strips_trailing_market_token() {
        let catalog = MarketCatalog::new();
        assert_eq!(
            catalog.resolve_alias("Hospet Market"),
            Some(MarketKey::Hospet)
        );
        assert_eq!(
            catalog.resolve_alias("  gangavati market "),
            Some(MarketKey::Gangavathi)
        );
    }

    #[test]
    fn test_resolve_alias_unknown() {
        let catalog = MarketCatalog::new();
        assert_eq!(catalog.resolve_alias("mysore"), None);
        assert_eq!(catalog.resolve_alias(""), None);
        assert_eq!(catalog.resolve_alias("market"), None);
    }

    #[test]
    fn test_resolve_scraped_substring() {
        let catalog = MarketCatalog::new();
        assert_eq!(
            catalog.resolve_scraped("Gangavati APMC Yard"),
            Some(MarketKey::Gangavathi)
        );
        assert_eq!(
            catalog.resolve_scraped("davangere"),
            Some(MarketKey::Davangere)
        );
        assert_eq!(catalog.resolve_scraped("Bangalore City"), None);
    }

    #[test]
    fn test_normalize_crop() {
        let catalog = MarketCatalog::new();
        assert_eq!(
            catalog.normalize_crop(MarketKey::Davangere, "rice"),
            Some("Rice".to_string())
        );
        assert_eq!(
            catalog.normalize_crop(MarketKey::Davangere, "RICE"),
            Some("Rice".to_string())
        );
        // Tomato is not listed for gangavathi
        assert_eq!(catalog.normalize_crop(MarketKey::Gangavathi, "tomato"), None);
        assert_eq!(catalog.normalize_crop(MarketKey::Davangere, "wheat"), None);
    }

    #[test]
    fn test_is_valid_crop_is_case_sensitive() {
        let catalog = MarketCatalog::new();
        assert!(catalog.is_valid_crop(MarketKey::Hospet, "Ragi"));
        assert!(!catalog.is_valid_crop(MarketKey::Hospet, "ragi"));
        assert!(!catalog.is_valid_crop(MarketKey::Hospet, "Cotton"));
    }
}
