//! Fixed external contracts and tuning constants for the price pipeline.
//!
//! The CSV column names and the scraped table layout are external
//! contracts owned by the archive files and the live source; this
//! crate only reads them.

/// Header of the record date column in archive CSV files
pub const CSV_DATE_COLUMN: &str = "Price Date";

/// Header of the modal price column in archive CSV files
pub const CSV_PRICE_COLUMN: &str = "Modal Price (Rs./Quintal)";

/// Live mandi price table scraped for current quotes
pub const LIVE_SOURCE_URL: &str = "https://www.commodityonline.com/mandiprices";

/// Cache key covering the whole scraped table (one fetch serves all markets)
pub const LIVE_SOURCE_CACHE_KEY: &str = "commodityonline";

/// Minimum cells a scraped table row must have before field extraction
pub const SCRAPE_MIN_COLUMNS: usize = 9;

/// Column indices for the scraped price table (0-indexed)
pub mod scrape_column {
    pub const COMMODITY: usize = 0;
    pub const MARKET: usize = 5;
    pub const MODAL_PRICE: usize = 8;
}

/// Timeout for one live table fetch
pub const LIVE_FETCH_TIMEOUT_SECS: u64 = 15;

/// TTL for the live quote cache
pub const PRICE_CACHE_TTL_SECS: u64 = 300;

/// History window bounds, enforced at the HTTP boundary
pub const HISTORY_LIMIT_DEFAULT: usize = 30;
pub const HISTORY_LIMIT_MIN: usize = 1;
pub const HISTORY_LIMIT_MAX: usize = 365;

/// Points of archived history backfilled into a forecast request
pub const ANCHOR_HISTORY_WINDOW: usize = 60;
