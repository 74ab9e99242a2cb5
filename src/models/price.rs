use crate::models::MarketKey;
use chrono::NaiveDate;
use serde::Serialize;

/// One dated price record from the archive or a scraped row
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    /// Record date (serialized as YYYY-MM-DD)
    pub date: NaiveDate,

    /// Modal price in Rs./Quintal, always finite
    pub price: f64,
}

/// Time series for one (market, crop), ascending by date
pub type PriceSeries = Vec<PricePoint>;

/// Latest quote for one (market, commodity) pair
///
/// `crop` carries the raw commodity text when scraped and the
/// canonical crop name when derived from the archive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveQuote {
    pub market: MarketKey,
    pub crop: String,
    pub price: f64,
}
