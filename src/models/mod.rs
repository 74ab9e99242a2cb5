mod market;
mod price;

pub use market::MarketKey;
pub use price::{LiveQuote, PricePoint, PriceSeries};
