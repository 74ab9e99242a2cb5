//! Scraper for the live mandi price table.
//!
//! One fetch pulls the whole table; parsing is split out so tests run
//! against inline HTML. The source lists every mandi in the country,
//! so rows are filtered down to catalog markets via alias resolution.

use crate::catalog::MarketCatalog;
use crate::constants::{
    scrape_column, LIVE_FETCH_TIMEOUT_SECS, LIVE_SOURCE_URL, SCRAPE_MIN_COLUMNS,
};
use crate::error::{AppError, Result};
use crate::models::LiveQuote;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

pub struct LiveSource {
    client: reqwest::Client,
    url: String,
}

impl LiveSource {
    pub fn new() -> Result<Self> {
        Self::with_url(LIVE_SOURCE_URL.to_string())
    }

    pub fn with_url(url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(LIVE_FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, url })
    }

    /// Fetch and parse the live price table in one call.
    ///
    /// Network failure, timeout, or a non-success status fails the
    /// whole call; the resolver owns the archive fallback.
    pub async fn fetch_quotes(&self, catalog: &MarketCatalog) -> Result<Vec<LiveQuote>> {
        debug!("fetching live quotes from {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::Network(format!(
                "live source returned {}",
                response.status()
            )));
        }
        let html = response.text().await?;
        let quotes = parse_quote_table(&html, catalog);
        debug!("scraped {} quotes for catalog markets", quotes.len());
        Ok(quotes)
    }
}

/// Parse the scraped HTML into deduplicated quotes.
///
/// Per row: require the minimum cell count, strip everything but
/// digits and the decimal point from the modal price cell, resolve
/// the market cell against catalog aliases. Rows failing any step are
/// dropped. Duplicate (market, commodity) pairs keep the last row in
/// document order.
pub fn parse_quote_table(html: &str, catalog: &MarketCatalog) -> Vec<LiveQuote> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse("table tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();

    let mut latest: HashMap<String, LiveQuote> = HashMap::new();
    for row in document.select(&row_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();
        if cells.len() < SCRAPE_MIN_COLUMNS {
            continue;
        }

        let commodity = cells[scrape_column::COMMODITY].clone();
        let market_text = cells[scrape_column::MARKET].to_lowercase();
        let cleaned: String = cells[scrape_column::MODAL_PRICE]
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        let Ok(price) = cleaned.parse::<f64>() else {
            continue;
        };
        if !price.is_finite() {
            continue;
        }
        let Some(market) = catalog.resolve_scraped(&market_text) else {
            continue;
        };

        let key = format!("{}|{}", market.as_str(), commodity);
        latest.insert(
            key,
            LiveQuote {
                market,
                crop: commodity,
                price,
            },
        );
    }
    latest.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MarketKey;

    fn row(commodity: &str, market: &str, modal: &str) -> String {
        format!(
            "<tr><td>{}</td><td>v</td><td>Karnataka</td><td>d</td><td>APMC</td>\
             <td>{}</td><td>min</td><td>max</td><td>{}</td></tr>",
            commodity, market, modal
        )
    }

    fn table(rows: &[String]) -> String {
        format!("<html><body><table>{}</table></body></html>", rows.join(""))
    }

    #[test]
    fn test_parse_extracts_catalog_markets_only() {
        let catalog = MarketCatalog::new();
        let html = table(&[
            row("Rice", "Davangere", "Rs 2,900 / Quintal"),
            row("Maize", "Mysore Central", "2100"),
        ]);
        let quotes = parse_quote_table(&html, &catalog);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].market, MarketKey::Davangere);
        assert_eq!(quotes[0].crop, "Rice");
        assert_eq!(quotes[0].price, 2900.0);
    }

    #[test]
    fn test_parse_strips_price_decorations() {
        let catalog = MarketCatalog::new();
        let html = table(&[row("Cotton", "Gangavati", "₹ 7,150.50/-")]);
        let quotes = parse_quote_table(&html, &catalog);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].market, MarketKey::Gangavathi);
        assert_eq!(quotes[0].price, 7150.50);
    }

    #[test]
    fn test_parse_discards_unparseable_price() {
        let catalog = MarketCatalog::new();
        let html = table(&[
            row("Rice", "Hospet", "N/A"),
            row("Ragi", "Hospet", ""),
            row("Maize", "Hospet", "2050"),
        ]);
        let quotes = parse_quote_table(&html, &catalog);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].crop, "Maize");
    }

    #[test]
    fn test_parse_discards_short_rows() {
        let catalog = MarketCatalog::new();
        let html = format!(
            "<table><tr><td>Rice</td><td>Davangere</td><td>2900</td></tr>{}</table>",
            row("Ragi", "Davangere", "1800")
        );
        let quotes = parse_quote_table(&html, &catalog);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].crop, "Ragi");
    }

    #[test]
    fn test_duplicate_pair_keeps_last_row() {
        let catalog = MarketCatalog::new();
        let html = table(&[
            row("Rice", "Davangere", "2900"),
            row("Rice", "Davangere", "3000"),
        ]);
        let quotes = parse_quote_table(&html, &catalog);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].price, 3000.0);
    }

    #[test]
    fn test_same_crop_in_two_markets_is_kept() {
        let catalog = MarketCatalog::new();
        let html = table(&[
            row("Rice", "Davangere", "2900"),
            row("Rice", "HB Halli", "2800"),
        ]);
        let mut quotes = parse_quote_table(&html, &catalog);
        quotes.sort_by(|a, b| a.market.as_str().cmp(b.market.as_str()));
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].market, MarketKey::HBhalli);
        assert_eq!(quotes[1].market, MarketKey::Davangere);
    }
}
