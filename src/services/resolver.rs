//! Price resolution: one canonical answer per (market, crop) query.
//!
//! Live quotes come through the TTL cache; when the live path errors
//! or returns nothing, the archive's latest prices stand in. History
//! is archive-only: the live table is a point-in-time snapshot, not a
//! time series.

use crate::catalog::MarketCatalog;
use crate::constants::{LIVE_SOURCE_CACHE_KEY, PRICE_CACHE_TTL_SECS};
use crate::error::{AppError, Result};
use crate::models::{LiveQuote, MarketKey, PricePoint, PriceSeries};
use crate::services::cache::TtlCache;
use crate::services::history::HistoryStore;
use crate::services::scraper::LiveSource;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Normalized answer for one (market, crop) query
#[derive(Debug, Serialize)]
pub struct ResolvedQuery {
    pub market: MarketKey,
    pub crop: String,
    pub latest: Option<PricePoint>,
    pub history: PriceSeries,
}

/// Stateless orchestration over catalog, archive, scraper, and cache.
/// All mutable state lives in the cache; the archive is read-only.
pub struct PriceResolver {
    catalog: MarketCatalog,
    store: HistoryStore,
    live: LiveSource,
    cache: TtlCache<Vec<LiveQuote>>,
}

impl PriceResolver {
    pub fn new(catalog: MarketCatalog, store: HistoryStore, live: LiveSource) -> Self {
        Self {
            catalog,
            store,
            live,
            cache: TtlCache::new(Duration::from_secs(PRICE_CACHE_TTL_SECS)),
        }
    }

    pub fn catalog(&self) -> &MarketCatalog {
        &self.catalog
    }

    /// Current prices for all catalog markets.
    ///
    /// A non-empty live result short-circuits; otherwise the latest
    /// archived price of every catalog (market, crop) pair is
    /// returned. Never fails: live-source trouble is logged and
    /// absorbed here.
    pub async fn live_prices(&self) -> Vec<LiveQuote> {
        let live = self
            .cache
            .get_or_fetch(LIVE_SOURCE_CACHE_KEY, || {
                self.live.fetch_quotes(&self.catalog)
            })
            .await;
        match live {
            Ok(quotes) if !quotes.is_empty() => quotes,
            Ok(_) => {
                debug!("live source returned no catalog rows, using archive");
                self.archive_latest()
            }
            Err(e) => {
                warn!("live fetch failed, using archive: {}", e);
                self.archive_latest()
            }
        }
    }

    /// Latest archived price for every catalog (market, crop) pair.
    /// Pairs without data are skipped; read errors skip the pair too,
    /// so one unreadable file cannot empty the whole fallback.
    fn archive_latest(&self) -> Vec<LiveQuote> {
        let mut results = Vec::new();
        for market in self.catalog.markets() {
            for crop in self.catalog.list_crops(market) {
                match self.store.read_latest_price(market, crop) {
                    Ok(Some(price)) => results.push(LiveQuote {
                        market,
                        crop: (*crop).to_string(),
                        price,
                    }),
                    Ok(None) => {}
                    Err(e) => warn!("archive read failed for {}/{}: {}", market, crop, e),
                }
            }
        }
        results
    }

    /// Reference price for a forecast request that arrived without
    /// one. Matches the first live-or-fallback quote whose commodity
    /// text contains `crop`, case-insensitively ("Ric" matches a
    /// "Rice" quote). Absent is a normal outcome, not an error.
    pub async fn anchor_price(&self, market: MarketKey, crop: &str) -> Option<f64> {
        let needle = crop.to_lowercase();
        self.live_prices()
            .await
            .into_iter()
            .find(|q| q.market == market && q.crop.to_lowercase().contains(&needle))
            .map(|q| q.price)
            .filter(|p| p.is_finite())
    }

    /// Most recent `limit` points of the archived series, ascending
    pub fn history(&self, market: MarketKey, crop: &str, limit: usize) -> Result<PriceSeries> {
        let rows = self.store.read_history(market, crop)?;
        Ok(tail(rows, limit))
    }

    /// Alias-tolerant, case-tolerant query resolution.
    ///
    /// Fails with `InvalidInput` when the market or crop cannot be
    /// normalized; archival I/O failures propagate as-is.
    pub fn resolve_query(
        &self,
        raw_market: &str,
        raw_crop: &str,
        limit: usize,
    ) -> Result<ResolvedQuery> {
        let market = self
            .catalog
            .resolve_alias(raw_market)
            .ok_or_else(|| AppError::InvalidInput(format!("Invalid market: {}", raw_market)))?;
        let crop = self
            .catalog
            .normalize_crop(market, raw_crop)
            .ok_or_else(|| AppError::InvalidInput(format!("Invalid crop: {}", raw_crop)))?;

        let rows = self.store.read_history(market, &crop)?;
        let history = tail(rows, limit);
        let latest = history.last().copied();
        Ok(ResolvedQuery {
            market,
            crop,
            latest,
            history,
        })
    }
}

/// Most recent `limit` points of an ascending series
fn tail(mut series: PriceSeries, limit: usize) -> PriceSeries {
    let skip = series.len().saturating_sub(limit);
    series.split_off(skip)
}
