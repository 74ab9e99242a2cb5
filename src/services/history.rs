//! Read-only access to the on-disk CSV price archive.
//!
//! Layout: one folder per market under the data root, one or more
//! files per crop inside it. File selection is a case-insensitive
//! substring match of the crop name against the filename, first match
//! in directory-listing order ("Rice" can match a "Basmati Rice"
//! file; kept as the archive's established behavior).

use crate::constants::{CSV_DATE_COLUMN, CSV_PRICE_COLUMN};
use crate::error::Result;
use crate::models::{MarketKey, PricePoint, PriceSeries};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct HistoryStore {
    data_dir: PathBuf,
}

impl HistoryStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn market_dir(&self, market: MarketKey) -> PathBuf {
        self.data_dir.join(market.as_str())
    }

    /// First file in the market folder whose name contains the crop,
    /// case-insensitively. Missing folder is `Ok(None)`, not an error.
    fn find_crop_file(&self, market: MarketKey, crop: &str) -> Result<Option<PathBuf>> {
        let folder = self.market_dir(market);
        if !folder.is_dir() {
            return Ok(None);
        }
        let needle = crop.to_lowercase();
        for entry in fs::read_dir(&folder)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_lowercase();
            if name.contains(&needle) {
                return Ok(Some(entry.path()));
            }
        }
        Ok(None)
    }

    /// Full archived series for one (market, crop), ascending by date.
    ///
    /// "No folder" and "no matching file" are empty series; only
    /// I/O-level failures surface as errors. Rows whose price or date
    /// fail to parse are skipped.
    pub fn read_history(&self, market: MarketKey, crop: &str) -> Result<PriceSeries> {
        let Some(path) = self.find_crop_file(market, crop)? else {
            debug!("no archive file for {}/{}", market, crop);
            return Ok(Vec::new());
        };
        let mut rows = read_price_rows(&path)?;
        rows.sort_by_key(|r| r.date);
        Ok(rows)
    }

    /// Price of the chronologically last archived record, if any
    pub fn read_latest_price(&self, market: MarketKey, crop: &str) -> Result<Option<f64>> {
        let Some(path) = self.find_crop_file(market, crop)? else {
            return Ok(None);
        };
        let mut rows = read_price_rows(&path)?;
        rows.sort_by_key(|r| r.date);
        Ok(rows.last().map(|r| r.price))
    }
}

/// Archive dates are YYYY-MM-DD, with DD/MM/YYYY in older files
fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .ok()
}

/// Parse every usable row of one archive file, unsorted.
///
/// Non-finite or unparseable prices and unparseable dates drop the
/// row, never the whole read. A file without the expected headers
/// yields an empty result.
fn read_price_rows(path: &Path) -> Result<Vec<PricePoint>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let date_idx = headers.iter().position(|h| h == CSV_DATE_COLUMN);
    let price_idx = headers.iter().position(|h| h == CSV_PRICE_COLUMN);
    let (Some(date_idx), Some(price_idx)) = (date_idx, price_idx) else {
        warn!("archive file {} is missing expected columns", path.display());
        return Ok(Vec::new());
    };

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                debug!("skipping malformed row in {}: {}", path.display(), e);
                continue;
            }
        };
        let date_raw = record.get(date_idx).unwrap_or("").trim();
        let price_raw = record.get(price_idx).unwrap_or("").trim();
        let Ok(price) = price_raw.parse::<f64>() else {
            continue;
        };
        if !price.is_finite() {
            continue;
        }
        let Some(date) = parse_record_date(date_raw) else {
            continue;
        };
        rows.push(PricePoint { date, price });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    fn store_with_market(market: MarketKey) -> (TempDir, HistoryStore) {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join(market.as_str())).unwrap();
        let store = HistoryStore::new(temp_dir.path().to_path_buf());
        (temp_dir, store)
    }

    #[test]
    fn test_read_history_sorts_ascending() {
        let (temp_dir, store) = store_with_market(MarketKey::Davangere);
        write_file(
            &temp_dir.path().join("davangere"),
            "Rice.csv",
            "Price Date,Modal Price (Rs./Quintal)\n\
             2024-01-03,2300\n\
             2024-01-01,2200\n",
        );

        let rows = store.read_history(MarketKey::Davangere, "Rice").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(rows[0].price, 2200.0);
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(rows[1].price, 2300.0);
    }

    #[test]
    fn test_read_history_skips_malformed_rows() {
        let (temp_dir, store) = store_with_market(MarketKey::Hospet);
        write_file(
            &temp_dir.path().join("hospet"),
            "Ragi_prices.csv",
            "Price Date,Modal Price (Rs./Quintal)\n\
             2024-02-01,1800\n\
             2024-02-02,not-a-number\n\
             2024-02-03,\n\
             bad-date,1900\n\
             2024-02-04,1850\n",
        );

        let rows = store.read_history(MarketKey::Hospet, "Ragi").unwrap();
        // 5 input rows, 3 malformed
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].price, 1800.0);
        assert_eq!(rows[1].price, 1850.0);
    }

    #[test]
    fn test_read_history_missing_market_folder_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = HistoryStore::new(temp_dir.path().to_path_buf());
        let rows = store.read_history(MarketKey::Gangavathi, "Rice").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_read_history_no_matching_file_is_empty() {
        let (temp_dir, store) = store_with_market(MarketKey::Davangere);
        write_file(
            &temp_dir.path().join("davangere"),
            "Cotton.csv",
            "Price Date,Modal Price (Rs./Quintal)\n2024-01-01,5600\n",
        );
        let rows = store.read_history(MarketKey::Davangere, "Tomato").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_file_selection_is_substring_match() {
        let (temp_dir, store) = store_with_market(MarketKey::Davangere);
        write_file(
            &temp_dir.path().join("davangere"),
            "Basmati Rice 2024.csv",
            "Price Date,Modal Price (Rs./Quintal)\n2024-01-01,4100\n",
        );
        let rows = store.read_history(MarketKey::Davangere, "rice").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].price, 4100.0);
    }

    #[test]
    fn test_read_latest_price_uses_chronological_order() {
        let (temp_dir, store) = store_with_market(MarketKey::Gangavathi);
        write_file(
            &temp_dir.path().join("gangavathi"),
            "Maize.csv",
            "Price Date,Modal Price (Rs./Quintal)\n\
             2024-03-10,2100\n\
             2024-03-01,2000\n",
        );
        let price = store
            .read_latest_price(MarketKey::Gangavathi, "Maize")
            .unwrap();
        assert_eq!(price, Some(2100.0));
    }

    #[test]
    fn test_read_latest_price_empty_file() {
        let (temp_dir, store) = store_with_market(MarketKey::HBhalli);
        write_file(
            &temp_dir.path().join("HBhalli"),
            "Cotton.csv",
            "Price Date,Modal Price (Rs./Quintal)\n",
        );
        let price = store
            .read_latest_price(MarketKey::HBhalli, "Cotton")
            .unwrap();
        assert_eq!(price, None);
    }

    #[test]
    fn test_legacy_date_format() {
        let (temp_dir, store) = store_with_market(MarketKey::Hospet);
        write_file(
            &temp_dir.path().join("hospet"),
            "Tomato.csv",
            "Price Date,Modal Price (Rs./Quintal)\n\
             15/01/2024,900\n\
             2024-01-20,950\n",
        );
        let rows = store.read_history(MarketKey::Hospet, "Tomato").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }
}
