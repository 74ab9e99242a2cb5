use crate::catalog::MarketCatalog;
use crate::services::HistoryStore;
use crate::utils::get_data_dir;
use std::path::PathBuf;

pub fn run(data_dir: Option<PathBuf>) {
    let data_dir = data_dir.unwrap_or_else(get_data_dir);

    println!("📊 Mandi Archive Status\n");
    println!("📁 Archive directory: {}", data_dir.display());

    let catalog = MarketCatalog::new();
    let store = HistoryStore::new(data_dir);

    for market in catalog.markets() {
        println!("\n═══ {} ═══", market);
        for crop in catalog.list_crops(market) {
            match store.read_history(market, crop) {
                Ok(rows) if rows.is_empty() => {
                    println!("  {:<10} no archive data", crop);
                }
                Ok(rows) => {
                    // read_history returns ascending, so last is newest
                    let last = &rows[rows.len() - 1];
                    println!(
                        "  {:<10} {} records, latest {} @ {:.2}",
                        crop,
                        rows.len(),
                        last.date,
                        last.price
                    );
                }
                Err(e) => {
                    eprintln!("  {:<10} ⚠️  read failed: {}", crop, e);
                }
            }
        }
    }
}
