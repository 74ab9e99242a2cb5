use crate::catalog::MarketCatalog;
use crate::server;
use crate::services::{HistoryStore, LiveSource, PriceResolver};
use crate::utils::get_data_dir;
use std::path::PathBuf;
use std::sync::Arc;

pub async fn run(port: u16, data_dir: Option<PathBuf>) {
    let data_dir = data_dir.unwrap_or_else(get_data_dir);

    println!("🚀 Starting mandiprice server on port {}", port);
    println!("📁 Archive directory: {}", data_dir.display());

    let catalog = MarketCatalog::new();
    let store = HistoryStore::new(data_dir);
    let live = match LiveSource::new() {
        Ok(live) => live,
        Err(e) => {
            eprintln!("❌ Failed to build live source client: {}", e);
            std::process::exit(1);
        }
    };

    let resolver = Arc::new(PriceResolver::new(catalog, store, live));

    if let Err(e) = server::serve(resolver, port).await {
        eprintln!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}
