pub mod cache;
pub mod history;
pub mod resolver;
pub mod scraper;

pub use cache::TtlCache;
pub use history::HistoryStore;
pub use resolver::{PriceResolver, ResolvedQuery};
pub use scraper::{parse_quote_table, LiveSource};
