// Shared data structures and helpers used by the proxy server and its consumers

pub mod logging;
pub mod suggest;
pub mod types;

pub use logging::{init_logging, parse_level_filter};
pub use suggest::{close_matches, similarity_ratio};
pub use types::{CoinDetail, CoinSummary, PricePoint};
