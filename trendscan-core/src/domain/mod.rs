//! Domain types for TrendScan

pub mod record;
pub mod series;
pub mod ticker;

pub use record::{TrendRecord, WindowTrend};
pub use series::{Observation, PriceSeries, SeriesError};
pub use ticker::{parse_ticker_list, Ticker, TickerError};
