//! Market data sources and ticker universes

pub mod ingest;
pub mod provider;
pub mod synthetic;
pub mod universe;
pub mod yahoo;

pub use ingest::FileProvider;
pub use provider::{DataError, DataProvider, DataSource, FetchResult};
pub use synthetic::SyntheticProvider;
pub use universe::{Universe, UniverseError, DEFAULT_LIST};
pub use yahoo::YahooProvider;
