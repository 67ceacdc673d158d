//! Local file provider — reads per-ticker CSV or Parquet price files.
//!
//! Layout: `<dir>/<TICKER>.csv` or `<dir>/<TICKER>.parquet`, with at least
//! the columns `date` (YYYY-MM-DD) and `close`; `volume` is optional. Extra
//! columns are ignored. CSV wins when both files exist.

use chrono::NaiveDate;
use polars::prelude::*;
use std::path::{Path, PathBuf};

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::{Observation, PriceSeries, Ticker};

/// Provider backed by a directory of price files.
#[derive(Debug, Clone)]
pub struct FileProvider {
    dir: PathBuf,
}

impl FileProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn locate(&self, ticker: &Ticker) -> Option<(PathBuf, DataSource)> {
        let csv = self.dir.join(format!("{ticker}.csv"));
        if csv.is_file() {
            return Some((csv, DataSource::CsvFile));
        }
        let parquet = self.dir.join(format!("{ticker}.parquet"));
        if parquet.is_file() {
            return Some((parquet, DataSource::ParquetFile));
        }
        None
    }
}

/// Read a CSV price file into a DataFrame.
pub fn read_csv(path: &Path) -> Result<DataFrame, DataError> {
    CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| DataError::FileError(format!("{}: {e}", path.display())))
}

/// Read a Parquet price file into a DataFrame.
pub fn read_parquet(path: &Path) -> Result<DataFrame, DataError> {
    let file = std::fs::File::open(path)
        .map_err(|e| DataError::FileError(format!("{}: {e}", path.display())))?;
    ParquetReader::new(file)
        .finish()
        .map_err(|e| DataError::FileError(format!("{}: {e}", path.display())))
}

/// Convert a `date, close[, volume]` frame into observations.
///
/// Rows with a missing or unparseable date, or a close that is not a positive
/// price, are dropped. A missing volume cell or column counts as zero.
pub fn frame_to_observations(df: &DataFrame) -> Result<Vec<Observation>, DataError> {
    let column = |name: &str, dtype: DataType| -> Result<Series, DataError> {
        df.column(name)
            .map_err(|_| DataError::FileError(format!("missing column '{name}'")))?
            .as_materialized_series()
            .cast(&dtype)
            .map_err(|e| DataError::FileError(format!("column '{name}': {e}")))
    };

    let dates = column("date", DataType::String)?;
    let closes = column("close", DataType::Float64)?;
    let volumes = match df.column("volume") {
        Ok(_) => Some(column("volume", DataType::UInt64)?),
        Err(_) => None,
    };

    let dates = dates
        .str()
        .map_err(|e| DataError::FileError(e.to_string()))?;
    let closes = closes
        .f64()
        .map_err(|e| DataError::FileError(e.to_string()))?;
    let volumes = volumes
        .as_ref()
        .map(|s| s.u64())
        .transpose()
        .map_err(|e| DataError::FileError(e.to_string()))?;

    let mut out = Vec::with_capacity(df.height());
    for (i, (date, close)) in dates.into_iter().zip(closes).enumerate() {
        let (Some(date), Some(close)) = (date, close) else {
            continue;
        };
        let Ok(date) = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") else {
            continue;
        };
        let volume = volumes.and_then(|v| v.get(i)).unwrap_or(0);
        let obs = Observation::new(date, close, volume);
        if obs.is_sane() {
            out.push(obs);
        }
    }
    Ok(out)
}

impl DataProvider for FileProvider {
    fn name(&self) -> &str {
        "file"
    }

    fn fetch(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let (path, source) = self.locate(ticker).ok_or_else(|| DataError::NoDataFile {
            symbol: ticker.to_string(),
            dir: self.dir.display().to_string(),
        })?;

        let df = match source {
            DataSource::ParquetFile => read_parquet(&path)?,
            _ => read_csv(&path)?,
        };

        let observations = frame_to_observations(&df)?
            .into_iter()
            .filter(|o| o.date >= start && o.date <= end)
            .collect();

        Ok(FetchResult {
            series: PriceSeries::from_unsorted(ticker.clone(), observations),
            source,
        })
    }
}
