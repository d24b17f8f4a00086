//! CSV ingestion for portfolio exports.

mod mapping;
mod normalizer;
mod parser;

use crate::workflows::portfolio::{
    ColumnMap, PortfolioEngine, PortfolioError, PortfolioTable,
};
use chrono::NaiveDateTime;
use std::io::Read;
use std::path::Path;
use tracing::debug;

pub use mapping::suggest_mapping;
pub use parser::CsvBatch;

#[derive(Debug)]
pub enum PortfolioImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for PortfolioImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortfolioImportError::Io(err) => write!(f, "failed to read portfolio export: {}", err),
            PortfolioImportError::Csv(err) => write!(f, "invalid portfolio CSV data: {}", err),
        }
    }
}

impl std::error::Error for PortfolioImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PortfolioImportError::Io(err) => Some(err),
            PortfolioImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for PortfolioImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for PortfolioImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct PortfolioCsvImporter;

impl PortfolioCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<CsvBatch, PortfolioImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<CsvBatch, PortfolioImportError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(CsvBatch::default());
        }

        let batch = parser::parse_batch(&data)?;
        debug!(
            columns = batch.headers.len(),
            rows = batch.rows.len(),
            "portfolio export parsed"
        );
        Ok(batch)
    }
}

impl CsvBatch {
    /// Checks the mapping against this file's header, then runs the engine.
    pub fn classify(
        &self,
        engine: &PortfolioEngine,
        columns: &ColumnMap,
        now: NaiveDateTime,
    ) -> Result<PortfolioTable, PortfolioError> {
        columns.validate()?;
        columns.validate_against_headers(&self.headers)?;
        engine.run(&self.rows, columns, now)
    }
}
