use crate::error::DatasetError;
use crate::record::read_transactions;
use core_types::Transaction;
use std::path::{Path, PathBuf};

/// A place transactions can be loaded from.
///
/// Implementations must return a fresh copy of the data on every call; the metrics
/// engine relies on this to stay stateless. The `Send + Sync` bounds let one source
/// be shared by calculations running on several threads.
pub trait DataSource: Send + Sync {
    /// Loads and validates every transaction.
    fn load(&self) -> Result<Vec<Transaction>, DatasetError>;

    /// A short human-readable name for logs and error messages.
    fn describe(&self) -> String;
}

/// A CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataSource for CsvSource {
    fn load(&self) -> Result<Vec<Transaction>, DatasetError> {
        if !self.path.is_file() {
            return Err(DatasetError::Unavailable(self.path.clone()));
        }
        let reader = csv::Reader::from_path(&self.path)?;
        let transactions = read_transactions(reader)?;
        tracing::debug!(path = %self.path.display(), rows = transactions.len(), "Loaded CSV data source.");
        Ok(transactions)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Transactions already held in memory, e.g. produced by another component.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    transactions: Vec<Transaction>,
}

impl InMemorySource {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }
}

impl DataSource for InMemorySource {
    fn load(&self) -> Result<Vec<Transaction>, DatasetError> {
        Ok(self.transactions.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory ({} rows)", self.transactions.len())
    }
}
