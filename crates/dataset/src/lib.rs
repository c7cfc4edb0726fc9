//! # Sales Dataset Crate
//!
//! This crate is the boundary between the metrics engine and the files that hold
//! transaction data.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Adapter:** All file-format knowledge lives here. The rest of the
//!   application only sees validated `Transaction` values through the `DataSource` trait.
//! - **Validate Once:** Every row is checked when it is loaded (parseable date,
//!   non-negative revenue, calendar fields consistent with the date), so the
//!   aggregations can trust the data they receive.
//! - **No Caching:** A source is re-read on every `load` call.
//!
//! ## Public API
//!
//! - `DataSource`: The trait every data source implements.
//! - `CsvSource` / `InMemorySource`: The two concrete sources.
//! - `generate` / `write_csv_file`: The seeded sample data generator.
//! - `DatasetError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod generator;
pub mod record;
pub mod source;

// Re-export the key components to create a clean, public-facing API.
pub use error::DatasetError;
pub use generator::{generate, write_csv, write_csv_file, GeneratorSettings};
pub use record::{read_transactions, CsvRecord, REQUIRED_COLUMNS};
pub use source::{CsvSource, DataSource, InMemorySource};
