use crate::error::DatasetError;
use crate::record::CsvRecord;
use chrono::{Datelike, NaiveDate};
use core_types::calendar::derive_fields;
use core_types::Transaction;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::fs;
use std::io;
use std::path::Path;

/// Products and their unit price range in whole currency units.
const PRODUCTS: [(&str, i64, i64); 5] = [
    ("Laptop", 800, 2000),
    ("Mouse", 15, 80),
    ("Keyboard", 30, 150),
    ("Monitor", 200, 800),
    ("Headphones", 50, 300),
];
const REGIONS: [&str; 4] = ["North", "South", "East", "West"];
const CHANNELS: [&str; 3] = ["Online", "Retail", "Partner"];

/// Parameters for a generated sample dataset.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub rows: usize,
    pub seed: u64,
    /// Every generated transaction falls within this calendar year.
    pub year: i32,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            rows: 1000,
            seed: 42,
            year: 2024,
        }
    }
}

/// Generates a reproducible set of sales transactions, sorted by date.
///
/// The same settings always yield the same rows.
pub fn generate(settings: &GeneratorSettings) -> Vec<Transaction> {
    let mut rng = StdRng::seed_from_u64(settings.seed);
    let days_in_year = NaiveDate::from_ymd_opt(settings.year, 12, 31)
        .map(|d| d.ordinal())
        .unwrap_or(365);

    let mut transactions: Vec<Transaction> = (1..=settings.rows)
        .filter_map(|i| {
            let ordinal = rng.gen_range(1..=days_in_year);
            let date = NaiveDate::from_yo_opt(settings.year, ordinal)?;
            let (product, low, high) = PRODUCTS[rng.gen_range(0..PRODUCTS.len())];
            let region = REGIONS[rng.gen_range(0..REGIONS.len())];
            let channel = CHANNELS[rng.gen_range(0..CHANNELS.len())];
            let quantity: u32 = rng.gen_range(1..10);
            let unit_price = Decimal::new(rng.gen_range(low * 100..=high * 100), 2);
            let customer: u32 = rng.gen_range(1000..5000);

            let (year, month, quarter, month_name) = derive_fields(date);
            Some(Transaction {
                transaction_id: format!("TXN{:04}", i),
                date,
                product: product.to_string(),
                region: region.to_string(),
                channel: channel.to_string(),
                quantity,
                unit_price,
                customer_id: format!("CUST{:04}", customer),
                revenue: (Decimal::from(quantity) * unit_price).round_dp(2),
                year,
                month,
                quarter,
                month_name,
            })
        })
        .collect();

    // Stable, so same-day rows keep their generation order.
    transactions.sort_by_key(|t| t.date);

    tracing::info!(
        rows = transactions.len(),
        seed = settings.seed,
        year = settings.year,
        "Generated sample transactions."
    );
    transactions
}

/// Writes transactions as CSV, header included.
pub fn write_csv<W: io::Write>(transactions: &[Transaction], writer: W) -> Result<(), DatasetError> {
    let mut writer = csv::Writer::from_writer(writer);
    for transaction in transactions {
        writer.serialize(CsvRecord::from(transaction))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes transactions to a CSV file, creating parent directories as needed.
pub fn write_csv_file(path: &Path, transactions: &[Transaction]) -> Result<(), DatasetError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write_csv(transactions, file)?;
    tracing::info!(path = %path.display(), rows = transactions.len(), "Wrote transactions.");
    Ok(())
}
