use chrono::{Month, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single sales transaction.
///
/// `revenue` is carried as recorded by the source (quantity × unit price,
/// rounded to cents) and is never recomputed. The calendar fields are
/// precomputed by the source and validated against `date` when loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub date: NaiveDate,
    pub product: String,
    pub region: String,
    pub channel: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub customer_id: String,
    pub revenue: Decimal,

    // Derived calendar fields
    pub year: i32,
    pub month: u32,
    pub quarter: u32,
    pub month_name: Month,
}
