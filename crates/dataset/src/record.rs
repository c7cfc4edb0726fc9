use crate::error::DatasetError;
use chrono::{NaiveDate, NaiveDateTime};
use core_types::calendar::{derive_fields, month_from_name};
use core_types::Transaction;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io;

/// Header fields every transaction file must carry.
pub const REQUIRED_COLUMNS: [&str; 13] = [
    "transaction_id",
    "date",
    "product",
    "region",
    "channel",
    "quantity",
    "unit_price",
    "customer_id",
    "revenue",
    "year",
    "month",
    "quarter",
    "month_name",
];

/// A row exactly as it appears in the CSV file, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvRecord {
    pub transaction_id: String,
    pub date: String,
    pub product: String,
    pub region: String,
    pub channel: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub customer_id: String,
    pub revenue: Decimal,
    pub year: i32,
    pub month: u32,
    pub quarter: u32,
    pub month_name: String,
}

impl CsvRecord {
    /// Validates the raw row and converts it into a `Transaction`.
    pub fn into_transaction(self) -> Result<Transaction, String> {
        if self.transaction_id.trim().is_empty() {
            return Err("transaction_id is empty".to_string());
        }
        let date = parse_date(&self.date)?;
        if self.revenue < Decimal::ZERO {
            return Err(format!("revenue {} is negative", self.revenue));
        }
        if self.quantity == 0 {
            return Err("quantity must be positive".to_string());
        }
        if self.unit_price <= Decimal::ZERO {
            return Err(format!("unit_price {} must be positive", self.unit_price));
        }

        let month_name = month_from_name(&self.month_name)
            .ok_or_else(|| format!("'{}' is not a month name", self.month_name))?;
        let expected = derive_fields(date);
        let found = (self.year, self.month, self.quarter, month_name);
        if found != expected {
            return Err(format!(
                "calendar fields (year {}, month {}, quarter {}, {}) do not match date {}",
                self.year,
                self.month,
                self.quarter,
                self.month_name,
                date
            ));
        }

        Ok(Transaction {
            transaction_id: self.transaction_id,
            date,
            product: self.product,
            region: self.region,
            channel: self.channel,
            quantity: self.quantity,
            unit_price: self.unit_price,
            customer_id: self.customer_id,
            revenue: self.revenue,
            year: self.year,
            month: self.month,
            quarter: self.quarter,
            month_name,
        })
    }
}

impl From<&Transaction> for CsvRecord {
    fn from(t: &Transaction) -> Self {
        Self {
            transaction_id: t.transaction_id.clone(),
            date: t.date.format("%Y-%m-%d").to_string(),
            product: t.product.clone(),
            region: t.region.clone(),
            channel: t.channel.clone(),
            quantity: t.quantity,
            unit_price: t.unit_price,
            customer_id: t.customer_id.clone(),
            revenue: t.revenue,
            year: t.year,
            month: t.month,
            quarter: t.quarter,
            month_name: t.month_name.name().to_string(),
        }
    }
}

/// Accepts a plain date or a date with a midnight-style time component.
fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .map_err(|e| format!("unparseable date '{}': {}", raw, e))
}

/// Reads and validates every row from a CSV reader.
///
/// Fails on the first bad row, reporting its 1-based line number in the file.
pub fn read_transactions<R: io::Read>(
    mut reader: csv::Reader<R>,
) -> Result<Vec<Transaction>, DatasetError> {
    let headers = reader.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(DatasetError::MalformedRow {
            line: 1,
            reason: format!("missing required column '{}'", missing),
        });
    }

    let mut transactions = Vec::new();
    let mut raw = csv::StringRecord::new();
    while reader.read_record(&mut raw)? {
        let line = raw.position().map(|p| p.line()).unwrap_or_default();
        let record: CsvRecord = raw
            .deserialize(Some(&headers))
            .map_err(|e| DatasetError::MalformedRow {
                line,
                reason: e.to_string(),
            })?;
        let transaction = record
            .into_transaction()
            .map_err(|reason| DatasetError::MalformedRow { line, reason })?;
        transactions.push(transaction);
    }

    tracing::debug!(rows = transactions.len(), "Transactions read.");
    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Month;
    use rust_decimal_macros::dec;

    const HEADER: &str = "transaction_id,date,product,region,channel,quantity,unit_price,customer_id,revenue,year,month,quarter,month_name";

    fn read(body: &str) -> Result<Vec<Transaction>, DatasetError> {
        let data = format!("{}\n{}", HEADER, body);
        read_transactions(csv::Reader::from_reader(data.as_bytes()))
    }

    #[test]
    fn reads_valid_rows() {
        let rows = read(
            "TXN0001,2024-02-03,Laptop,North,Online,2,999.50,CUST1001,1999.00,2024,2,1,February\n\
             TXN0002,2024-05-20 00:00:00,Mouse,East,Retail,1,25,CUST1002,25,2024,5,2,May\n",
        )
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].revenue, dec!(1999.00));
        assert_eq!(rows[0].month_name, Month::February);
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2024, 5, 20).unwrap());
        assert_eq!(rows[1].quarter, 2);
    }

    #[test]
    fn unparseable_date_reports_line() {
        let err = read(
            "TXN0001,2024-02-03,Laptop,North,Online,2,999.50,CUST1001,1999.00,2024,2,1,February\n\
             TXN0002,not-a-date,Mouse,East,Retail,1,25,CUST1002,25,2024,5,2,May\n",
        )
        .unwrap_err();

        match err {
            DatasetError::MalformedRow { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("not-a-date"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_numeric_revenue_is_malformed() {
        let err = read("TXN0001,2024-02-03,Laptop,North,Online,2,999.50,CUST1001,lots,2024,2,1,February\n")
            .unwrap_err();
        assert!(matches!(err, DatasetError::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn negative_revenue_is_malformed() {
        let err = read("TXN0001,2024-02-03,Laptop,North,Online,2,999.50,CUST1001,-10.00,2024,2,1,February\n")
            .unwrap_err();
        assert!(matches!(err, DatasetError::MalformedRow { .. }));
    }

    #[test]
    fn non_positive_unit_price_is_malformed() {
        for price in ["0", "-12.50"] {
            let row = format!(
                "TXN0001,2024-02-03,Laptop,North,Online,2,{},CUST1001,0,2024,2,1,February\n",
                price
            );
            match read(&row).unwrap_err() {
                DatasetError::MalformedRow { line, reason } => {
                    assert_eq!(line, 2);
                    assert!(reason.contains("unit_price"));
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn calendar_fields_must_match_date() {
        let err = read("TXN0001,2024-02-03,Laptop,North,Online,2,999.50,CUST1001,1999.00,2024,3,1,March\n")
            .unwrap_err();
        match err {
            DatasetError::MalformedRow { reason, .. } => assert!(reason.contains("do not match")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_column_is_reported_against_header() {
        let data = "transaction_id,date\nTXN0001,2024-01-01\n";
        let err = read_transactions(csv::Reader::from_reader(data.as_bytes())).unwrap_err();
        match err {
            DatasetError::MalformedRow { line, reason } => {
                assert_eq!(line, 1);
                assert!(reason.contains("product"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
