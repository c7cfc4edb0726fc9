use crate::error::CoreError;
use crate::structs::Transaction;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// A categorical field of a `Transaction` that rows can be partitioned by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    TransactionId,
    Product,
    Region,
    Channel,
    CustomerId,
    Year,
    Month,
    Quarter,
    MonthName,
}

impl Dimension {
    pub const ALL: [Dimension; 9] = [
        Dimension::TransactionId,
        Dimension::Product,
        Dimension::Region,
        Dimension::Channel,
        Dimension::CustomerId,
        Dimension::Year,
        Dimension::Month,
        Dimension::Quarter,
        Dimension::MonthName,
    ];

    /// The column name as it appears in the data source header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::TransactionId => "transaction_id",
            Dimension::Product => "product",
            Dimension::Region => "region",
            Dimension::Channel => "channel",
            Dimension::CustomerId => "customer_id",
            Dimension::Year => "year",
            Dimension::Month => "month",
            Dimension::Quarter => "quarter",
            Dimension::MonthName => "month_name",
        }
    }

    /// Extracts this dimension's key from a transaction.
    pub fn key<'a>(&self, transaction: &'a Transaction) -> Cow<'a, str> {
        match self {
            Dimension::TransactionId => Cow::Borrowed(transaction.transaction_id.as_str()),
            Dimension::Product => Cow::Borrowed(transaction.product.as_str()),
            Dimension::Region => Cow::Borrowed(transaction.region.as_str()),
            Dimension::Channel => Cow::Borrowed(transaction.channel.as_str()),
            Dimension::CustomerId => Cow::Borrowed(transaction.customer_id.as_str()),
            Dimension::Year => Cow::Owned(transaction.year.to_string()),
            Dimension::Month => Cow::Owned(transaction.month.to_string()),
            Dimension::Quarter => Cow::Owned(transaction.quarter.to_string()),
            Dimension::MonthName => Cow::Borrowed(transaction.month_name.name()),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Dimension::ALL.iter().map(|d| d.as_str()).collect();
                CoreError::InvalidInput(
                    "dimension".to_string(),
                    format!("'{}' (expected one of: {})", s, valid.join(", ")),
                )
            })
    }
}

/// A numeric field of a `Transaction` that can be summed or averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericColumn {
    Revenue,
    Quantity,
    UnitPrice,
}

impl NumericColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            NumericColumn::Revenue => "revenue",
            NumericColumn::Quantity => "quantity",
            NumericColumn::UnitPrice => "unit_price",
        }
    }

    pub fn value(&self, transaction: &Transaction) -> Decimal {
        match self {
            NumericColumn::Revenue => transaction.revenue,
            NumericColumn::Quantity => Decimal::from(transaction.quantity),
            NumericColumn::UnitPrice => transaction.unit_price,
        }
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
