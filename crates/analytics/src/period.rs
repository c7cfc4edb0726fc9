use chrono::Month;
use core_types::calendar::month_from_name;
use core_types::Transaction;
use std::fmt;

/// A time filter parsed from a request's period string.
///
/// Parsing follows a fixed precedence: `"all"`, then `Q1`..`Q4`, then a full
/// English month name (case-sensitive), then an all-digit year. Anything else is
/// `Unrecognized`, which filters nothing; the engine decides whether that is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Period {
    All,
    Quarter(u32),
    Month(Month),
    Year(i64),
    Unrecognized(String),
}

impl Period {
    pub fn parse(raw: &str) -> Self {
        if raw == "all" {
            return Period::All;
        }
        if let Some(quarter) = parse_quarter(raw) {
            return Period::Quarter(quarter);
        }
        if let Some(month) = month_from_name(raw) {
            return Period::Month(month);
        }
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            // Digit strings too long for any year still select nothing.
            return Period::Year(raw.parse().unwrap_or(i64::MAX));
        }
        Period::Unrecognized(raw.to_string())
    }

    /// Whether the period narrows the data at all.
    pub fn is_filtering(&self) -> bool {
        !matches!(self, Period::All | Period::Unrecognized(_))
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            Period::All | Period::Unrecognized(_) => true,
            Period::Quarter(quarter) => transaction.quarter == *quarter,
            Period::Month(month) => transaction.month_name == *month,
            Period::Year(year) => i64::from(transaction.year) == *year,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::All => f.write_str("all"),
            Period::Quarter(quarter) => write!(f, "Q{}", quarter),
            Period::Month(month) => f.write_str(month.name()),
            Period::Year(year) => write!(f, "{}", year),
            Period::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

fn parse_quarter(raw: &str) -> Option<u32> {
    match raw {
        "Q1" => Some(1),
        "Q2" => Some(2),
        "Q3" => Some(3),
        "Q4" => Some(4),
        _ => None,
    }
}

/// Keeps the transactions that fall within `period`.
///
/// `All` and `Unrecognized` return the input unchanged.
pub fn filter(transactions: Vec<Transaction>, period: &Period) -> Vec<Transaction> {
    if !period.is_filtering() {
        return transactions;
    }
    transactions
        .into_iter()
        .filter(|t| period.matches(t))
        .collect()
}
