use dataset::DatasetError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Metric '{name}' not found.\n\nAvailable: {}", .available.join(", "))]
    UnknownMetric { name: String, available: Vec<String> },

    #[error("Metric '{0}' is defined more than once in the catalogue")]
    DuplicateMetric(String),

    #[error("{0}")]
    DataSourceUnavailable(String),

    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("No data for time period: {0}")]
    EmptyResultSet(String),

    #[error("Metric '{0}' requires a group_by parameter")]
    MissingGroupDimension(String),

    #[error("Unknown group_by dimension: {0}")]
    UnknownDimension(String),

    #[error("Need at least 2 months for growth rate, found {0}")]
    InsufficientPeriods(usize),

    #[error("Growth rate is undefined: previous month {0} sums to zero")]
    DegenerateGrowthDenominator(String),

    #[error("Unrecognized time period '{0}': expected 'all', Q1-Q4, a month name or a year")]
    UnrecognizedTimePeriod(String),

    #[error("Limit must be a positive integer, got {0}")]
    InvalidLimit(usize),

    #[error("Arithmetic overflow computing {0}: values exceed the supported decimal range")]
    ArithmeticOverflow(String),
}

/// The kind of a failure, without its message. Lets callers branch on, or
/// serialize, the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnknownMetric,
    DuplicateMetric,
    DataSourceUnavailable,
    MalformedRow,
    EmptyResultSet,
    MissingGroupDimension,
    UnknownDimension,
    InsufficientPeriods,
    DegenerateGrowthDenominator,
    UnrecognizedTimePeriod,
    InvalidLimit,
    ArithmeticOverflow,
}

impl AnalyticsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalyticsError::UnknownMetric { .. } => ErrorKind::UnknownMetric,
            AnalyticsError::DuplicateMetric(_) => ErrorKind::DuplicateMetric,
            AnalyticsError::DataSourceUnavailable(_) => ErrorKind::DataSourceUnavailable,
            AnalyticsError::MalformedRow { .. } => ErrorKind::MalformedRow,
            AnalyticsError::EmptyResultSet(_) => ErrorKind::EmptyResultSet,
            AnalyticsError::MissingGroupDimension(_) => ErrorKind::MissingGroupDimension,
            AnalyticsError::UnknownDimension(_) => ErrorKind::UnknownDimension,
            AnalyticsError::InsufficientPeriods(_) => ErrorKind::InsufficientPeriods,
            AnalyticsError::DegenerateGrowthDenominator(_) => {
                ErrorKind::DegenerateGrowthDenominator
            }
            AnalyticsError::UnrecognizedTimePeriod(_) => ErrorKind::UnrecognizedTimePeriod,
            AnalyticsError::InvalidLimit(_) => ErrorKind::InvalidLimit,
            AnalyticsError::ArithmeticOverflow(_) => ErrorKind::ArithmeticOverflow,
        }
    }
}

impl From<DatasetError> for AnalyticsError {
    fn from(err: DatasetError) -> Self {
        match err {
            DatasetError::MalformedRow { line, reason } => {
                AnalyticsError::MalformedRow { line, reason }
            }
            DatasetError::Csv(csv_err) => {
                // Structural CSV problems are tied to a row; anything else is I/O.
                let line = match csv_err.kind() {
                    csv::ErrorKind::UnequalLengths { pos, .. } => pos.as_ref().map(|p| p.line()),
                    csv::ErrorKind::Utf8 { pos, .. } => pos.as_ref().map(|p| p.line()),
                    _ => None,
                };
                match line {
                    Some(line) => AnalyticsError::MalformedRow {
                        line,
                        reason: csv_err.to_string(),
                    },
                    None => AnalyticsError::DataSourceUnavailable(csv_err.to_string()),
                }
            }
            other @ (DatasetError::Unavailable(_) | DatasetError::Io(_)) => {
                AnalyticsError::DataSourceUnavailable(other.to_string())
            }
        }
    }
}
