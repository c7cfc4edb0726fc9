use rust_decimal::Decimal;
use serde::Serialize;

/// The structured outcome of one metric calculation.
///
/// This struct is the final output of the `MetricsEngine` and serves as the data
/// transfer object for downstream consumers (text rendering, JSON, tables).
/// Its `Display` impl renders the human-readable text form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationResult {
    pub metric: String,
    /// The period string the calculation was filtered by.
    pub period: String,
    pub value: MetricValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MetricValue {
    /// A money amount.
    Currency { amount: Decimal },
    /// A count, with the unit it counts (e.g. "transactions").
    Count { count: usize, unit: String },
    /// The top groups, highest first. `limit` is the requested size, which may
    /// exceed the number of groups present.
    Ranking {
        limit: usize,
        entries: Vec<RankedEntry>,
    },
    /// Every group, highest first.
    Breakdown { entries: Vec<GroupTotal> },
    /// Monthly totals in calendar order.
    TimeSeries { points: Vec<GroupTotal> },
    Growth(GrowthComparison),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub label: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    /// 1-based.
    pub rank: usize,
    pub label: String,
    pub value: Decimal,
}

/// Latest vs previous calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthComparison {
    /// Year-month label, e.g. "2024-02".
    pub latest_period: String,
    pub latest: Decimal,
    pub previous_period: String,
    pub previous: Decimal,
    /// Signed percentage change, rounded to two decimal places.
    pub growth_pct: Decimal,
    pub trend: Trend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Positive,
    Negative,
    Flat,
}
