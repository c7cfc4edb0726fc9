//! The aggregation strategies. Each is a pure function over an already
//! time-filtered slice of transactions.

use crate::error::AnalyticsError;
use crate::report::{GroupTotal, GrowthComparison, RankedEntry, Trend};
use chrono::Datelike;
use core_types::calendar::month_from_number;
use core_types::{Dimension, NumericColumn, Transaction};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Adds `value` into `total`, failing instead of overflowing the decimal range.
fn accumulate(total: &mut Decimal, value: Decimal, column: NumericColumn) -> Result<(), AnalyticsError> {
    *total = total
        .checked_add(value)
        .ok_or_else(|| AnalyticsError::ArithmeticOverflow(format!("sum of {}", column)))?;
    Ok(())
}

pub fn sum(transactions: &[Transaction], column: NumericColumn) -> Result<Decimal, AnalyticsError> {
    let mut total = Decimal::ZERO;
    for t in transactions {
        accumulate(&mut total, column.value(t), column)?;
    }
    Ok(total)
}

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(transactions: &[Transaction], column: NumericColumn) -> Result<Option<Decimal>, AnalyticsError> {
    if transactions.is_empty() {
        return Ok(None);
    }
    let total = sum(transactions, column)?;
    total
        .checked_div(Decimal::from(transactions.len()))
        .map(Some)
        .ok_or_else(|| AnalyticsError::ArithmeticOverflow(format!("mean of {}", column)))
}

pub fn count(transactions: &[Transaction]) -> usize {
    transactions.len()
}

pub fn unique_count(transactions: &[Transaction], column: Dimension) -> usize {
    transactions
        .iter()
        .map(|t| column.key(t))
        .collect::<HashSet<_>>()
        .len()
}

/// Totals per group, ordered by value descending and then by label ascending,
/// so equal totals always come out in the same order.
pub fn group_sum(
    transactions: &[Transaction],
    column: NumericColumn,
    group_by: Dimension,
) -> Result<Vec<GroupTotal>, AnalyticsError> {
    let mut totals: HashMap<String, Decimal> = HashMap::new();
    for t in transactions {
        accumulate(totals.entry(group_by.key(t).into_owned()).or_default(), column.value(t), column)?;
    }

    let mut groups: Vec<GroupTotal> = totals
        .into_iter()
        .map(|(label, value)| GroupTotal { label, value })
        .collect();
    groups.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.label.cmp(&b.label)));

    tracing::debug!(dimension = %group_by, groups = groups.len(), "Grouped totals.");
    Ok(groups)
}

/// The first `limit` entries of [`group_sum`], numbered from 1.
pub fn group_sum_ranked(
    transactions: &[Transaction],
    column: NumericColumn,
    group_by: Dimension,
    limit: usize,
) -> Result<Vec<RankedEntry>, AnalyticsError> {
    let ranked = group_sum(transactions, column, group_by)?
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, group)| RankedEntry {
            rank: i + 1,
            label: group.label,
            value: group.value,
        })
        .collect();
    Ok(ranked)
}

/// Totals per month name in calendar order. Months with no rows are left out.
///
/// Rows from different years that share a month name are summed together.
pub fn time_series(
    transactions: &[Transaction],
    column: NumericColumn,
) -> Result<Vec<GroupTotal>, AnalyticsError> {
    let mut by_month: BTreeMap<u32, Decimal> = BTreeMap::new();
    for t in transactions {
        accumulate(by_month.entry(t.month_name.number_from_month()).or_default(), column.value(t), column)?;
    }

    let points = by_month
        .into_iter()
        .filter_map(|(number, value)| {
            month_from_number(number).map(|month| GroupTotal {
                label: month.name().to_string(),
                value,
            })
        })
        .collect();
    Ok(points)
}

/// Growth between the two most recent (year, month) periods in the data.
pub fn percentage_change(
    transactions: &[Transaction],
    column: NumericColumn,
) -> Result<GrowthComparison, AnalyticsError> {
    let mut by_period: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
    for t in transactions {
        accumulate(by_period.entry((t.date.year(), t.date.month())).or_default(), column.value(t), column)?;
    }

    let mut recent = by_period.iter().rev();
    let (Some((latest_key, latest)), Some((previous_key, previous))) = (recent.next(), recent.next())
    else {
        return Err(AnalyticsError::InsufficientPeriods(by_period.len()));
    };

    let previous_period = period_label(*previous_key);
    if previous.is_zero() {
        return Err(AnalyticsError::DegenerateGrowthDenominator(previous_period));
    }

    // A previous month close to zero can push the ratio past the decimal range.
    let growth = latest
        .checked_sub(*previous)
        .and_then(|change| change.checked_div(*previous))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| AnalyticsError::ArithmeticOverflow("growth rate".to_string()))?;
    let trend = if growth > Decimal::ZERO {
        Trend::Positive
    } else if growth < Decimal::ZERO {
        Trend::Negative
    } else {
        Trend::Flat
    };

    tracing::debug!(%growth, latest = %latest, previous = %previous, "Computed growth.");
    Ok(GrowthComparison {
        latest_period: period_label(*latest_key),
        latest: *latest,
        previous_period,
        previous: *previous,
        growth_pct: growth.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        trend,
    })
}

fn period_label((year, month): (i32, u32)) -> String {
    format!("{:04}-{:02}", year, month)
}
