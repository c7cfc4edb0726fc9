use crate::error::AnalyticsError;
use core_types::{Dimension, NumericColumn};
use serde::Serialize;
use std::collections::HashSet;

/// How a metric aggregates the filtered transactions.
///
/// Each variant carries only the parameters its strategy reads, so the engine's
/// dispatch is an exhaustive `match` with no runtime "unknown formula" branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Aggregation {
    Sum {
        column: NumericColumn,
    },
    Mean {
        column: NumericColumn,
    },
    /// Row count.
    Count,
    UniqueCount {
        column: Dimension,
    },
    /// Per-group totals, highest first, truncated to the request's limit.
    GroupSumRanked {
        column: NumericColumn,
        group_by: Option<Dimension>,
    },
    /// Per-group totals, highest first, all groups.
    GroupSum {
        column: NumericColumn,
        group_by: Option<Dimension>,
    },
    /// Totals per month name, in calendar order.
    TimeSeries {
        column: NumericColumn,
    },
    /// Change between the two most recent year-months.
    PercentageChange {
        column: NumericColumn,
    },
}

impl Aggregation {
    /// The formula name used in listings.
    pub fn name(&self) -> &'static str {
        match self {
            Aggregation::Sum { .. } => "sum",
            Aggregation::Mean { .. } => "mean",
            Aggregation::Count => "count",
            Aggregation::UniqueCount { .. } => "unique_count",
            Aggregation::GroupSumRanked { .. } => "group_sum_ranked",
            Aggregation::GroupSum { .. } => "group_sum",
            Aggregation::TimeSeries { .. } => "time_series",
            Aggregation::PercentageChange { .. } => "percentage_change",
        }
    }

    /// The column the aggregation reads.
    pub fn column_name(&self) -> &'static str {
        match self {
            Aggregation::Sum { column }
            | Aggregation::Mean { column }
            | Aggregation::GroupSumRanked { column, .. }
            | Aggregation::GroupSum { column, .. }
            | Aggregation::TimeSeries { column }
            | Aggregation::PercentageChange { column } => column.as_str(),
            Aggregation::Count => Dimension::TransactionId.as_str(),
            Aggregation::UniqueCount { column } => column.as_str(),
        }
    }

    /// The grouping dimension used when the request does not override it.
    pub fn default_group(&self) -> Option<Dimension> {
        match self {
            Aggregation::GroupSumRanked { group_by, .. } | Aggregation::GroupSum { group_by, .. } => {
                *group_by
            }
            Aggregation::TimeSeries { .. } => Some(Dimension::MonthName),
            _ => None,
        }
    }
}

/// A named metric and how to compute it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricDefinition {
    pub name: &'static str,
    pub aggregation: Aggregation,
    pub description: &'static str,
}

/// An immutable registry of metric definitions, in listing order.
#[derive(Debug, Clone)]
pub struct MetricCatalogue {
    definitions: Vec<MetricDefinition>,
}

impl MetricCatalogue {
    /// Builds a catalogue from custom definitions. Names must be unique.
    pub fn new(definitions: Vec<MetricDefinition>) -> Result<Self, AnalyticsError> {
        let mut seen = HashSet::new();
        for definition in &definitions {
            if !seen.insert(definition.name) {
                return Err(AnalyticsError::DuplicateMetric(definition.name.to_string()));
            }
        }
        Ok(Self { definitions })
    }

    /// The nine built-in sales metrics.
    pub fn builtin() -> Self {
        use Aggregation::*;
        let revenue = NumericColumn::Revenue;
        let definitions = vec![
            MetricDefinition {
                name: "total_revenue",
                aggregation: Sum { column: revenue },
                description: "Sum of all revenue",
            },
            MetricDefinition {
                name: "average_order_value",
                aggregation: Mean { column: revenue },
                description: "Average revenue per transaction",
            },
            MetricDefinition {
                name: "total_transactions",
                aggregation: Count,
                description: "Total number of transactions",
            },
            MetricDefinition {
                name: "customer_count",
                aggregation: UniqueCount {
                    column: Dimension::CustomerId,
                },
                description: "Number of unique customers",
            },
            MetricDefinition {
                name: "top_products",
                aggregation: GroupSumRanked {
                    column: revenue,
                    group_by: Some(Dimension::Product),
                },
                description: "Products ranked by revenue",
            },
            MetricDefinition {
                name: "top_regions",
                aggregation: GroupSumRanked {
                    column: revenue,
                    group_by: Some(Dimension::Region),
                },
                description: "Regions ranked by revenue",
            },
            MetricDefinition {
                name: "revenue_by_channel",
                aggregation: GroupSum {
                    column: revenue,
                    group_by: Some(Dimension::Channel),
                },
                description: "Revenue by sales channel",
            },
            MetricDefinition {
                name: "monthly_revenue",
                aggregation: TimeSeries { column: revenue },
                description: "Revenue by month",
            },
            MetricDefinition {
                name: "growth_rate",
                aggregation: PercentageChange { column: revenue },
                description: "Month-over-month growth rate",
            },
        ];
        Self { definitions }
    }

    /// Resolves a metric by name. Unknown names list every valid name.
    pub fn lookup(&self, name: &str) -> Result<&MetricDefinition, AnalyticsError> {
        self.definitions
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| AnalyticsError::UnknownMetric {
                name: name.to_string(),
                available: self.names().map(str::to_string).collect(),
            })
    }

    pub fn definitions(&self) -> &[MetricDefinition] {
        &self.definitions
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.definitions.iter().map(|d| d.name)
    }
}

impl Default for MetricCatalogue {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_nine_metrics_in_order() {
        let catalogue = MetricCatalogue::builtin();
        let names: Vec<_> = catalogue.names().collect();
        assert_eq!(
            names,
            vec![
                "total_revenue",
                "average_order_value",
                "total_transactions",
                "customer_count",
                "top_products",
                "top_regions",
                "revenue_by_channel",
                "monthly_revenue",
                "growth_rate",
            ]
        );
    }

    #[test]
    fn lookup_resolves_columns_and_groups() {
        let catalogue = MetricCatalogue::builtin();

        let top = catalogue.lookup("top_regions").unwrap();
        assert_eq!(top.aggregation.name(), "group_sum_ranked");
        assert_eq!(top.aggregation.column_name(), "revenue");
        assert_eq!(top.aggregation.default_group(), Some(Dimension::Region));

        let count = catalogue.lookup("total_transactions").unwrap();
        assert_eq!(count.aggregation.column_name(), "transaction_id");
        assert_eq!(count.aggregation.default_group(), None);

        let monthly = catalogue.lookup("monthly_revenue").unwrap();
        assert_eq!(monthly.aggregation.default_group(), Some(Dimension::MonthName));
    }

    #[test]
    fn unknown_metric_lists_all_names() {
        let catalogue = MetricCatalogue::builtin();
        let err = catalogue.lookup("profit_margin").unwrap_err();

        match &err {
            AnalyticsError::UnknownMetric { name, available } => {
                assert_eq!(name, "profit_margin");
                assert_eq!(available.len(), 9);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let message = err.to_string();
        assert!(message.contains("profit_margin"));
        assert!(message.contains("total_revenue, average_order_value"));
        assert!(message.ends_with("growth_rate"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let definition = MetricDefinition {
            name: "orders",
            aggregation: Aggregation::Count,
            description: "Orders",
        };
        let err = MetricCatalogue::new(vec![definition.clone(), definition]).unwrap_err();
        assert_eq!(err, AnalyticsError::DuplicateMetric("orders".to_string()));
    }
}
