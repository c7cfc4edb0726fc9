use crate::aggregation;
use crate::catalogue::{Aggregation, MetricCatalogue, MetricDefinition};
use crate::error::AnalyticsError;
use crate::period::{self, Period};
use crate::report::{CalculationResult, MetricValue};
use core_types::{Dimension, Transaction};
use dataset::DataSource;

/// Ranking size used when a request does not set one.
pub const DEFAULT_LIMIT: usize = 5;

/// One metric calculation to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculationRequest {
    pub metric: String,
    /// `"all"`, `Q1`..`Q4`, a month name, or a year.
    pub period: String,
    /// Overrides the metric's default grouping dimension.
    pub group_by: Option<String>,
    pub limit: usize,
}

impl CalculationRequest {
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            period: "all".to_string(),
            group_by: None,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = period.into();
        self
    }

    pub fn with_group_by(mut self, group_by: impl Into<String>) -> Self {
        self.group_by = Some(group_by.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// A stateless calculator mapping metric requests onto aggregation strategies.
///
/// The catalogue is built once when the engine is constructed and never changes,
/// so one engine can serve concurrent calculations by shared reference.
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    catalogue: MetricCatalogue,
    strict_periods: bool,
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsEngine {
    /// An engine over the built-in catalogue.
    pub fn new() -> Self {
        Self::with_catalogue(MetricCatalogue::builtin())
    }

    pub fn with_catalogue(catalogue: MetricCatalogue) -> Self {
        Self {
            catalogue,
            strict_periods: false,
        }
    }

    /// When enabled, an unrecognized period is an error instead of a no-op filter.
    pub fn strict_periods(mut self, strict: bool) -> Self {
        self.strict_periods = strict;
        self
    }

    pub fn catalogue(&self) -> &MetricCatalogue {
        &self.catalogue
    }

    pub fn list_metrics(&self) -> &[MetricDefinition] {
        self.catalogue.definitions()
    }

    /// The catalogue as a human-readable list.
    pub fn describe_metrics(&self) -> String {
        let mut output = String::from("Available Metrics:\n\n");
        for definition in self.list_metrics() {
            output.push_str(&format!("- {}: {}\n", definition.name, definition.description));
        }
        output
    }

    /// The main entry point: loads the source, filters it, and computes the metric.
    #[tracing::instrument(
        name = "calculate_metric",
        skip(self, request, source),
        fields(metric = %request.metric, period = %request.period)
    )]
    pub fn calculate(
        &self,
        request: &CalculationRequest,
        source: &dyn DataSource,
    ) -> Result<CalculationResult, AnalyticsError> {
        // Reject bad requests before touching the data.
        let (definition, period, group_override) = self.prepare(request)?;

        let transactions = source.load()?;
        tracing::info!(source = %source.describe(), rows = transactions.len(), "Loaded transactions.");

        self.aggregate(definition, request, &period, group_override, transactions)
    }

    /// Computes a metric over transactions the caller already holds.
    pub fn calculate_transactions(
        &self,
        request: &CalculationRequest,
        transactions: Vec<Transaction>,
    ) -> Result<CalculationResult, AnalyticsError> {
        let (definition, period, group_override) = self.prepare(request)?;
        self.aggregate(definition, request, &period, group_override, transactions)
    }

    /// Same as [`calculate`](Self::calculate), rendered as text with a leading
    /// success or failure marker.
    pub fn calculate_formatted(&self, request: &CalculationRequest, source: &dyn DataSource) -> String {
        match self.calculate(request, source) {
            Ok(result) => format!("✅ {}", result),
            Err(e) => {
                tracing::warn!(metric = %request.metric, kind = ?e.kind(), "Calculation failed.");
                format!("❌ {}", e)
            }
        }
    }

    /// Resolves everything about a request that does not depend on the data.
    fn prepare(
        &self,
        request: &CalculationRequest,
    ) -> Result<(&MetricDefinition, Period, Option<Dimension>), AnalyticsError> {
        let definition = self.catalogue.lookup(&request.metric)?;
        let period = self.resolve_period(&request.period)?;
        let group_override = resolve_group(request.group_by.as_deref())?;
        if request.limit == 0 {
            return Err(AnalyticsError::InvalidLimit(request.limit));
        }
        Ok((definition, period, group_override))
    }

    fn resolve_period(&self, raw: &str) -> Result<Period, AnalyticsError> {
        let period = Period::parse(raw);
        if let Period::Unrecognized(raw) = &period {
            if self.strict_periods {
                return Err(AnalyticsError::UnrecognizedTimePeriod(raw.clone()));
            }
            tracing::warn!(period = %raw, "Unrecognized time period; using all data.");
        }
        Ok(period)
    }

    fn aggregate(
        &self,
        definition: &MetricDefinition,
        request: &CalculationRequest,
        period: &Period,
        group_override: Option<Dimension>,
        transactions: Vec<Transaction>,
    ) -> Result<CalculationResult, AnalyticsError> {
        let rows = period::filter(transactions, period);
        if rows.is_empty() {
            return Err(AnalyticsError::EmptyResultSet(request.period.clone()));
        }
        tracing::debug!(rows = rows.len(), formula = definition.aggregation.name(), "Aggregating.");

        let grouping = |default: Option<Dimension>| {
            group_override
                .or(default)
                .ok_or_else(|| AnalyticsError::MissingGroupDimension(definition.name.to_string()))
        };

        let value = match definition.aggregation {
            Aggregation::Sum { column } => MetricValue::Currency {
                amount: aggregation::sum(&rows, column)?,
            },
            Aggregation::Mean { column } => MetricValue::Currency {
                amount: aggregation::mean(&rows, column)?
                    .ok_or_else(|| AnalyticsError::EmptyResultSet(request.period.clone()))?,
            },
            Aggregation::Count => MetricValue::Count {
                count: aggregation::count(&rows),
                unit: "transactions".to_string(),
            },
            Aggregation::UniqueCount { column } => MetricValue::Count {
                count: aggregation::unique_count(&rows, column),
                unit: format!("unique {}", column.as_str().replace('_', " ")),
            },
            Aggregation::GroupSumRanked { column, group_by } => MetricValue::Ranking {
                limit: request.limit,
                entries: aggregation::group_sum_ranked(&rows, column, grouping(group_by)?, request.limit)?,
            },
            Aggregation::GroupSum { column, group_by } => MetricValue::Breakdown {
                entries: aggregation::group_sum(&rows, column, grouping(group_by)?)?,
            },
            Aggregation::TimeSeries { column } => MetricValue::TimeSeries {
                points: aggregation::time_series(&rows, column)?,
            },
            Aggregation::PercentageChange { column } => {
                MetricValue::Growth(aggregation::percentage_change(&rows, column)?)
            }
        };

        Ok(CalculationResult {
            metric: definition.name.to_string(),
            period: request.period.clone(),
            value,
        })
    }
}

fn resolve_group(raw: Option<&str>) -> Result<Option<Dimension>, AnalyticsError> {
    raw.map(|name| {
        name.parse::<Dimension>()
            .map_err(|_| AnalyticsError::UnknownDimension(name.to_string()))
    })
    .transpose()
}
