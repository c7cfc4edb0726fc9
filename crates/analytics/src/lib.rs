//! # Sales Metrics Engine
//!
//! This crate computes a fixed catalogue of business metrics over sales transactions.
//! It is the only place in the system that knows how a metric is calculated.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It reads data only through the
//!   `dataset::DataSource` trait and has no knowledge of files or the CLI.
//! - **Declarative Catalogue:** Each metric is a `MetricDefinition` naming one
//!   `Aggregation` variant. Dispatch is an exhaustive `match`, so adding a variant
//!   without handling it fails to compile.
//! - **Stateless Calculation:** The `MetricsEngine` holds only its immutable catalogue.
//!   Every call loads fresh data, filters it by period, aggregates, and returns a new
//!   `CalculationResult`. Engines can be shared freely across threads.
//!
//! ## Public API
//!
//! - `MetricsEngine`: The calculator, with structured (`calculate`) and text
//!   (`calculate_formatted`) entry points.
//! - `CalculationRequest`: Metric name plus period, group override and limit.
//! - `CalculationResult`: The structured result; `Display` renders the text form.
//! - `MetricCatalogue` / `MetricDefinition` / `Aggregation`: The metric registry.
//! - `Period`: The parsed time filter.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod aggregation;
pub mod catalogue;
pub mod engine;
pub mod error;
pub mod format;
pub mod period;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use catalogue::{Aggregation, MetricCatalogue, MetricDefinition};
pub use engine::{CalculationRequest, MetricsEngine, DEFAULT_LIMIT};
pub use error::{AnalyticsError, ErrorKind};
pub use period::Period;
pub use report::{CalculationResult, GroupTotal, GrowthComparison, MetricValue, RankedEntry, Trend};
