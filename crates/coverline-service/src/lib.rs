//! Coverline Service
//!
//! Business logic for the Coverline quote aggregator: the aggregation
//! orchestrator, the scoring and ranking engine, quote lifecycle operations,
//! and the process-wide metrics collector.

pub mod aggregator;
pub mod metrics;
pub mod quote_ops;
pub mod scoring;

pub use aggregator::AggregatorService;
pub use metrics::MetricsCollector;
pub use quote_ops::QuoteService;
