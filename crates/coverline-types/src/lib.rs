//! Coverline Types
//!
//! Shared models and traits for the Coverline quote aggregation service.
//! This crate contains all domain models organized by business entity.

pub mod adapters;
pub mod constants;
pub mod metrics;
pub mod models;
pub mod operations;
pub mod quotes;
pub mod test_utils;

// Re-export chrono and serde_json for convenience
pub use chrono;
pub use serde_json;

// Re-export commonly used types for convenience
pub use quotes::{
	round_cents, AggregationError, AggregationResult, AggregationStatistics, Badge, Coverage, Discount, Driver,
	DriverAddress, LiabilityLimits, Premium, Quote, QuoteAnalysis, QuoteInsights, QuoteRequest,
	QuoteResponse, QuoteSource, QuoteValidationError, QuoteValidationResult, Recommendation,
	ResponseMetadata, RiskAssessment, RiskLevel, SavingsOpportunity, Vehicle,
};

pub use adapters::{
	AdapterError, AdapterResult, ProviderAdapter, ProviderInfo, ProviderRuntimeConfig,
};

pub use metrics::{
	ErrorRecord, HealthReport, HealthStatus, MetricsSnapshot, ProviderStats, ResponseTimeStats,
};

pub use models::SecretString;

pub use operations::{
	BindQuoteRequest, BindQuoteResponse, CompareQuotesRequest, ComparisonRow, CustomerInfo,
	PolicyDocument, QuoteComparison, SaveQuoteRequest, SavedQuoteResponse,
};
