//! Canonical quote domain model
//!
//! A `Quote` is the unified representation of one carrier offer, independent
//! of which provider produced it. Adapters create quotes; the scoring engine
//! enriches them with score, rank, badge, and analysis; after the response is
//! returned they are never mutated.

pub mod errors;
pub mod request;
pub mod response;

pub use errors::{
	AggregationError, AggregationResult, QuoteValidationError, QuoteValidationResult,
};
pub use request::{Coverage, Driver, DriverAddress, LiabilityLimits, QuoteRequest, Vehicle};
pub use response::{
	AggregationStatistics, QuoteInsights, QuoteResponse, Recommendation, ResponseMetadata,
	RiskAssessment, RiskLevel, SavingsOpportunity,
};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::QUOTE_VALIDITY_DAYS;

/// Which provider adapter produced a quote
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum QuoteSource {
	ApexRate,
	Sureline,
	QuantumQuote,
}

impl QuoteSource {
	/// Stable identifier, also used as the provider id in config and metrics
	pub fn as_str(&self) -> &'static str {
		match self {
			QuoteSource::ApexRate => "apex-rate",
			QuoteSource::Sureline => "sureline",
			QuoteSource::QuantumQuote => "quantum-quote",
		}
	}

	/// Prefix applied to quote identifiers from this source
	pub fn quote_id_prefix(&self) -> &'static str {
		match self {
			QuoteSource::ApexRate => "APX",
			QuoteSource::Sureline => "SRL",
			QuoteSource::QuantumQuote => "QTM",
		}
	}

	/// Fixed source-reliability factor used by the scoring engine
	pub fn reliability(&self) -> f64 {
		match self {
			QuoteSource::ApexRate => 0.95,
			QuoteSource::Sureline => 0.88,
			QuoteSource::QuantumQuote => 0.92,
		}
	}
}

impl std::fmt::Display for QuoteSource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// Premium figures, all derived consistently from the annual amount
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Premium {
	pub monthly: f64,
	pub six_month: f64,
	pub annual: f64,
	pub down_payment: f64,
}

/// Round a dollar amount to cents
pub fn round_cents(value: f64) -> f64 {
	(value * 100.0).round() / 100.0
}

impl Premium {
	/// Derive the full premium breakdown from an annual amount
	pub fn from_annual(annual: f64) -> Self {
		let annual = round_cents(annual);
		Self {
			monthly: round_cents(annual / 12.0),
			six_month: round_cents(annual / 2.0),
			annual,
			down_payment: round_cents(annual * 0.10),
		}
	}
}

/// A single named discount applied by the carrier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
	pub name: String,
	pub amount: f64,
}

/// Single priority-selected label summarizing why a quote stands out
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Badge {
	BestValue,
	LowestPrice,
	AiRecommended,
	BestCoverage,
	InstantBind,
}

/// Advisory per-quote analysis attached by the scoring engine.
/// Deterministic for identical inputs; not used in scoring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteAnalysis {
	pub strengths: Vec<String>,
	pub considerations: Vec<String>,
	pub suitability: String,
}

/// Canonical quote produced by a provider adapter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
	/// Source-prefixed identifier, e.g. "APX-1f0c..."
	pub quote_id: String,
	pub carrier: String,
	pub carrier_logo: String,
	pub premium: Premium,
	/// Coverage snapshot copied from the request, not provider-specific
	pub coverage: Coverage,
	pub discounts: Vec<Discount>,
	pub total_discounts: f64,
	/// Letter-grade carrier rating, e.g. "A++"
	pub carrier_rating: String,
	pub source: QuoteSource,
	pub bindable: bool,
	pub effective_date: DateTime<Utc>,
	pub expiration_date: DateTime<Utc>,
	/// 0-100 confidence score, supplied only by the AI-augmented provider
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ai_score: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ai_recommendation: Option<String>,
	// Enrichment applied by the scoring engine
	#[serde(skip_serializing_if = "Option::is_none")]
	pub score: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub rank: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub badge: Option<Badge>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub analysis: Option<QuoteAnalysis>,
}

impl Quote {
	/// Create a new quote with a freshly generated source-prefixed id
	pub fn new(
		carrier: impl Into<String>,
		carrier_logo: impl Into<String>,
		premium: Premium,
		coverage: Coverage,
		carrier_rating: impl Into<String>,
		source: QuoteSource,
		bindable: bool,
	) -> Self {
		let now = Utc::now();
		Self {
			quote_id: format!("{}-{}", source.quote_id_prefix(), uuid::Uuid::new_v4()),
			carrier: carrier.into(),
			carrier_logo: carrier_logo.into(),
			premium,
			coverage,
			discounts: Vec::new(),
			total_discounts: 0.0,
			carrier_rating: carrier_rating.into(),
			source,
			bindable,
			effective_date: now,
			expiration_date: now + Duration::days(QUOTE_VALIDITY_DAYS),
			ai_score: None,
			ai_recommendation: None,
			score: None,
			rank: None,
			badge: None,
			analysis: None,
		}
	}

	/// Attach discounts, keeping the total in sync
	pub fn with_discounts(mut self, discounts: Vec<Discount>) -> Self {
		self.total_discounts = round_cents(discounts.iter().map(|d| d.amount).sum());
		self.discounts = discounts;
		self
	}

	/// Attach the AI confidence score and recommendation text
	pub fn with_ai_assessment(mut self, score: f64, recommendation: impl Into<String>) -> Self {
		self.ai_score = Some(score);
		self.ai_recommendation = Some(recommendation.into());
		self
	}

	/// Whether this quote has passed its expiration timestamp
	pub fn is_expired(&self) -> bool {
		self.expiration_date <= Utc::now()
	}

	/// Dedup bucket: annual premium rounded to the nearest hundred dollars
	pub fn premium_bucket(&self) -> i64 {
		(self.premium.annual / 100.0).round() as i64
	}

	/// Numeric scale for the letter-grade carrier rating (0.4 - 1.0)
	pub fn rating_scale(&self) -> f64 {
		match self.carrier_rating.as_str() {
			"A++" => 1.0,
			"A+" => 0.9,
			"A" => 0.8,
			"A-" => 0.7,
			"B++" => 0.6,
			"B+" => 0.5,
			_ => 0.4,
		}
	}
}
