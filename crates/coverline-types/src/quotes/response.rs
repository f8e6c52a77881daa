//! Aggregation response, statistics, and insight models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Quote;

/// Full aggregation response returned by the orchestrator and cached by
/// request fingerprint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
	pub success: bool,
	pub quotes: Vec<Quote>,
	pub insights: QuoteInsights,
	pub statistics: AggregationStatistics,
	pub metadata: ResponseMetadata,
}

/// Aggregate statistics over the scored quote set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregationStatistics {
	pub total_quotes: usize,
	pub average_premium: f64,
	pub lowest_premium: f64,
	pub highest_premium: f64,
	pub potential_savings: f64,
	pub providers_queried: u32,
	pub providers_responded: u32,
}

/// Request-scoped response metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
	pub session_id: String,
	pub request_id: String,
	pub cached: bool,
	pub generated_at: DateTime<Utc>,
	pub duration_ms: u64,
}

/// Human-readable insights derived from the scored quote set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteInsights {
	pub summary: String,
	pub recommendations: Vec<Recommendation>,
	pub savings_opportunity: SavingsOpportunity,
	pub risk_assessment: RiskAssessment,
	pub market_analysis: String,
}

/// One entry in the ranked recommendation list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
	pub rank: u32,
	pub carrier: String,
	pub reason: String,
}

/// Spread between the highest and lowest annual premium in the set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsOpportunity {
	pub amount: f64,
	pub percentage: f64,
	pub message: String,
}

/// Coarse risk level derived from the numeric risk score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskLevel {
	Low,
	Standard,
	High,
}

/// Coarse risk assessment of the applicant profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
	pub score: i32,
	pub level: RiskLevel,
	pub factors: Vec<String>,
}

impl RiskLevel {
	/// Level thresholds: below 40 is Low, above 60 is High
	pub fn from_score(score: i32) -> Self {
		if score < 40 {
			RiskLevel::Low
		} else if score > 60 {
			RiskLevel::High
		} else {
			RiskLevel::Standard
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_risk_level_thresholds() {
		assert_eq!(RiskLevel::from_score(39), RiskLevel::Low);
		assert_eq!(RiskLevel::from_score(40), RiskLevel::Standard);
		assert_eq!(RiskLevel::from_score(60), RiskLevel::Standard);
		assert_eq!(RiskLevel::from_score(61), RiskLevel::High);
	}
}
