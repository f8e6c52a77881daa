//! Request/response models for quote operations (bind, compare, save)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quotes::Badge;

/// Customer details supplied when binding a quote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
	pub first_name: String,
	pub last_name: String,
	pub email: String,
	pub phone: String,
}

/// Body for POST /api/quote/bind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindQuoteRequest {
	pub quote_id: String,
	pub customer_info: CustomerInfo,
	/// e.g. "card", "ach", "check"
	pub payment_method: String,
}

/// Reference to a generated policy document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDocument {
	pub name: String,
	pub url: String,
}

/// Successful bind result with a synthesized policy number
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindQuoteResponse {
	pub success: bool,
	pub policy_number: String,
	pub carrier: String,
	pub effective_date: DateTime<Utc>,
	pub documents: Vec<PolicyDocument>,
	pub bound_at: DateTime<Utc>,
}

/// Body for POST /api/quote/compare
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareQuotesRequest {
	pub quote_ids: Vec<String>,
}

/// One row in a structured quote comparison
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
	pub quote_id: String,
	pub carrier: String,
	pub annual_premium: f64,
	pub monthly_premium: f64,
	pub carrier_rating: String,
	pub total_discounts: f64,
	pub bindable: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub badge: Option<Badge>,
}

/// Structured comparison plus a textual recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteComparison {
	pub rows: Vec<ComparisonRow>,
	pub recommendation: String,
	pub generated_at: DateTime<Utc>,
}

/// Body for POST /api/quote/save
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveQuoteRequest {
	pub email: String,
	pub session_id: String,
	pub quote_ids: Vec<String>,
}

/// Saved-session receipt with a retrieval link
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedQuoteResponse {
	pub success: bool,
	pub retrieval_url: String,
	pub expires_at: DateTime<Utc>,
}
