//! Quote lifecycle operations: retrieval, bind, compare, save
//!
//! All operations work against the ephemeral quote store populated by the
//! aggregator; quotes that have expired or were never generated report as
//! not found.

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use coverline_storage::{SavedSession, Storage};
use coverline_types::constants::SAVED_SESSION_VALIDITY_DAYS;
use coverline_types::{
	AggregationError, AggregationResult, BindQuoteRequest, BindQuoteResponse, ComparisonRow,
	CompareQuotesRequest, PolicyDocument, Quote, QuoteComparison, QuoteValidationError,
	SaveQuoteRequest, SavedQuoteResponse,
};

/// Service for operations on previously generated quotes
pub struct QuoteService {
	store: Arc<dyn Storage>,
}

impl QuoteService {
	pub fn new(store: Arc<dyn Storage>) -> Self {
		Self { store }
	}

	/// Fetch a previously generated quote by id
	pub async fn get_quote(&self, quote_id: &str) -> AggregationResult<Quote> {
		self.store
			.get_quote(quote_id)
			.await
			.map_err(|e| AggregationError::Internal(e.to_string()))?
			.ok_or_else(|| AggregationError::QuoteNotFound {
				quote_id: quote_id.to_string(),
			})
	}

	/// Bind a quote, synthesizing a policy number and document references
	pub async fn bind_quote(
		&self,
		request: BindQuoteRequest,
	) -> AggregationResult<BindQuoteResponse> {
		let quote = self.get_quote(&request.quote_id).await?;

		if !quote.bindable {
			return Err(AggregationError::Validation(
				QuoteValidationError::InvalidField {
					field: "quoteId".to_string(),
					reason: format!("quote from {} cannot be bound online", quote.carrier),
				},
			));
		}

		let policy_number = format!(
			"POL-{}",
			Uuid::new_v4().simple().to_string()[..10].to_uppercase()
		);
		let bound_at = Utc::now();

		info!(
			"Bound quote {} as policy {} for {}",
			quote.quote_id, policy_number, request.customer_info.email
		);

		Ok(BindQuoteResponse {
			success: true,
			carrier: quote.carrier,
			effective_date: quote.effective_date,
			documents: vec![
				PolicyDocument {
					name: "Policy Declaration".to_string(),
					url: format!("/documents/{}/declaration.pdf", policy_number),
				},
				PolicyDocument {
					name: "Insurance ID Cards".to_string(),
					url: format!("/documents/{}/id-cards.pdf", policy_number),
				},
			],
			policy_number,
			bound_at,
		})
	}

	/// Compare two or more previously generated quotes side by side
	pub async fn compare_quotes(
		&self,
		request: CompareQuotesRequest,
	) -> AggregationResult<QuoteComparison> {
		if request.quote_ids.len() < 2 {
			return Err(AggregationError::Validation(
				QuoteValidationError::InvalidField {
					field: "quoteIds".to_string(),
					reason: "at least two quote ids are required for comparison".to_string(),
				},
			));
		}

		let mut quotes = Vec::with_capacity(request.quote_ids.len());
		for quote_id in &request.quote_ids {
			quotes.push(self.get_quote(quote_id).await?);
		}

		let rows: Vec<ComparisonRow> = quotes
			.iter()
			.map(|quote| ComparisonRow {
				quote_id: quote.quote_id.clone(),
				carrier: quote.carrier.clone(),
				annual_premium: quote.premium.annual,
				monthly_premium: quote.premium.monthly,
				carrier_rating: quote.carrier_rating.clone(),
				total_discounts: quote.total_discounts,
				bindable: quote.bindable,
				badge: quote.badge,
			})
			.collect();

		// Best rank wins; unranked quotes sort last
		let best = quotes
			.iter()
			.min_by_key(|quote| quote.rank.unwrap_or(u32::MAX))
			.ok_or_else(|| AggregationError::Internal("empty comparison set".to_string()))?;
		let recommendation = format!(
			"{} offers the strongest overall value of the quotes compared",
			best.carrier
		);

		Ok(QuoteComparison {
			rows,
			recommendation,
			generated_at: Utc::now(),
		})
	}

	/// Save a set of quotes under an email for later retrieval
	pub async fn save_quotes(
		&self,
		request: SaveQuoteRequest,
	) -> AggregationResult<SavedQuoteResponse> {
		if !request.email.contains('@') {
			return Err(AggregationError::Validation(
				QuoteValidationError::InvalidField {
					field: "email".to_string(),
					reason: "a valid email address is required".to_string(),
				},
			));
		}
		if request.quote_ids.is_empty() {
			return Err(AggregationError::Validation(
				QuoteValidationError::InvalidField {
					field: "quoteIds".to_string(),
					reason: "at least one quote id is required".to_string(),
				},
			));
		}

		let token = Uuid::new_v4().to_string();
		let now = Utc::now();
		let expires_at = now + Duration::days(SAVED_SESSION_VALIDITY_DAYS);

		self.store
			.add_session(SavedSession {
				token: token.clone(),
				email: request.email,
				session_id: request.session_id,
				quote_ids: request.quote_ids,
				created_at: now,
				expires_at,
			})
			.await
			.map_err(|e| AggregationError::Internal(e.to_string()))?;

		Ok(SavedQuoteResponse {
			success: true,
			retrieval_url: format!("/api/quote/saved/{}", token),
			expires_at,
		})
	}

	/// Look up a saved session by its retrieval token
	pub async fn get_saved_session(&self, token: &str) -> AggregationResult<SavedSession> {
		self.store
			.get_session(token)
			.await
			.map_err(|e| AggregationError::Internal(e.to_string()))?
			.ok_or_else(|| AggregationError::QuoteNotFound {
				quote_id: token.to_string(),
			})
	}
}
