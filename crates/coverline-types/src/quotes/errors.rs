//! Error taxonomy for quote aggregation

use thiserror::Error;

/// Validation errors for incoming quote requests
#[derive(Error, Debug)]
pub enum QuoteValidationError {
	#[error("Missing required field: {field}")]
	MissingRequiredField { field: String },

	#[error("At least one vehicle is required")]
	NoVehicles,

	#[error("At least one driver is required")]
	NoDrivers,

	#[error("Invalid liability limit format: {value} (expected BI/BI/PD, e.g. 100/300/50)")]
	InvalidLiabilityFormat { value: String },

	#[error("Invalid vehicle year: {year}")]
	InvalidVehicleYear { year: u16 },

	#[error("Invalid field value: {field} - {reason}")]
	InvalidField { field: String, reason: String },
}

pub type QuoteValidationResult<T> = Result<T, QuoteValidationError>;

/// Errors surfaced by the request orchestrator
///
/// Individual provider failures are isolated inside the orchestrator and
/// never appear here; only total failure escalates to the caller.
#[derive(Error, Debug)]
pub enum AggregationError {
	#[error("Quote request validation failed: {0}")]
	Validation(#[from] QuoteValidationError),

	#[error("No quotes available: all providers failed or returned no quotes")]
	NoQuotesAvailable,

	#[error("Quote not found: {quote_id}")]
	QuoteNotFound { quote_id: String },

	#[error("Internal error: {0}")]
	Internal(String),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

pub type AggregationResult<T> = Result<T, AggregationError>;

impl AggregationError {
	/// HTTP status code this error maps to at the API boundary
	pub fn status_code(&self) -> u16 {
		match self {
			AggregationError::Validation(_) => 400,
			AggregationError::QuoteNotFound { .. } => 404,
			AggregationError::NoQuotesAvailable
			| AggregationError::Internal(_)
			| AggregationError::Serialization(_) => 500,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_code_mapping() {
		let err = AggregationError::Validation(QuoteValidationError::NoVehicles);
		assert_eq!(err.status_code(), 400);

		assert_eq!(AggregationError::NoQuotesAvailable.status_code(), 500);
		assert_eq!(
			AggregationError::QuoteNotFound {
				quote_id: "APX-123".to_string()
			}
			.status_code(),
			404
		);
	}
}
