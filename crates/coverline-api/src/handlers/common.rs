use axum::{
	http::StatusCode,
	response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use coverline_types::AggregationError;

/// Error response format shared by handlers
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
	pub timestamp: i64,
}

/// 400 body listing the missing top-level request fields
#[derive(Debug, Serialize)]
pub struct MissingFieldsResponse {
	pub error: String,
	pub required: Vec<String>,
}

pub fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> Response {
	(
		status,
		Json(ErrorResponse {
			error: error.to_string(),
			message: message.into(),
			timestamp: chrono::Utc::now().timestamp(),
		}),
	)
		.into_response()
}

/// Map an aggregation error to its HTTP response
pub fn aggregation_error_response(error: AggregationError) -> Response {
	let status =
		StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
	let code = match &error {
		AggregationError::Validation(_) => "VALIDATION_ERROR",
		AggregationError::NoQuotesAvailable => "NO_QUOTES_AVAILABLE",
		AggregationError::QuoteNotFound { .. } => "QUOTE_NOT_FOUND",
		AggregationError::Internal(_) | AggregationError::Serialization(_) => "INTERNAL_ERROR",
	};

	error_response(status, code, error.to_string())
}
