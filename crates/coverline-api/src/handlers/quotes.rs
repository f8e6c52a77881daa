use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use coverline_storage::SavedSession;
use coverline_types::{
	AggregationError, BindQuoteRequest, CompareQuotesRequest, Coverage, Driver, QuoteRequest,
	SaveQuoteRequest, Vehicle,
};

use crate::handlers::common::{
	aggregation_error_response, error_response, MissingFieldsResponse,
};
use crate::rate_limit::ClientIp;
use crate::state::AppState;

/// Body for POST /api/quote/generate
///
/// Top-level fields are optional here so their absence produces the API's
/// structured 400 listing what is missing, rather than a deserialization
/// error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuoteBody {
	pub vehicle_data: Option<Vec<Vehicle>>,
	pub driver_data: Option<Vec<Driver>>,
	pub coverage: Option<Coverage>,
	pub session_id: Option<String>,
	#[serde(default)]
	pub force_refresh: bool,
}

/// 500 body for a fully failed aggregation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TotalFailureResponse {
	success: bool,
	error: String,
	message: String,
	session_id: String,
	timestamp: i64,
}

/// POST /api/quote/generate - Run the aggregation pipeline
pub async fn post_generate(
	State(state): State<AppState>,
	ClientIp(client_ip): ClientIp,
	Json(body): Json<GenerateQuoteBody>,
) -> Response {
	let decision = state.rate_limiter.check(&client_ip);
	if !decision.allowed {
		return error_response(
			StatusCode::TOO_MANY_REQUESTS,
			"RATE_LIMITED",
			format!("Rate limit exceeded; retry after {}", decision.reset_at),
		);
	}

	let (vehicle_data, driver_data, coverage) =
		match (body.vehicle_data, body.driver_data, body.coverage) {
			(Some(vehicles), Some(drivers), Some(coverage)) => (vehicles, drivers, coverage),
			(vehicles, drivers, coverage) => {
				let mut required = Vec::new();
				if vehicles.is_none() {
					required.push("vehicleData".to_string());
				}
				if drivers.is_none() {
					required.push("driverData".to_string());
				}
				if coverage.is_none() {
					required.push("coverage".to_string());
				}
				return (
					StatusCode::BAD_REQUEST,
					Json(MissingFieldsResponse {
						error: "Missing required fields".to_string(),
						required,
					}),
				)
					.into_response();
			},
		};

	let request = QuoteRequest {
		vehicle_data,
		driver_data,
		coverage,
		session_id: body
			.session_id
			.unwrap_or_else(|| format!("sess-{}", Uuid::new_v4())),
	};
	let session_id = request.session_id.clone();

	info!(
		"Generating quotes for session {} ({} vehicles, {} drivers)",
		session_id,
		request.vehicle_data.len(),
		request.driver_data.len()
	);

	match state
		.aggregator_service
		.generate_quotes(request, body.force_refresh)
		.await
	{
		Ok(response) => Json(response).into_response(),
		Err(AggregationError::NoQuotesAvailable) => (
			StatusCode::INTERNAL_SERVER_ERROR,
			Json(TotalFailureResponse {
				success: false,
				error: "NO_QUOTES_AVAILABLE".to_string(),
				message: AggregationError::NoQuotesAvailable.to_string(),
				session_id,
				timestamp: chrono::Utc::now().timestamp(),
			}),
		)
			.into_response(),
		Err(e) => aggregation_error_response(e),
	}
}

/// GET /api/quote/{quoteId} - Retrieve a previously generated quote
pub async fn get_quote(
	State(state): State<AppState>,
	Path(quote_id): Path<String>,
) -> Response {
	match state.quote_service.get_quote(&quote_id).await {
		Ok(quote) => Json(quote).into_response(),
		Err(e) => aggregation_error_response(e),
	}
}

/// POST /api/quote/bind - Bind a quote into a policy
pub async fn post_bind(
	State(state): State<AppState>,
	Json(request): Json<BindQuoteRequest>,
) -> Response {
	match state.quote_service.bind_quote(request).await {
		Ok(bound) => Json(bound).into_response(),
		Err(e) => aggregation_error_response(e),
	}
}

/// POST /api/quote/compare - Compare previously generated quotes
pub async fn post_compare(
	State(state): State<AppState>,
	Json(request): Json<CompareQuotesRequest>,
) -> Response {
	match state.quote_service.compare_quotes(request).await {
		Ok(comparison) => Json(comparison).into_response(),
		Err(e) => aggregation_error_response(e),
	}
}

/// POST /api/quote/save - Save quotes under an email for later retrieval
pub async fn post_save(
	State(state): State<AppState>,
	Json(request): Json<SaveQuoteRequest>,
) -> Response {
	match state.quote_service.save_quotes(request).await {
		Ok(saved) => Json(saved).into_response(),
		Err(e) => aggregation_error_response(e),
	}
}

/// GET /api/quote/saved/{token} - Retrieve a saved quote session
pub async fn get_saved_session(
	State(state): State<AppState>,
	Path(token): Path<String>,
) -> Response {
	match state.quote_service.get_saved_session(&token).await {
		Ok(session) => Json::<SavedSession>(session).into_response(),
		Err(e) => aggregation_error_response(e),
	}
}
