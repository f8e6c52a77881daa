//! Test application harness
//!
//! Builds a fully wired router plus state without binding a socket, so tests
//! drive the HTTP surface through `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use coverline::{AggregatorBuilder, AppState, ProviderAdapter, Settings};
use coverline_types::test_utils;

/// App wired with the standard adapters (all offline, serving fallback data)
pub async fn app_with_defaults() -> (Router, AppState) {
	AggregatorBuilder::new()
		.with_settings(Settings::default())
		.start()
		.await
		.expect("Failed to build test app")
}

/// App wired with the standard adapters and custom settings
pub async fn app_with_settings(settings: Settings) -> (Router, AppState) {
	AggregatorBuilder::new()
		.with_settings(settings)
		.start()
		.await
		.expect("Failed to build test app")
}

/// App wired with only the given adapters
pub async fn app_with_adapters(adapters: Vec<Arc<dyn ProviderAdapter>>) -> (Router, AppState) {
	app_with_adapters_and_settings(adapters, Settings::default()).await
}

pub async fn app_with_adapters_and_settings(
	adapters: Vec<Arc<dyn ProviderAdapter>>,
	settings: Settings,
) -> (Router, AppState) {
	let mut builder = AggregatorBuilder::new().with_settings(settings);
	for adapter in adapters {
		builder = builder.with_adapter(adapter);
	}
	builder.start().await.expect("Failed to build test app")
}

/// Issue one request against the router and decode the JSON body
pub async fn request_json(
	app: &Router,
	method: &str,
	uri: &str,
	body: Option<Value>,
) -> (StatusCode, Value) {
	let mut builder = Request::builder()
		.method(method)
		.uri(uri)
		.header(header::CONTENT_TYPE, "application/json");
	// Distinct per-process client key keeps unrelated tests out of each
	// other's rate limit windows
	builder = builder.header("x-forwarded-for", "203.0.113.7");

	let request = builder
		.body(match body {
			Some(value) => Body::from(value.to_string()),
			None => Body::empty(),
		})
		.expect("Failed to build request");

	let response = app
		.clone()
		.oneshot(request)
		.await
		.expect("Router call failed");
	let status = response.status();
	let bytes = response
		.into_body()
		.collect()
		.await
		.expect("Failed to read body")
		.to_bytes();
	let value = if bytes.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&bytes).expect("Response body was not JSON")
	};
	(status, value)
}

/// Standard generate body: one 2021 sedan, one clean 30-year-old driver,
/// 100/300/50 coverage
pub fn generate_body() -> Value {
	let request = test_utils::standard_request();
	json!({
		"vehicleData": request.vehicle_data,
		"driverData": request.driver_data,
		"coverage": request.coverage,
		"sessionId": request.session_id,
	})
}

/// Same body with the cache bypass flag set
pub fn generate_body_force_refresh() -> Value {
	let mut body = generate_body();
	body["forceRefresh"] = json!(true);
	body
}
