//! QuantumQuote adapter implementation
//!
//! QuantumQuote is the AI-augmented provider: every quote carries a 0-100
//! confidence score and a free-text recommendation. The other adapters never
//! populate those fields.

use async_trait::async_trait;
use reqwest::{
	header::{HeaderMap, HeaderValue},
	Client,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use coverline_types::constants::RECENT_VEHICLE_YEAR_THRESHOLD;
use coverline_types::{
	AdapterError, AdapterResult, Discount, Premium, ProviderAdapter, ProviderInfo,
	ProviderRuntimeConfig, Quote, QuoteRequest, QuoteSource, round_cents,
};

use crate::rating::baseline_annual_premium;

/// QuantumQuote assessment request payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuantumAssessmentRequest {
	risk_profile: QuantumRiskProfile,
	vehicles: Vec<QuantumVehicle>,
	coverage: QuantumCoverage,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuantumRiskProfile {
	primary_driver_age: u32,
	driver_count: u32,
	total_violations: u32,
	total_at_fault_claims: u32,
	garaging_zip: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuantumVehicle {
	year: u16,
	make: String,
	model: String,
	annual_mileage: u32,
	ownership: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuantumCoverage {
	liability_bi_per_person: u32,
	liability_bi_per_accident: u32,
	liability_pd: u32,
	collision_deductible: u32,
	comprehensive_deductible: u32,
	addon_count: u32,
}

/// QuantumQuote assessment response models
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuantumAssessmentResponse {
	matches: Vec<QuantumMatch>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuantumMatch {
	carrier: String,
	annual_premium: f64,
	rating: Option<String>,
	confidence: f64,
	recommendation: String,
	#[serde(default)]
	discounts: Vec<QuantumDiscount>,
	#[serde(default)]
	instant_bind: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuantumDiscount {
	name: String,
	amount: f64,
}

/// QuantumQuote provider adapter
#[derive(Debug)]
pub struct QuantumQuoteAdapter {
	info: ProviderInfo,
	client: Client,
}

impl QuantumQuoteAdapter {
	pub fn new() -> AdapterResult<Self> {
		let mut headers = HeaderMap::new();
		headers.insert("Content-Type", HeaderValue::from_static("application/json"));
		headers.insert(
			"User-Agent",
			HeaderValue::from_static("Coverline-Aggregator/1.0"),
		);
		headers.insert("Accept", HeaderValue::from_static("application/json"));

		let client = Client::builder()
			.default_headers(headers)
			.build()
			.map_err(AdapterError::HttpError)?;

		Ok(Self {
			info: ProviderInfo::new(
				QuoteSource::QuantumQuote.as_str(),
				"QuantumQuote",
				"QuantumQuote AI-assisted carrier matching",
				"1.0.0",
			),
			client,
		})
	}

	fn build_payload(request: &QuoteRequest) -> AdapterResult<QuantumAssessmentRequest> {
		let limits = request
			.coverage
			.liability_limits()
			.map_err(|e| AdapterError::InvalidResponse {
				reason: format!("Unrateable coverage: {}", e),
			})?;

		let primary_age = request.primary_driver().map(|d| d.age()).unwrap_or(0);
		let garaging_zip = request
			.vehicle_data
			.first()
			.map(|v| v.garaging_zip.clone())
			.unwrap_or_default();

		Ok(QuantumAssessmentRequest {
			risk_profile: QuantumRiskProfile {
				primary_driver_age: primary_age,
				driver_count: request.driver_data.len() as u32,
				total_violations: request.driver_data.iter().map(|d| d.violations).sum(),
				total_at_fault_claims: request
					.driver_data
					.iter()
					.map(|d| d.at_fault_claims)
					.sum(),
				garaging_zip,
			},
			vehicles: request
				.vehicle_data
				.iter()
				.map(|vehicle| QuantumVehicle {
					year: vehicle.year,
					make: vehicle.make.clone(),
					model: vehicle.model.clone(),
					annual_mileage: vehicle.annual_mileage,
					ownership: vehicle.ownership.clone(),
				})
				.collect(),
			coverage: QuantumCoverage {
				liability_bi_per_person: limits.bodily_injury_per_person,
				liability_bi_per_accident: limits.bodily_injury_per_accident,
				liability_pd: limits.property_damage,
				collision_deductible: request.coverage.collision_deductible,
				comprehensive_deductible: request.coverage.comprehensive_deductible,
				addon_count: request.coverage.addon_count(),
			},
		})
	}

	fn translate_match(&self, provider_match: QuantumMatch, request: &QuoteRequest) -> Quote {
		Quote::new(
			provider_match.carrier.clone(),
			Self::logo_url(&provider_match.carrier),
			Premium::from_annual(provider_match.annual_premium),
			request.coverage.clone(),
			provider_match.rating.unwrap_or_else(|| "A".to_string()),
			QuoteSource::QuantumQuote,
			provider_match.instant_bind,
		)
		.with_discounts(
			provider_match
				.discounts
				.into_iter()
				.map(|d| Discount {
					name: d.name,
					amount: d.amount,
				})
				.collect(),
		)
		.with_ai_assessment(provider_match.confidence, provider_match.recommendation)
	}

	fn logo_url(carrier: &str) -> String {
		format!(
			"https://cdn.coverline.example/logos/{}.svg",
			carrier.to_lowercase().replace(' ', "-")
		)
	}

	/// Deterministic confidence score derived from the request's risk profile
	fn confidence_for(request: &QuoteRequest, base: f64) -> f64 {
		let mut confidence = base;

		if let Some(driver) = request.primary_driver() {
			confidence -= f64::from(driver.violations) * 3.0;
			confidence -= f64::from(driver.at_fault_claims) * 4.0;
			if driver.violations == 0 && driver.at_fault_claims == 0 {
				confidence += 2.0;
			}
		}
		if request
			.vehicle_data
			.first()
			.is_some_and(|v| v.year > RECENT_VEHICLE_YEAR_THRESHOLD)
		{
			confidence += 1.0;
		}

		confidence.clamp(60.0, 99.0)
	}

	fn recommendation_for(request: &QuoteRequest, carrier: &str) -> String {
		let profile = match request.primary_driver() {
			Some(driver) if driver.violations == 0 && driver.at_fault_claims == 0 => {
				"a clean driving record"
			},
			_ => "your driving history",
		};
		format!(
			"{} is a strong match for {} and the selected coverage level",
			carrier, profile
		)
	}

	fn standard_discounts(request: &QuoteRequest, annual: f64) -> Vec<Discount> {
		let mut discounts = vec![Discount {
			name: "Smart Quote".to_string(),
			amount: round_cents(annual * 0.03),
		}];

		if request.is_multi_vehicle() {
			discounts.push(Discount {
				name: "Multi-Vehicle".to_string(),
				amount: round_cents(annual * 0.09),
			});
		}
		if request
			.vehicle_data
			.first()
			.is_some_and(|v| v.year > RECENT_VEHICLE_YEAR_THRESHOLD)
		{
			discounts.push(Discount {
				name: "New Vehicle Safety".to_string(),
				amount: round_cents(annual * 0.05),
			});
		}

		discounts
	}

	fn fallback_quotes(&self, request: &QuoteRequest) -> Vec<Quote> {
		let baseline = baseline_annual_premium(request);

		let meridian_annual = round_cents(baseline * 0.93);
		let northwind_annual = round_cents(baseline * 1.08);

		vec![
			Quote::new(
				"Meridian Direct",
				Self::logo_url("Meridian Direct"),
				Premium::from_annual(meridian_annual),
				request.coverage.clone(),
				"A",
				QuoteSource::QuantumQuote,
				true,
			)
			.with_discounts(Self::standard_discounts(request, meridian_annual))
			.with_ai_assessment(
				Self::confidence_for(request, 94.0),
				Self::recommendation_for(request, "Meridian Direct"),
			),
			Quote::new(
				"Northwind Assurance",
				Self::logo_url("Northwind Assurance"),
				Premium::from_annual(northwind_annual),
				request.coverage.clone(),
				"A-",
				QuoteSource::QuantumQuote,
				true,
			)
			.with_discounts(Self::standard_discounts(request, northwind_annual))
			.with_ai_assessment(
				Self::confidence_for(request, 88.0),
				Self::recommendation_for(request, "Northwind Assurance"),
			),
		]
	}

	async fn fetch_live_quotes(
		&self,
		request: &QuoteRequest,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<Vec<Quote>> {
		let payload = Self::build_payload(request)?;
		let url = format!("{}/v1/assessments", config.endpoint.trim_end_matches('/'));

		let mut http_request = self.client.post(&url).json(&payload);
		if let Some(api_key) = &config.api_key {
			http_request = http_request.header("X-Quantum-Key", api_key.expose_secret());
		}

		let response = timeout(Duration::from_millis(config.timeout_ms), http_request.send())
			.await
			.map_err(|_| AdapterError::Timeout {
				timeout_ms: config.timeout_ms,
			})??;

		if !response.status().is_success() {
			return Err(AdapterError::from_http_failure(response.status().as_u16()));
		}

		let assessment: QuantumAssessmentResponse = response.json().await?;
		Ok(assessment
			.matches
			.into_iter()
			.map(|m| self.translate_match(m, request))
			.collect())
	}
}

#[async_trait]
impl ProviderAdapter for QuantumQuoteAdapter {
	fn provider_info(&self) -> &ProviderInfo {
		&self.info
	}

	fn source(&self) -> QuoteSource {
		QuoteSource::QuantumQuote
	}

	async fn get_quotes(
		&self,
		request: &QuoteRequest,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<Vec<Quote>> {
		if !config.use_live_call() {
			debug!("QuantumQuote serving deterministic fallback quotes");
			return Ok(self.fallback_quotes(request));
		}

		self.fetch_live_quotes(request, config).await
	}

	async fn health_check(&self, config: &ProviderRuntimeConfig) -> AdapterResult<bool> {
		if !config.use_live_call() {
			return Ok(true);
		}

		let url = format!("{}/v1/health", config.endpoint.trim_end_matches('/'));
		let response = timeout(
			Duration::from_millis(config.timeout_ms),
			self.client.get(&url).send(),
		)
		.await
		.map_err(|_| AdapterError::Timeout {
			timeout_ms: config.timeout_ms,
		})??;

		Ok(response.status().is_success())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use coverline_types::test_utils;

	#[test]
	fn test_adapter_identity() {
		let adapter = QuantumQuoteAdapter::new().unwrap();
		assert_eq!(adapter.id(), "quantum-quote");
		assert_eq!(adapter.source(), QuoteSource::QuantumQuote);
	}

	#[test]
	fn test_payload_carries_risk_profile() {
		let request = test_utils::standard_request();
		let payload = QuantumQuoteAdapter::build_payload(&request).unwrap();

		assert_eq!(payload.risk_profile.driver_count, 1);
		assert_eq!(payload.risk_profile.total_violations, 0);
		assert_eq!(payload.risk_profile.garaging_zip, "78701");
		assert_eq!(payload.coverage.liability_bi_per_person, 100_000);
		assert_eq!(payload.coverage.addon_count, 3);
	}

	#[tokio::test]
	async fn test_fallback_quotes_carry_ai_assessment() {
		let adapter = QuantumQuoteAdapter::new().unwrap();
		let request = test_utils::standard_request();
		let config = ProviderRuntimeConfig::offline("quantum-quote");

		let quotes = adapter.get_quotes(&request, &config).await.unwrap();
		assert_eq!(quotes.len(), 2);
		for quote in &quotes {
			assert!(quote.quote_id.starts_with("QTM-"));
			let ai_score = quote.ai_score.unwrap();
			assert!((60.0..=99.0).contains(&ai_score));
			assert!(quote.ai_recommendation.is_some());
		}
	}

	#[test]
	fn test_confidence_penalizes_incidents() {
		let clean = test_utils::standard_request();
		let mut dinged = clean.clone();
		dinged.driver_data[0].violations = 2;
		dinged.driver_data[0].at_fault_claims = 1;

		let clean_confidence = QuantumQuoteAdapter::confidence_for(&clean, 94.0);
		let dinged_confidence = QuantumQuoteAdapter::confidence_for(&dinged, 94.0);
		assert!(dinged_confidence < clean_confidence);
	}
}
