//! ApexRate adapter implementation
//!
//! ApexRate's API takes a snake_case payload with liability limits broken out
//! into separate dollar-amount fields and returns one quote per partner
//! carrier.

use async_trait::async_trait;
use reqwest::{
	header::{HeaderMap, HeaderValue},
	Client,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use coverline_types::{
	AdapterError, AdapterResult, Discount, Premium, ProviderAdapter, ProviderInfo,
	ProviderRuntimeConfig, Quote, QuoteRequest, QuoteSource, round_cents,
};

use crate::rating::baseline_annual_premium;

/// ApexRate quote request payload
#[derive(Debug, Clone, Serialize)]
struct ApexRateQuotePayload {
	applicants: Vec<ApexRateApplicant>,
	vehicles: Vec<ApexRateVehicle>,
	coverage_selections: ApexRateCoverageSelections,
}

#[derive(Debug, Clone, Serialize)]
struct ApexRateApplicant {
	first_name: String,
	last_name: String,
	date_of_birth: String,
	license_state: String,
	violation_count: u32,
	at_fault_claim_count: u32,
}

#[derive(Debug, Clone, Serialize)]
struct ApexRateVehicle {
	model_year: u16,
	make: String,
	model: String,
	vin: String,
	annual_mileage: u32,
	garaging_zip: String,
}

#[derive(Debug, Clone, Serialize)]
struct ApexRateCoverageSelections {
	bodily_injury_per_person: u32,
	bodily_injury_per_accident: u32,
	property_damage: u32,
	collision_deductible: u32,
	comprehensive_deductible: u32,
	uninsured_motorist: bool,
	medical_payments: u32,
}

/// ApexRate quote response models
#[derive(Debug, Clone, Deserialize)]
struct ApexRateQuoteResponse {
	quotes: Vec<ApexRateQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct ApexRateQuote {
	carrier_name: String,
	logo_url: Option<String>,
	annual_premium: f64,
	carrier_rating: Option<String>,
	#[serde(default)]
	discounts: Vec<ApexRateDiscount>,
	#[serde(default)]
	instant_bind: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct ApexRateDiscount {
	description: String,
	amount: f64,
}

/// ApexRate provider adapter
#[derive(Debug)]
pub struct ApexRateAdapter {
	info: ProviderInfo,
	client: Client,
}

impl ApexRateAdapter {
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
				QuoteSource::ApexRate.as_str(),
				"ApexRate",
				"ApexRate multi-carrier rating network",
				"1.0.0",
			),
			client,
		})
	}

	/// Translate the canonical request into ApexRate's payload shape
	fn build_payload(request: &QuoteRequest) -> AdapterResult<ApexRateQuotePayload> {
		let limits = request
			.coverage
			.liability_limits()
			.map_err(|e| AdapterError::InvalidResponse {
				reason: format!("Unrateable coverage: {}", e),
			})?;

		Ok(ApexRateQuotePayload {
			applicants: request
				.driver_data
				.iter()
				.map(|driver| ApexRateApplicant {
					first_name: driver.first_name.clone(),
					last_name: driver.last_name.clone(),
					date_of_birth: driver.date_of_birth.format("%Y-%m-%d").to_string(),
					license_state: driver.license_state.clone(),
					violation_count: driver.violations,
					at_fault_claim_count: driver.at_fault_claims,
				})
				.collect(),
			vehicles: request
				.vehicle_data
				.iter()
				.map(|vehicle| ApexRateVehicle {
					model_year: vehicle.year,
					make: vehicle.make.clone(),
					model: vehicle.model.clone(),
					vin: vehicle.vin.clone(),
					annual_mileage: vehicle.annual_mileage,
					garaging_zip: vehicle.garaging_zip.clone(),
				})
				.collect(),
			coverage_selections: ApexRateCoverageSelections {
				bodily_injury_per_person: limits.bodily_injury_per_person,
				bodily_injury_per_accident: limits.bodily_injury_per_accident,
				property_damage: limits.property_damage,
				collision_deductible: request.coverage.collision_deductible,
				comprehensive_deductible: request.coverage.comprehensive_deductible,
				uninsured_motorist: request.coverage.uninsured_motorist,
				medical_payments: request.coverage.medical_payments,
			},
		})
	}

	fn translate_quote(&self, provider_quote: ApexRateQuote, request: &QuoteRequest) -> Quote {
		let logo = provider_quote.logo_url.unwrap_or_else(|| {
			Self::logo_url(&provider_quote.carrier_name)
		});

		Quote::new(
			provider_quote.carrier_name,
			logo,
			Premium::from_annual(provider_quote.annual_premium),
			request.coverage.clone(),
			provider_quote.carrier_rating.unwrap_or_else(|| "A".to_string()),
			QuoteSource::ApexRate,
			provider_quote.instant_bind,
		)
		.with_discounts(
			provider_quote
				.discounts
				.into_iter()
				.map(|d| Discount {
					name: d.description,
					amount: d.amount,
				})
				.collect(),
		)
	}

	fn logo_url(carrier: &str) -> String {
		format!(
			"https://cdn.coverline.example/logos/{}.svg",
			carrier.to_lowercase().replace(' ', "-")
		)
	}

	fn standard_discounts(request: &QuoteRequest, annual: f64) -> Vec<Discount> {
		let mut discounts = Vec::new();

		if let Some(driver) = request.primary_driver() {
			if driver.violations == 0 && driver.at_fault_claims == 0 {
				discounts.push(Discount {
					name: "Safe Driver".to_string(),
					amount: round_cents(annual * 0.08),
				});
			}
		}
		if request.is_multi_vehicle() {
			discounts.push(Discount {
				name: "Multi-Vehicle".to_string(),
				amount: round_cents(annual * 0.10),
			});
		}
		discounts.push(Discount {
			name: "Paperless Billing".to_string(),
			amount: round_cents(annual * 0.02),
		});

		discounts
	}

	/// Deterministic quote set served without credentials or outside the
	/// production profile
	fn fallback_quotes(&self, request: &QuoteRequest) -> Vec<Quote> {
		let baseline = baseline_annual_premium(request);

		let sentinel_annual = round_cents(baseline * 0.96);
		let granite_annual = round_cents(baseline * 1.05);

		vec![
			Quote::new(
				"Sentinel Mutual",
				Self::logo_url("Sentinel Mutual"),
				Premium::from_annual(sentinel_annual),
				request.coverage.clone(),
				"A+",
				QuoteSource::ApexRate,
				true,
			)
			.with_discounts(Self::standard_discounts(request, sentinel_annual)),
			Quote::new(
				"Granite State Auto",
				Self::logo_url("Granite State Auto"),
				Premium::from_annual(granite_annual),
				request.coverage.clone(),
				"A",
				QuoteSource::ApexRate,
				true,
			)
			.with_discounts(Self::standard_discounts(request, granite_annual)),
		]
	}

	async fn fetch_live_quotes(
		&self,
		request: &QuoteRequest,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<Vec<Quote>> {
		let payload = Self::build_payload(request)?;
		let url = format!("{}/v2/quotes", config.endpoint.trim_end_matches('/'));

		let mut http_request = self.client.post(&url).json(&payload);
		if let Some(api_key) = &config.api_key {
			http_request = http_request.header("X-Apex-Api-Key", api_key.expose_secret());
		}

		let response = timeout(Duration::from_millis(config.timeout_ms), http_request.send())
			.await
			.map_err(|_| AdapterError::Timeout {
				timeout_ms: config.timeout_ms,
			})??;

		if !response.status().is_success() {
			return Err(AdapterError::from_http_failure(response.status().as_u16()));
		}

		let quote_response: ApexRateQuoteResponse = response.json().await?;
		Ok(quote_response
			.quotes
			.into_iter()
			.map(|q| self.translate_quote(q, request))
			.collect())
	}
}

#[async_trait]
impl ProviderAdapter for ApexRateAdapter {
	fn provider_info(&self) -> &ProviderInfo {
		&self.info
	}

	fn source(&self) -> QuoteSource {
		QuoteSource::ApexRate
	}

	async fn get_quotes(
		&self,
		request: &QuoteRequest,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<Vec<Quote>> {
		if !config.use_live_call() {
			debug!("ApexRate serving deterministic fallback quotes");
			return Ok(self.fallback_quotes(request));
		}

		self.fetch_live_quotes(request, config).await
	}

	async fn health_check(&self, config: &ProviderRuntimeConfig) -> AdapterResult<bool> {
		if !config.use_live_call() {
			return Ok(true);
		}

		let url = format!("{}/v2/health", config.endpoint.trim_end_matches('/'));
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
		let adapter = ApexRateAdapter::new().unwrap();
		assert_eq!(adapter.id(), "apex-rate");
		assert_eq!(adapter.source(), QuoteSource::ApexRate);
	}

	#[test]
	fn test_payload_translates_liability_to_dollar_limits() {
		let request = test_utils::standard_request();
		let payload = ApexRateAdapter::build_payload(&request).unwrap();

		assert_eq!(payload.coverage_selections.bodily_injury_per_person, 100_000);
		assert_eq!(
			payload.coverage_selections.bodily_injury_per_accident,
			300_000
		);
		assert_eq!(payload.coverage_selections.property_damage, 50_000);
		assert_eq!(payload.applicants.len(), 1);
		assert_eq!(payload.vehicles[0].model_year, 2021);
	}

	#[tokio::test]
	async fn test_offline_config_serves_fallback_quotes() {
		let adapter = ApexRateAdapter::new().unwrap();
		let request = test_utils::standard_request();
		let config = ProviderRuntimeConfig::offline("apex-rate");

		let quotes = adapter.get_quotes(&request, &config).await.unwrap();
		assert_eq!(quotes.len(), 2);
		assert!(quotes.iter().all(|q| q.source == QuoteSource::ApexRate));
		assert!(quotes.iter().all(|q| q.quote_id.starts_with("APX-")));
		assert!(quotes.iter().all(|q| q.ai_score.is_none()));
	}

	#[tokio::test]
	async fn test_fallback_quotes_are_deterministic() {
		let adapter = ApexRateAdapter::new().unwrap();
		let request = test_utils::standard_request();
		let config = ProviderRuntimeConfig::offline("apex-rate");

		let first = adapter.get_quotes(&request, &config).await.unwrap();
		let second = adapter.get_quotes(&request, &config).await.unwrap();

		for (a, b) in first.iter().zip(second.iter()) {
			assert_eq!(a.carrier, b.carrier);
			assert_eq!(a.premium, b.premium);
			assert_eq!(a.discounts, b.discounts);
		}
	}
}
