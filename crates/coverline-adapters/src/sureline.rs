//! Sureline adapter implementation
//!
//! Sureline's API speaks camelCase JSON, rates on six-month terms, and
//! reports premiums as a term total. The annual figure is reconstructed on
//! translation since the canonical premium is annual-first.

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

/// Sureline rating request payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SurelineRatingRequest {
	term_months: u8,
	drivers: Vec<SurelineDriver>,
	autos: Vec<SurelineAuto>,
	limits: SurelineLimits,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SurelineDriver {
	name: String,
	birth_date: String,
	license_state: String,
	incident_count: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SurelineAuto {
	year: u16,
	make: String,
	model: String,
	vin: String,
	usage: String,
	zip: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SurelineLimits {
	bodily_injury_person: u32,
	bodily_injury_accident: u32,
	property_damage: u32,
	collision_deductible: u32,
	comprehensive_deductible: u32,
	include_uninsured_motorist: bool,
	medical_limit: u32,
}

/// Sureline rating response models
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SurelineRatingResponse {
	offers: Vec<SurelineOffer>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SurelineOffer {
	carrier: String,
	/// Six-month term premium; annual is derived on translation
	term_premium: f64,
	am_best_rating: Option<String>,
	#[serde(default)]
	credits: Vec<SurelineCredit>,
	#[serde(default)]
	online_bindable: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SurelineCredit {
	label: String,
	value: f64,
}

/// Sureline provider adapter
#[derive(Debug)]
pub struct SurelineAdapter {
	info: ProviderInfo,
	client: Client,
}

impl SurelineAdapter {
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
				QuoteSource::Sureline.as_str(),
				"Sureline",
				"Sureline direct-to-carrier rating gateway",
				"1.0.0",
			),
			client,
		})
	}

	fn build_payload(request: &QuoteRequest) -> AdapterResult<SurelineRatingRequest> {
		let limits = request
			.coverage
			.liability_limits()
			.map_err(|e| AdapterError::InvalidResponse {
				reason: format!("Unrateable coverage: {}", e),
			})?;

		Ok(SurelineRatingRequest {
			term_months: 6,
			drivers: request
				.driver_data
				.iter()
				.map(|driver| SurelineDriver {
					name: format!("{} {}", driver.first_name, driver.last_name),
					birth_date: driver.date_of_birth.format("%Y-%m-%d").to_string(),
					license_state: driver.license_state.clone(),
					incident_count: driver.violations + driver.at_fault_claims,
				})
				.collect(),
			autos: request
				.vehicle_data
				.iter()
				.map(|vehicle| SurelineAuto {
					year: vehicle.year,
					make: vehicle.make.clone(),
					model: vehicle.model.clone(),
					vin: vehicle.vin.clone(),
					usage: vehicle.usage.clone(),
					zip: vehicle.garaging_zip.clone(),
				})
				.collect(),
			limits: SurelineLimits {
				bodily_injury_person: limits.bodily_injury_per_person,
				bodily_injury_accident: limits.bodily_injury_per_accident,
				property_damage: limits.property_damage,
				collision_deductible: request.coverage.collision_deductible,
				comprehensive_deductible: request.coverage.comprehensive_deductible,
				include_uninsured_motorist: request.coverage.uninsured_motorist,
				medical_limit: request.coverage.medical_payments,
			},
		})
	}

	fn translate_offer(&self, offer: SurelineOffer, request: &QuoteRequest) -> Quote {
		// Sureline quotes six-month terms; the canonical premium is annual
		let annual = round_cents(offer.term_premium * 2.0);

		Quote::new(
			offer.carrier.clone(),
			Self::logo_url(&offer.carrier),
			Premium::from_annual(annual),
			request.coverage.clone(),
			offer.am_best_rating.unwrap_or_else(|| "A-".to_string()),
			QuoteSource::Sureline,
			offer.online_bindable,
		)
		.with_discounts(
			offer
				.credits
				.into_iter()
				.map(|c| Discount {
					name: c.label,
					amount: c.value,
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
			if driver.violations == 0 {
				discounts.push(Discount {
					name: "Clean Record".to_string(),
					amount: round_cents(annual * 0.07),
				});
			}
		}
		if request.coverage.addon_count() >= 3 {
			discounts.push(Discount {
				name: "Full Coverage Bundle".to_string(),
				amount: round_cents(annual * 0.04),
			});
		}

		discounts
	}

	fn fallback_quotes(&self, request: &QuoteRequest) -> Vec<Quote> {
		let baseline = baseline_annual_premium(request);

		let harbor_annual = round_cents(baseline * 1.12);
		let bluepeak_annual = round_cents(baseline * 0.98);

		vec![
			Quote::new(
				"Harbor National",
				Self::logo_url("Harbor National"),
				Premium::from_annual(harbor_annual),
				request.coverage.clone(),
				"A++",
				QuoteSource::Sureline,
				true,
			)
			.with_discounts(Self::standard_discounts(request, harbor_annual)),
			Quote::new(
				"Bluepeak Insurance",
				Self::logo_url("Bluepeak Insurance"),
				Premium::from_annual(bluepeak_annual),
				request.coverage.clone(),
				"B++",
				QuoteSource::Sureline,
				false,
			)
			.with_discounts(Self::standard_discounts(request, bluepeak_annual)),
		]
	}

	async fn fetch_live_quotes(
		&self,
		request: &QuoteRequest,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<Vec<Quote>> {
		let payload = Self::build_payload(request)?;
		let url = format!("{}/rating/offers", config.endpoint.trim_end_matches('/'));

		let mut http_request = self.client.post(&url).json(&payload);
		if let Some(api_key) = &config.api_key {
			http_request = http_request.bearer_auth(api_key.expose_secret());
		}

		let response = timeout(Duration::from_millis(config.timeout_ms), http_request.send())
			.await
			.map_err(|_| AdapterError::Timeout {
				timeout_ms: config.timeout_ms,
			})??;

		if !response.status().is_success() {
			return Err(AdapterError::from_http_failure(response.status().as_u16()));
		}

		let rating_response: SurelineRatingResponse = response.json().await?;
		Ok(rating_response
			.offers
			.into_iter()
			.map(|offer| self.translate_offer(offer, request))
			.collect())
	}
}

#[async_trait]
impl ProviderAdapter for SurelineAdapter {
	fn provider_info(&self) -> &ProviderInfo {
		&self.info
	}

	fn source(&self) -> QuoteSource {
		QuoteSource::Sureline
	}

	async fn get_quotes(
		&self,
		request: &QuoteRequest,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<Vec<Quote>> {
		if !config.use_live_call() {
			debug!("Sureline serving deterministic fallback quotes");
			return Ok(self.fallback_quotes(request));
		}

		self.fetch_live_quotes(request, config).await
	}

	async fn health_check(&self, config: &ProviderRuntimeConfig) -> AdapterResult<bool> {
		if !config.use_live_call() {
			return Ok(true);
		}

		let url = format!("{}/rating/health", config.endpoint.trim_end_matches('/'));
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
