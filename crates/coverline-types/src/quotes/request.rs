//! Quote request model and validation

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{QuoteValidationError, QuoteValidationResult};

/// Normalized quote request submitted to the aggregation pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
	pub vehicle_data: Vec<Vehicle>,
	pub driver_data: Vec<Driver>,
	pub coverage: Coverage,
	pub session_id: String,
}

/// A vehicle on the requested policy. Immutable once submitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
	pub year: u16,
	pub make: String,
	pub model: String,
	pub vin: String,
	/// Usage category, e.g. "commute", "pleasure", "business"
	pub usage: String,
	pub annual_mileage: u32,
	pub garaging_zip: String,
	/// Ownership type, e.g. "owned", "financed", "leased"
	pub ownership: String,
}

/// A driver on the requested policy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
	pub first_name: String,
	pub last_name: String,
	pub date_of_birth: NaiveDate,
	pub license_number: String,
	pub license_state: String,
	/// Moving violations in the lookback window
	#[serde(default)]
	pub violations: u32,
	/// At-fault claims in the lookback window
	#[serde(default)]
	pub at_fault_claims: u32,
	pub email: String,
	pub phone: String,
	pub address: DriverAddress,
}

/// Mailing address for a driver
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriverAddress {
	pub street: String,
	pub city: String,
	pub state: String,
	pub zip: String,
}

impl Driver {
	/// Age in whole years as of `today`
	pub fn age_on(&self, today: NaiveDate) -> u32 {
		today.years_since(self.date_of_birth).unwrap_or(0)
	}

	/// Age in whole years as of the current date
	pub fn age(&self) -> u32 {
		self.age_on(Utc::now().date_naive())
	}
}

/// Requested coverage selections
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
	/// Liability limits as a BI/BI/PD string in thousands, e.g. "100/300/50"
	pub liability: String,
	pub collision_deductible: u32,
	pub comprehensive_deductible: u32,
	pub uninsured_motorist: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub uninsured_motorist_limits: Option<String>,
	pub medical_payments: u32,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub personal_injury_protection: Option<u32>,
	#[serde(default)]
	pub rental_reimbursement: bool,
	#[serde(default)]
	pub roadside_assistance: bool,
}

/// Liability limits parsed out of the "BI/BI/PD" string, in dollars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiabilityLimits {
	pub bodily_injury_per_person: u32,
	pub bodily_injury_per_accident: u32,
	pub property_damage: u32,
}

impl Coverage {
	/// Parse the liability string ("100/300/50") into dollar limits.
	///
	/// Each component is expressed in thousands on the wire, so "100/300/50"
	/// becomes $100,000 / $300,000 / $50,000.
	pub fn liability_limits(&self) -> QuoteValidationResult<LiabilityLimits> {
		let parts: Vec<&str> = self.liability.split('/').collect();
		if parts.len() != 3 {
			return Err(QuoteValidationError::InvalidLiabilityFormat {
				value: self.liability.clone(),
			});
		}

		let mut limits = [0u32; 3];
		for (i, part) in parts.iter().enumerate() {
			// Components are in thousands; anything whose dollar value does
			// not fit in u32 is rejected, not wrapped
			limits[i] = part
				.trim()
				.parse::<u32>()
				.ok()
				.and_then(|thousands| thousands.checked_mul(1_000))
				.ok_or_else(|| QuoteValidationError::InvalidLiabilityFormat {
					value: self.liability.clone(),
				})?;
		}

		Ok(LiabilityLimits {
			bodily_injury_per_person: limits[0],
			bodily_injury_per_accident: limits[1],
			property_damage: limits[2],
		})
	}

	/// Count of optional add-on coverages present on the request
	pub fn addon_count(&self) -> u32 {
		let mut count = 0;
		if self.uninsured_motorist {
			count += 1;
		}
		if self.medical_payments > 0 {
			count += 1;
		}
		if self.personal_injury_protection.unwrap_or(0) > 0 {
			count += 1;
		}
		if self.rental_reimbursement {
			count += 1;
		}
		if self.roadside_assistance {
			count += 1;
		}
		count
	}
}

impl QuoteRequest {
	/// Validate the request before it reaches the provider network
	///
	/// Applied validations:
	/// - at least one vehicle and one driver
	/// - liability string parses as BI/BI/PD
	/// - vehicle years within a plausible range
	pub fn validate(&self) -> QuoteValidationResult<()> {
		if self.vehicle_data.is_empty() {
			return Err(QuoteValidationError::NoVehicles);
		}
		if self.driver_data.is_empty() {
			return Err(QuoteValidationError::NoDrivers);
		}

		self.coverage.liability_limits()?;

		let next_model_year = (Utc::now().year() + 1) as u16;
		for vehicle in &self.vehicle_data {
			if vehicle.year < 1980 || vehicle.year > next_model_year {
				return Err(QuoteValidationError::InvalidVehicleYear {
					year: vehicle.year,
				});
			}
			if vehicle.garaging_zip.is_empty() {
				return Err(QuoteValidationError::MissingRequiredField {
					field: "vehicleData.garagingZip".to_string(),
				});
			}
		}

		Ok(())
	}

	/// Whether the request covers more than one vehicle (multi-vehicle discount)
	pub fn is_multi_vehicle(&self) -> bool {
		self.vehicle_data.len() > 1
	}

	/// The first listed driver, treated as the primary applicant
	pub fn primary_driver(&self) -> Option<&Driver> {
		self.driver_data.first()
	}
}
