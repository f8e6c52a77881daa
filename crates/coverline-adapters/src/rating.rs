//! Shared deterministic rating base for fallback quote generation
//!
//! Every adapter's fallback path starts from the same request-derived annual
//! premium and applies its own carrier factors on top. The derivation is a
//! pure function of the request, so repeated calls with the same request
//! always produce the same premiums.

use coverline_types::constants::{
	NATIONAL_AVERAGE_ANNUAL_PREMIUM, RECENT_VEHICLE_YEAR_THRESHOLD,
};
use coverline_types::{round_cents, QuoteRequest};

/// Derive a baseline annual premium from the request's risk profile
pub(crate) fn baseline_annual_premium(request: &QuoteRequest) -> f64 {
	let mut premium = NATIONAL_AVERAGE_ANNUAL_PREMIUM;

	if let Some(driver) = request.primary_driver() {
		let age = driver.age();
		if age < 25 {
			premium *= 1.45;
		} else if age > 65 {
			premium *= 1.18;
		}
		premium += f64::from(driver.violations) * 180.0;
		premium += f64::from(driver.at_fault_claims) * 265.0;
	}

	// Each additional vehicle adds most of another single-vehicle premium
	let extra_vehicles = request.vehicle_data.len().saturating_sub(1);
	premium *= 1.0 + 0.72 * extra_vehicles as f64;

	if let Some(vehicle) = request.vehicle_data.first() {
		if vehicle.year > RECENT_VEHICLE_YEAR_THRESHOLD {
			premium *= 1.06;
		}
		if vehicle.annual_mileage > 15_000 {
			premium *= 1.08;
		}
	}

	if let Ok(limits) = request.coverage.liability_limits() {
		if limits.bodily_injury_per_person >= 250_000 {
			premium *= 1.12;
		} else if limits.bodily_injury_per_person < 50_000 {
			premium *= 0.91;
		}
	}

	premium *= match request.coverage.collision_deductible {
		0..=250 => 1.09,
		251..=500 => 1.0,
		_ => 0.94,
	};

	round_cents(premium)
}

#[cfg(test)]
mod tests {
	use super::*;
	use coverline_types::test_utils;

	#[test]
	fn test_baseline_is_deterministic() {
		let request = test_utils::standard_request();
		assert_eq!(
			baseline_annual_premium(&request),
			baseline_annual_premium(&request.clone())
		);
	}

	#[test]
	fn test_violations_raise_the_baseline() {
		let clean = test_utils::standard_request();
		let mut dinged = clean.clone();
		dinged.driver_data[0].violations = 2;

		assert!(baseline_annual_premium(&dinged) > baseline_annual_premium(&clean));
	}

	#[test]
	fn test_second_vehicle_raises_the_baseline() {
		let single = test_utils::standard_request();
		let mut multi = single.clone();
		multi.vehicle_data.push(test_utils::vehicle_2021_sedan());

		assert!(baseline_annual_premium(&multi) > baseline_annual_premium(&single));
	}
}
