//! Shared test fixtures for unit and integration tests
//!
//! Kept in the library (not behind `cfg(test)`) so downstream crates and the
//! integration suite can build requests and quotes without repeating
//! boilerplate.

use chrono::NaiveDate;

use crate::quotes::{
	Coverage, Driver, DriverAddress, Premium, Quote, QuoteRequest, QuoteSource, Vehicle,
};

/// A 2021 mid-size sedan, commuter profile
pub fn vehicle_2021_sedan() -> Vehicle {
	Vehicle {
		year: 2021,
		make: "Honda".to_string(),
		model: "Accord".to_string(),
		vin: "1HGCV1F34MA052780".to_string(),
		usage: "commute".to_string(),
		annual_mileage: 12_000,
		garaging_zip: "78701".to_string(),
		ownership: "financed".to_string(),
	}
}

/// A clean-record driver born 1996-03-15 (age 30 in mid-2026)
pub fn driver_aged_30() -> Driver {
	Driver {
		first_name: "Jordan".to_string(),
		last_name: "Reyes".to_string(),
		date_of_birth: NaiveDate::from_ymd_opt(1996, 3, 15).unwrap(),
		license_number: "D12345678".to_string(),
		license_state: "TX".to_string(),
		violations: 0,
		at_fault_claims: 0,
		email: "jordan.reyes@example.com".to_string(),
		phone: "512-555-0142".to_string(),
		address: DriverAddress {
			street: "810 Congress Ave".to_string(),
			city: "Austin".to_string(),
			state: "TX".to_string(),
			zip: "78701".to_string(),
		},
	}
}

/// 100/300/50 liability with mid-range deductibles and three add-ons
pub fn standard_coverage() -> Coverage {
	Coverage {
		liability: "100/300/50".to_string(),
		collision_deductible: 500,
		comprehensive_deductible: 500,
		uninsured_motorist: true,
		uninsured_motorist_limits: Some("100/300".to_string()),
		medical_payments: 5_000,
		personal_injury_protection: None,
		rental_reimbursement: true,
		roadside_assistance: false,
	}
}

/// One 2021 sedan, one 30-year-old driver, standard coverage
pub fn standard_request() -> QuoteRequest {
	QuoteRequest {
		vehicle_data: vec![vehicle_2021_sedan()],
		driver_data: vec![driver_aged_30()],
		coverage: standard_coverage(),
		session_id: "sess-test-0001".to_string(),
	}
}

/// A bindable A-rated quote for the given carrier and annual premium
pub fn quote(carrier: &str, annual: f64, source: QuoteSource) -> Quote {
	Quote::new(
		carrier,
		format!(
			"https://cdn.coverline.example/logos/{}.svg",
			carrier.to_lowercase().replace(' ', "-")
		),
		Premium::from_annual(annual),
		standard_coverage(),
		"A",
		source,
		true,
	)
}
