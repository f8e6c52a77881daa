//! Scoring, ranking, and insight generation
//!
//! The composite score is a weighted sum of fixed design parameters and must
//! reproduce identical scores for identical inputs. Badge assignment is a
//! strict priority chain; reordering the rules changes which quote wins when
//! several conditions hold at once.

use tracing::debug;

use coverline_types::constants::{
	AI_RECOMMENDED_THRESHOLD, AI_WEIGHT, BINDABLE_BONUS, COVERAGE_WEIGHT, DISCOUNT_WEIGHT,
	NATIONAL_AVERAGE_ANNUAL_PREMIUM, PRICE_WEIGHT, RATING_WEIGHT, RECENT_VEHICLE_YEAR_THRESHOLD,
	RELIABILITY_WEIGHT,
};
use coverline_types::{
	Badge, Coverage, Quote, QuoteAnalysis, QuoteInsights, QuoteRequest, Recommendation,
	RiskAssessment, RiskLevel, SavingsOpportunity,
};

/// Composite score for one quote, 0 to roughly 105, uncapped
pub fn composite_score(quote: &Quote) -> f64 {
	let price_factor = (NATIONAL_AVERAGE_ANNUAL_PREMIUM / quote.premium.annual).min(2.0);
	let discount_factor = (quote.discounts.len() as f64 / 5.0).min(1.0);

	let mut score = price_factor * PRICE_WEIGHT
		+ coverage_quality(&quote.coverage) * COVERAGE_WEIGHT
		+ quote.rating_scale() * RATING_WEIGHT
		+ discount_factor * DISCOUNT_WEIGHT
		+ quote.source.reliability() * RELIABILITY_WEIGHT;

	if let Some(ai_score) = quote.ai_score {
		score += (ai_score / 100.0) * AI_WEIGHT;
	}
	if quote.bindable {
		score += BINDABLE_BONUS;
	}

	(score * 100.0).round() / 100.0
}

/// Coverage quality on a 0-1 scale from liability tier, deductible tier, and
/// add-on presence
pub fn coverage_quality(coverage: &Coverage) -> f64 {
	let liability_tier = coverage
		.liability_limits()
		.map(|limits| match limits.bodily_injury_per_person {
			250_000.. => 1.0,
			100_000..=249_999 => 0.8,
			50_000..=99_999 => 0.6,
			_ => 0.4,
		})
		.unwrap_or(0.4);

	let deductible_tier = match coverage.collision_deductible {
		0..=250 => 1.0,
		251..=500 => 0.8,
		501..=1000 => 0.6,
		_ => 0.4,
	};

	let addon_factor = (f64::from(coverage.addon_count()) / 5.0).min(1.0);

	0.5 * liability_tier + 0.3 * deductible_tier + 0.2 * addon_factor
}

/// Score, dedupe, sort, rank, badge, and analyze the union of all providers'
/// quotes
///
/// `quotes_by_source` arrives in provider fan-out order; that order breaks
/// duplicate-score ties (later insertion wins).
pub fn rank_and_analyze(quotes_by_source: Vec<Vec<Quote>>, request: &QuoteRequest) -> Vec<Quote> {
	let mut deduped: Vec<Quote> = Vec::new();

	for mut quote in quotes_by_source.into_iter().flatten() {
		quote.score = Some(composite_score(&quote));

		let key = (quote.carrier.clone(), quote.premium_bucket());
		match deduped
			.iter_mut()
			.find(|kept| kept.carrier == key.0 && kept.premium_bucket() == key.1)
		{
			// Later insertion wins ties
			Some(kept) if quote.score >= kept.score => {
				debug!(
					"Replacing duplicate quote for {} (bucket {})",
					key.0, key.1
				);
				*kept = quote;
			},
			Some(_) => {},
			None => deduped.push(quote),
		}
	}

	deduped.sort_by(|a, b| {
		b.score
			.partial_cmp(&a.score)
			.unwrap_or(std::cmp::Ordering::Equal)
			.then(
				a.premium
					.annual
					.partial_cmp(&b.premium.annual)
					.unwrap_or(std::cmp::Ordering::Equal),
			)
			.then_with(|| a.carrier.cmp(&b.carrier))
	});

	for (position, quote) in deduped.iter_mut().enumerate() {
		quote.rank = Some(position as u32 + 1);
	}

	assign_badges(&mut deduped);

	let average_annual = if deduped.is_empty() {
		0.0
	} else {
		deduped.iter().map(|q| q.premium.annual).sum::<f64>() / deduped.len() as f64
	};
	for quote in deduped.iter_mut() {
		quote.analysis = Some(analyze_quote(quote, average_annual, request));
	}

	deduped
}

/// Assign at most one badge per quote, first matching rule wins
fn assign_badges(quotes: &mut [Quote]) {
	let min_annual = quotes
		.iter()
		.map(|q| q.premium.annual)
		.fold(f64::INFINITY, f64::min);
	let max_bodily_injury = quotes
		.iter()
		.filter_map(|q| q.coverage.liability_limits().ok())
		.map(|limits| limits.bodily_injury_per_person)
		.max()
		.unwrap_or(0);

	for quote in quotes.iter_mut() {
		let bodily_injury = quote
			.coverage
			.liability_limits()
			.map(|limits| limits.bodily_injury_per_person)
			.unwrap_or(0);

		quote.badge = if quote.rank == Some(1) {
			Some(Badge::BestValue)
		} else if quote.premium.annual == min_annual {
			Some(Badge::LowestPrice)
		} else if quote.ai_score.is_some_and(|s| s >= AI_RECOMMENDED_THRESHOLD) {
			Some(Badge::AiRecommended)
		} else if max_bodily_injury > 0 && bodily_injury == max_bodily_injury {
			Some(Badge::BestCoverage)
		} else if quote.bindable {
			Some(Badge::InstantBind)
		} else {
			None
		};
	}
}

/// Advisory per-quote analysis; deterministic for identical inputs and never
/// used in scoring
fn analyze_quote(quote: &Quote, average_annual: f64, request: &QuoteRequest) -> QuoteAnalysis {
	let mut strengths = Vec::new();
	let mut considerations = Vec::new();

	if quote.premium.annual < average_annual {
		strengths.push("Annual premium below the average for this quote set".to_string());
	}
	if quote.rating_scale() >= 0.9 {
		strengths.push(format!(
			"Top-tier {} financial strength rating",
			quote.carrier_rating
		));
	}
	if quote.discounts.len() >= 3 {
		strengths.push(format!("{} discounts applied", quote.discounts.len()));
	}
	if quote.bindable {
		strengths.push("Can be bound online immediately".to_string());
	}

	if let Ok(limits) = quote.coverage.liability_limits() {
		if limits.bodily_injury_per_person < 100_000 {
			considerations
				.push("Liability limits are below commonly recommended levels".to_string());
		}
	}
	if quote.coverage.collision_deductible >= 1_000 {
		considerations
			.push("High collision deductible increases out-of-pocket cost after a claim"
				.to_string());
	}

	let driver_profile = match request.primary_driver().map(|d| d.age()) {
		Some(age) if age < 25 => "a younger driver still building a record",
		Some(age) if age > 65 => "a senior driver",
		_ => "an experienced driver",
	};
	let vehicle_profile = if request
		.vehicle_data
		.first()
		.is_some_and(|v| v.year > RECENT_VEHICLE_YEAR_THRESHOLD)
	{
		"a newer vehicle"
	} else {
		"an older vehicle"
	};
	let suitability = format!(
		"Well suited to {} insuring {}",
		driver_profile, vehicle_profile
	);

	QuoteAnalysis {
		strengths,
		considerations,
		suitability,
	}
}

/// Coarse risk assessment of the applicant profile
///
/// Base score 50; younger and senior drivers raise it, a recent-model-year
/// vehicle and a multi-vehicle policy lower it.
pub fn risk_assessment(request: &QuoteRequest) -> RiskAssessment {
	let mut score = 50;
	let mut factors = Vec::new();

	if let Some(age) = request.primary_driver().map(|d| d.age()) {
		if age < 25 {
			score += 20;
			factors.push("Primary driver under 25".to_string());
		} else if age > 65 {
			score += 10;
			factors.push("Primary driver over 65".to_string());
		}
	}
	if request
		.vehicle_data
		.first()
		.is_some_and(|v| v.year > RECENT_VEHICLE_YEAR_THRESHOLD)
	{
		score -= 10;
		factors.push("Recent model year vehicle".to_string());
	}
	if request.is_multi_vehicle() {
		score -= 5;
		factors.push("Multi-vehicle policy".to_string());
	}

	RiskAssessment {
		score,
		level: RiskLevel::from_score(score),
		factors,
	}
}

/// Aggregate insights over the scored, ranked quote set
pub fn build_insights(quotes: &[Quote], request: &QuoteRequest) -> QuoteInsights {
	let lowest = quotes
		.iter()
		.map(|q| q.premium.annual)
		.fold(f64::INFINITY, f64::min);
	let highest = quotes
		.iter()
		.map(|q| q.premium.annual)
		.fold(f64::NEG_INFINITY, f64::max);
	let average = if quotes.is_empty() {
		0.0
	} else {
		quotes.iter().map(|q| q.premium.annual).sum::<f64>() / quotes.len() as f64
	};

	let summary = format!(
		"Found {} quotes with annual premiums from ${:.2} to ${:.2}",
		quotes.len(),
		lowest,
		highest
	);

	let recommendations = quotes
		.iter()
		.take(3)
		.map(|quote| Recommendation {
			rank: quote.rank.unwrap_or(0),
			carrier: quote.carrier.clone(),
			reason: match quote.badge {
				Some(Badge::BestValue) => "Best overall value across price, coverage, and carrier strength".to_string(),
				Some(Badge::LowestPrice) => "Lowest annual premium in this quote set".to_string(),
				Some(Badge::AiRecommended) => "Highest AI confidence match for this profile".to_string(),
				Some(Badge::BestCoverage) => "Strongest liability protection in this quote set".to_string(),
				Some(Badge::InstantBind) => "Can be bound online immediately".to_string(),
				None => "Competitive option worth comparing".to_string(),
			},
		})
		.collect();

	let savings_amount = ((highest - lowest) * 100.0).round() / 100.0;
	let savings_percentage = if highest > 0.0 {
		((savings_amount / highest) * 1000.0).round() / 10.0
	} else {
		0.0
	};
	let savings_opportunity = SavingsOpportunity {
		amount: savings_amount,
		percentage: savings_percentage,
		message: format!(
			"Choosing the lowest-priced quote saves ${:.2} per year ({:.1}%) over the highest",
			savings_amount, savings_percentage
		),
	};

	let market_analysis = if average < NATIONAL_AVERAGE_ANNUAL_PREMIUM {
		format!(
			"Average quoted premium of ${:.2} is below the national average of ${:.2}",
			average, NATIONAL_AVERAGE_ANNUAL_PREMIUM
		)
	} else {
		format!(
			"Average quoted premium of ${:.2} is above the national average of ${:.2}",
			average, NATIONAL_AVERAGE_ANNUAL_PREMIUM
		)
	};

	QuoteInsights {
		summary,
		recommendations,
		savings_opportunity,
		risk_assessment: risk_assessment(request),
		market_analysis,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use coverline_types::test_utils;
	use coverline_types::QuoteSource;

	#[test]
	fn test_score_is_deterministic() {
		let quote = test_utils::quote("Sentinel Mutual", 1400.0, QuoteSource::ApexRate);
		assert_eq!(composite_score(&quote), composite_score(&quote.clone()));
	}

	#[test]
	fn test_cheaper_quote_scores_higher_all_else_equal() {
		let cheap = test_utils::quote("Sentinel Mutual", 1200.0, QuoteSource::ApexRate);
		let pricey = test_utils::quote("Sentinel Mutual", 1800.0, QuoteSource::ApexRate);
		assert!(composite_score(&cheap) > composite_score(&pricey));
	}

	#[test]
	fn test_price_factor_is_capped() {
		// At half the national average the price factor saturates at 2
		let very_cheap = test_utils::quote("Sentinel Mutual", 400.0, QuoteSource::ApexRate);
		let cheap = test_utils::quote("Sentinel Mutual", 800.0, QuoteSource::ApexRate);
		assert_eq!(composite_score(&very_cheap), composite_score(&cheap));
	}

	#[test]
	fn test_duplicates_collapse_to_one() {
		let request = test_utils::standard_request();
		// Same carrier, premiums in the same hundred-dollar bucket
		let a = test_utils::quote("Sentinel Mutual", 1210.0, QuoteSource::ApexRate);
		let b = test_utils::quote("Sentinel Mutual", 1190.0, QuoteSource::Sureline);
		let c = test_utils::quote("Harbor National", 1400.0, QuoteSource::Sureline);

		let ranked = rank_and_analyze(vec![vec![a], vec![b, c]], &request);
		assert_eq!(ranked.len(), 2);

		let carriers: Vec<&str> = ranked.iter().map(|q| q.carrier.as_str()).collect();
		assert!(carriers.contains(&"Sentinel Mutual"));
		assert!(carriers.contains(&"Harbor National"));
	}

	#[test]
	fn test_duplicate_keeps_higher_scored_entry() {
		let request = test_utils::standard_request();
		let mut weak = test_utils::quote("Sentinel Mutual", 1210.0, QuoteSource::ApexRate);
		weak.carrier_rating = "B+".to_string();
		let mut strong = test_utils::quote("Sentinel Mutual", 1190.0, QuoteSource::Sureline);
		strong.carrier_rating = "A++".to_string();

		let ranked = rank_and_analyze(vec![vec![strong.clone()], vec![weak]], &request);
		assert_eq!(ranked.len(), 1);
		assert_eq!(ranked[0].carrier_rating, "A++");
		assert_eq!(ranked[0].premium.annual, 1190.0);
	}

	#[test]
	fn test_ranks_are_sequential_from_one() {
		let request = test_utils::standard_request();
		let quotes = vec![
			vec![
				test_utils::quote("Sentinel Mutual", 1557.0, QuoteSource::ApexRate),
				test_utils::quote("Granite State Auto", 1703.0, QuoteSource::ApexRate),
			],
			vec![
				test_utils::quote("Harbor National", 1816.0, QuoteSource::Sureline),
				test_utils::quote("Bluepeak Insurance", 1590.0, QuoteSource::Sureline),
			],
			vec![
				test_utils::quote("Meridian Direct", 1508.0, QuoteSource::QuantumQuote),
				test_utils::quote("Northwind Assurance", 1752.0, QuoteSource::QuantumQuote),
			],
		];

		let ranked = rank_and_analyze(quotes, &request);
		assert_eq!(ranked.len(), 6);
		let ranks: Vec<u32> = ranked.iter().filter_map(|q| q.rank).collect();
		assert_eq!(ranks, vec![1, 2, 3, 4, 5, 6]);

		// Scores are non-increasing down the ranking
		for pair in ranked.windows(2) {
			assert!(pair[0].score >= pair[1].score);
		}
	}

	#[test]
	fn test_rank_one_takes_best_value_even_when_cheapest() {
		let request = test_utils::standard_request();
		let quotes = vec![vec![
			test_utils::quote("Sentinel Mutual", 1200.0, QuoteSource::ApexRate),
			test_utils::quote("Harbor National", 1500.0, QuoteSource::ApexRate),
		]];

		let ranked = rank_and_analyze(quotes, &request);
		// Cheapest quote wins rank 1, so BEST_VALUE shadows LOWEST_PRICE
		assert_eq!(ranked[0].premium.annual, 1200.0);
		assert_eq!(ranked[0].badge, Some(Badge::BestValue));
		assert_ne!(ranked[1].badge, Some(Badge::LowestPrice));
	}

	#[test]
	fn test_lowest_price_badge_when_cheapest_is_not_rank_one() {
		let request = test_utils::standard_request();
		// Cheap but weak carrier loses rank 1 to a much stronger quote
		let mut weak_cheap = test_utils::quote("Bluepeak Insurance", 1560.0, QuoteSource::Sureline);
		weak_cheap.carrier_rating = "C".to_string();
		weak_cheap.bindable = false;
		let mut strong = test_utils::quote("Harbor National", 1600.0, QuoteSource::Sureline);
		strong.carrier_rating = "A++".to_string();

		let ranked = rank_and_analyze(vec![vec![weak_cheap, strong]], &request);
		assert_eq!(ranked[0].carrier, "Harbor National");
		assert_eq!(ranked[0].badge, Some(Badge::BestValue));
		assert_eq!(ranked[1].carrier, "Bluepeak Insurance");
		assert_eq!(ranked[1].badge, Some(Badge::LowestPrice));
	}

	#[test]
	fn test_ai_recommended_badge_requires_threshold() {
		let request = test_utils::standard_request();
		let strong = test_utils::quote("Harbor National", 1400.0, QuoteSource::Sureline);
		let cheap = test_utils::quote("Bluepeak Insurance", 1399.0, QuoteSource::Sureline);
		// Expensive and weakly rated, so it can take neither rank 1 nor the
		// lowest-price badge
		let mut ai_high = test_utils::quote("Meridian Direct", 1900.0, QuoteSource::QuantumQuote)
			.with_ai_assessment(96.0, "Strong match");
		ai_high.carrier_rating = "B+".to_string();
		ai_high.bindable = false;
		let mut ai_low = test_utils::quote("Northwind Assurance", 1890.0, QuoteSource::QuantumQuote)
			.with_ai_assessment(90.0, "Decent match");
		ai_low.carrier_rating = "B+".to_string();
		ai_low.bindable = false;

		let ranked = rank_and_analyze(vec![vec![strong, cheap], vec![ai_high, ai_low]], &request);
		let meridian = ranked.iter().find(|q| q.carrier == "Meridian Direct").unwrap();
		let northwind = ranked
			.iter()
			.find(|q| q.carrier == "Northwind Assurance")
			.unwrap();

		assert_eq!(meridian.badge, Some(Badge::AiRecommended));
		assert_ne!(northwind.badge, Some(Badge::AiRecommended));
	}

	#[test]
	fn test_risk_assessment_rules() {
		let mut request = test_utils::standard_request();
		// 30-year-old driver, 2021 vehicle, single vehicle: 50 - 10 = 40
		let assessment = risk_assessment(&request);
		assert_eq!(assessment.score, 40);
		assert_eq!(assessment.level, RiskLevel::Standard);

		// Young driver pushes risk high: 50 + 20 - 10 = 60 -> Standard edge
		request.driver_data[0].date_of_birth = NaiveDate::from_ymd_opt(2004, 6, 1).unwrap();
		let assessment = risk_assessment(&request);
		assert_eq!(assessment.score, 60);
		assert_eq!(assessment.level, RiskLevel::Standard);

		// Older, multi-vehicle household with an old car: 50 + 10 - 5 = 55
		request.driver_data[0].date_of_birth = NaiveDate::from_ymd_opt(1955, 6, 1).unwrap();
		request.vehicle_data[0].year = 2012;
		request.vehicle_data.push(test_utils::vehicle_2021_sedan());
		request.vehicle_data[1].year = 2010;
		let assessment = risk_assessment(&request);
		assert_eq!(assessment.score, 55);
	}

	#[test]
	fn test_savings_opportunity() {
		let request = test_utils::standard_request();
		let quotes = rank_and_analyze(
			vec![vec![
				test_utils::quote("Sentinel Mutual", 1200.0, QuoteSource::ApexRate),
				test_utils::quote("Harbor National", 1600.0, QuoteSource::ApexRate),
			]],
			&request,
		);

		let insights = build_insights(&quotes, &request);
		assert_eq!(insights.savings_opportunity.amount, 400.0);
		assert_eq!(insights.savings_opportunity.percentage, 25.0);
		assert_eq!(insights.recommendations.len(), 2);
		assert_eq!(insights.recommendations[0].rank, 1);
	}
}
