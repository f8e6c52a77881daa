//! Global limits and fixed design parameters

/// Default TTL for cached aggregation responses in seconds
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;

/// Interval between background sweeps of expired cache entries in seconds
pub const DEFAULT_CACHE_SWEEP_INTERVAL_SECONDS: u64 = 60;

/// Default per-provider timeout in milliseconds
pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 5_000;

/// Number of logical providers queried per aggregation
pub const PROVIDERS_QUERIED: u32 = 3;

/// How long a generated quote stays retrievable, in days
pub const QUOTE_VALIDITY_DAYS: i64 = 30;

/// How long a saved quote session stays retrievable, in days
pub const SAVED_SESSION_VALIDITY_DAYS: i64 = 30;

/// Rolling response-time window size (oldest samples discarded first)
pub const RESPONSE_TIME_WINDOW_CAPACITY: usize = 1_000;

/// Recent-error ring buffer size
pub const RECENT_ERROR_CAPACITY: usize = 100;

/// Error rate over total requests above which health degrades
pub const DEGRADED_ERROR_RATE: f64 = 0.10;

/// Average response time in milliseconds above which health degrades
pub const DEGRADED_AVG_RESPONSE_TIME_MS: f64 = 5_000.0;

/// Recent-error count above which health degrades
pub const DEGRADED_RECENT_ERROR_COUNT: usize = 50;

/// Default rate limit: requests per window on the generate endpoint
pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 30;

/// Rate limit window duration in seconds
pub const RATE_LIMIT_WINDOW_SECONDS: u64 = 60;

// ---- Scoring model (fixed design parameters, not runtime-configurable) ----

/// National average annual premium used as the price-factor baseline
pub const NATIONAL_AVERAGE_ANNUAL_PREMIUM: f64 = 1_622.0;

/// Weight of the price factor in the composite score
pub const PRICE_WEIGHT: f64 = 40.0;

/// Weight of the coverage-quality factor
pub const COVERAGE_WEIGHT: f64 = 20.0;

/// Weight of the carrier-rating factor
pub const RATING_WEIGHT: f64 = 20.0;

/// Weight of the AI-confidence factor (only applied when a score is present)
pub const AI_WEIGHT: f64 = 10.0;

/// Weight of the discount-count factor
pub const DISCOUNT_WEIGHT: f64 = 5.0;

/// Weight of the per-source reliability factor
pub const RELIABILITY_WEIGHT: f64 = 5.0;

/// Flat bonus applied to instantly bindable quotes
pub const BINDABLE_BONUS: f64 = 5.0;

/// AI score at or above which a quote qualifies for the AI_RECOMMENDED badge
pub const AI_RECOMMENDED_THRESHOLD: f64 = 95.0;

/// Vehicles newer than this model year reduce the risk score
pub const RECENT_VEHICLE_YEAR_THRESHOLD: u16 = 2020;
