//! Coverline API
//!
//! Axum-based HTTP surface for the Coverline quote aggregator.

pub mod handlers;
pub mod rate_limit;
pub mod router;
pub mod state;

pub use rate_limit::{RateLimitPolicy, RateLimiter};
pub use router::create_router;
pub use state::AppState;
