//! Coverline Aggregator Server
//!
//! Main entry point for the Coverline quote aggregation service.

use coverline::AggregatorBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	AggregatorBuilder::new().start_server().await
}
