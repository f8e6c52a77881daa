//! Coverline Adapters
//!
//! Provider-specific adapters for the Coverline quote aggregator. Each
//! adapter translates the canonical request into one provider's payload shape
//! and the provider's response back into canonical quotes; without
//! credentials (or outside the production profile) each serves its
//! deterministic fallback quote set instead.

pub mod apex_rate;
pub mod quantum_quote;
pub mod sureline;

mod rating;

pub use apex_rate::ApexRateAdapter;
pub use coverline_types::{AdapterError, AdapterResult, ProviderAdapter};
pub use quantum_quote::QuantumQuoteAdapter;
pub use sureline::SurelineAdapter;

use std::sync::Arc;

/// Registry of provider adapters in fan-out order
///
/// Registration order is the order the orchestrator queries providers and
/// flattens their results, so it must stay stable across runs.
pub struct AdapterRegistry {
	adapters: Vec<Arc<dyn ProviderAdapter>>,
}

impl AdapterRegistry {
	pub fn new() -> Self {
		Self {
			adapters: Vec::new(),
		}
	}

	/// Registry with the three standard providers registered
	pub fn with_defaults() -> AdapterResult<Self> {
		let mut registry = Self::new();
		registry.register(Arc::new(ApexRateAdapter::new()?));
		registry.register(Arc::new(SurelineAdapter::new()?));
		registry.register(Arc::new(QuantumQuoteAdapter::new()?));
		Ok(registry)
	}

	pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
		self.adapters.push(adapter);
	}

	pub fn get(&self, provider_id: &str) -> Option<Arc<dyn ProviderAdapter>> {
		self.adapters
			.iter()
			.find(|adapter| adapter.id() == provider_id)
			.cloned()
	}

	pub fn all(&self) -> &[Arc<dyn ProviderAdapter>] {
		&self.adapters
	}

	pub fn len(&self) -> usize {
		self.adapters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.adapters.is_empty()
	}
}

impl Default for AdapterRegistry {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_registry_order_is_stable() {
		let registry = AdapterRegistry::with_defaults().unwrap();
		let ids: Vec<&str> = registry.all().iter().map(|a| a.id()).collect();
		assert_eq!(ids, vec!["apex-rate", "sureline", "quantum-quote"]);
	}

	#[test]
	fn test_lookup_by_id() {
		let registry = AdapterRegistry::with_defaults().unwrap();
		assert!(registry.get("sureline").is_some());
		assert!(registry.get("unknown-provider").is_none());
	}
}
