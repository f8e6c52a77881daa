//! In-memory storage implementation using DashMap with TTL support

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, info};

use coverline_types::Quote;

use crate::traits::{
	CacheBackend, SavedSession, Storage, StorageResult, StorageStats,
};

/// One cached response payload with its expiry timestamp
#[derive(Debug, Clone)]
struct CacheEntry {
	payload: String,
	expires_at: DateTime<Utc>,
}

impl CacheEntry {
	fn is_expired(&self) -> bool {
		self.expires_at <= Utc::now()
	}
}

/// In-memory store for cached responses, generated quotes, and saved
/// sessions, with lazy eviction on read plus a background sweep
#[derive(Clone, Default)]
pub struct MemoryStore {
	cache: Arc<DashMap<String, CacheEntry>>,
	quotes: Arc<DashMap<String, Quote>>,
	sessions: Arc<DashMap<String, SavedSession>>,
}

impl MemoryStore {
	/// Create a new memory store instance
	pub fn new() -> Self {
		Self {
			cache: Arc::new(DashMap::new()),
			quotes: Arc::new(DashMap::new()),
			sessions: Arc::new(DashMap::new()),
		}
	}

	/// Start the background sweep that removes expired entries on a fixed
	/// interval, independent of read traffic
	pub fn start_ttl_sweep(&self, sweep_every: Duration) -> tokio::task::JoinHandle<()> {
		let store = self.clone();
		tokio::spawn(async move {
			let mut sweep_interval = interval(sweep_every);

			loop {
				sweep_interval.tick().await;
				let removed = store.sweep_expired();
				if removed > 0 {
					debug!("TTL sweep removed {} expired entries", removed);
				}
			}
		})
	}

	/// Remove every expired cache entry, quote, and session immediately
	pub fn sweep_expired(&self) -> usize {
		let now = Utc::now();
		let mut removed = 0;

		self.cache.retain(|_key, entry| {
			if entry.expires_at <= now {
				removed += 1;
				false
			} else {
				true
			}
		});

		self.quotes.retain(|_key, quote| {
			if quote.expiration_date <= now {
				removed += 1;
				false
			} else {
				true
			}
		});

		self.sessions.retain(|_key, session| {
			if session.expires_at <= now {
				removed += 1;
				false
			} else {
				true
			}
		});

		removed
	}

	/// Number of cache entries currently held, expired or not
	pub fn cache_len(&self) -> usize {
		self.cache.len()
	}
}

#[async_trait]
impl CacheBackend for MemoryStore {
	async fn get(&self, key: &str) -> StorageResult<Option<String>> {
		if let Some(entry) = self.cache.get(key) {
			if entry.is_expired() {
				drop(entry);
				self.cache.remove(key);
				return Ok(None);
			}
			return Ok(Some(entry.payload.clone()));
		}
		Ok(None)
	}

	async fn set(&self, key: &str, value: String, ttl: Duration) -> StorageResult<()> {
		let entry = CacheEntry {
			payload: value,
			expires_at: Utc::now() + ChronoDuration::seconds(ttl.as_secs() as i64),
		};
		self.cache.insert(key.to_string(), entry);
		Ok(())
	}

	async fn remove(&self, key: &str) -> StorageResult<bool> {
		Ok(self.cache.remove(key).is_some())
	}

	async fn health_check(&self) -> StorageResult<bool> {
		Ok(true)
	}
}

#[async_trait]
impl Storage for MemoryStore {
	async fn add_quote(&self, quote: Quote) -> StorageResult<()> {
		self.quotes.insert(quote.quote_id.clone(), quote);
		Ok(())
	}

	async fn get_quote(&self, quote_id: &str) -> StorageResult<Option<Quote>> {
		if let Some(quote) = self.quotes.get(quote_id) {
			if quote.is_expired() {
				drop(quote);
				self.quotes.remove(quote_id);
				return Ok(None);
			}
			return Ok(Some(quote.clone()));
		}
		Ok(None)
	}

	async fn cleanup_expired_quotes(&self) -> StorageResult<usize> {
		let now = Utc::now();
		let mut removed_count = 0;

		self.quotes.retain(|_key, quote| {
			if quote.expiration_date <= now {
				removed_count += 1;
				false
			} else {
				true
			}
		});

		if removed_count > 0 {
			info!("Cleaned up {} expired quotes", removed_count);
		}

		Ok(removed_count)
	}

	async fn add_session(&self, session: SavedSession) -> StorageResult<()> {
		self.sessions.insert(session.token.clone(), session);
		Ok(())
	}

	async fn get_session(&self, token: &str) -> StorageResult<Option<SavedSession>> {
		if let Some(session) = self.sessions.get(token) {
			if session.is_expired() {
				drop(session);
				self.sessions.remove(token);
				return Ok(None);
			}
			return Ok(Some(session.clone()));
		}
		Ok(None)
	}

	async fn stats(&self) -> StorageResult<StorageStats> {
		let now = Utc::now();
		let total_quotes = self.quotes.len();
		let active_quotes = self
			.quotes
			.iter()
			.filter(|entry| entry.value().expiration_date > now)
			.count();

		Ok(StorageStats {
			total_quotes,
			active_quotes,
			saved_sessions: self.sessions.len(),
			cache_entries: self.cache.len(),
		})
	}

	async fn health_check(&self) -> StorageResult<bool> {
		Ok(true)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use coverline_types::test_utils;
	use coverline_types::QuoteSource;

	#[tokio::test]
	async fn test_cache_set_get_roundtrip() {
		let store = MemoryStore::new();
		store
			.set("key-1", "payload".to_string(), Duration::from_secs(60))
			.await
			.unwrap();

		assert_eq!(
			store.get("key-1").await.unwrap(),
			Some("payload".to_string())
		);
		assert_eq!(store.get("key-2").await.unwrap(), None);
	}

	#[tokio::test]
	async fn test_expired_entry_is_evicted_on_read() {
		let store = MemoryStore::new();
		store
			.set("key-1", "payload".to_string(), Duration::from_secs(0))
			.await
			.unwrap();

		assert_eq!(store.get("key-1").await.unwrap(), None);
		assert_eq!(store.cache_len(), 0);
	}

	#[tokio::test]
	async fn test_quote_store_roundtrip() {
		let store = MemoryStore::new();
		let quote = test_utils::quote("Sentinel Mutual", 1200.0, QuoteSource::ApexRate);
		let quote_id = quote.quote_id.clone();

		store.add_quote(quote).await.unwrap();
		let loaded = store.get_quote(&quote_id).await.unwrap().unwrap();
		assert_eq!(loaded.carrier, "Sentinel Mutual");

		assert!(store.get_quote("APX-missing").await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_expired_quote_reported_absent() {
		let store = MemoryStore::new();
		let mut quote = test_utils::quote("Sentinel Mutual", 1200.0, QuoteSource::ApexRate);
		quote.expiration_date = Utc::now() - ChronoDuration::minutes(1);
		let quote_id = quote.quote_id.clone();

		store.add_quote(quote).await.unwrap();
		assert!(store.get_quote(&quote_id).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_sweep_removes_expired_entries() {
		let store = MemoryStore::new();
		store
			.set("live", "v".to_string(), Duration::from_secs(300))
			.await
			.unwrap();
		store
			.set("dead", "v".to_string(), Duration::from_secs(0))
			.await
			.unwrap();

		let removed = store.sweep_expired();
		assert_eq!(removed, 1);
		assert_eq!(store.cache_len(), 1);
	}

	#[tokio::test]
	async fn test_background_sweep_honors_configured_interval() {
		let store = MemoryStore::new();
		store
			.set("dead", "v".to_string(), Duration::from_secs(0))
			.await
			.unwrap();

		let handle = store.start_ttl_sweep(Duration::from_millis(10));
		tokio::time::sleep(Duration::from_millis(50)).await;
		handle.abort();

		assert_eq!(store.cache_len(), 0);
	}

	#[tokio::test]
	async fn test_session_roundtrip_and_expiry() {
		let store = MemoryStore::new();
		let session = SavedSession {
			token: "tok-1".to_string(),
			email: "jordan.reyes@example.com".to_string(),
			session_id: "sess-1".to_string(),
			quote_ids: vec!["APX-1".to_string()],
			created_at: Utc::now(),
			expires_at: Utc::now() + ChronoDuration::days(30),
		};
		store.add_session(session).await.unwrap();
		assert!(store.get_session("tok-1").await.unwrap().is_some());

		let expired = SavedSession {
			token: "tok-2".to_string(),
			email: "jordan.reyes@example.com".to_string(),
			session_id: "sess-1".to_string(),
			quote_ids: vec![],
			created_at: Utc::now() - ChronoDuration::days(60),
			expires_at: Utc::now() - ChronoDuration::days(30),
		};
		store.add_session(expired).await.unwrap();
		assert!(store.get_session("tok-2").await.unwrap().is_none());
	}
}
