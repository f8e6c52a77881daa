//! Redis cache backend for the response cache
//!
//! Expiry is delegated to Redis key TTLs, so no sweep task is needed on
//! this backend. Any connection or command failure surfaces as a
//! `StorageError::Backend`, which the cache service treats as a signal to
//! degrade to the in-process map.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;
use tracing::info;

use crate::traits::{CacheBackend, StorageError, StorageResult};

/// Namespace prefix for cache keys so the service shares a Redis instance
/// without clashing with other keyspaces
const KEY_PREFIX: &str = "coverline:quote-cache:";

/// Redis-backed cache using a multiplexed connection manager
#[derive(Clone)]
pub struct RedisCache {
	manager: ConnectionManager,
}

impl RedisCache {
	/// Connect to Redis at the given URL
	pub async fn connect(url: &str) -> StorageResult<Self> {
		let client =
			redis::Client::open(url).map_err(|e| StorageError::Backend(e.to_string()))?;
		let manager = client
			.get_connection_manager()
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		info!("Connected to Redis cache backend");
		Ok(Self { manager })
	}

	fn namespaced(key: &str) -> String {
		format!("{}{}", KEY_PREFIX, key)
	}
}

#[async_trait]
impl CacheBackend for RedisCache {
	async fn get(&self, key: &str) -> StorageResult<Option<String>> {
		let mut conn = self.manager.clone();
		let value: Option<String> = conn
			.get(Self::namespaced(key))
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		Ok(value)
	}

	async fn set(&self, key: &str, value: String, ttl: Duration) -> StorageResult<()> {
		let mut conn = self.manager.clone();
		// SET with EX so Redis owns the expiry
		let _: () = conn
			.set_ex(Self::namespaced(key), value, ttl.as_secs())
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		Ok(())
	}

	async fn remove(&self, key: &str) -> StorageResult<bool> {
		let mut conn = self.manager.clone();
		let removed: i64 = conn
			.del(Self::namespaced(key))
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		Ok(removed > 0)
	}

	async fn health_check(&self) -> StorageResult<bool> {
		let mut conn = self.manager.clone();
		let pong: String = redis::cmd("PING")
			.query_async(&mut conn)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		Ok(pong == "PONG")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_key_namespacing() {
		assert_eq!(
			RedisCache::namespaced("abc123"),
			"coverline:quote-cache:abc123"
		);
	}
}
