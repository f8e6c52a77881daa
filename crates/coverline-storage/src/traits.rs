//! Storage traits shared by the cache backends and ephemeral stores

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use coverline_types::Quote;

/// Storage operation errors
///
/// These never reach API callers: cache backend failures degrade to the
/// in-process map, and the orchestrator logs store failures without
/// surfacing them.
#[derive(Error, Debug)]
pub enum StorageError {
	#[error("Backend error: {0}")]
	Backend(String),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Keyed string store with per-entry TTL, used for the response cache
///
/// Implementations must be safe under concurrent access from multiple
/// simultaneously handled requests.
#[async_trait]
pub trait CacheBackend: Send + Sync {
	/// Fetch a live entry; absent and expired entries both return `None`
	async fn get(&self, key: &str) -> StorageResult<Option<String>>;

	/// Store an entry that expires after `ttl`
	async fn set(&self, key: &str, value: String, ttl: Duration) -> StorageResult<()>;

	/// Remove an entry, reporting whether it existed
	async fn remove(&self, key: &str) -> StorageResult<bool>;

	/// Whether the backend is reachable
	async fn health_check(&self) -> StorageResult<bool>;
}

/// A quote session saved under an email for later retrieval
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedSession {
	pub token: String,
	pub email: String,
	pub session_id: String,
	pub quote_ids: Vec<String>,
	pub created_at: DateTime<Utc>,
	pub expires_at: DateTime<Utc>,
}

impl SavedSession {
	pub fn is_expired(&self) -> bool {
		self.expires_at <= Utc::now()
	}
}

/// Counts reported by `Storage::stats`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
	pub total_quotes: usize,
	pub active_quotes: usize,
	pub saved_sessions: usize,
	pub cache_entries: usize,
}

/// Ephemeral store for generated quotes and saved sessions
///
/// Quotes live here only so bind/retrieve/compare can find them before they
/// expire; there is no durable quote persistence.
#[async_trait]
pub trait Storage: Send + Sync {
	async fn add_quote(&self, quote: Quote) -> StorageResult<()>;

	/// Fetch by id; expired quotes are evicted on read and reported absent
	async fn get_quote(&self, quote_id: &str) -> StorageResult<Option<Quote>>;

	async fn cleanup_expired_quotes(&self) -> StorageResult<usize>;

	async fn add_session(&self, session: SavedSession) -> StorageResult<()>;

	async fn get_session(&self, token: &str) -> StorageResult<Option<SavedSession>>;

	async fn stats(&self) -> StorageResult<StorageStats>;

	async fn health_check(&self) -> StorageResult<bool>;
}
