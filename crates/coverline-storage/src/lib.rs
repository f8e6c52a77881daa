//! Coverline Storage
//!
//! Cache layer and ephemeral stores. The response cache prefers a durable
//! Redis backend when configured and degrades transparently to the
//! in-process map on any backend failure; quotes and saved sessions live in
//! memory only.

pub mod cache;
pub mod memory_store;
pub mod redis_store;
pub mod traits;

pub use cache::{fingerprint, CacheService};
pub use memory_store::MemoryStore;
pub use redis_store::RedisCache;
pub use traits::{CacheBackend, SavedSession, Storage, StorageError, StorageResult, StorageStats};
