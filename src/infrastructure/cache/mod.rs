//! Key-value caching layer.
//!
//! Provides a [`KeyValueCache`] trait with three implementations:
//! - [`RedisCache`] - Production Redis-backed cache
//! - [`NullCache`] - No-op implementation for the cache-disabled mode
//! - [`MemoryCache`] - In-process TTL map for tests

mod memory_cache;
mod null_cache;
mod redis_cache;
mod service;

pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, KeyValueCache};
