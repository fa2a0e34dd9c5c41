// Adapters layer: concrete cache stores behind the `CacheStore` port.

pub mod memory_store;
pub mod redis_store;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
