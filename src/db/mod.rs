pub mod memory;
pub mod redis;
pub mod store;

pub use memory::MemoryUserStore;
pub use self::redis::create_redis_client;
pub use self::redis::Cache;
pub use self::redis::CacheKey;
pub use self::redis::CacheWriterHandle;
pub use self::redis::RedisUserStore;
pub use store::{ConditionalWrite, UserStore};

#[cfg(test)]
pub use store::MockUserStore;
