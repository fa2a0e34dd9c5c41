pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{MemoryStore, RedisStore};
pub use config::settings::{Overrides, Settings};
pub use self::core::{
    consumet::ConsumetClient,
    read_through::{ReadThroughCache, DEFAULT_CACHE_TTL},
    watch::{WatchLoader, WatchPage, WatchParams},
};
pub use domain::ports::{AnimeCatalog, CacheStore, ConfigProvider};
pub use utils::error::{AppError, Result};
