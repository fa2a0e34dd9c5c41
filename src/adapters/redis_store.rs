use crate::domain::ports::CacheStore;
use crate::utils::error::{AppError, Result};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::time::Duration;

/// Redis-backed store. The connection manager reconnects on its own and is
/// cheap to clone per command.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = Client::open(redis_url).map_err(|e| AppError::Cache {
            message: format!("Invalid Redis URL: {}", e),
        })?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::Cache {
                message: format!("Failed to connect to Redis: {}", e),
            })?;

        tracing::debug!("Connected to Redis");
        Ok(Self { conn })
    }
}

impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, ttl: Duration, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        // SETEX rejects a zero expiry
        let seconds = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key, value, seconds).await?;
        Ok(())
    }
}
