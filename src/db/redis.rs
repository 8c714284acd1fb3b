use super::DbClient;
use crate::errors::ApiError;
use crate::Result;
use redis::AsyncCommands;

/// Default TTL for cached values, in seconds.
const CACHE_TTL_SECONDS: u64 = 60;

impl DbClient {
    pub async fn set_cache(&self, key: &str, value: &str) -> Result<()> {
        let mut redis_conn = self.get_async_redis_conn().await.map_err(|err| {
            tracing::error!("Redis connection error: {}", err);
            ApiError::from(err)
        })?;

        redis_conn
            .set_ex::<_, _, ()>(key, value, CACHE_TTL_SECONDS)
            .await
            .map_err(|err| {
                tracing::error!("Redis SET failed: {}", err);
                ApiError::from(err)
            })?;
        tracing::info!("Cache set for key: {}", key);
        Ok(())
    }

    pub async fn get_cache(&self, key: &str) -> Result<String> {
        let mut redis_conn = self.get_async_redis_conn().await.map_err(|err| {
            tracing::error!("Redis connection error: {}", err);
            ApiError::from(err)
        })?;

        let value: Option<String> = redis_conn.get(key).await.map_err(|err| {
            tracing::error!("Redis GET failed: {}", err);
            ApiError::from(err)
        })?;

        value.ok_or_else(|| ApiError::NotFound(format!("No cached value for key: {}", key)))
    }
}
