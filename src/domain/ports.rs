use crate::domain::model::{
    AnimeInfo, ConsumetResponse, Popular, RecentEpisode, Search, SeasonalResponse,
    SourcesResponse,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// String key-value store with per-key expiry.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn set_ex(
        &self,
        key: &str,
        ttl: Duration,
        value: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// Public origin of the site, used for its own API routes and share links.
    fn app_url(&self) -> &str;
    fn anime_api_url(&self) -> &str;
    fn seasonal_url(&self) -> &str;
    fn cache_ttl(&self) -> Duration;
    fn request_timeout(&self) -> Duration;
}

#[async_trait]
pub trait AnimeCatalog: Send + Sync {
    async fn recent(&self) -> Result<ConsumetResponse<RecentEpisode>>;
    async fn popular(&self) -> Result<ConsumetResponse<Popular>>;
    async fn anime_info(&self, anime_id: &str) -> Result<AnimeInfo>;
    async fn watch(&self, episode_id: &str) -> Result<SourcesResponse>;
    async fn search(&self, query: &str, page: u32) -> Result<ConsumetResponse<Search>>;
    async fn seasonal(&self) -> Result<SeasonalResponse>;
}
