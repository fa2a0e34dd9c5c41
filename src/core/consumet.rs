use crate::core::read_through::ReadThroughCache;
use crate::domain::model::{
    AnimeInfo, ConsumetResponse, Popular, RecentEpisode, Search, SeasonalResponse,
    SourcesResponse,
};
use crate::domain::ports::{AnimeCatalog, CacheStore, ConfigProvider};
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

pub const RECENTS_KEY: &str = "recents";
pub const SEASONAL_KEY: &str = "seasonal";

/// Anify seasonal listing, trimmed to the fields the site renders.
pub const DEFAULT_SEASONAL_URL: &str = "https://api.anify.tv/seasonal/anime?fields=[id,mappings,title,coverImage,bannerImage,description,currentEpisode,totalEpisodes,format]";

pub fn anime_key(anime_id: &str) -> String {
    format!("anime:{}", anime_id)
}

/// Appends `segments` to `base` as individually encoded path segments.
fn join_segments(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base).map_err(|e| AppError::ConfigError {
        message: format!("Invalid base URL '{}': {}", base, e),
    })?;

    {
        let mut path = url.path_segments_mut().map_err(|_| AppError::ConfigError {
            message: format!("Base URL '{}' cannot carry a path", base),
        })?;
        path.pop_if_empty().extend(segments);
    }

    Ok(url)
}

/// Page 1 is the bare route; later pages add `?page=N`.
fn search_url(base: &str, query: &str, page: u32) -> Result<Url> {
    let mut url = join_segments(base, &["anime", "anify", query])?;
    if page > 1 {
        url.query_pairs_mut().append_pair("page", &page.to_string());
    }
    Ok(url)
}

/// Client for the consumet routes, the site's trending route and the anify
/// seasonal listing. Info, recent episodes and seasonal go through the cache.
pub struct ConsumetClient<S: CacheStore, C: ConfigProvider> {
    cache: ReadThroughCache<S>,
    config: C,
    client: Client,
}

impl<S: CacheStore, C: ConfigProvider> ConsumetClient<S, C> {
    pub fn new(store: S, config: C) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            cache: ReadThroughCache::new(store),
            config,
            client,
        })
    }

    fn api_url(&self, segments: &[&str]) -> Result<Url> {
        join_segments(self.config.anime_api_url(), segments)
    }

    /// GET `url` and return the body of a successful response.
    async fn fetch_text(&self, url: Url) -> Result<String> {
        tracing::debug!(%url, "upstream request");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "upstream request failed");
            return Err(AppError::Upstream {
                endpoint: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let body = self.fetch_text(url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn cached<T: DeserializeOwned>(&self, key: &str, url: Url) -> Result<T> {
        self.cache
            .get_or_fetch(key, self.config.cache_ttl(), || self.fetch_text(url))
            .await
    }
}

#[async_trait]
impl<S: CacheStore, C: ConfigProvider> AnimeCatalog for ConsumetClient<S, C> {
    async fn recent(&self) -> Result<ConsumetResponse<RecentEpisode>> {
        let url = self.api_url(&["meta", "anilist", "recent-episodes"])?;
        self.cached(RECENTS_KEY, url).await
    }

    async fn popular(&self) -> Result<ConsumetResponse<Popular>> {
        let url = join_segments(self.config.app_url(), &["api", "anime", "trending"])?;
        self.fetch_json(url).await
    }

    async fn anime_info(&self, anime_id: &str) -> Result<AnimeInfo> {
        if anime_id.trim().is_empty() {
            return Err(AppError::MissingAnimeId);
        }

        let url = self.api_url(&["anime", "gogoanime", "info", anime_id])?;
        self.cached(&anime_key(anime_id), url).await
    }

    async fn watch(&self, episode_id: &str) -> Result<SourcesResponse> {
        let url = self.api_url(&["anime", "gogoanime", "watch", episode_id])?;
        self.fetch_json(url).await
    }

    async fn search(&self, query: &str, page: u32) -> Result<ConsumetResponse<Search>> {
        let url = search_url(self.config.anime_api_url(), query, page)?;
        self.fetch_json(url).await
    }

    async fn seasonal(&self) -> Result<SeasonalResponse> {
        let url = Url::parse(self.config.seasonal_url()).map_err(|e| AppError::ConfigError {
            message: format!("Invalid seasonal URL: {}", e),
        })?;
        self.cached(SEASONAL_KEY, url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_segments_handles_trailing_slash() {
        let a = join_segments("http://localhost:3000", &["anime", "gogoanime", "info", "x"]).unwrap();
        let b = join_segments("http://localhost:3000/", &["anime", "gogoanime", "info", "x"]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "http://localhost:3000/anime/gogoanime/info/x");
    }

    #[test]
    fn test_join_segments_keeps_base_path() {
        let url = join_segments("https://example.org/consumet/", &["meta", "anilist", "recent-episodes"])
            .unwrap();
        assert_eq!(url.path(), "/consumet/meta/anilist/recent-episodes");
    }

    #[test]
    fn test_join_segments_encodes_each_segment() {
        let url = join_segments("http://localhost", &["anime", "anify", "attack on/titan"]).unwrap();
        assert_eq!(url.path(), "/anime/anify/attack%20on%2Ftitan");
    }

    #[test]
    fn test_search_url_first_page_has_no_query() {
        let url = search_url("http://localhost:3000", "naruto", 1).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/anime/anify/naruto");
        assert_eq!(url.query(), None);

        let url = search_url("http://localhost:3000", "naruto", 3).unwrap();
        assert_eq!(url.query(), Some("page=3"));
    }

    #[test]
    fn test_anime_key() {
        assert_eq!(anime_key("one-piece"), "anime:one-piece");
    }
}
