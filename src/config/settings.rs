use crate::config::toml_config::TomlConfig;
use crate::core::consumet::DEFAULT_SEASONAL_URL;
use crate::core::read_through::DEFAULT_CACHE_TTL;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_redis_url, validate_required_field,
    validate_url, Validate,
};
use std::time::Duration;
use url::Url;

pub const DEFAULT_APP_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Values supplied on the command line or through the environment. They win
/// over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub app_url: Option<String>,
    pub anime_api_url: Option<String>,
    pub seasonal_url: Option<String>,
    pub redis_url: Option<String>,
    pub cache_ttl_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub verbose: bool,
    pub json_logs: bool,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub app_url: String,
    pub anime_api_url: String,
    pub seasonal_url: String,
    pub redis_url: Option<String>,
    pub cache_ttl_secs: u64,
    pub timeout_secs: u64,
    pub verbose: bool,
    pub json_logs: bool,
}

/// File values whose `${VAR}` reference was left unexpanded count as unset.
fn expanded(value: Option<String>) -> Option<String> {
    value.filter(|v| !(v.contains("${") && v.contains('}')))
}

impl Settings {
    /// Merges overrides, file values and defaults, then validates the result.
    pub fn resolve(overrides: Overrides, file: TomlConfig) -> Result<Self> {
        let TomlConfig { api, cache, logging } = file;
        let api_app_url = expanded(api.app_url);
        let api_anime_api_url = expanded(api.anime_api_url);
        let api_seasonal_url = expanded(api.seasonal_url);
        let cache_redis_url = expanded(cache.redis_url);

        let anime_api_url = overrides.anime_api_url.or(api_anime_api_url);
        let anime_api_url = validate_required_field("api.anime_api_url", &anime_api_url)?.clone();

        let settings = Self {
            app_url: overrides
                .app_url
                .or(api_app_url)
                .unwrap_or_else(|| DEFAULT_APP_URL.to_string()),
            anime_api_url,
            seasonal_url: overrides
                .seasonal_url
                .or(api_seasonal_url)
                .unwrap_or_else(|| DEFAULT_SEASONAL_URL.to_string()),
            redis_url: overrides
                .redis_url
                .or(cache_redis_url)
                .filter(|url| !url.trim().is_empty()),
            cache_ttl_secs: overrides
                .cache_ttl_secs
                .or(cache.ttl_seconds)
                .unwrap_or(DEFAULT_CACHE_TTL.as_secs()),
            timeout_secs: overrides
                .timeout_secs
                .or(api.timeout_seconds)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            verbose: overrides.verbose || logging.verbose.unwrap_or(false),
            json_logs: overrides.json_logs || logging.json.unwrap_or(false),
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Redis URL with any password masked, for logging.
    pub fn redacted_redis_url(&self) -> Option<String> {
        let raw = self.redis_url.as_deref()?;
        match Url::parse(raw) {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("***"));
                }
                Some(url.to_string())
            }
            Err(_) => Some("<unparseable>".to_string()),
        }
    }
}

impl ConfigProvider for Settings {
    fn app_url(&self) -> &str {
        &self.app_url
    }

    fn anime_api_url(&self) -> &str {
        &self.anime_api_url
    }

    fn seasonal_url(&self) -> &str {
        &self.seasonal_url
    }

    fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("api.app_url", &self.app_url)?;
        validate_url("api.anime_api_url", &self.anime_api_url)?;
        validate_url("api.seasonal_url", &self.seasonal_url)?;

        if let Some(redis_url) = &self.redis_url {
            validate_non_empty_string("cache.redis_url", redis_url)?;
            validate_redis_url("cache.redis_url", redis_url)?;
        }

        validate_range("cache.ttl_seconds", self.cache_ttl_secs, 1, MAX_TTL_SECS)?;
        validate_range("api.timeout_seconds", self.timeout_secs, 1, 600)?;

        tracing::debug!("configuration validation passed");
        Ok(())
    }
}
