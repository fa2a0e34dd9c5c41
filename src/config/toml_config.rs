use crate::utils::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSection {
    pub app_url: Option<String>,
    pub anime_api_url: Option<String>,
    pub seasonal_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheSection {
    pub redis_url: Option<String>,
    pub ttl_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// Loads a TOML file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML after expanding `${VAR}` references.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Unset variables are left as written; `Settings::resolve` treats such values as unset.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| {
            AppError::ConfigError {
                message: format!("env substitution pattern: {}", e),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[api]
app_url = "https://anime.example.org"
anime_api_url = "https://consumet.example.org"
timeout_seconds = 15

[cache]
redis_url = "redis://127.0.0.1:6379"
ttl_seconds = 600

[logging]
verbose = true
json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api.app_url.as_deref(), Some("https://anime.example.org"));
        assert_eq!(config.api.timeout_seconds, Some(15));
        assert_eq!(config.api.seasonal_url, None);
        assert_eq!(config.cache.ttl_seconds, Some(600));
        assert_eq!(config.logging.verbose, Some(true));
        assert_eq!(config.logging.json, Some(true));
    }

    #[test]
    fn test_missing_sections_default() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.api.anime_api_url.is_none());
        assert!(config.cache.redis_url.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ANICACHE_TEST_REDIS_HOST", "cache.internal");
        let config = TomlConfig::from_toml_str(
            r#"
[cache]
redis_url = "redis://${ANICACHE_TEST_REDIS_HOST}:6379"
"#,
        )
        .unwrap();
        assert_eq!(
            config.cache.redis_url.as_deref(),
            Some("redis://cache.internal:6379")
        );
    }

    #[test]
    fn test_unset_env_var_is_kept() {
        let config = TomlConfig::from_toml_str(
            r#"
[api]
anime_api_url = "${ANICACHE_TEST_DEFINITELY_UNSET}"
"#,
        )
        .unwrap();
        assert_eq!(
            config.api.anime_api_url.as_deref(),
            Some("${ANICACHE_TEST_DEFINITELY_UNSET}")
        );
    }

    #[test]
    fn test_invalid_toml() {
        let err = TomlConfig::from_toml_str("[api\napp_url = 1").unwrap_err();
        assert!(matches!(err, AppError::ConfigError { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nanime_api_url = \"http://localhost:3000\"").unwrap();

        let config = TomlConfig::from_file(file.path()).unwrap();
        assert_eq!(
            config.api.anime_api_url.as_deref(),
            Some("http://localhost:3000")
        );
    }
}
