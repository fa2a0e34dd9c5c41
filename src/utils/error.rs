use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Upstream request to {endpoint} failed with status {status}")]
    Upstream { endpoint: String, status: u16 },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Cache store error: {message}")]
    Cache { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Missing anime id for anime info request")]
    MissingAnimeId,

    #[error("Invalid watch parameters: {message}")]
    InvalidParams { message: String },
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::Cache {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Upstream,
    Network,
    Cache,
    Data,
    Configuration,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit status for the CLI. Always non-zero.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::Upstream { .. } => ErrorCategory::Upstream,
            AppError::Http(_) => ErrorCategory::Network,
            AppError::Cache { .. } => ErrorCategory::Cache,
            AppError::Serialization(_) | AppError::Io(_) => ErrorCategory::Data,
            AppError::ConfigError { .. }
            | AppError::InvalidConfigValueError { .. }
            | AppError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AppError::MissingAnimeId | AppError::InvalidParams { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Upstream | ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Cache | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AppError::Upstream { status, .. } if *status == 404 => {
                "Check that the anime or episode id exists on the content API"
            }
            AppError::Upstream { .. } => "The content API is unavailable, try again later",
            AppError::Http(_) => "Check network connectivity and the configured API base URLs",
            AppError::Cache { .. } => "Check that Redis is running and REDIS_URL is correct",
            AppError::Serialization(_) => {
                "The upstream response shape changed or the cached entry is corrupt"
            }
            AppError::Io(_) => "Check file paths and permissions",
            AppError::ConfigError { .. }
            | AppError::InvalidConfigValueError { .. }
            | AppError::MissingConfigError { .. } => {
                "Fix the configuration file, CLI flags or environment variables"
            }
            AppError::MissingAnimeId => "Pass a non-empty anime id",
            AppError::InvalidParams { .. } => {
                "Use <anime-id> <anilist-id> <episode-number> with a positive episode number"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::Upstream { status, .. } => {
                format!("The content API returned an error (HTTP {})", status)
            }
            AppError::Http(_) => "Could not reach the content API".to_string(),
            AppError::Cache { .. } => "The cache store is unavailable".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_is_medium_severity() {
        let err = AppError::Upstream {
            endpoint: "http://localhost/anime/gogoanime/info/x".to_string(),
            status: 502,
        };
        assert_eq!(err.category(), ErrorCategory::Upstream);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().contains("502"));
    }

    #[test]
    fn test_not_found_has_specific_suggestion() {
        let err = AppError::Upstream {
            endpoint: "x".to_string(),
            status: 404,
        };
        assert!(err.recovery_suggestion().contains("exists"));
    }

    #[test]
    fn test_every_error_exits_non_zero() {
        let errors = [
            AppError::Upstream {
                endpoint: "x".to_string(),
                status: 500,
            },
            AppError::Cache {
                message: "down".to_string(),
            },
            AppError::MissingAnimeId,
            AppError::InvalidParams {
                message: "bad".to_string(),
            },
        ];
        for err in errors {
            assert_ne!(err.severity().exit_code(), 0, "{:?}", err);
        }
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = AppError::MissingConfigError {
            field: "api.anime_api_url".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
