pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};

#[cfg(feature = "cli")]
mod cli {
    use super::settings::Overrides;
    use clap::{Parser, Subcommand};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "anicache")]
    #[command(about = "Cached client for consumet-style anime content APIs")]
    pub struct CliConfig {
        /// Public origin of the site (serves /api/anime/trending)
        #[arg(long, env = "APP_URL")]
        pub app_url: Option<String>,

        #[arg(long, env = "ANIME_API_URI")]
        pub anime_api_url: Option<String>,

        #[arg(long, env = "SEASONAL_URL")]
        pub seasonal_url: Option<String>,

        /// Without one, responses are cached in memory for this process only
        #[arg(long, env = "REDIS_URL")]
        pub redis_url: Option<String>,

        #[arg(long)]
        pub cache_ttl_secs: Option<u64>,

        #[arg(long)]
        pub timeout_secs: Option<u64>,

        #[arg(long, short, help = "TOML configuration file")]
        pub config: Option<PathBuf>,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Recently released episodes
        Recent,
        /// Trending list from the site's own API
        Popular,
        /// Anime details and episode list
        Info { anime_id: String },
        /// Streaming sources for one episode
        Sources { episode_id: String },
        Search {
            query: String,
            #[arg(long, default_value = "1")]
            page: u32,
        },
        Seasonal,
        /// Everything the watch page needs for one episode
        Watch {
            anime_id: String,
            anilist_id: String,
            episode: String,
        },
    }

    impl CliConfig {
        pub fn overrides(&self) -> Overrides {
            Overrides {
                app_url: self.app_url.clone(),
                anime_api_url: self.anime_api_url.clone(),
                seasonal_url: self.seasonal_url.clone(),
                redis_url: self.redis_url.clone(),
                cache_ttl_secs: self.cache_ttl_secs,
                timeout_secs: self.timeout_secs,
                verbose: self.verbose,
                json_logs: self.json_logs,
            }
        }
    }

}
