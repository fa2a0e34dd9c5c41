use anicache::config::toml_config::TomlConfig;
use anicache::utils::logger;
use anicache::{
    AnimeCatalog, CacheStore, CliConfig, Command, ConsumetClient, MemoryStore,
    RedisStore, Settings, WatchLoader, WatchParams,
};
use anyhow::Context;
use clap::Parser;
use serde_json::Value;

async fn run<S: CacheStore>(store: S, settings: Settings, command: Command) -> anicache::Result<Value> {
    let app_url = settings.app_url.clone();
    let client = ConsumetClient::new(store, settings)?;

    let value = match command {
        Command::Recent => serde_json::to_value(client.recent().await?)?,
        Command::Popular => serde_json::to_value(client.popular().await?)?,
        Command::Info { anime_id } => serde_json::to_value(client.anime_info(&anime_id).await?)?,
        Command::Sources { episode_id } => serde_json::to_value(client.watch(&episode_id).await?)?,
        Command::Search { query, page } => {
            serde_json::to_value(client.search(&query, page).await?)?
        }
        Command::Seasonal => serde_json::to_value(client.seasonal().await?)?,
        Command::Watch {
            anime_id,
            anilist_id,
            episode,
        } => {
            let params = WatchParams::from_segments(&[anime_id, anilist_id, episode])?;
            let page = WatchLoader::new(&client, app_url).load(&params).await?;
            serde_json::to_value(page)?
        }
    };

    Ok(value)
}

async fn execute(cli: CliConfig) -> anicache::Result<Value> {
    let file = match &cli.config {
        Some(path) => TomlConfig::from_file(path)?,
        None => TomlConfig::default(),
    };
    let settings = Settings::resolve(cli.overrides(), file)?;

    if settings.json_logs {
        logger::init_json_logger(settings.verbose);
    } else {
        logger::init_cli_logger(settings.verbose);
    }
    let redis = settings
        .redacted_redis_url()
        .unwrap_or_else(|| "none".to_string());
    tracing::debug!(
        app_url = %settings.app_url,
        anime_api_url = %settings.anime_api_url,
        %redis,
        cache_ttl_secs = settings.cache_ttl_secs,
        "Resolved settings"
    );

    match settings.redis_url.clone() {
        Some(redis_url) => {
            let store = RedisStore::connect(&redis_url).await?;
            run(store, settings, cli.command).await
        }
        None => {
            tracing::warn!("REDIS_URL not set, caching in memory for this run only");
            run(MemoryStore::new(), settings, cli.command).await
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = CliConfig::parse();

    match execute(cli).await {
        Ok(value) => {
            let rendered = serde_json::to_string_pretty(&value).context("rendering output")?;
            println!("{}", rendered);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "Request failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.severity().exit_code());
        }
    }
}
