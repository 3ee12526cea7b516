use anyhow::Context;
use clap::Parser;
use moviweb::{
    cli::{self, Cli},
    config::Config,
    data_manager::DataManager,
    db,
    omdb::OmdbClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,moviweb=debug,sqlx=warn".to_string()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::from_env()?;
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }

    let db = db::connect_and_migrate(config.database_url.as_str())
        .await
        .with_context(|| format!("opening {}", config.database_url))?;

    let omdb = match &config.omdb_api_key {
        Some(key) => {
            let http = reqwest::Client::builder().user_agent("moviweb/0.1").build()?;
            Some(OmdbClient::new(
                http,
                key.clone(),
                config.omdb_base_url.clone(),
                config.omdb_timeout,
                config.omdb_rps,
            ))
        }
        None => {
            tracing::warn!("no OMDB_API_KEY provided, movies are stored as typed");
            None
        }
    };

    let data = DataManager::new(db, omdb);
    let output = cli::execute(cli.command, &data).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
