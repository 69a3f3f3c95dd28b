use clap::Parser;
use rizz_api::ApiState;
use rizz_engine::Engine;
use rizz_storage::GameDb;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rizzhoused")]
#[command(about = "Rizz House game server")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Address to serve the API on
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// Database directory
    #[arg(short, long, default_value = "rizzhouse-data")]
    data_dir: PathBuf,
}

#[derive(Debug, Deserialize, Default)]
struct Config {
    listen: Option<SocketAddr>,
    data_dir: Option<PathBuf>,
}

fn load_config(path: &PathBuf) -> Result<Config, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    // Config file values win over flag defaults; flags stay usable on
    // their own for local runs.
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    let listen = config.listen.unwrap_or(cli.listen);
    let data_dir = config.data_dir.unwrap_or(cli.data_dir);

    info!(path = %data_dir.display(), "opening database");
    let db = GameDb::open(&data_dir)?;
    let state = ApiState::new(Engine::new(db));

    info!(%listen, "starting Rizz House API");
    rizz_api::start_server(listen, state).await
}
