mod action;
mod app;
mod app_state;
mod component;
mod components;
mod download;
mod theme;

use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = kss_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = data_dir.join("kss.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("kss log: {}", log_path.display());

    tracing::info!("kss client starting…");

    let config = kss_proto::config::Config::load().unwrap_or_default();
    tracing::info!("[config] device at {}", config.server.base_url);

    let client = kss_proto::client::KssClient::new(
        &config.server.base_url,
        Duration::from_millis(config.server.connect_timeout_ms),
    )?;

    let app = app::App::new(&config, client);
    let result = app.run().await;

    tracing::info!("kss client exiting");
    result
}
