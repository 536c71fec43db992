// src/main.rs

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use greenlight::api;
use greenlight::config::{self, CONFIG};
use greenlight::llm::{GeminiClient, RetryPolicy};
use greenlight::prompt::PromptBuilder;
use greenlight::services::{ReferenceFetcher, ReportService};
use greenlight::session::SessionStore;
use greenlight::state::AppState;

#[derive(Parser)]
#[command(name = "greenlight", about = "Screenplay coverage service")]
struct Cli {
    /// Bind host (overrides GREENLIGHT_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides GREENLIGHT_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Users TOML file (overrides GREENLIGHT_USERS_FILE)
    #[arg(long)]
    users_file: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = Level::from_str(&CONFIG.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting greenlight");
    info!("Model: {}", CONFIG.model);

    let users_file = cli.users_file.as_deref().unwrap_or(&CONFIG.users_file);
    let users = config::load_users(users_file)?;
    info!("Loaded {} user(s) from {}", users.len(), users_file);

    let generator = Arc::new(GeminiClient::from_env(
        CONFIG.model.as_str(),
        Duration::from_secs(CONFIG.generate_timeout),
    )?);
    let reference = Arc::new(ReferenceFetcher::new(
        CONFIG.reference_url.as_str(),
        Duration::from_secs(CONFIG.reference_timeout),
    ));
    let prompt_builder = PromptBuilder::new(CONFIG.script_char_budget, CONFIG.reference_char_budget);
    let retry = RetryPolicy::from_config(&CONFIG);

    let reports = ReportService::new(generator, reference, prompt_builder, retry);
    let state = Arc::new(AppState {
        sessions: SessionStore::new(users),
        reports,
    });

    let app = api::app_router(state, &CONFIG.cors_origin);

    let host = cli.host.as_deref().unwrap_or(&CONFIG.host);
    let port = cli.port.unwrap_or(CONFIG.port);
    let bind_address = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
