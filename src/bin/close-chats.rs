//! One-shot maintenance job: close open chats with no recent activity.
//! Meant to run from cron or a scheduler; connects, sweeps once, exits.

use chrono::Duration;
use confide_backend::{ChatService, Config};
use mongodb::Client;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("confide_backend=info")),
        )
        .init();

    let config = Config::from_env()?;
    let client = Client::with_uri_str(&config.mongodb_url).await?;
    let db = client.database(&config.db_name);

    let window = Duration::hours(config.chat_close_after_hours);
    let closed = ChatService::close_stale(&db, window).await?;
    tracing::info!(closed, hours = config.chat_close_after_hours, "stale chats closed");
    Ok(())
}
