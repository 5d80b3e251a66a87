use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bookbot::books_client::BooksClient;
use bookbot::config::Config;
use bookbot::{bot, db};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Book Search Telegram Bot");

    let config = Config::from_env()?;

    if config.books.api_key.is_none() {
        warn!("GOOGLE_BOOKS_API_KEY is not set, searching without an API key");
    }

    info!("Initializing database at: {}", config.database_url);

    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    db::init_database_schema(&pool).await?;

    let api = Arc::new(BooksClient::new(&config.books)?);

    let bot = Bot::new(&config.bot_token);

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint({
            let api = Arc::clone(&api);
            let pool = pool.clone();
            move |bot: Bot, msg: Message| {
                let api = Arc::clone(&api);
                let pool = pool.clone();
                async move { bot::message_handler(bot, msg, api, pool).await }
            }
        }))
        .branch(Update::filter_callback_query().endpoint({
            let api = Arc::clone(&api);
            move |bot: Bot, q: CallbackQuery| {
                let api = Arc::clone(&api);
                async move { bot::callback_handler(bot, q, api).await }
            }
        }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
