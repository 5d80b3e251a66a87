//! # Configuration Module
//!
//! This module defines the configuration value objects for the bot,
//! loaded once at startup and passed explicitly to the components
//! that need them.

use anyhow::{Context, Result};
use std::env;

// Constants for search orchestration
pub const DEFAULT_BOOKS_URL: &str = "https://www.googleapis.com/books/v1/volumes";
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
pub const SEARCH_RESULT_LIMIT: usize = 5;
pub const MIN_QUERY_CHARS: usize = 2;
pub const DEFAULT_DATABASE_URL: &str = "sqlite:books_bot.db";

/// Configuration for the Google Books API client
#[derive(Debug, Clone)]
pub struct BooksApiConfig {
    /// Base URL of the volumes endpoint
    pub base_url: String,
    /// Optional API key; requests are sent without it when absent
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for BooksApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BOOKS_URL.to_string(),
            api_key: None,
            timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Top-level bot configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token
    pub bot_token: String,
    /// Database connection URL
    pub database_url: String,
    /// Google Books API client configuration
    pub books: BooksApiConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let bot_token =
            env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let api_key = env::var("GOOGLE_BOOKS_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        Ok(Self {
            bot_token,
            database_url,
            books: BooksApiConfig {
                api_key,
                ..Default::default()
            },
        })
    }
}
