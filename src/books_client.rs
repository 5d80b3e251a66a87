//! # Google Books API Client
//!
//! Thin HTTP client for the volumes endpoint. Every transport fault
//! (network error, timeout, non-2xx status, malformed payload) is
//! converted into an [`ApiError`] value at this boundary and logged
//! once; callers never see a raised fault.

use anyhow::Result;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

use crate::books::{SearchResponse, Volume};
use crate::config::BooksApiConfig;

/// Normalized failure value replacing any fault from the search API
#[derive(Debug, Clone)]
pub struct ApiError {
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Books API error: {}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// Client for the Google Books volumes API
#[derive(Debug, Clone)]
pub struct BooksClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl BooksClient {
    pub fn new(config: &BooksApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Search volumes matching a free-text query
    pub async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<SearchResponse, ApiError> {
        debug!(query, max_results, "Searching books");

        let mut params = vec![
            ("q".to_string(), query.to_string()),
            ("maxResults".to_string(), max_results.to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("key".to_string(), key.clone()));
        }

        match self.get_json::<SearchResponse>(&self.base_url, &params).await {
            Ok(response) => {
                debug!(
                    total_items = response.total_items,
                    items = response.items.len(),
                    "Book search completed"
                );
                Ok(response)
            }
            Err(err) => {
                error!(error = %err, "Book search request failed");
                Err(err.into())
            }
        }
    }

    /// Fetch a single volume by its identifier
    pub async fn fetch_volume(&self, volume_id: &str) -> Result<Volume, ApiError> {
        debug!(volume_id, "Fetching book details");

        let url = format!("{}/{}", self.base_url, volume_id);
        let mut params = Vec::new();
        if let Some(key) = &self.api_key {
            params.push(("key".to_string(), key.clone()));
        }

        match self.get_json::<Volume>(&url, &params).await {
            Ok(volume) => Ok(volume),
            Err(err) => {
                error!(volume_id, error = %err, "Book details request failed");
                Err(err.into())
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<T, reqwest::Error> {
        let response = self.http.get(url).query(params).send().await?;
        let response = response.error_for_status()?;
        response.json::<T>().await
    }
}
