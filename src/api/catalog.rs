//! Fyvio catalog API client
//!
//! Read-only access to the series endpoints of the Fyvio backend:
//! `/api/tv/{id}`, `/api/tv/{id}/similar` and `/api/tv/{id}/season/{n}`.

use anyhow::Result;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::{EpisodeKey, SeasonListing, SeriesDetails, SimilarSeries};

/// Catalog API error types
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// Details and similar list, fetched together
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesBundle {
    pub details: SeriesDetails,
    pub similar: Vec<SimilarSeries>,
}

/// Catalog API client
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
    client: reqwest::Client,
}

impl CatalogClient {
    /// Create a client for the backend at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a JSON resource. No retries: every failure is returned as-is.
    async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(CatalogError::from)?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await.map_err(CatalogError::from)?;
                let parsed: T = serde_json::from_str(&body).map_err(|e| {
                    CatalogError::InvalidResponse(format!("JSON parse error: {}", e))
                })?;
                Ok(parsed)
            }
            StatusCode::NOT_FOUND => Err(CatalogError::NotFound.into()),
            status => Err(CatalogError::ServerError(status.as_u16()).into()),
        }
    }

    /// Get series details by ID
    pub async fn series_details(&self, id: u64) -> Result<SeriesDetails> {
        self.get(&format!("/api/tv/{}", id)).await
    }

    /// Get series similar to `id`
    pub async fn similar_series(&self, id: u64) -> Result<Vec<SimilarSeries>> {
        self.get(&format!("/api/tv/{}/similar", id)).await
    }

    /// Get the season list and the episodes of one season.
    /// Season summaries come back sorted by season number.
    pub async fn season(&self, id: u64, season: u32) -> Result<SeasonListing> {
        let listing: SeasonListing = self
            .get(&format!("/api/tv/{}/season/{}", id, season))
            .await?;
        Ok(listing.sorted())
    }

    /// Fetch details and similar concurrently; fails if either fails
    pub async fn series_bundle(&self, id: u64) -> Result<SeriesBundle> {
        let (details, similar) =
            tokio::try_join!(self.series_details(id), self.similar_series(id))?;
        Ok(SeriesBundle { details, similar })
    }

    /// Backend watch page for the series or one of its episodes
    pub fn watch_url(&self, id: u64, episode: Option<EpisodeKey>) -> String {
        watch_url(&self.base_url, id, episode)
    }
}

/// Build `{base}/watch/{id}` with optional season/episode query
pub fn watch_url(base_url: &str, id: u64, episode: Option<EpisodeKey>) -> String {
    let base = base_url.trim_end_matches('/');
    match episode {
        Some(key) => format!(
            "{}/watch/{}?season_number={}&episode_number={}",
            base, id, key.season, key.episode
        ),
        None => format!("{}/watch/{}", base, id),
    }
}

/// True when an error chain bottoms out in a 404 from the catalog
pub fn is_not_found(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<CatalogError>(), Some(CatalogError::NotFound))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = CatalogClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_watch_url_series() {
        assert_eq!(
            watch_url("http://host:8000", 1399, None),
            "http://host:8000/watch/1399"
        );
    }

    #[test]
    fn test_watch_url_episode() {
        let key = EpisodeKey { season: 2, episode: 5 };
        assert_eq!(
            watch_url("http://host:8000/", 1399, Some(key)),
            "http://host:8000/watch/1399?season_number=2&episode_number=5"
        );
    }

    #[test]
    fn test_is_not_found() {
        let err: anyhow::Error = CatalogError::NotFound.into();
        assert!(is_not_found(&err));

        let err: anyhow::Error = CatalogError::ServerError(500).into();
        assert!(!is_not_found(&err));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(CatalogError::NotFound.to_string(), "Resource not found (404)");
        assert_eq!(CatalogError::ServerError(502).to_string(), "Server error: 502");
    }
}
