//! Data structures and types for Fyvio
//!
//! Shared models for the series page, organized by payload:
//! - **Series**: details record and similar-series summaries
//! - **Seasons**: season summaries, episodes and the season listing
//! - **Targets**: what a watch/download choice points at

use serde::{Deserialize, Serialize};
use std::fmt;

/// Poster shown when the backend has none
pub const PLACEHOLDER_POSTER: &str = "/placeholder-poster.jpg";

// =============================================================================
// Series Models
// =============================================================================

/// Full series record from `/api/tv/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDetails {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
}

impl SeriesDetails {
    /// Rating badge text, `N/A` when unrated
    pub fn rating_label(&self) -> String {
        rating_label(self.vote_average)
    }

    /// Upper-cased language code
    pub fn language_label(&self) -> Option<String> {
        self.original_language
            .as_deref()
            .filter(|l| !l.is_empty())
            .map(|l| l.to_uppercase())
    }

    /// "1 Season" / "5 Seasons"
    pub fn seasons_label(&self) -> Option<String> {
        self.number_of_seasons.map(|n| {
            let plural = if n != 1 { "s" } else { "" };
            format!("{} Season{}", n, plural)
        })
    }

    pub fn poster(&self) -> &str {
        self.poster_url
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(PLACEHOLDER_POSTER)
    }

    /// Window title for the page
    pub fn page_title(&self) -> String {
        format!("{} - TV Series | Fyvio", self.name)
    }

    /// One-line page description
    pub fn page_description(&self) -> String {
        format!("Watch {} - {}", self.name, self.overview)
    }
}

impl fmt::Display for SeriesDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [★ {}]", self.name, self.rating_label())?;
        if let Some(seasons) = self.seasons_label() {
            write!(f, " - {}", seasons)?;
        }
        Ok(())
    }
}

/// Summary record from `/api/tv/{id}/similar`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarSeries {
    pub id: u64,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub first_air_date: Option<String>,
}

impl SimilarSeries {
    pub fn rating_label(&self) -> String {
        rating_label(self.vote_average)
    }

    /// Year prefix of the first-air date
    pub fn year(&self) -> Option<u16> {
        self.first_air_date.as_deref().and_then(extract_year)
    }
}

impl fmt::Display for SimilarSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year().map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(f, "{}{}", self.name, year_str)
    }
}

// =============================================================================
// Season Models
// =============================================================================

/// Entry of the season selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub season_number: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub episode_count: Option<u32>,
}

impl fmt::Display for SeasonSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Season {}", self.season_number)
    }
}

/// TV episode information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: u64,
    pub season_number: u32,
    pub episode_number: u32,
    pub name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub air_date: Option<String>,
}

impl Episode {
    /// Unpadded episode code, e.g. `S1E3`
    pub fn code(&self) -> String {
        format!("S{}E{}", self.season_number, self.episode_number)
    }

    pub fn key(&self) -> EpisodeKey {
        EpisodeKey {
            season: self.season_number,
            episode: self.episode_number,
        }
    }
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code(), self.name)
    }
}

/// Payload of `/api/tv/{id}/season/{season}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonListing {
    #[serde(default)]
    pub seasons: Vec<SeasonSummary>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

impl SeasonListing {
    /// Sort season summaries ascending by number (stable)
    pub fn sorted(mut self) -> Self {
        self.seasons.sort_by_key(|s| s.season_number);
        self
    }

    pub fn has_season(&self, season: u32) -> bool {
        self.seasons.iter().any(|s| s.season_number == season)
    }
}

// =============================================================================
// Target Models
// =============================================================================

/// Season/episode pair identifying one episode of the current series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpisodeKey {
    pub season: u32,
    pub episode: u32,
}

impl fmt::Display for EpisodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}E{}", self.season, self.episode)
    }
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Format a vote average with one decimal; missing or zero is `N/A`
pub fn rating_label(vote_average: Option<f32>) -> String {
    match vote_average {
        Some(v) if v != 0.0 && v.is_finite() => format!("{:.1}", v),
        _ => "N/A".to_string(),
    }
}

/// Extract year from a date string like "2011-04-17"
fn extract_year(date: &str) -> Option<u16> {
    date.get(..4).and_then(|y| y.parse().ok())
}

// =============================================================================
// Unit Tests
// =============================================================================
