//! Fyvio - TV series details in the terminal
//!
//! Opens one series from a Fyvio backend: details, similar titles and
//! season-by-season episode lists, with player/download choice dialogs.
//!
//! # Modules
//!
//! - `models` - Series, season and episode records
//! - `api` - Catalog client for the backend
//! - `app` - Page state, modal state machines, key handling
//! - `loader` - Background fetch tasks
//! - `ui` - TUI rendering
//! - `cli` / `commands` - Scriptable subcommands
//! - `config` / `logging` - Config file and diagnostic log

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod loader;
pub mod logging;
pub mod models;
pub mod ui;

// Re-export commonly used types
pub use models::{Episode, EpisodeKey, SeasonListing, SeasonSummary, SeriesDetails, SimilarSeries};

pub use api::{CatalogClient, CatalogError, SeriesBundle};
pub use app::{App, Modal, ModalChoice, ModalState, TvDetailsPage};
pub use loader::FetchEvent;
