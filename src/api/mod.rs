//! API clients for external services
//!
//! - Catalog: series details, similar titles and season listings from the Fyvio backend

pub mod catalog;

pub use catalog::{CatalogClient, CatalogError, SeriesBundle};
