//! Background fetches for the series page
//!
//! Each [`FetchRequest`] runs on its own tokio task and reports back over an
//! unbounded channel, tagged with the generation it was issued under.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::api::{CatalogClient, SeriesBundle};
use crate::app::FetchRequest;
use crate::models::SeasonListing;

/// A finished fetch
#[derive(Debug)]
pub enum FetchEvent {
    Series {
        generation: u64,
        result: Result<SeriesBundle>,
    },
    Season {
        generation: u64,
        season: u32,
        result: Result<SeasonListing>,
    },
}

/// Run one request to completion
pub async fn fetch(client: &CatalogClient, request: FetchRequest) -> FetchEvent {
    match request {
        FetchRequest::Series { generation, id } => FetchEvent::Series {
            generation,
            result: client.series_bundle(id).await,
        },
        FetchRequest::Season {
            generation,
            id,
            season,
        } => FetchEvent::Season {
            generation,
            season,
            result: client.season(id, season).await,
        },
    }
}

/// Run `request` in the background and send its result to `tx`
pub fn spawn_fetch(
    client: Arc<CatalogClient>,
    request: FetchRequest,
    tx: UnboundedSender<FetchEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let event = fetch(&client, request).await;
        // Receiver gone means the UI already shut down
        if tx.send(event).is_err() {
            tracing::debug!(?request, "fetch finished after shutdown");
        }
    })
}
