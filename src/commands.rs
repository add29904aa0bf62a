//! CLI Command Handlers
//!
//! One-shot versions of what the series page fetches.
//! Each handler takes CLI args and Output, returns ExitCode.

use std::path::PathBuf;

use crate::api::catalog::is_not_found;
use crate::api::CatalogClient;
use crate::cli::{
    ConfigCmd, ConfigResponse, EpisodesCmd, ExitCode, Output, SeriesArg, SimilarCmd,
    WatchUrlCmd, WatchUrlResponse,
};
use crate::config::Config;
use crate::models::EpisodeKey;

/// Map a catalog failure to an exit code: 404 is NotFound, the rest is network
fn fetch_failed(output: &Output, what: &str, err: anyhow::Error) -> ExitCode {
    tracing::warn!("{} failed: {:#}", what, err);
    let code = if is_not_found(&err) {
        ExitCode::NotFound
    } else {
        ExitCode::NetworkError
    };
    output.error(format!("{} failed: {:#}", what, err), code)
}

fn serialize_failed(output: &Output, err: anyhow::Error) -> ExitCode {
    output.error(format!("Failed to serialize: {}", err), ExitCode::Error)
}

// =============================================================================
// Info Command
// =============================================================================

pub async fn info_cmd(cmd: SeriesArg, client: &CatalogClient, output: &Output) -> ExitCode {
    output.info(format!("Getting info for: {}", cmd.id));

    match client.series_details(cmd.id).await {
        Ok(details) => {
            if let Err(e) = output.print_item(&details) {
                return serialize_failed(output, e);
            }
            if !output.json && !details.overview.is_empty() {
                println!("\n{}", details.overview);
            }
            ExitCode::Success
        }
        Err(e) => fetch_failed(output, "Series info", e),
    }
}

// =============================================================================
// Similar Command
// =============================================================================

pub async fn similar_cmd(cmd: SimilarCmd, client: &CatalogClient, output: &Output) -> ExitCode {
    output.info(format!("Fetching titles similar to: {}", cmd.id));

    match client.similar_series(cmd.id).await {
        Ok(mut similar) => {
            similar.truncate(cmd.limit);
            if similar.is_empty() {
                output.info("No similar series");
            }
            if let Err(e) = output.print_list(&similar) {
                return serialize_failed(output, e);
            }
            ExitCode::Success
        }
        Err(e) => fetch_failed(output, "Similar series", e),
    }
}

// =============================================================================
// Seasons Command
// =============================================================================

/// Season summaries ride along with every season listing, so ask for season 1
pub async fn seasons_cmd(cmd: SeriesArg, client: &CatalogClient, output: &Output) -> ExitCode {
    match client.season(cmd.id, crate::app::DEFAULT_SEASON).await {
        Ok(listing) => {
            if let Err(e) = output.print_list(&listing.seasons) {
                return serialize_failed(output, e);
            }
            ExitCode::Success
        }
        Err(e) => fetch_failed(output, "Season list", e),
    }
}

// =============================================================================
// Episodes Command
// =============================================================================

pub async fn episodes_cmd(
    cmd: EpisodesCmd,
    season: u32,
    client: &CatalogClient,
    output: &Output,
) -> ExitCode {
    output.info(format!("Fetching season {} of {}", season, cmd.id));

    match client.season(cmd.id, season).await {
        Ok(listing) => {
            if let Err(e) = output.print_list(&listing.episodes) {
                return serialize_failed(output, e);
            }
            ExitCode::Success
        }
        Err(e) => fetch_failed(output, "Episode list", e),
    }
}

// =============================================================================
// Watch URL Command
// =============================================================================

pub fn watch_url_cmd(cmd: WatchUrlCmd, client: &CatalogClient, output: &Output) -> ExitCode {
    let episode = match (cmd.season, cmd.episode) {
        (Some(season), Some(episode)) => Some(EpisodeKey { season, episode }),
        (None, None) => None,
        _ => {
            return output.error(
                "--season and --episode must be given together",
                ExitCode::InvalidArgs,
            )
        }
    };

    let url = client.watch_url(cmd.id, episode);
    let result = if output.json {
        output.print(WatchUrlResponse {
            id: cmd.id,
            season: cmd.season,
            episode: cmd.episode,
            url,
        })
    } else {
        println!("{}", url);
        Ok(())
    };

    match result {
        Ok(()) => ExitCode::Success,
        Err(e) => serialize_failed(output, e),
    }
}

// =============================================================================
// Config Command
// =============================================================================

/// Print the effective config; with `--set-*` flags, update and save it first
pub fn config_cmd(
    cmd: ConfigCmd,
    mut config: Config,
    path: Option<PathBuf>,
    base_url_override: Option<&str>,
    output: &Output,
) -> ExitCode {
    let path = path.or_else(Config::path);

    if cmd.has_updates() {
        if let Some(url) = cmd.set_base_url {
            config.base_url = Some(url);
        }
        if let Some(season) = cmd.set_default_season {
            if season == 0 {
                return output.error("Season numbers start at 1", ExitCode::InvalidArgs);
            }
            config.default_season = Some(season);
        }

        let Some(target) = path.as_deref() else {
            return output.error("Could not determine config path", ExitCode::Error);
        };
        if let Err(e) = config.save_to(target) {
            return output.error(format!("Saving config failed: {:#}", e), ExitCode::Error);
        }
        tracing::info!(path = %target.display(), "config saved");
        output.info(format!("Saved {}", target.display()));
    }

    let response = ConfigResponse {
        path,
        base_url: config.base_url(base_url_override),
        default_season: config.season(None),
    };
    match output.print(response) {
        Ok(()) => ExitCode::Success,
        Err(e) => serialize_failed(output, e),
    }
}
