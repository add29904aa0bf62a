//! CLI - Command Line Interface for Fyvio
//!
//! `fyvio tv <ID>` opens the interactive series page. Every other
//! subcommand prints what the page would fetch, as text or JSON.
//!
//! # Examples
//!
//! ```bash
//! # Open the series page on season 2
//! fyvio tv 1399 --season 2
//!
//! # Scripting
//! fyvio info 1399 --json
//! fyvio episodes 1399 -s 1
//! fyvio watch-url 1399 -s 1 -e 3
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Series or season not found
    NotFound = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Fyvio - TV series details in your terminal
#[derive(Parser, Debug)]
#[command(
    name = "fyvio",
    version,
    about = "TV series details, seasons and episodes from a Fyvio backend",
    arg_required_else_help = true,
    after_help = "EXAMPLES:\n\
                  fyvio tv 1399                   Open the series page\n\
                  fyvio tv 1399 -s 3              Open on season 3\n\
                  fyvio episodes 1399 --json      Season 1 episodes as JSON\n\
                  fyvio watch-url 1399 -s 1 -e 2  Backend watch link"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Backend base URL (overrides FYVIO_API_BASE and the config file)
    #[arg(long, short = 'b', global = true)]
    pub base_url: Option<String>,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Interactive page rather than a one-shot command
    pub fn is_tui_mode(&self) -> bool {
        matches!(self.command, Command::Tv(_))
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the interactive series page
    Tv(TvCmd),

    /// Print series details
    #[command(visible_alias = "i")]
    Info(SeriesArg),

    /// List similar series
    #[command(visible_alias = "sim")]
    Similar(SimilarCmd),

    /// List a series' seasons in order
    Seasons(SeriesArg),

    /// List the episodes of one season
    #[command(visible_alias = "ep")]
    Episodes(EpisodesCmd),

    /// Print the backend watch link for a series or episode
    WatchUrl(WatchUrlCmd),

    /// Show or update the config file
    Config(ConfigCmd),
}

/// Just a series id
#[derive(Args, Debug)]
pub struct SeriesArg {
    /// Series id (e.g. 1399)
    pub id: u64,
}

#[derive(Args, Debug)]
pub struct TvCmd {
    /// Series id (e.g. 1399)
    pub id: u64,

    /// Season to open on (default: config, then 1)
    #[arg(long, short = 's', value_parser = clap::value_parser!(u32).range(1..))]
    pub season: Option<u32>,
}

#[derive(Args, Debug)]
pub struct SimilarCmd {
    /// Series id (e.g. 1399)
    pub id: u64,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct EpisodesCmd {
    /// Series id (e.g. 1399)
    pub id: u64,

    /// Season number (default: config, then 1)
    #[arg(long, short = 's')]
    pub season: Option<u32>,
}

#[derive(Args, Debug)]
pub struct WatchUrlCmd {
    /// Series id (e.g. 1399)
    pub id: u64,

    /// Season number (requires --episode)
    #[arg(long, short = 's', requires = "episode")]
    pub season: Option<u32>,

    /// Episode number (requires --season)
    #[arg(long, short = 'e', requires = "season")]
    pub episode: Option<u32>,
}

#[derive(Args, Debug)]
pub struct ConfigCmd {
    /// Store this backend base URL
    #[arg(long = "set-base-url")]
    pub set_base_url: Option<String>,

    /// Store this default season
    #[arg(long = "set-default-season")]
    pub set_default_season: Option<u32>,
}

impl ConfigCmd {
    pub fn has_updates(&self) -> bool {
        self.set_base_url.is_some() || self.set_default_season.is_some()
    }
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// JSON envelope: `{success, data}` or `{success: false, error, code}`
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            success: false,
            data: None,
            error: Some(msg.into()),
            code: code.into(),
        }
    }
}

/// Response of `watch-url`
#[derive(Debug, Serialize, Deserialize)]
pub struct WatchUrlResponse {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    pub url: String,
}

/// Response of `config`
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// URL in effect after flag/env/file resolution
    pub base_url: String,
    pub default_season: u32,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data as JSON, or one line per item via `Display`
    pub fn print_list<T: Serialize + std::fmt::Display>(&self, items: &[T]) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&JsonOutput::success(items))?);
        } else {
            for item in items {
                println!("{}", item);
            }
        }
        Ok(())
    }

    /// Print one success value as JSON, or via `Display`
    pub fn print_item<T: Serialize + std::fmt::Display>(&self, item: &T) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&JsonOutput::success(item))?);
        } else {
            println!("{}", item);
        }
        Ok(())
    }

    /// Print success data, pretty JSON either way
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&JsonOutput::success(data))?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
