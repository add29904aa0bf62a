//! App state and core application logic
//!
//! Holds the series page state, the modal state machines and the
//! generation counters that keep late responses from overwriting newer ones.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::catalog::{watch_url, SeriesBundle};
use crate::loader::FetchEvent;
use crate::models::*;

/// Season selected when a series is opened
pub const DEFAULT_SEASON: u32 = 1;

// =============================================================================
// Fetch Requests
// =============================================================================

/// Work the page asks the event loop to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRequest {
    /// Details + similar list, fetched together
    Series { generation: u64, id: u64 },
    /// Season list + episodes of one season
    Season { generation: u64, id: u64, season: u32 },
}

// =============================================================================
// Modals
// =============================================================================

/// The three choice dialogs on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modal {
    /// Player choice for the whole series
    Watch,
    /// Player choice for one episode
    WatchEpisode,
    /// Download options
    Download,
}

impl Modal {
    /// Stacking order, bottom to top
    pub const ALL: [Modal; 3] = [Modal::Watch, Modal::WatchEpisode, Modal::Download];

    pub fn title(self) -> &'static str {
        match self {
            Modal::Watch | Modal::WatchEpisode => "Choose Player",
            Modal::Download => "Download Options",
        }
    }

    /// Choices in display order; Cancel is always last
    pub fn choices(self) -> &'static [ModalChoice] {
        match self {
            Modal::Watch | Modal::WatchEpisode => {
                &[ModalChoice::MxPlayer, ModalChoice::Vlc, ModalChoice::Cancel]
            }
            Modal::Download => &[ModalChoice::Download, ModalChoice::Cancel],
        }
    }
}

/// A button inside a modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalChoice {
    MxPlayer,
    Vlc,
    Download,
    Cancel,
}

impl ModalChoice {
    pub fn label(self) -> &'static str {
        match self {
            ModalChoice::MxPlayer => "MX Player (Free)",
            ModalChoice::Vlc => "VLC Player",
            ModalChoice::Download => "Download",
            ModalChoice::Cancel => "Cancel",
        }
    }
}

/// Closed → Open → Closed; the cursor is the highlighted choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open { cursor: usize },
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        matches!(self, ModalState::Open { .. })
    }

    pub fn cursor(&self) -> Option<usize> {
        match self {
            ModalState::Open { cursor } => Some(*cursor),
            ModalState::Closed => None,
        }
    }
}

/// A non-cancel choice made in a modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModalOutcome {
    pub modal: Modal,
    pub choice: ModalChoice,
    /// Episode for `WatchEpisode`, `None` for the whole series
    pub target: Option<EpisodeKey>,
}

// =============================================================================
// Selection State
// =============================================================================

/// Selection state for list views
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Scroll offset for viewport
    pub offset: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self {
            selected: 0,
            offset: 0,
            len,
        }
    }

    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.offset {
                self.offset = self.selected;
            }
        }
    }

    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
        if self.selected < self.offset {
            self.offset = self.selected;
        }
    }

    pub fn page_down(&mut self, page_size: usize) {
        if self.len > 0 {
            self.selected = (self.selected + page_size).min(self.len - 1);
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    /// Offset that keeps the selection inside a viewport of `visible_height` rows
    pub fn visible_offset(&self, visible_height: usize) -> usize {
        if visible_height == 0 {
            return self.selected;
        }
        if self.selected < self.offset {
            self.selected
        } else if self.selected >= self.offset + visible_height {
            self.selected + 1 - visible_height
        } else {
            self.offset
        }
    }

    /// Replace the list contents; selection returns to the top
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        self.selected = 0;
        self.offset = 0;
    }
}

// =============================================================================
// TV Details Page
// =============================================================================

/// State of the series page
#[derive(Debug, Clone)]
pub struct TvDetailsPage {
    pub series_id: Option<u64>,
    /// True until the details/similar fetch settles
    pub loading: bool,
    pub details: Option<SeriesDetails>,
    pub similar: Vec<SimilarSeries>,
    /// Season selector entries, ascending
    pub seasons: Vec<SeasonSummary>,
    pub episodes: Vec<Episode>,
    /// Season that `episodes` were fetched for
    pub episodes_season: Option<u32>,
    pub selected_season: u32,
    pub episode_list: ListState,

    watch: ModalState,
    watch_episode: ModalState,
    download: ModalState,
    episode_target: Option<EpisodeKey>,

    /// Season whose last fetch failed
    season_error: Option<u32>,

    series_generation: u64,
    season_generation: u64,
}

impl Default for TvDetailsPage {
    fn default() -> Self {
        Self {
            series_id: None,
            loading: true,
            details: None,
            similar: Vec::new(),
            seasons: Vec::new(),
            episodes: Vec::new(),
            episodes_season: None,
            selected_season: DEFAULT_SEASON,
            episode_list: ListState::default(),
            watch: ModalState::Closed,
            watch_episode: ModalState::Closed,
            download: ModalState::Closed,
            episode_target: None,
            season_error: None,
            series_generation: 0,
            season_generation: 0,
        }
    }
}

impl TvDetailsPage {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Fetch lifecycle
    // -------------------------------------------------------------------------

    /// Show a new series; returns the two fetches to run
    pub fn open_series(&mut self, id: u64, season: u32) -> [FetchRequest; 2] {
        *self = Self {
            series_generation: self.series_generation,
            season_generation: self.season_generation,
            ..Self::default()
        };
        self.series_id = Some(id);
        self.selected_season = season;

        [self.next_series_request(id), self.next_season_request(id)]
    }

    /// Re-issue both fetches for the current series
    pub fn reload(&mut self) -> Vec<FetchRequest> {
        let Some(id) = self.series_id else {
            return Vec::new();
        };
        self.loading = true;
        vec![self.next_series_request(id), self.next_season_request(id)]
    }

    /// Mark `season` selected; no request when it already is
    pub fn select_season(&mut self, season: u32) -> Option<FetchRequest> {
        let id = self.series_id?;
        if season == self.selected_season {
            return None;
        }
        self.selected_season = season;
        Some(self.next_season_request(id))
    }

    /// Step through the known seasons by `delta`, clamped at both ends
    pub fn select_adjacent_season(&mut self, delta: isize) -> Option<FetchRequest> {
        if self.seasons.is_empty() {
            return None;
        }
        let last = self.seasons.len() - 1;
        let target = match self
            .seasons
            .iter()
            .position(|s| s.season_number == self.selected_season)
        {
            Some(idx) => idx.saturating_add_signed(delta).min(last),
            None => 0,
        };
        let season = self.seasons[target].season_number;
        self.select_season(season)
    }

    fn next_series_request(&mut self, id: u64) -> FetchRequest {
        self.series_generation = self.series_generation.wrapping_add(1);
        FetchRequest::Series {
            generation: self.series_generation,
            id,
        }
    }

    fn next_season_request(&mut self, id: u64) -> FetchRequest {
        self.season_generation = self.season_generation.wrapping_add(1);
        self.season_error = None;
        FetchRequest::Season {
            generation: self.season_generation,
            id,
            season: self.selected_season,
        }
    }

    /// Store a details/similar result; returns false if it was stale
    pub fn apply_series(&mut self, generation: u64, result: Result<SeriesBundle>) -> bool {
        if generation != self.series_generation {
            tracing::debug!(generation, current = self.series_generation, "dropping stale series response");
            return false;
        }

        match result {
            Ok(bundle) => {
                self.details = Some(bundle.details);
                self.similar = bundle.similar;
            }
            Err(e) => {
                tracing::error!(series_id = ?self.series_id, "Error fetching TV details: {:#}", e);
            }
        }
        self.loading = false;
        true
    }

    /// Store a season listing; returns false if it was stale
    pub fn apply_season(
        &mut self,
        generation: u64,
        season: u32,
        result: Result<SeasonListing>,
    ) -> bool {
        if generation != self.season_generation {
            tracing::debug!(generation, season, current = self.season_generation, "dropping stale season response");
            return false;
        }

        match result {
            Ok(listing) => {
                let listing = listing.sorted();
                self.seasons = listing.seasons;
                self.episode_list.reset(listing.episodes.len());
                self.episodes = listing.episodes;
                self.episodes_season = Some(season);
            }
            Err(e) => {
                tracing::error!(series_id = ?self.series_id, season, "Error fetching episodes: {:#}", e);
                self.season_error = Some(season);
            }
        }
        true
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Episodes of the selected season; empty while that season is in flight
    pub fn visible_episodes(&self) -> &[Episode] {
        if self.episodes_season == Some(self.selected_season) {
            &self.episodes
        } else {
            &[]
        }
    }

    /// True when the selected season's fetch failed and nothing is in flight
    pub fn season_failed(&self) -> bool {
        self.season_error == Some(self.selected_season)
    }

    pub fn current_episode(&self) -> Option<&Episode> {
        self.visible_episodes().get(self.episode_list.selected)
    }

    pub fn has_season(&self, season: u32) -> bool {
        self.seasons.iter().any(|s| s.season_number == season)
    }

    // -------------------------------------------------------------------------
    // Modals
    // -------------------------------------------------------------------------

    pub fn modal_state(&self, modal: Modal) -> ModalState {
        match modal {
            Modal::Watch => self.watch,
            Modal::WatchEpisode => self.watch_episode,
            Modal::Download => self.download,
        }
    }

    fn modal_state_mut(&mut self, modal: Modal) -> &mut ModalState {
        match modal {
            Modal::Watch => &mut self.watch,
            Modal::WatchEpisode => &mut self.watch_episode,
            Modal::Download => &mut self.download,
        }
    }

    /// Topmost open modal, if any
    pub fn active_modal(&self) -> Option<Modal> {
        Modal::ALL
            .iter()
            .rev()
            .copied()
            .find(|m| self.modal_state(*m).is_open())
    }

    pub fn open_modal(&mut self, modal: Modal) {
        *self.modal_state_mut(modal) = ModalState::Open { cursor: 0 };
    }

    /// Open the episode player dialog for `episode`
    pub fn open_episode_modal(&mut self, episode: EpisodeKey) {
        self.episode_target = Some(episode);
        self.open_modal(Modal::WatchEpisode);
    }

    pub fn episode_target(&self) -> Option<EpisodeKey> {
        self.episode_target
    }

    pub fn modal_cursor_up(&mut self, modal: Modal) {
        if let ModalState::Open { cursor } = self.modal_state_mut(modal) {
            *cursor = cursor.saturating_sub(1);
        }
    }

    pub fn modal_cursor_down(&mut self, modal: Modal) {
        let max = modal.choices().len() - 1;
        if let ModalState::Open { cursor } = self.modal_state_mut(modal) {
            *cursor = (*cursor + 1).min(max);
        }
    }

    /// Close `modal` with `choice`; `None` for Cancel or when it was not open
    pub fn choose(&mut self, modal: Modal, choice: ModalChoice) -> Option<ModalOutcome> {
        if !self.modal_state(modal).is_open() {
            return None;
        }
        *self.modal_state_mut(modal) = ModalState::Closed;

        let target = match modal {
            Modal::WatchEpisode => self.episode_target.take(),
            _ => None,
        };

        if choice == ModalChoice::Cancel {
            return None;
        }
        Some(ModalOutcome {
            modal,
            choice,
            target,
        })
    }

    /// Choose whatever the cursor points at
    pub fn confirm(&mut self, modal: Modal) -> Option<ModalOutcome> {
        let cursor = self.modal_state(modal).cursor()?;
        let choice = modal.choices().get(cursor).copied()?;
        self.choose(modal, choice)
    }

    pub fn cancel(&mut self, modal: Modal) {
        self.choose(modal, ModalChoice::Cancel);
    }
}

// =============================================================================
// Focus
// =============================================================================

/// Which part of the page receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Seasons,
    Episodes,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Focus::Seasons => Focus::Episodes,
            Focus::Episodes => Focus::Seasons,
        }
    }
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Whether the app is running
    pub running: bool,
    pub page: TvDetailsPage,
    pub focus: Focus,
    /// Last action feedback for the status bar
    pub status: Option<String>,
    /// Frame counter for the spinner
    pub tick: u64,
    base_url: String,
    pending: Vec<FetchRequest>,
}

impl App {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            running: true,
            page: TvDetailsPage::new(),
            focus: Focus::default(),
            status: None,
            tick: 0,
            base_url: base_url.into(),
            pending: Vec::new(),
        }
    }

    /// Navigate to a series
    pub fn open_series(&mut self, id: u64, season: u32) {
        tracing::info!(series_id = id, season, "opening series");
        self.focus = Focus::default();
        self.status = None;
        let requests = self.page.open_series(id, season);
        self.pending.extend(requests);
    }

    /// Hand queued fetches to the caller
    pub fn drain_requests(&mut self) -> Vec<FetchRequest> {
        std::mem::take(&mut self.pending)
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Apply a finished fetch
    pub fn handle_fetch(&mut self, event: FetchEvent) {
        match event {
            FetchEvent::Series { generation, result } => {
                self.page.apply_series(generation, result);
            }
            FetchEvent::Season {
                generation,
                season,
                result,
            } => {
                self.page.apply_season(generation, season, result);
            }
        }
    }

    fn select_season(&mut self, season: u32) {
        if let Some(request) = self.page.select_season(season) {
            tracing::info!(season, "season selected");
            self.pending.push(request);
        }
    }

    fn select_adjacent_season(&mut self, delta: isize) {
        if let Some(request) = self.page.select_adjacent_season(delta) {
            tracing::info!(season = self.page.selected_season, "season selected");
            self.pending.push(request);
        }
    }

    /// Report a modal choice; the actions themselves are not wired to anything
    fn record_outcome(&mut self, outcome: ModalOutcome) {
        let Some(id) = self.page.series_id else {
            return;
        };
        let url = watch_url(&self.base_url, id, outcome.target);
        tracing::info!(
            series_id = id,
            modal = ?outcome.modal,
            choice = ?outcome.choice,
            %url,
            "modal choice"
        );

        let subject = match outcome.target {
            Some(key) => key.to_string(),
            None => self
                .page
                .details
                .as_ref()
                .map(|d| d.name.clone())
                .unwrap_or_else(|| id.to_string()),
        };
        self.status = Some(match outcome.choice {
            ModalChoice::Download => format!("Download requested for {}: {}", subject, url),
            choice => format!("{} selected for {}: {}", choice.label(), subject, url),
        });
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returns true if event was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return true;
        }

        if let Some(modal) = self.page.active_modal() {
            return self.handle_modal_key(modal, key);
        }

        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                true
            }
            KeyCode::Char('r') => {
                let requests = self.page.reload();
                self.pending.extend(requests);
                true
            }
            _ if self.page.loading => false,
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = self.focus.toggle();
                true
            }
            KeyCode::Char('w') => {
                self.page.open_modal(Modal::Watch);
                true
            }
            KeyCode::Char('d') => {
                self.page.open_modal(Modal::Download);
                true
            }
            KeyCode::Char(c @ '1'..='9') => {
                let season = c as u32 - '0' as u32;
                if self.page.has_season(season) {
                    self.select_season(season);
                }
                true
            }
            _ => match self.focus {
                Focus::Seasons => self.handle_seasons_key(key),
                Focus::Episodes => self.handle_episodes_key(key),
            },
        }
    }

    fn handle_seasons_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Up | KeyCode::Char('k') => {
                self.select_adjacent_season(-1);
                true
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Down | KeyCode::Char('j') => {
                self.select_adjacent_season(1);
                true
            }
            KeyCode::Enter => {
                self.focus = Focus::Episodes;
                true
            }
            _ => false,
        }
    }

    fn handle_episodes_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.page.episode_list.up(),
            KeyCode::Down | KeyCode::Char('j') => self.page.episode_list.down(),
            KeyCode::PageUp => self.page.episode_list.page_up(5),
            KeyCode::PageDown => self.page.episode_list.page_down(5),
            KeyCode::Home => self.page.episode_list.first(),
            KeyCode::End => self.page.episode_list.last(),
            KeyCode::Left | KeyCode::Char('h') => self.select_adjacent_season(-1),
            KeyCode::Right | KeyCode::Char('l') => self.select_adjacent_season(1),
            KeyCode::Enter => {
                if let Some(key) = self.page.current_episode().map(Episode::key) {
                    self.page.open_episode_modal(key);
                }
            }
            _ => return false,
        }
        true
    }

    fn handle_modal_key(&mut self, modal: Modal, key: KeyEvent) -> bool {
        let outcome = match key.code {
            KeyCode::Esc | KeyCode::Char('c') | KeyCode::Char('q') => {
                self.page.cancel(modal);
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.page.modal_cursor_up(modal);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.page.modal_cursor_down(modal);
                None
            }
            KeyCode::Enter => self.page.confirm(modal),
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                match modal.choices().get(idx) {
                    Some(choice) => self.page.choose(modal, *choice),
                    None => None,
                }
            }
            _ => return false,
        };

        if let Some(outcome) = outcome {
            self.record_outcome(outcome);
        }
        true
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CatalogError;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn details() -> SeriesDetails {
        SeriesDetails {
            id: 1399,
            name: "Game of Thrones".to_string(),
            overview: "Winter is coming.".to_string(),
            poster_url: None,
            vote_average: Some(8.4),
            first_air_date: Some("2011-04-17".to_string()),
            original_language: Some("en".to_string()),
            number_of_seasons: Some(3),
        }
    }

    fn bundle() -> SeriesBundle {
        SeriesBundle {
            details: details(),
            similar: vec![SimilarSeries {
                id: 94997,
                name: "House of the Dragon".to_string(),
                poster_url: None,
                vote_average: Some(8.4),
                first_air_date: Some("2022-08-21".to_string()),
            }],
        }
    }

    fn episode(season: u32, number: u32) -> Episode {
        Episode {
            id: (season * 100 + number) as u64,
            season_number: season,
            episode_number: number,
            name: format!("Episode {}", number),
            overview: String::new(),
            air_date: None,
        }
    }

    fn listing(season: u32) -> SeasonListing {
        SeasonListing {
            seasons: vec![
                SeasonSummary {
                    season_number: 3,
                    name: None,
                    episode_count: Some(10),
                },
                SeasonSummary {
                    season_number: 1,
                    name: None,
                    episode_count: Some(10),
                },
                SeasonSummary {
                    season_number: 2,
                    name: None,
                    episode_count: Some(10),
                },
            ],
            episodes: vec![episode(season, 1), episode(season, 2)],
        }
    }

    fn generations(requests: &[FetchRequest]) -> (u64, u64) {
        let mut series = 0;
        let mut season = 0;
        for r in requests {
            match r {
                FetchRequest::Series { generation, .. } => series = *generation,
                FetchRequest::Season { generation, .. } => season = *generation,
            }
        }
        (series, season)
    }

    /// Page with details and season 1 already applied
    fn loaded_app() -> App {
        let mut app = App::new("http://host:8000");
        app.open_series(1399, 1);
        let (series_gen, season_gen) = generations(&app.drain_requests());
        app.page.apply_series(series_gen, Ok(bundle()));
        app.page.apply_season(season_gen, 1, Ok(listing(1)));
        app
    }

    // -------------------------------------------------------------------------
    // Fetch Lifecycle Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_page_starts_loading() {
        let page = TvDetailsPage::new();
        assert!(page.loading);
        assert_eq!(page.selected_season, DEFAULT_SEASON);
        assert!(page.details.is_none());
    }

    #[test]
    fn test_open_series_issues_both_fetches() {
        let mut page = TvDetailsPage::new();
        let requests = page.open_series(1399, 1);
        assert_eq!(
            requests,
            [
                FetchRequest::Series { generation: 1, id: 1399 },
                FetchRequest::Season { generation: 1, id: 1399, season: 1 },
            ]
        );
        assert!(page.loading);
    }

    #[test]
    fn test_apply_series_success_populates() {
        let mut page = TvDetailsPage::new();
        page.open_series(1399, 1);
        assert!(page.apply_series(1, Ok(bundle())));
        assert!(!page.loading);
        assert_eq!(page.details.as_ref().unwrap().name, "Game of Thrones");
        assert_eq!(page.similar.len(), 1);
    }

    #[test]
    fn test_apply_series_failure_clears_loading() {
        let mut page = TvDetailsPage::new();
        page.open_series(1399, 1);
        assert!(page.apply_series(1, Err(CatalogError::ServerError(500).into())));
        assert!(!page.loading);
        assert!(page.details.is_none());
        assert!(page.similar.is_empty());
    }

    #[test]
    fn test_stale_series_response_ignored() {
        let mut page = TvDetailsPage::new();
        page.open_series(1, 1);
        page.open_series(1399, 1);

        // Generation 1 belonged to series 1
        let mut stale = bundle();
        stale.details.name = "Stale".to_string();
        assert!(!page.apply_series(1, Ok(stale)));
        assert!(page.loading);
        assert!(page.details.is_none());

        assert!(page.apply_series(2, Ok(bundle())));
        assert_eq!(page.details.as_ref().unwrap().name, "Game of Thrones");
    }

    #[test]
    fn test_apply_season_sorts_and_stores() {
        let mut page = TvDetailsPage::new();
        page.open_series(1399, 1);
        assert!(page.apply_season(1, 1, Ok(listing(1))));

        let numbers: Vec<u32> = page.seasons.iter().map(|s| s.season_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(page.visible_episodes().len(), 2);
        assert!(page.visible_episodes().iter().all(|e| e.season_number == 1));
    }

    #[test]
    fn test_select_season_issues_fetch() {
        let mut page = TvDetailsPage::new();
        page.open_series(1399, 1);
        page.apply_season(1, 1, Ok(listing(1)));

        let request = page.select_season(2);
        assert_eq!(
            request,
            Some(FetchRequest::Season { generation: 2, id: 1399, season: 2 })
        );
        assert_eq!(page.selected_season, 2);
        // Old season's episodes hidden until the new listing arrives
        assert!(page.visible_episodes().is_empty());

        page.apply_season(2, 2, Ok(listing(2)));
        assert!(page.visible_episodes().iter().all(|e| e.season_number == 2));
    }

    #[test]
    fn test_select_same_season_is_noop() {
        let mut page = TvDetailsPage::new();
        page.open_series(1399, 1);
        assert_eq!(page.select_season(1), None);
    }

    #[test]
    fn test_select_season_without_series() {
        let mut page = TvDetailsPage::new();
        assert_eq!(page.select_season(2), None);
    }

    #[test]
    fn test_stale_season_response_ignored() {
        let mut page = TvDetailsPage::new();
        page.open_series(1399, 1);
        page.select_season(2);
        page.select_season(3);

        // Season 2 answer arrives after season 3 was requested
        assert!(!page.apply_season(2, 2, Ok(listing(2))));
        assert!(page.episodes.is_empty());

        assert!(page.apply_season(3, 3, Ok(listing(3))));
        assert!(page.visible_episodes().iter().all(|e| e.season_number == 3));
    }

    #[test]
    fn test_season_failure_keeps_previous_state() {
        let mut page = TvDetailsPage::new();
        page.open_series(1399, 1);
        page.apply_season(1, 1, Ok(listing(1)));
        page.select_season(2);

        assert!(page.apply_season(2, 2, Err(CatalogError::NotFound.into())));
        assert_eq!(page.seasons.len(), 3);
        assert_eq!(page.episodes.len(), 2);
        assert_eq!(page.episodes_season, Some(1));
    }

    #[test]
    fn test_failed_season_is_reported_until_reissued() {
        let mut page = TvDetailsPage::new();
        page.open_series(1399, 1);
        page.apply_season(1, 1, Ok(listing(1)));
        page.select_season(2);
        assert!(!page.season_failed());

        page.apply_season(2, 2, Err(CatalogError::ServerError(500).into()));
        assert!(page.season_failed());
        assert!(page.visible_episodes().is_empty());

        // Back to season 1 issues a new request and clears the failure
        page.select_season(1);
        assert!(!page.season_failed());

        let requests = page.reload();
        page.apply_season(generations(&requests).1, 1, Ok(listing(1)));
        assert!(!page.season_failed());
        assert_eq!(page.visible_episodes().len(), 2);
    }

    #[test]
    fn test_select_adjacent_season_clamps() {
        let mut page = TvDetailsPage::new();
        page.open_series(1399, 1);
        page.apply_season(1, 1, Ok(listing(1)));

        assert_eq!(page.select_adjacent_season(-1), None);
        assert!(page.select_adjacent_season(1).is_some());
        assert_eq!(page.selected_season, 2);
        page.select_adjacent_season(5);
        assert_eq!(page.selected_season, 3);
    }

    #[test]
    fn test_reload_reissues_fetches() {
        let mut page = TvDetailsPage::new();
        assert!(page.reload().is_empty());

        page.open_series(1399, 1);
        page.apply_series(1, Ok(bundle()));
        let requests = page.reload();
        assert_eq!(requests.len(), 2);
        assert!(page.loading);
        assert_eq!(generations(&requests), (2, 2));
    }

    // -------------------------------------------------------------------------
    // Modal Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_modal_open_and_choose_closes() {
        let mut page = TvDetailsPage::new();
        page.open_series(1399, 1);

        page.open_modal(Modal::Watch);
        assert!(page.modal_state(Modal::Watch).is_open());
        assert_eq!(page.active_modal(), Some(Modal::Watch));

        let outcome = page.choose(Modal::Watch, ModalChoice::Vlc);
        assert_eq!(
            outcome,
            Some(ModalOutcome {
                modal: Modal::Watch,
                choice: ModalChoice::Vlc,
                target: None,
            })
        );
        assert_eq!(page.modal_state(Modal::Watch), ModalState::Closed);
    }

    #[test]
    fn test_modal_cancel_closes_without_outcome() {
        let mut page = TvDetailsPage::new();
        for modal in Modal::ALL {
            page.open_modal(modal);
            assert!(page.modal_state(modal).is_open());
            assert_eq!(page.choose(modal, ModalChoice::Cancel), None);
            assert!(!page.modal_state(modal).is_open());
        }
    }

    #[test]
    fn test_modals_are_independent() {
        let mut page = TvDetailsPage::new();
        page.open_modal(Modal::Watch);
        page.open_modal(Modal::Download);
        assert_eq!(page.active_modal(), Some(Modal::Download));

        page.cancel(Modal::Download);
        assert!(page.modal_state(Modal::Watch).is_open());
        assert_eq!(page.active_modal(), Some(Modal::Watch));
    }

    #[test]
    fn test_choose_on_closed_modal() {
        let mut page = TvDetailsPage::new();
        assert_eq!(page.choose(Modal::Download, ModalChoice::Download), None);
    }

    #[test]
    fn test_episode_modal_carries_target() {
        let mut page = TvDetailsPage::new();
        let target = EpisodeKey { season: 1, episode: 2 };
        page.open_episode_modal(target);
        assert_eq!(page.episode_target(), Some(target));

        let outcome = page.confirm(Modal::WatchEpisode).unwrap();
        assert_eq!(outcome.choice, ModalChoice::MxPlayer);
        assert_eq!(outcome.target, Some(target));
        assert_eq!(page.episode_target(), None);
    }

    #[test]
    fn test_modal_cursor_bounds() {
        let mut page = TvDetailsPage::new();
        page.open_modal(Modal::Download);
        page.modal_cursor_up(Modal::Download);
        assert_eq!(page.modal_state(Modal::Download).cursor(), Some(0));
        page.modal_cursor_down(Modal::Download);
        page.modal_cursor_down(Modal::Download);
        assert_eq!(page.modal_state(Modal::Download).cursor(), Some(1));

        // Cursor on Cancel
        assert_eq!(page.confirm(Modal::Download), None);
        assert!(!page.modal_state(Modal::Download).is_open());
    }

    #[test]
    fn test_modal_choices() {
        assert_eq!(Modal::Watch.title(), "Choose Player");
        assert_eq!(Modal::Download.title(), "Download Options");
        assert_eq!(
            Modal::WatchEpisode.choices(),
            &[ModalChoice::MxPlayer, ModalChoice::Vlc, ModalChoice::Cancel]
        );
        assert_eq!(ModalChoice::MxPlayer.label(), "MX Player (Free)");
    }

    // -------------------------------------------------------------------------
    // ListState Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_list_state_navigation() {
        let mut list = ListState::new(5);
        list.down();
        list.down();
        assert_eq!(list.selected, 2);
        list.last();
        list.down();
        assert_eq!(list.selected, 4);
        list.first();
        list.up();
        assert_eq!(list.selected, 0);
    }

    #[test]
    fn test_list_state_visible_offset() {
        let mut list = ListState::new(20);
        assert_eq!(list.visible_offset(5), 0);
        list.page_down(7);
        assert_eq!(list.visible_offset(5), 3);
    }

    // -------------------------------------------------------------------------
    // App Key Handling Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_app_quit_keys() {
        let mut app = App::new("http://host");
        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.running);

        let mut app = App::new("http://host");
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }

    #[test]
    fn test_app_open_series_queues_requests() {
        let mut app = App::new("http://host");
        app.open_series(1399, 1);
        assert_eq!(app.drain_requests().len(), 2);
        assert!(app.drain_requests().is_empty());
    }

    #[test]
    fn test_keys_ignored_while_loading() {
        let mut app = App::new("http://host");
        app.open_series(1399, 1);
        app.drain_requests();
        assert!(!app.handle_key(key(KeyCode::Char('w'))));
        assert!(app.page.active_modal().is_none());
    }

    #[test]
    fn test_number_key_selects_season() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('3')));
        assert_eq!(app.page.selected_season, 3);
        assert_eq!(
            app.drain_requests(),
            vec![FetchRequest::Season { generation: 2, id: 1399, season: 3 }]
        );

        // Unknown season number does nothing
        app.handle_key(key(KeyCode::Char('9')));
        assert_eq!(app.page.selected_season, 3);
        assert!(app.drain_requests().is_empty());
    }

    #[test]
    fn test_arrow_keys_step_seasons() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.page.selected_season, 2);
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.page.selected_season, 1);
        assert_eq!(app.drain_requests().len(), 2);
    }

    #[test]
    fn test_watch_modal_via_keys() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('w')));
        assert!(app.page.modal_state(Modal::Watch).is_open());

        app.handle_key(key(KeyCode::Char('2')));
        assert!(!app.page.modal_state(Modal::Watch).is_open());
        assert_eq!(
            app.status.as_deref(),
            Some("VLC Player selected for Game of Thrones: http://host:8000/watch/1399")
        );
    }

    #[test]
    fn test_escape_cancels_modal() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('d')));
        assert!(app.page.modal_state(Modal::Download).is_open());
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.page.modal_state(Modal::Download).is_open());
        assert!(app.status.is_none());
        assert!(app.running);
    }

    #[test]
    fn test_episode_enter_opens_episode_modal() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Episodes);

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.page.modal_state(Modal::WatchEpisode).is_open());

        app.handle_key(key(KeyCode::Enter));
        assert_eq!(
            app.status.as_deref(),
            Some(
                "MX Player (Free) selected for S1E2: \
                 http://host:8000/watch/1399?season_number=1&episode_number=2"
            )
        );
    }

    #[test]
    fn test_download_choice_status() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Char('d')));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(
            app.status.as_deref(),
            Some("Download requested for Game of Thrones: http://host:8000/watch/1399")
        );
    }

    #[test]
    fn test_handle_fetch_routes_events() {
        let mut app = App::new("http://host");
        app.open_series(1399, 1);
        app.drain_requests();

        app.handle_fetch(FetchEvent::Series {
            generation: 1,
            result: Ok(bundle()),
        });
        app.handle_fetch(FetchEvent::Season {
            generation: 1,
            season: 1,
            result: Ok(listing(1)),
        });
        assert!(!app.page.loading);
        assert_eq!(app.page.visible_episodes().len(), 2);
    }
}
